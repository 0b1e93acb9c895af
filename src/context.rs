use crate::cli::Cli;
use crate::config::{Config, RepoConfig};
use crate::constants::{INSTRUCTIONS_FILE_NAME, SUMMARY_FILE_NAME};
use crate::git::{self, InspectMode};
use crate::log::{ActivityLog, timestamp};
use crate::report::{self, GitSummary, Inspected, SetupInstructions};
use crate::runner::{CommandRunner, SystemRunner};
use crate::status::RepositoryStatus;
use crate::{info, warning};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// application context shared by every command of a single run
pub struct AppContext {
    /// resolved and validated configuration
    pub config: Config,

    /// executes the git queries
    pub runner: Box<dyn CommandRunner>,

    /// append-only activity log
    pub log: ActivityLog,

    /// whether probe failures are absorbed or propagated
    pub mode: InspectMode,
}

impl AppContext {
    pub fn new(
        config: Config,
        runner: Box<dyn CommandRunner>,
        log: ActivityLog,
        mode: InspectMode,
    ) -> Self {
        Self {
            config,
            runner,
            log,
            mode,
        }
    }

    /// load config and wire up the system runner from command-line flags
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::default_path()?,
        };
        let config = Config::load_file(&config_path)?;

        // the flag wins over the config file
        let timeout = cli
            .timeout
            .map(Duration::from_secs)
            .or_else(|| config.command_timeout());
        let log = ActivityLog::new(config.log_file.clone());
        let mode = if cli.strict {
            InspectMode::Strict
        } else {
            InspectMode::Lenient
        };

        Ok(Self::new(
            config,
            Box::new(SystemRunner::new(timeout)),
            log,
            mode,
        ))
    }

    /// inspect every configured repository, in configuration order
    pub fn inspect_all(&self) -> Result<Vec<(&RepoConfig, RepositoryStatus)>> {
        let mut inspected = Vec::with_capacity(self.config.repos.len());
        for repo in &self.config.repos {
            self.log
                .log(&format!("checking {} repository status", repo.name));
            if !repo.path.is_dir() {
                warning!("{} does not exist or is not a directory", repo.path.display());
            }
            let status = git::inspect_with(self.runner.as_ref(), &repo.path, &repo.name, self.mode)
                .with_context(|| format!("failed to inspect {}", repo.name))?;
            inspected.push((repo, status));
        }
        Ok(inspected)
    }

    pub fn print_status(&self, inspected: &Inspected) {
        for (_, status) in inspected {
            let marker = if status.has_uncommitted_changes() {
                "[M]"
            } else {
                "[OK]"
            };
            let remote = if status.has_remote() {
                "origin"
            } else {
                "no remote"
            };
            info!(
                "{} {} ({}, {}) {}: {} at {}",
                marker,
                status.name(),
                status.current_branch(),
                remote,
                status.status().as_str(),
                status.last_commit(),
                status.path().display()
            );
        }
    }

    pub fn write_instructions(&self, inspected: &Inspected) -> Result<PathBuf> {
        let instructions = SetupInstructions::build(&self.config, inspected, timestamp());
        let path = self.config.output_dir().join(INSTRUCTIONS_FILE_NAME);
        report::write_json(&path, &instructions)?;
        self.log
            .log(&format!("GitHub setup instructions written to {}", path.display()));
        Ok(path)
    }

    /// returns `None` when no workflow is configured
    pub fn write_workflow(&self) -> Result<Option<PathBuf>> {
        let Some(workflow) = &self.config.workflow else {
            warning!("no [workflow] section configured, skipping workflow template");
            return Ok(None);
        };
        let Some(root) = self.config.workflow_root() else {
            warning!("no workflow root configured, skipping workflow template");
            return Ok(None);
        };

        let path = crate::workflow::write(root, workflow)?;
        self.log
            .log(&format!("GitHub Actions workflow written to {}", path.display()));
        Ok(Some(path))
    }

    pub fn write_summary(&self, inspected: &Inspected) -> Result<PathBuf> {
        let summary = GitSummary::build(inspected, timestamp());
        let path = self.config.output_dir().join(SUMMARY_FILE_NAME);
        report::write_json(&path, &summary)?;
        self.log
            .log(&format!("enterprise git summary written to {}", path.display()));
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CommandOutput;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// pretends every directory is a clean repo on `main` with an origin remote
    struct CleanRunner;

    impl CommandRunner for CleanRunner {
        fn run(&self, _program: &str, args: &[&str], _working_dir: &Path) -> CommandOutput {
            let stdout = match args.first().copied() {
                Some("remote") => "origin\tgit@example.com:a/b.git (fetch)\n",
                Some("branch") => "main\n",
                Some("log") => "0000001 initial\n",
                _ => "",
            };
            CommandOutput {
                success: true,
                stdout: stdout.to_string(),
                stderr: String::new(),
                launched: true,
            }
        }
    }

    /// git is never installed
    struct MissingGitRunner;

    impl CommandRunner for MissingGitRunner {
        fn run(&self, _program: &str, _args: &[&str], _working_dir: &Path) -> CommandOutput {
            CommandOutput::launch_failure("failed to run git: No such file or directory")
        }
    }

    fn context(dir: &Path, runner: Box<dyn CommandRunner>, mode: InspectMode) -> AppContext {
        let content = format!(
            r#"
output_dir = "{out}"
log_file = "{log}"
workflow_root = "{root}"

[[repos]]
name = "Alpha"
path = "{root}"

[workflow]
app_name = "Alpha"
app_dir = "alpha"
"#,
            out = dir.join("reports").display(),
            log = dir.join("activity.log").display(),
            root = dir.display(),
        );
        let config = Config::parse(&content, dir).unwrap();
        let log = ActivityLog::new(config.log_file.clone());
        AppContext::new(config, runner, log, mode)
    }

    #[test]
    fn test_full_run_writes_every_artifact() {
        let dir = TempDir::new().unwrap();
        let ctx = context(dir.path(), Box::new(CleanRunner), InspectMode::Lenient);

        let inspected = ctx.inspect_all().unwrap();
        let instructions = ctx.write_instructions(&inspected).unwrap();
        let workflow = ctx.write_workflow().unwrap().unwrap();
        let summary = ctx.write_summary(&inspected).unwrap();

        assert_eq!(instructions, dir.path().join("reports/github_setup_instructions.json"));
        assert_eq!(summary, dir.path().join("reports/enterprise_git_summary.json"));
        assert!(workflow.ends_with(".github/workflows/deploy-bot.yml"));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(value["enterprise_git_status"], "configured");
        assert_eq!(value["repositories"][0]["status"], "ready_for_github");

        let log = fs::read_to_string(dir.path().join("activity.log")).unwrap();
        assert_eq!(log.lines().count(), 4);
        assert!(log.lines().next().unwrap().ends_with(": checking Alpha repository status"));
    }

    #[test]
    fn test_lenient_mode_survives_missing_git() {
        let dir = TempDir::new().unwrap();
        let ctx = context(dir.path(), Box::new(MissingGitRunner), InspectMode::Lenient);

        let inspected = ctx.inspect_all().unwrap();
        let status = &inspected[0].1;
        assert_eq!(status.current_branch(), "unknown");
        assert_eq!(status.last_commit(), "none");
        assert!(!status.has_remote());
    }

    #[test]
    fn test_strict_mode_reports_missing_git() {
        let dir = TempDir::new().unwrap();
        let ctx = context(dir.path(), Box::new(MissingGitRunner), InspectMode::Strict);

        let err = ctx.inspect_all().unwrap_err();
        assert_eq!(err.to_string(), "failed to inspect Alpha");
        assert!(format!("{err:#}").contains("git could not be run"));
    }

    #[test]
    fn test_workflow_skipped_without_section() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(dir.path(), Box::new(CleanRunner), InspectMode::Lenient);
        ctx.config.workflow = None;

        assert_eq!(ctx.write_workflow().unwrap(), None);
        assert!(!dir.path().join(".github").exists());
    }
}
