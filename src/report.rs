use crate::config::{Config, RepoConfig};
use crate::constants::{DEFAULT_PUSH_BRANCH, UNKNOWN_BRANCH};
use crate::status::{Readiness, RepositoryStatus};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const NEXT_STEPS: [&str; 5] = [
    "Create GitHub repositories in the organization",
    "Add remote origins to local repositories",
    "Push initial commits to GitHub",
    "Setup GitHub Actions for automated deployment",
    "Configure branch protection rules",
];

const FEATURES_IMPLEMENTED: [&str; 6] = [
    "Local Git repositories initialized",
    "Branch structure created (main, development, feature branches)",
    "Automated commit system",
    "Backup branch management",
    "Git status reporting",
    "GitHub integration preparation",
];

/// repositories paired with their config entry, in configuration order
pub type Inspected<'a> = [(&'a RepoConfig, RepositoryStatus)];

#[derive(Debug, Serialize)]
pub struct SetupInstructions {
    pub timestamp: String,
    pub github_setup_required: bool,
    pub repositories: Vec<RepositoryStatus>,
    pub next_steps: Vec<String>,
    pub github_commands: BTreeMap<String, Vec<String>>,
}

impl SetupInstructions {
    pub fn build(config: &Config, inspected: &Inspected, timestamp: String) -> Self {
        let github_commands = inspected
            .iter()
            .map(|(repo, status)| (repo.key.clone(), setup_commands(config, repo, status)))
            .collect();

        Self {
            timestamp,
            github_setup_required: inspected.iter().any(|(_, status)| !status.has_remote()),
            repositories: statuses(inspected),
            next_steps: NEXT_STEPS.iter().map(ToString::to_string).collect(),
            github_commands,
        }
    }
}

/// shell commands the user would run to publish one repository
fn setup_commands(config: &Config, repo: &RepoConfig, status: &RepositoryStatus) -> Vec<String> {
    let branch = match status.current_branch() {
        UNKNOWN_BRANCH => DEFAULT_PUSH_BRANCH,
        branch => branch,
    };

    let mut commands = vec![
        format!("# Navigate to {}", repo.name),
        format!("cd {}", repo.path.display()),
    ];
    if status.has_remote() {
        commands.push("# Remote 'origin' already configured".to_string());
    } else {
        commands.push("# Add GitHub remote (replace with actual repo URL)".to_string());
        commands.push(format!("git remote add origin {}", config.remote_url(repo)));
    }
    commands.push("# Push to GitHub".to_string());
    commands.push(format!("git push -u origin {branch}"));
    commands.push("# Push all branches".to_string());
    commands.push("git push --all origin".to_string());
    commands
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Totals {
    pub repositories: usize,
    pub ready_for_github: usize,
    pub with_uncommitted_changes: usize,
    pub without_remote: usize,
}

#[derive(Debug, Serialize)]
pub struct GitSummary {
    pub timestamp: String,
    pub enterprise_git_status: String,
    pub repositories: Vec<RepositoryStatus>,
    pub features_implemented: Vec<String>,
    pub automation_level: String,
    pub next_phase: String,
    pub totals: Totals,
}

impl GitSummary {
    pub fn build(inspected: &Inspected, timestamp: String) -> Self {
        let repositories = statuses(inspected);
        let count = |readiness: Readiness| {
            repositories
                .iter()
                .filter(|s| s.status() == readiness)
                .count()
        };
        let totals = Totals {
            repositories: repositories.len(),
            ready_for_github: count(Readiness::ReadyForGithub),
            with_uncommitted_changes: count(Readiness::HasUncommittedChanges),
            without_remote: repositories.iter().filter(|s| !s.has_remote()).count(),
        };
        let enterprise_git_status = if totals.without_remote == 0 {
            "configured"
        } else {
            "pending_remotes"
        };

        Self {
            timestamp,
            enterprise_git_status: enterprise_git_status.to_string(),
            repositories,
            features_implemented: FEATURES_IMPLEMENTED.iter().map(ToString::to_string).collect(),
            automation_level: "advanced".to_string(),
            next_phase: "github_integration_and_deployment".to_string(),
            totals,
        }
    }
}

fn statuses(inspected: &Inspected) -> Vec<RepositoryStatus> {
    inspected.iter().map(|(_, status)| status.clone()).collect()
}

/// serialize `value` as 2-space indented JSON, creating parent directories
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }

    let mut json = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config() -> Config {
        Config::parse(
            r#"
organization = "Acme"

[[repos]]
name = "Command Center"
path = "/srv/cc"

[[repos]]
name = "Bot"
path = "/srv/bot"
remote_url = "https://github.com/acme/bot.git"
"#,
            Path::new("/cfg"),
        )
        .unwrap()
    }

    fn inspected(config: &Config) -> Vec<(&RepoConfig, RepositoryStatus)> {
        vec![
            (
                &config.repos[0],
                RepositoryStatus::new("Command Center", "/srv/cc", false, "unknown", true, "none"),
            ),
            (
                &config.repos[1],
                RepositoryStatus::new("Bot", "/srv/bot", true, "develop", false, "abc1234 init"),
            ),
        ]
    }

    #[test]
    fn test_instructions_commands() {
        let config = config();
        let inspected = inspected(&config);
        let instructions = SetupInstructions::build(&config, &inspected, "t".to_string());

        assert!(instructions.github_setup_required);
        assert_eq!(instructions.repositories.len(), 2);
        assert_eq!(instructions.next_steps.len(), 5);

        let cc = &instructions.github_commands["command_center"];
        assert_eq!(cc[0], "# Navigate to Command Center");
        assert_eq!(cc[1], "cd /srv/cc");
        assert!(cc.contains(&"git remote add origin https://github.com/Acme/command-center.git".to_string()));
        assert!(cc.contains(&"git push -u origin main".to_string()));

        let bot = &instructions.github_commands["bot"];
        assert!(!bot.iter().any(|c| c.starts_with("git remote add")));
        assert!(bot.contains(&"git push -u origin develop".to_string()));
    }

    #[test]
    fn test_setup_not_required_when_all_have_remotes() {
        let config = config();
        let inspected = vec![(
            &config.repos[1],
            RepositoryStatus::new("Bot", "/srv/bot", true, "main", false, "abc1234 init"),
        )];
        let instructions = SetupInstructions::build(&config, &inspected, "t".to_string());
        assert!(!instructions.github_setup_required);
    }

    #[test]
    fn test_summary_totals() {
        let config = config();
        let summary = GitSummary::build(&inspected(&config), "t".to_string());

        assert_eq!(summary.enterprise_git_status, "pending_remotes");
        assert_eq!(
            summary.totals,
            Totals {
                repositories: 2,
                ready_for_github: 1,
                with_uncommitted_changes: 1,
                without_remote: 1,
            }
        );
    }

    #[test]
    fn test_write_json_is_indented_and_creates_dirs() {
        let dir = TempDir::new().unwrap();
        let path: PathBuf = dir.path().join("nested").join("report.json");
        let config = config();
        let summary = GitSummary::build(&inspected(&config), "2026-01-01T00:00:00.000000".to_string());

        write_json(&path, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\n  \"timestamp\": \"2026-01-01T00:00:00.000000\",\n"));
        assert!(content.ends_with("}\n"));

        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["repositories"][0]["status"], "has_uncommitted_changes");
        assert_eq!(value["repositories"][1]["current_branch"], "develop");
    }
}
