use crate::constants::{GIT_PROGRAM, NO_COMMIT, ORIGIN_REMOTE, UNKNOWN_BRANCH};
use crate::runner::{CommandOutput, CommandRunner};
use crate::status::RepositoryStatus;
use std::path::{Path, PathBuf};
use thiserror::Error;

const REMOTE_ARGS: &[&str] = &["remote", "-v"];
const BRANCH_ARGS: &[&str] = &["branch", "--show-current"];
const STATUS_ARGS: &[&str] = &["status", "--porcelain"];
const LAST_COMMIT_ARGS: &[&str] = &["log", "-1", "--format=%h %s"];

/// why a single git query could not produce a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("git could not be run: {0}")]
    ToolUnavailable(String),

    #[error("not a git repository: {}", .0.display())]
    NonRepository(PathBuf),

    #[error("repository has no commits yet")]
    EmptyRepository,

    #[error("`git {command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
}

pub type Probe<T> = Result<T, ProbeError>;

/// how probe failures are handled when building a `RepositoryStatus`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InspectMode {
    /// every failure degrades to the field's fallback value
    #[default]
    Lenient,
    /// the first failure (in query order) is returned to the caller
    Strict,
}

/// raw outcome of the four independent queries against one working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probes {
    pub has_remote: Probe<bool>,
    /// `Ok(None)` when HEAD is detached
    pub current_branch: Probe<Option<String>>,
    pub has_uncommitted_changes: Probe<bool>,
    /// `Err(EmptyRepository)` when there is no history yet
    pub last_commit: Probe<String>,
}

impl Probes {
    /// absorb every failure into its documented default
    pub fn into_lenient(self, name: &str, path: &Path) -> RepositoryStatus {
        RepositoryStatus::new(
            name,
            path,
            self.has_remote.unwrap_or(false),
            self.current_branch
                .ok()
                .flatten()
                .unwrap_or_else(|| UNKNOWN_BRANCH.to_string()),
            self.has_uncommitted_changes.unwrap_or(false),
            self.last_commit.unwrap_or_else(|_| NO_COMMIT.to_string()),
        )
    }

    /// propagate the first real failure; an empty history is not one
    pub fn into_strict(self, name: &str, path: &Path) -> Result<RepositoryStatus, ProbeError> {
        let has_remote = self.has_remote?;
        let current_branch = self
            .current_branch?
            .unwrap_or_else(|| UNKNOWN_BRANCH.to_string());
        let has_uncommitted_changes = self.has_uncommitted_changes?;
        let last_commit = match self.last_commit {
            Ok(commit) => commit,
            Err(ProbeError::EmptyRepository) => NO_COMMIT.to_string(),
            Err(e) => return Err(e),
        };

        Ok(RepositoryStatus::new(
            name,
            path,
            has_remote,
            current_branch,
            has_uncommitted_changes,
            last_commit,
        ))
    }
}

/// run all four queries against `path`; none of them short-circuits the others
pub fn probe(runner: &dyn CommandRunner, path: &Path) -> Probes {
    Probes {
        has_remote: probe_remote(runner, path),
        current_branch: probe_branch(runner, path),
        has_uncommitted_changes: probe_changes(runner, path),
        last_commit: probe_last_commit(runner, path),
    }
}

/// best-effort snapshot; never fails
pub fn inspect(runner: &dyn CommandRunner, path: &Path, name: &str) -> RepositoryStatus {
    probe(runner, path).into_lenient(name, path)
}

pub fn inspect_strict(
    runner: &dyn CommandRunner,
    path: &Path,
    name: &str,
) -> Result<RepositoryStatus, ProbeError> {
    probe(runner, path).into_strict(name, path)
}

pub fn inspect_with(
    runner: &dyn CommandRunner,
    path: &Path,
    name: &str,
    mode: InspectMode,
) -> Result<RepositoryStatus, ProbeError> {
    match mode {
        InspectMode::Lenient => Ok(inspect(runner, path, name)),
        InspectMode::Strict => inspect_strict(runner, path, name),
    }
}

fn probe_remote(runner: &dyn CommandRunner, path: &Path) -> Probe<bool> {
    let stdout = query(runner, path, REMOTE_ARGS)?;
    // `git remote -v` prints "<name>\t<url> (fetch|push)"
    Ok(stdout
        .lines()
        .any(|line| line.split_whitespace().next() == Some(ORIGIN_REMOTE)))
}

fn probe_branch(runner: &dyn CommandRunner, path: &Path) -> Probe<Option<String>> {
    let stdout = query(runner, path, BRANCH_ARGS)?;
    let branch = stdout.trim();
    Ok((!branch.is_empty()).then(|| branch.to_string()))
}

fn probe_changes(runner: &dyn CommandRunner, path: &Path) -> Probe<bool> {
    let stdout = query(runner, path, STATUS_ARGS)?;
    Ok(!stdout.trim().is_empty())
}

fn probe_last_commit(runner: &dyn CommandRunner, path: &Path) -> Probe<String> {
    let stdout = query(runner, path, LAST_COMMIT_ARGS)?;
    let commit = stdout.trim();
    if commit.is_empty() {
        return Err(ProbeError::EmptyRepository);
    }
    Ok(commit.to_string())
}

/// run one git query and map a failed run to a `ProbeError`
fn query(runner: &dyn CommandRunner, path: &Path, args: &[&str]) -> Probe<String> {
    let output = runner.run(GIT_PROGRAM, args, path);
    if output.success {
        return Ok(output.stdout);
    }
    Err(classify_failure(&output, path, args))
}

fn classify_failure(output: &CommandOutput, path: &Path, args: &[&str]) -> ProbeError {
    if !output.launched {
        return ProbeError::ToolUnavailable(output.stderr.trim().to_string());
    }

    let stderr = output.stderr.to_lowercase();
    if stderr.contains("not a git repository") {
        ProbeError::NonRepository(path.to_path_buf())
    } else if stderr.contains("does not have any commits yet")
        || stderr.contains("bad default revision")
    {
        ProbeError::EmptyRepository
    } else {
        ProbeError::CommandFailed {
            command: args.join(" "),
            stderr: output.stderr.trim().to_string(),
        }
    }
}
