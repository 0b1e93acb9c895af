use serde::Serialize;
use std::path::{Path, PathBuf};

/// coarse readiness classification of a working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    ReadyForGithub,
    HasUncommittedChanges,
}

impl Readiness {
    pub fn from_changes(has_uncommitted_changes: bool) -> Self {
        if has_uncommitted_changes {
            Self::HasUncommittedChanges
        } else {
            Self::ReadyForGithub
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadyForGithub => "ready_for_github",
            Self::HasUncommittedChanges => "has_uncommitted_changes",
        }
    }
}

/// snapshot of a single working tree, produced fresh by each inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryStatus {
    name: String,
    path: PathBuf,
    has_remote: bool,
    current_branch: String,
    has_uncommitted_changes: bool,
    last_commit: String,
    status: Readiness,
}

impl RepositoryStatus {
    /// `status` is always derived here, never supplied by the caller
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        has_remote: bool,
        current_branch: impl Into<String>,
        has_uncommitted_changes: bool,
        last_commit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            has_remote,
            current_branch: current_branch.into(),
            has_uncommitted_changes,
            last_commit: last_commit.into(),
            status: Readiness::from_changes(has_uncommitted_changes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_remote(&self) -> bool {
        self.has_remote
    }

    pub fn current_branch(&self) -> &str {
        &self.current_branch
    }

    pub fn has_uncommitted_changes(&self) -> bool {
        self.has_uncommitted_changes
    }

    pub fn last_commit(&self) -> &str {
        &self.last_commit
    }

    pub fn status(&self) -> Readiness {
        self.status
    }
}
