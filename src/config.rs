use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME, CONFIG_HOME_ENV, DEFAULT_ORGANIZATION};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// one working tree to inspect
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RepoConfig {
    /// human label, used in reports
    pub name: String,
    /// identifier used as the `github_commands` key; derived from `name` when empty
    #[serde(default)]
    pub key: String,
    pub path: PathBuf,
    /// remote to suggest in setup commands; derived from the organization when absent
    pub remote_url: Option<String>,
}

/// deployment workflow template parameters
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    pub app_name: String,
    /// app directory relative to the workflow root
    pub app_dir: String,
    #[serde(default = "default_workflow_file")]
    pub file_name: String,
    #[serde(default = "default_node_version")]
    pub node_version: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_organization")]
    pub organization: String,
    /// resolved against the config directory; `<config dir>/reports` when unset
    #[serde(default)]
    pub output_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    pub command_timeout_secs: Option<u64>,
    pub workflow_root: Option<PathBuf>,
    #[serde(default)]
    pub repos: Vec<RepoConfig>,
    pub workflow: Option<WorkflowConfig>,
}

fn default_organization() -> String {
    DEFAULT_ORGANIZATION.to_string()
}

fn default_workflow_file() -> String {
    "deploy-bot.yml".to_string()
}

fn default_node_version() -> String {
    "18".to_string()
}

impl Config {
    /// `$GIT_READINESS_CONFIG_HOME/config.toml`, else the platform config dir
    ///
    /// Linux   :   $XDG_CONFIG_HOME/git-readiness or $HOME/.config/git-readiness
    /// macOS   :   $HOME/Library/Application Support/git-readiness
    /// Windows :   %AppData%\Roaming\git-readiness
    pub fn default_path() -> Result<PathBuf> {
        Ok(config_home(std::env::var(CONFIG_HOME_ENV).ok())?.join(CONFIG_FILE_NAME))
    }

    /// read, resolve and validate a config file
    ///
    /// relative paths are resolved against the config file's directory and a
    /// leading `~/` expands to the home directory.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&content, base_dir)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(content: &str, base_dir: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.resolve(base_dir);
        config.validate()?;
        Ok(config)
    }

    fn resolve(&mut self, base_dir: &Path) {
        let resolve = |path: &Path| resolve_path(path, base_dir);

        self.output_dir = if self.output_dir.as_os_str().is_empty() {
            base_dir.join("reports")
        } else {
            resolve(&self.output_dir)
        };
        self.log_file = self.log_file.as_deref().map(resolve);
        self.workflow_root = self.workflow_root.as_deref().map(resolve);

        for repo in &mut self.repos {
            repo.path = resolve(&repo.path);
            if repo.key.trim().is_empty() {
                repo.key = derive_key(&repo.name);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.repos.is_empty() {
            bail!("no repositories configured (add at least one [[repos]] entry)");
        }

        let mut seen = HashSet::new();
        for repo in &self.repos {
            if repo.name.trim().is_empty() {
                bail!("repository at {} has an empty name", repo.path.display());
            }
            if repo.key.is_empty() {
                bail!("repository '{}' has no usable key", repo.name);
            }
            if !seen.insert(repo.key.as_str()) {
                bail!("duplicate repository key '{}'", repo.key);
            }
        }

        if self.organization.trim().is_empty() {
            bail!("organization must not be empty");
        }
        if self.command_timeout_secs == Some(0) {
            bail!("command_timeout_secs must be greater than zero");
        }

        Ok(())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    /// directory that receives `.github/workflows`; defaults to the first repository
    pub fn workflow_root(&self) -> Option<&Path> {
        self.workflow_root
            .as_deref()
            .or_else(|| self.repos.first().map(|r| r.path.as_path()))
    }

    pub fn remote_url(&self, repo: &RepoConfig) -> String {
        repo.remote_url.clone().unwrap_or_else(|| {
            format!(
                "https://github.com/{}/{}.git",
                self.organization,
                repo.key.replace('_', "-")
            )
        })
    }
}

fn config_home(env_value: Option<String>) -> Result<PathBuf> {
    if let Some(dir) = env_value.filter(|v| !v.is_empty()) {
        return Ok(dir.into());
    }

    match dirs::config_dir() {
        Some(dir) => Ok(dir.join(APP_DIR_NAME)),
        None => bail!(
            "could not find your config directory; set {} or pass --config",
            CONFIG_HOME_ENV
        ),
    }
}

fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// "STAYArta Command Center" -> "stayarta_command_center"
fn derive_key(name: &str) -> String {
    let mut key = String::new();
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_lowercase());
        } else if !key.ends_with('_') && !key.is_empty() {
            key.push('_');
        }
    }
    key.trim_end_matches('_').to_string()
}
