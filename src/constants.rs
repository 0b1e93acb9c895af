// git
pub const GIT_PROGRAM: &str = "git";
pub const ORIGIN_REMOTE: &str = "origin";
pub const UNKNOWN_BRANCH: &str = "unknown";
pub const NO_COMMIT: &str = "none";
pub const DEFAULT_PUSH_BRANCH: &str = "main";

// config
pub const APP_DIR_NAME: &str = "git-readiness";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const CONFIG_HOME_ENV: &str = "GIT_READINESS_CONFIG_HOME";
pub const DEFAULT_ORGANIZATION: &str = "STAYNova";

// reports
pub const INSTRUCTIONS_FILE_NAME: &str = "github_setup_instructions.json";
pub const SUMMARY_FILE_NAME: &str = "enterprise_git_summary.json";
pub const WORKFLOWS_DIR: &str = ".github/workflows";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
