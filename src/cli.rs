use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// git-readiness: inspect local git working trees and report whether they are ready for GitHub
#[derive(Parser, Debug)]
#[command(name = "git-readiness", about, long_about = None)]
pub struct Cli {
    /// config file (default: $GIT_READINESS_CONFIG_HOME/config.toml or the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// fail on the first git query error instead of falling back to defaults
    #[arg(long, global = true)]
    pub strict: bool,

    /// kill git queries that run longer than this many seconds
    #[arg(long, value_name = "SECS", global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// only print warnings and errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// print the status of every configured repository
    Status,
    /// write the GitHub setup instructions report
    Instructions,
    /// write the deployment workflow template
    Workflow,
    /// write the enterprise git summary report
    Summary,
    /// instructions, workflow and summary (default)
    All,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn selected_command(&self) -> Command {
        self.command.unwrap_or(Command::All)
    }
}
