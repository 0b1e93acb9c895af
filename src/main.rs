mod cli;
mod config;
mod constants;
mod context;
mod git;
mod log;
mod report;
mod runner;
mod status;
mod ui;
mod workflow;

use crate::cli::{Cli, Command};
use crate::context::AppContext;
use anyhow::Result;

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();
    ui::set_quiet(cli.quiet);

    let ctx = AppContext::from_cli(&cli)?;

    match cli.selected_command() {
        Command::Status => {
            let inspected = ctx.inspect_all()?;
            ctx.print_status(&inspected);
        }
        Command::Instructions => {
            let inspected = ctx.inspect_all()?;
            ctx.write_instructions(&inspected)?;
        }
        Command::Workflow => {
            ctx.write_workflow()?;
        }
        Command::Summary => {
            let inspected = ctx.inspect_all()?;
            ctx.write_summary(&inspected)?;
        }
        Command::All => {
            ctx.log.log("GitHub integration started");
            // one inspection pass feeds both reports
            let inspected = ctx.inspect_all()?;
            ctx.write_instructions(&inspected)?;
            ctx.write_workflow()?;
            ctx.write_summary(&inspected)?;
            ctx.log.log("GitHub integration completed");
        }
    }

    Ok(())
}
