use clap::Parser;

mod cli;
mod command;
mod config;
mod context;
mod coordinates;
mod error;
mod exec;
mod forge;
mod manifest;
mod orchestrator;
mod pipeline;
mod registry;
mod renderer;
mod repo;
mod requirement;
mod result;
mod rules;
#[cfg(test)]
mod test_helpers;

use crate::result::Result;

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("gitops_promote")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    match &cli_args.command {
        cli::Command::Promote(promote_args) => {
            command::promote::execute(&cli_args, promote_args)
        }
    }
}
