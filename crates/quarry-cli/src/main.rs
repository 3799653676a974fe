//! quarry - repository search for binary packages

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quarry_cli::{Cli, Commands, cmd};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            pattern,
            mode,
            field,
            sort,
        } => cmd::search::search(cli.repo, &pattern, mode, field, sort),
        Commands::Query { pattern, mode } => cmd::search::query(cli.repo, &pattern, mode),
        Commands::Groups {
            pattern,
            mode,
            comments,
        } => cmd::groups::groups(cli.repo, &pattern, mode, comments),
        Commands::Provides { capability, shlib } => {
            cmd::which::provides(cli.repo, &capability, shlib)
        }
        Commands::Requires { capability, shlib } => {
            cmd::which::requires(cli.repo, &capability, shlib)
        }
        Commands::Show { name } => cmd::show::show(cli.repo, &name),
        Commands::Stats => cmd::stats::stats(cli.repo),
    }
}
