//! Structbind CLI: the `structbind` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_logging(&cli.log_level);

    match cli.command {
        Commands::Resolve {
            primary,
            catalog,
            views,
            delegate,
        } => commands::resolve::run(primary, catalog, views, delegate),

        Commands::Converge { types, catalog } => commands::converge::run(types, catalog),

        Commands::Catalog { catalog } => commands::catalog::run(catalog),
    }
}
