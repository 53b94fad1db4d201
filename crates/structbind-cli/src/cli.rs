use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "structbind",
    about = "Structbind: resolve view contracts and delegates into binding plans",
    version
)]
pub struct Cli {
    /// Log filter (overridden by STRUCTBIND_LOG), e.g. `debug` or `structbind_kernel=trace`
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the binding plan for a primary view, extra views and a delegate
    Resolve {
        /// Primary view type ID
        primary: String,

        /// Path to the contract catalog (JSON, or TOML by extension)
        #[arg(long)]
        catalog: String,

        /// Additional view type ID (repeatable)
        #[arg(long = "view")]
        views: Vec<String>,

        /// Delegate type ID
        #[arg(long)]
        delegate: Option<String>,
    },

    /// Reduce a type list to its most-derived members
    Converge {
        /// Type IDs, in order
        #[arg(required = true)]
        types: Vec<String>,

        /// Path to the contract catalog (JSON, or TOML by extension)
        #[arg(long)]
        catalog: String,
    },

    /// List the types a catalog declares
    Catalog {
        /// Path to the contract catalog (JSON, or TOML by extension)
        #[arg(long)]
        catalog: String,
    },
}
