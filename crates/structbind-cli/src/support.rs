use structbind_kernel::SchemaCatalog;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "STRUCTBIND_LOG";

/// Install a stderr subscriber; `STRUCTBIND_LOG` wins over `--log-level`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub fn load_catalog_or_exit(path: &str) -> SchemaCatalog {
    SchemaCatalog::load(path).unwrap_or_else(|e| {
        eprintln!("error: failed to load catalog {path}: {e}");
        std::process::exit(2);
    })
}
