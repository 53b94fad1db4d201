use crate::support::load_catalog_or_exit;
use std::error::Error;
use structbind_kernel::{BindingsStore, TypeId};
use tracing::info;

pub fn run(primary: String, catalog_path: String, views: Vec<String>, delegate: Option<String>) {
    let store = BindingsStore::new(load_catalog_or_exit(&catalog_path));
    let primary = TypeId::new(primary);
    let views: Vec<TypeId> = views.into_iter().map(TypeId::new).collect();
    let delegate = delegate.map(TypeId::new);

    info!(catalog = %catalog_path, types = store.provider().len(), "catalog loaded");

    match store.get_bindings(&primary, &views, delegate.as_ref()) {
        Ok(bindings) => {
            println!("structbind resolve");
            println!("  Catalog: {catalog_path}");
            for line in bindings.to_string().lines() {
                println!("  {line}");
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            if let Some(cause) = err.source() {
                eprintln!("  caused by: {cause}");
            }
            std::process::exit(1);
        }
    }
}
