use crate::support::load_catalog_or_exit;
use structbind_kernel::{SchemaProvider, TypeId, find_converging_types};

pub fn run(types: Vec<String>, catalog_path: String) {
    let catalog = load_catalog_or_exit(&catalog_path);
    let types: Vec<TypeId> = types.into_iter().map(TypeId::new).collect();

    let unknown: Vec<&TypeId> = types
        .iter()
        .filter(|id| catalog.schema(id).is_none())
        .collect();
    if !unknown.is_empty() {
        let names: Vec<&str> = unknown.iter().map(|id| id.as_str()).collect();
        eprintln!("error: unknown types: {}", names.join(", "));
        std::process::exit(2);
    }

    let converged = find_converging_types(&types, &catalog);
    let names: Vec<&str> = converged.iter().map(TypeId::as_str).collect();
    println!("{}", names.join(", "));
}
