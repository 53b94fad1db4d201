use crate::support::load_catalog_or_exit;

pub fn run(catalog_path: String) {
    let catalog = load_catalog_or_exit(&catalog_path);

    println!("structbind catalog");
    println!("  Catalog: {catalog_path}");
    println!("  Types: {}", catalog.len());
    for schema in catalog.schemas() {
        let supertypes: Vec<&str> = schema.supertypes.iter().map(|s| s.as_str()).collect();
        let extends = if supertypes.is_empty() {
            String::new()
        } else {
            format!(" : {}", supertypes.join(", "))
        };
        println!(
            "  {}{extends} ({} methods, {} abstract)",
            schema.id,
            schema.methods.len(),
            schema.abstract_methods().count()
        );
    }
}
