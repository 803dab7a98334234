//! Field resolution example.
//!
//! Builds a small resource graph in memory and prints the resolved field
//! set and imports of one resource for every built-in target.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p clientgen-demos --example resolve_fields
//! ```

use clientgen_core::{
    Api, Field, ReferenceIndex, Resource, TargetKind, resolve_resource, validate_api, xsd,
};

fn main() {
    let api = Api::new("https://demo.example.com")
        .with_resource(
            Resource::new("https://demo.example.com/docs.jsonld#Book", "books", "Book")
                .with_field(Field::new("isbn").with_range(xsd::STRING).required())
                .with_field(Field::new("price").with_range(xsd::DECIMAL))
                .with_readable(Field::new("publishedAt").with_range(xsd::DATE_TIME))
                .with_field(
                    Field::new("author")
                        .with_reference("https://demo.example.com/docs.jsonld#Person")
                        .with_max_cardinality(1)
                        .with_description(r#"The "main" author"#),
                )
                .with_field(
                    Field::new("reviews")
                        .with_reference("https://demo.example.com/docs.jsonld#BookReview"),
                ),
        )
        .with_resource(Resource::new(
            "https://demo.example.com/docs.jsonld#Person",
            "people",
            "Person",
        ))
        .with_resource(Resource::new(
            "https://demo.example.com/docs.jsonld#BookReview",
            "reviews",
            "BookReview",
        ));

    let errors = validate_api(&api);
    if !errors.is_empty() {
        for err in errors {
            eprintln!("invalid graph: {err}");
        }
        std::process::exit(1);
    }

    let index = ReferenceIndex::new(&api.resources, Some("Demo"));
    let book = &api.resources[0];

    for kind in TargetKind::ALL {
        let target = kind.descriptor();
        for &mode in target.modes {
            println!("=== {kind} ({mode:?}) ===");
            let resolved = resolve_resource(book, &index, target, mode);
            for field in &resolved.fields {
                println!(
                    "  {:<12} {:<28} readonly={:<5} required={}",
                    field.name, field.type_name, field.readonly, !field.notrequired
                );
            }
            for import in &resolved.imports {
                println!("  import {} from {}", import.type_name, import.file);
            }
            println!();
        }
    }

    // Resolved fields serialize in the shape templates consume.
    let resolved = resolve_resource(book, &index, TargetKind::Angular.descriptor(), Default::default());
    match serde_json::to_string_pretty(&resolved.fields[2]) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize field: {err}"),
    }
}
