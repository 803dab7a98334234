//! Patch and generate example.
//!
//! Writes a resource graph and a patch document to a temporary directory,
//! merges the patch, runs the model generator for the `flutter-dio` target
//! and writes the bundle as YAML.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p clientgen-demos --example patch_and_generate
//! ```

use clientgen_core::{ModelGenerator, Selection, TargetKind, run};
use clientgen_io::{OutputFormat, apply_patch_file, load_api, write_bundle};

const API: &str = r#"{
    "entrypoint": "https://demo.example.com",
    "resources": [
        {
            "id": "https://demo.example.com/docs.jsonld#Book",
            "name": "books",
            "title": "Book",
            "fields": [{ "name": "isbn", "range": "http://www.w3.org/2001/XMLSchema#string" }],
            "readableFields": [{ "name": "isbn", "range": "http://www.w3.org/2001/XMLSchema#string" }],
            "writableFields": [{ "name": "isbn", "range": "http://www.w3.org/2001/XMLSchema#string" }]
        },
        { "id": "https://demo.example.com/docs.jsonld#Shelf", "name": "shelves", "title": "Shelf" }
    ]
}"#;

const PATCH: &str = r#"{
    "resources": [
        {
            "id": "Book",
            "newFields": [
                { "id": "shelf", "reference": "Shelf", "maxCardinality": 1 },
                { "id": "internalNote", "readable": false },
                { "id": "publisher", "reference": "Publisher" }
            ]
        }
    ]
}"#;

fn main() {
    let dir = std::env::temp_dir().join("clientgen_demo_patch");
    std::fs::create_dir_all(&dir).unwrap();
    let api_path = dir.join("api.json");
    let patch_path = dir.join("patch.json");
    std::fs::write(&api_path, API).unwrap();
    std::fs::write(&patch_path, PATCH).unwrap();

    let mut api = load_api(&api_path, None).unwrap();
    let report = apply_patch_file(&mut api, &patch_path).unwrap();
    println!(
        "Patched {:?}: {} added, {} overridden",
        report.patched, report.added, report.overridden
    );
    for unresolved in &report.unresolved {
        println!(
            "  {}.{} references unknown {}",
            unresolved.resource, unresolved.field, unresolved.reference
        );
    }

    let mut generator = ModelGenerator::new(TargetKind::FlutterDio);
    let outcome = run(&api, &Selection::all().with_prefix("Demo"), &mut generator).unwrap();
    println!("Generated {} resource(s)", outcome.processed.len());

    let mut bundle = generator.into_bundle();
    let out = dir.join("model.yaml");
    write_bundle(&mut bundle, &out, OutputFormat::Yaml).unwrap();
    println!("{}", std::fs::read_to_string(&out).unwrap());

    std::fs::remove_dir_all(&dir).ok();
}
