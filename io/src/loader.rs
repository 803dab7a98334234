//! Resource graph and patch file loading.
//!
//! A resource graph file holds either a full API document
//!
//! ```json
//! { "entrypoint": "https://demo.example.com", "title": "Demo", "resources": [] }
//! ```
//!
//! or a bare resource array, as written by [`dump_resources`]. A bare array
//! carries no entrypoint, so one must be supplied by the caller.

use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use clientgen_core::{
    Api, PatchDocument, PatchReport, Resource, merge_patch, validate_api,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{LoadError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum ApiDocument {
    Full(Api),
    Resources(Vec<Resource>),
}

/// Loads and validates a resource graph from a JSON file.
///
/// `entrypoint` overrides the document's entrypoint and is required when
/// the file holds a bare resource array.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read,
/// [`LoadError::Json`] if it is not a resource graph, or
/// [`LoadError::InvalidApi`] if validation fails.
pub fn load_api(path: impl AsRef<Path>, entrypoint: Option<&str>) -> Result<Api> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let document: ApiDocument = serde_json::from_reader(BufReader::new(file))?;
    let api = into_api(document, entrypoint)?;
    info!(
        path = %path.display(),
        entrypoint = %api.entrypoint,
        resources = api.resources.len(),
        "Loaded API documentation"
    );
    Ok(api)
}

/// Parses and validates a resource graph from a JSON string.
///
/// # Examples
///
/// ```
/// let api = clientgen_io::parse_api(
///     r#"[{ "id": "urn:book", "name": "books", "title": "Book" }]"#,
///     Some("http://example.com"),
/// )
/// .unwrap();
/// assert_eq!(api.resources[0].title, "Book");
///
/// assert!(clientgen_io::parse_api("[]", None).is_err());
/// ```
pub fn parse_api(json: &str, entrypoint: Option<&str>) -> Result<Api> {
    let document: ApiDocument = serde_json::from_str(json)?;
    into_api(document, entrypoint)
}

fn into_api(document: ApiDocument, entrypoint: Option<&str>) -> Result<Api> {
    let mut api = match document {
        ApiDocument::Full(api) => api,
        ApiDocument::Resources(resources) => Api {
            resources,
            ..Default::default()
        },
    };
    if let Some(entrypoint) = entrypoint.filter(|e| !e.is_empty()) {
        api.entrypoint = entrypoint.to_string();
    }
    if api.entrypoint.is_empty() {
        return Err(LoadError::InvalidApi(
            "no entrypoint given for the resource list".to_string(),
        ));
    }

    let errors = validate_api(&api);
    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(LoadError::InvalidApi(message));
    }
    Ok(api)
}

/// Loads a patch document from a JSON file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read, or
/// [`LoadError::Json`] if parsing fails.
pub fn load_patch(path: impl AsRef<Path>) -> Result<PatchDocument> {
    let file = std::fs::File::open(path.as_ref())?;
    let patch = serde_json::from_reader(BufReader::new(file))?;
    Ok(patch)
}

/// Loads the patch at `path` and merges it into `api`.
///
/// # Errors
///
/// Returns the errors of [`load_patch`], or [`LoadError::Patch`] if the
/// document is malformed. `api` is untouched on error.
pub fn apply_patch_file(api: &mut Api, path: impl AsRef<Path>) -> Result<PatchReport> {
    let path = path.as_ref();
    let patch = load_patch(path)?;
    let report = merge_patch(api, &patch)?;

    info!(
        path = %path.display(),
        patched = report.patched.len(),
        added = report.added,
        overridden = report.overridden,
        "Applied patch schema"
    );
    for id in &report.unmatched {
        warn!(resource = %id, "Patch resource not found in API documentation");
    }
    Ok(report)
}

/// Writes `resources` as a pretty-printed JSON array.
///
/// The output can be read back with [`load_api`] given an entrypoint.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be written.
pub fn dump_resources(resources: &[Resource], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, resources)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    debug!(path = %path.display(), resources = resources.len(), "Dumped resources");
    Ok(())
}
