//! Patch schema merging.
//!
//! A patch document adds fields to (or overrides fields of) resources of a
//! parsed API documentation before generation runs. It never removes
//! anything. Ids in the document may be short tokens; they are expanded
//! against the API entrypoint following the `docs.jsonld#` convention:
//!
//! | Patch value       | Normalized id                             |
//! |-------------------|-------------------------------------------|
//! | resource `Book`   | `<entrypoint>/docs.jsonld#Book`           |
//! | field `isbn`      | `<entrypoint>/docs.jsonld#Book/isbn`      |
//! | reference `Shelf` | `<entrypoint>/docs.jsonld#Shelf`          |
//!
//! Values already starting with `http://` or `https://` are kept as is.
//!
//! # Example
//!
//! ```
//! use clientgen_core::*;
//!
//! let mut api = Api::new("http://example.com")
//!     .with_resource(Resource::new("http://example.com/docs.jsonld#Book", "books", "Book"))
//!     .with_resource(Resource::new("http://example.com/docs.jsonld#Shelf", "shelves", "Shelf"));
//!
//! let patch: PatchDocument = serde_json::from_str(r#"{
//!     "resources": [{
//!         "id": "Book",
//!         "newFields": [
//!             { "id": "shelf", "reference": "Shelf", "maxCardinality": 1 },
//!             { "id": "internalNote", "readable": false }
//!         ]
//!     }]
//! }"#).unwrap();
//!
//! let report = merge_patch(&mut api, &patch).unwrap();
//! assert_eq!(report.added, 2);
//! assert!(report.unresolved.is_empty());
//!
//! let book = &api.resources[0];
//! assert_eq!(book.fields.len(), 2);
//! assert_eq!(book.readable_fields.len(), 1);
//! assert_eq!(book.writable_fields.len(), 2);
//! assert_eq!(
//!     book.fields[0].reference.as_deref(),
//!     Some("http://example.com/docs.jsonld#Shelf")
//! );
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::types::{Api, Field, Resource};
use crate::validate::{ValidationError, validate_patch};

/// User-authored patch document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchDocument {
    pub resources: Vec<PatchResource>,
}

/// Patch entry for one resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchResource {
    /// Resource id, absolute or a short token.
    pub id: String,
    /// Fields to add or override.
    #[serde(default)]
    pub new_fields: Vec<PatchField>,
}

/// Field declared by a patch.
///
/// `readable` and `writable` default to `true` when omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchField {
    /// Field id, absolute or a short token.
    pub id: String,
    /// Field name; defaults to the id token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Referenced resource id, absolute or a short token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "crate::types::de::lenient_bool")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cardinality: Option<u32>,
    #[serde(default, deserialize_with = "crate::types::de::lenient_bool")]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
}

impl PatchField {
    /// Creates a readable and writable patch field with the given id.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn is_readable(&self) -> bool {
        self.readable.unwrap_or(true)
    }

    pub fn is_writable(&self) -> bool {
        self.writable.unwrap_or(true)
    }
}

/// Errors that abort a patch merge.
///
/// A merge that fails leaves the API untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// The document violates structural requirements.
    #[error("malformed patch document: {}", join_errors(.0))]
    Malformed(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A patch reference that matched no resource of the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedReference {
    /// Title of the patched resource.
    pub resource: String,
    /// Name of the field carrying the reference.
    pub field: String,
    /// Normalized reference id.
    pub reference: String,
}

/// Summary of a successful merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchReport {
    /// Titles of the patched resources, in API order.
    pub patched: Vec<String>,
    /// Normalized ids of patch resources that matched nothing.
    pub unmatched: Vec<String>,
    /// Fields appended as new.
    pub added: usize,
    /// Existing fields replaced in place.
    pub overridden: usize,
    /// References kept as `None` because they matched no resource.
    pub unresolved: Vec<UnresolvedReference>,
}

/// Returns `true` for ids that must not be expanded.
pub fn is_absolute_id(id: &str) -> bool {
    id.starts_with("http://") || id.starts_with("https://")
}

/// Expands a resource (or reference) token against `entrypoint`.
///
/// # Examples
///
/// ```
/// use clientgen_core::normalize_resource_id;
///
/// assert_eq!(
///     normalize_resource_id("http://example.com", "Book"),
///     "http://example.com/docs.jsonld#Book"
/// );
/// assert_eq!(
///     normalize_resource_id("http://example.com/", "https://schema.org/Book"),
///     "https://schema.org/Book"
/// );
/// ```
pub fn normalize_resource_id(entrypoint: &str, id: &str) -> String {
    if is_absolute_id(id) {
        return id.to_string();
    }
    let separator = if entrypoint.ends_with('/') { "" } else { "/" };
    format!("{entrypoint}{separator}docs.jsonld#{id}")
}

/// Expands a field token under its normalized resource id.
pub fn normalize_field_id(resource_id: &str, id: &str) -> String {
    if is_absolute_id(id) {
        id.to_string()
    } else {
        format!("{resource_id}/{id}")
    }
}

struct NormalizedField {
    field: Field,
    readable: bool,
    writable: bool,
}

impl NormalizedField {
    fn new(patch: &PatchField, resource_id: &str, entrypoint: &str) -> Self {
        let field = Field {
            name: patch.name.clone().unwrap_or_else(|| patch.id.clone()),
            id: normalize_field_id(resource_id, &patch.id),
            range: patch.range.clone().filter(|r| !r.is_empty()),
            reference: patch
                .reference
                .as_deref()
                .filter(|r| !r.is_empty())
                .map(|r| normalize_resource_id(entrypoint, r)),
            required: patch.required,
            max_cardinality: patch.max_cardinality,
            description: patch.description.clone().filter(|d| !d.is_empty()),
            deprecated: patch.deprecated,
        };
        Self {
            field,
            readable: patch.is_readable(),
            writable: patch.is_writable(),
        }
    }
}

/// Merges `patch` into `api`.
///
/// New fields are appended to `fields`, to `readable_fields` when readable
/// and to `writable_fields` when writable. A field whose id already exists
/// on the resource is replaced in place in every list holding it and added
/// to the lists its flags require, so merging the same patch twice yields
/// the same API.
///
/// References are resolved against the resources present before the merge.
/// Unresolved references are reported and the field is kept without one.
///
/// # Errors
///
/// Returns [`PatchError::Malformed`] without touching `api` when the
/// document fails [`validate_patch`].
pub fn merge_patch(api: &mut Api, patch: &PatchDocument) -> Result<PatchReport, PatchError> {
    let errors = validate_patch(patch, &api.entrypoint);
    if !errors.is_empty() {
        return Err(PatchError::Malformed(errors));
    }

    let entrypoint = api.entrypoint_with_slash();
    let mut order = Vec::with_capacity(patch.resources.len());
    let mut patches: HashMap<String, Vec<NormalizedField>> = HashMap::new();
    for resource in &patch.resources {
        let resource_id = normalize_resource_id(&entrypoint, &resource.id);
        let fields = resource
            .new_fields
            .iter()
            .map(|f| NormalizedField::new(f, &resource_id, &entrypoint))
            .collect();
        order.push(resource_id.clone());
        patches.insert(resource_id, fields);
    }

    let known: HashSet<String> = api.resources.iter().map(|r| r.id.clone()).collect();
    let mut matched = HashSet::new();
    let mut report = PatchReport::default();

    for resource in &mut api.resources {
        let Some(fields) = patches.get(&resource.id) else {
            continue;
        };
        if !matched.insert(resource.id.clone()) {
            continue;
        }
        info!(resource = %resource.title, fields = fields.len(), "Patching resource");
        report.patched.push(resource.title.clone());

        for normalized in fields {
            let mut field = normalized.field.clone();
            if let Some(reference) = field.reference.take() {
                if known.contains(&reference) {
                    field.reference = Some(reference);
                } else {
                    warn!(
                        resource = %resource.title,
                        field = %field.name,
                        reference = %reference,
                        "Patch reference matches no resource"
                    );
                    report.unresolved.push(UnresolvedReference {
                        resource: resource.title.clone(),
                        field: field.name.clone(),
                        reference,
                    });
                }
            }

            if upsert_field(resource, field, normalized.readable, normalized.writable) {
                report.overridden += 1;
            } else {
                report.added += 1;
            }
        }
    }

    for resource_id in order {
        if !matched.contains(&resource_id) {
            debug!(resource = %resource_id, "Patch resource matches no API resource");
            report.unmatched.push(resource_id);
        }
    }

    Ok(report)
}

/// Inserts or replaces `field` on `resource`; returns `true` on replace.
fn upsert_field(resource: &mut Resource, field: Field, readable: bool, writable: bool) -> bool {
    let overridden = replace_by_id(&mut resource.fields, &field);
    if !overridden {
        resource.fields.push(field.clone());
    }
    if !replace_by_id(&mut resource.readable_fields, &field) && readable {
        resource.readable_fields.push(field.clone());
    }
    if !replace_by_id(&mut resource.writable_fields, &field) && writable {
        resource.writable_fields.push(field);
    }
    overridden
}

fn replace_by_id(fields: &mut [Field], field: &Field) -> bool {
    match fields.iter_mut().find(|f| f.id == field.id) {
        Some(existing) => {
            *existing = field.clone();
            true
        }
        None => false,
    }
}
