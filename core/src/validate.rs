//! Resource graph and patch document validation.
//!
//! Validates structural invariants the resolution pipeline relies on, such
//! as unique resource ids and non-empty names, before anything is resolved
//! or mutated. This is not a check of RDF or OpenAPI correctness.
//!
//! # Examples
//!
//! ```
//! use clientgen_core::*;
//!
//! let api = Api::new("http://example.com")
//!     .with_resource(Resource::new("urn:book", "books", "Book"));
//! assert!(validate_api(&api).is_empty());
//!
//! let broken = Api::new("http://example.com")
//!     .with_resource(Resource::new("urn:book", "books", ""));
//! assert!(!validate_api(&broken).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::patch::{PatchDocument, normalize_field_id, normalize_resource_id};
use crate::types::Api;

/// Structural validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// API entrypoint is empty.
    #[error("api entrypoint cannot be empty")]
    EmptyEntrypoint,
    /// A resource (or patch resource) at the given position has no id.
    #[error("resource #{0} has an empty id")]
    EmptyResourceId(usize),
    /// A resource has no title to derive type names from.
    #[error("resource {0} has an empty title")]
    EmptyResourceTitle(String),
    /// Two resources share an id.
    #[error("duplicate resource id: {0}")]
    DuplicateResource(String),
    /// A field has no name. `list` is the field list it sits in.
    #[error("field #{index} of {list} in resource {resource} has an empty name")]
    EmptyFieldName {
        resource: String,
        list: &'static str,
        index: usize,
    },
    /// A patch field has no id.
    #[error("new field #{index} of patch resource {resource} has an empty id")]
    EmptyFieldId { resource: String, index: usize },
    /// A patch resource adds the same field twice.
    #[error("duplicate new field {field} in patch resource {resource}")]
    DuplicateField { resource: String, field: String },
}

/// Validates a resource graph.
///
/// Checks for an empty entrypoint, empty resource ids and titles, duplicate
/// resource ids, and unnamed fields. An unnamed field is reported once per
/// field list it appears in.
pub fn validate_api(api: &Api) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if api.entrypoint.trim().is_empty() {
        errors.push(ValidationError::EmptyEntrypoint);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (position, resource) in api.resources.iter().enumerate() {
        if resource.id.trim().is_empty() {
            errors.push(ValidationError::EmptyResourceId(position));
            continue;
        }
        if !seen.insert(resource.id.as_str()) {
            errors.push(ValidationError::DuplicateResource(resource.id.clone()));
        }
        if resource.title.trim().is_empty() {
            errors.push(ValidationError::EmptyResourceTitle(resource.id.clone()));
        }

        let lists = [
            ("fields", &resource.fields),
            ("readableFields", &resource.readable_fields),
            ("writableFields", &resource.writable_fields),
        ];
        for (list, field_list) in lists {
            for (index, field) in field_list.iter().enumerate() {
                if field.name.trim().is_empty() {
                    errors.push(ValidationError::EmptyFieldName {
                        resource: resource.id.clone(),
                        list,
                        index,
                    });
                }
            }
        }
    }

    errors
}

/// Validates a patch document against the entrypoint it will be applied to.
///
/// Ids are compared after normalization, so `Book` and
/// `<entrypoint>docs.jsonld#Book` count as the same resource.
///
/// # Examples
///
/// ```
/// use clientgen_core::*;
///
/// let patch: PatchDocument = serde_json::from_str(r#"{
///     "resources": [
///         { "id": "Book", "newFields": [{ "id": "isbn" }] },
///         { "id": "http://example.com/docs.jsonld#Book" }
///     ]
/// }"#).unwrap();
///
/// let errors = validate_patch(&patch, "http://example.com");
/// assert_eq!(
///     errors,
///     vec![ValidationError::DuplicateResource("http://example.com/docs.jsonld#Book".into())]
/// );
/// ```
pub fn validate_patch(patch: &PatchDocument, entrypoint: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen_resources = HashSet::new();

    for (position, resource) in patch.resources.iter().enumerate() {
        if resource.id.trim().is_empty() {
            errors.push(ValidationError::EmptyResourceId(position));
            continue;
        }

        let resource_id = normalize_resource_id(entrypoint, &resource.id);
        if !seen_resources.insert(resource_id.clone()) {
            errors.push(ValidationError::DuplicateResource(resource_id.clone()));
        }

        let mut seen_fields = HashSet::new();
        for (index, field) in resource.new_fields.iter().enumerate() {
            if field.id.trim().is_empty() {
                errors.push(ValidationError::EmptyFieldId {
                    resource: resource.id.clone(),
                    index,
                });
                continue;
            }
            let field_id = normalize_field_id(&resource_id, &field.id);
            if !seen_fields.insert(field_id.clone()) {
                errors.push(ValidationError::DuplicateField {
                    resource: resource.id.clone(),
                    field: field_id,
                });
            }
        }
    }

    errors
}
