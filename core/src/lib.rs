//! Field, type and import resolution for API client code generation.
//!
//! This crate turns a parsed API documentation (an [`Api`] of [`Resource`]s
//! and their [`Field`]s) into the per-target field/type model that client
//! code templates are rendered from:
//!
//! - [`resolve_fields`] merges writable and readable declarations into one
//!   ordered, duplicate-free field set and synthesizes the `id` field.
//! - [`map_type`] maps ranges, cardinality and references to a target type
//!   expression, driven by a [`TargetDescriptor`].
//! - [`resolve_imports`] derives the deduplicated cross-resource imports.
//! - [`merge_patch`] adds or overrides fields from a user [`PatchDocument`]
//!   before anything is resolved.
//! - [`run`] filters resources and drives a [`Generator`];
//!   [`ModelGenerator`] collects everything into a serializable
//!   [`ModelBundle`].
//!
//! Validation ([`validate_api`], [`validate_patch`]) catches structural
//! errors such as duplicate resource ids and unnamed fields.
//!
//! # Example
//!
//! ```
//! use clientgen_core::*;
//!
//! let api = Api::new("http://example.com")
//!     .with_resource(
//!         Resource::new("http://example.com/docs.jsonld#Book", "books", "Book")
//!             .with_field(Field::new("title").with_range(xsd::STRING).required())
//!             .with_readable(Field::new("publishedAt").with_range(xsd::DATE_TIME))
//!             .with_field(
//!                 Field::new("author")
//!                     .with_reference("http://example.com/docs.jsonld#Person")
//!                     .with_max_cardinality(1),
//!             ),
//!     )
//!     .with_resource(Resource::new("http://example.com/docs.jsonld#Person", "people", "Person"));
//! assert!(validate_api(&api).is_empty());
//!
//! let mut generator = ModelGenerator::new(TargetKind::Angular);
//! run(&api, &Selection::all(), &mut generator).unwrap();
//! let bundle = generator.into_bundle();
//!
//! let book = bundle.find_resource("Book").unwrap().artifact(Mode::Default).unwrap();
//! let types: Vec<_> = book.fields.iter().map(|f| (f.name.as_str(), f.type_name.as_str())).collect();
//! assert_eq!(
//!     types,
//!     [("title", "string"), ("author", "Person | string"), ("publishedAt", "string"), ("id", "string")]
//! );
//! assert_eq!(book.imports[0].file, "./person");
//! ```

mod datatype;
mod generator;
mod imports;
mod naming;
mod orchestrate;
mod patch;
mod resolve;
mod target;
mod typemap;
mod types;
mod validate;

pub use datatype::{Datatype, xsd};
pub use generator::{
    AggregateModel, ArtifactModel, MissingDependency, ModelBundle, ModelGenerator, ResourceModel,
    ResourceWithFields,
};
pub use imports::{ImportEntry, resolve_imports};
pub use naming::{camel_case_to_kebab_case, camel_case_to_snake_case};
pub use orchestrate::{Generator, RunOutcome, Selection, prepare_resources, run};
pub use patch::{
    PatchDocument, PatchError, PatchField, PatchReport, PatchResource, UnresolvedReference,
    is_absolute_id, merge_patch, normalize_field_id, normalize_resource_id,
};
pub use resolve::{ID_FIELD_DESCRIPTION, ResolvedField, ResolvedResource, resolve_fields, resolve_resource};
pub use target::{
    ANGULAR, ANGULAR_V2, CollectionSyntax, FLUTTER_DIO, IdUnion, ImportStyle, Mode, ScalarTypes,
    TargetDescriptor, TargetKind, TitleSource, UnknownTarget, VUE_PLUGIN_AXIOS,
};
pub use typemap::{map_type, serializer_type};
pub use types::*;
pub use validate::{ValidationError, validate_api, validate_patch};
