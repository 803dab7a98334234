//! Cross-resource import resolution.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::resolve::ResolvedField;
use crate::types::ResourceRef;
use crate::{Mode, TargetDescriptor};

/// A type the generated artifact of a resource must import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    /// Imported type name (mode prefixed).
    #[serde(rename = "type")]
    pub type_name: String,
    /// Module path the type is imported from.
    pub file: String,
}

/// Derives the imports required by `fields` of the resource `owner`.
///
/// Entries are keyed by the referenced resource's key title, so several
/// fields referencing one resource produce a single entry. References back
/// to `owner` are skipped. Order follows the first reference of each
/// resource in `fields`.
///
/// # Examples
///
/// ```
/// use clientgen_core::*;
///
/// let api = Api::new("http://example.com")
///     .with_resource(
///         Resource::new("urn:foo", "foos", "Foo")
///             .with_field(Field::new("bar").with_reference("urn:bar").with_max_cardinality(1))
///             .with_field(Field::new("bars").with_reference("urn:bar"))
///             .with_field(Field::new("parent").with_reference("urn:foo")),
///     )
///     .with_resource(Resource::new("urn:bar", "bars", "Bar"));
/// let index = ReferenceIndex::from_api(&api);
/// let target = TargetKind::Angular.descriptor();
/// let foo = &api.resources[0];
///
/// let fields = resolve_fields(foo, &index, target, Mode::Default);
/// let owner = ResourceRef::from_resource(foo, None);
/// let imports = resolve_imports(&fields, &owner, target, Mode::Default);
///
/// assert_eq!(imports, vec![ImportEntry { type_name: "Bar".into(), file: "./bar".into() }]);
/// ```
pub fn resolve_imports(
    fields: &[ResolvedField],
    owner: &ResourceRef,
    target: &TargetDescriptor,
    mode: Mode,
) -> Vec<ImportEntry> {
    let owner_title = target.key_title(owner);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut imports = Vec::new();

    for reference in fields.iter().filter_map(|f| f.reference.as_ref()) {
        let title = target.key_title(reference);
        if title == owner_title || !seen.insert(title) {
            continue;
        }
        imports.push(ImportEntry {
            type_name: target.type_name(reference, mode),
            file: target.import_file(title),
        });
    }

    imports
}
