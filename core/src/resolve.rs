//! Field resolution.
//!
//! Merges a resource's writable and readable field lists into a single
//! ordered field set for one target and mode:
//!
//! 1. writable fields are inserted first, with `readonly = false`;
//! 2. readable fields are inserted only when their name is still free, with
//!    `readonly = true`;
//! 3. an `id` field is synthesized when neither list declares one.
//!
//! Within one list the first declaration of a name wins. Output order is
//! insertion order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::imports::{ImportEntry, resolve_imports};
use crate::typemap::{map_type, serializer_type};
use crate::types::{Field, ID_FIELD, ReferenceIndex, Resource, ResourceRef};
use crate::{Datatype, Mode, TargetDescriptor};

/// Description given to the synthesized identifier field.
pub const ID_FIELD_DESCRIPTION: &str = "id field";

/// A field ready for template rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedField {
    pub name: String,
    /// Negation of [`Field::required`].
    pub notrequired: bool,
    /// Target type expression.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Target independent serializer kind.
    pub serializer_type: String,
    /// Description with double quotes replaced by single quotes.
    pub description: String,
    /// Readable but not writable.
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cardinality: Option<u32>,
    /// Typed with the target's native date type.
    pub is_date: bool,
    /// Multi-valued reference.
    pub is_multiple: bool,
}

impl ResolvedField {
    fn synthesized_id(target: &TargetDescriptor) -> Self {
        Self {
            name: ID_FIELD.to_string(),
            notrequired: true,
            type_name: target.scalars.string.to_string(),
            serializer_type: "string".to_string(),
            description: ID_FIELD_DESCRIPTION.to_string(),
            readonly: false,
            reference: None,
            max_cardinality: None,
            is_date: false,
            is_multiple: false,
        }
    }
}

/// Resolved fields and imports of one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedResource {
    pub fields: Vec<ResolvedField>,
    pub imports: Vec<ImportEntry>,
}

/// Resolves the field set of `resource`.
///
/// # Examples
///
/// ```
/// use clientgen_core::*;
///
/// let foo = Resource::new("urn:foo", "foos", "Foo")
///     .with_writable(Field::new("bar").with_range(xsd::STRING).required());
/// let index = ReferenceIndex::new(std::slice::from_ref(&foo), None);
///
/// let fields = resolve_fields(&foo, &index, TargetKind::Angular.descriptor(), Mode::Default);
/// let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
/// assert_eq!(names, ["bar", "id"]);
/// assert!(!fields[0].notrequired);
/// assert_eq!(fields[1].type_name, "string");
/// ```
pub fn resolve_fields(
    resource: &Resource,
    index: &ReferenceIndex,
    target: &TargetDescriptor,
    mode: Mode,
) -> Vec<ResolvedField> {
    let mut names: HashSet<&str> = HashSet::new();
    let mut fields = Vec::with_capacity(resource.writable_fields.len() + 1);

    for field in &resource.writable_fields {
        if names.insert(field.name.as_str()) {
            fields.push(resolve_field(resource, field, false, index, target, mode));
        }
    }

    for field in &resource.readable_fields {
        if names.insert(field.name.as_str()) {
            fields.push(resolve_field(resource, field, true, index, target, mode));
        }
    }

    if !names.contains(ID_FIELD) {
        fields.push(ResolvedField::synthesized_id(target));
    }

    fields
}

/// Resolves the fields of `resource` and the imports they require.
///
/// The owner used for self-reference detection is `resource` itself, named
/// by its assigned prefixed title when the target names types that way.
pub fn resolve_resource(
    resource: &Resource,
    index: &ReferenceIndex,
    target: &TargetDescriptor,
    mode: Mode,
) -> ResolvedResource {
    let fields = resolve_fields(resource, index, target, mode);
    let owner = ResourceRef::from_resource(resource, None);
    let imports = resolve_imports(&fields, &owner, target, mode);
    ResolvedResource { fields, imports }
}

fn resolve_field(
    owner: &Resource,
    field: &Field,
    readonly: bool,
    index: &ReferenceIndex,
    target: &TargetDescriptor,
    mode: Mode,
) -> ResolvedField {
    let reference = field.reference.as_deref().and_then(|id| {
        let found = index.get(id);
        if found.is_none() {
            warn!(
                resource = %owner.title,
                field = %field.name,
                reference = %id,
                "Unresolved reference, typing field from its range"
            );
        }
        found
    });

    let type_name = map_type(field, reference, target, mode);
    let datatype = Datatype::from_range(field.range.as_deref());
    let is_date = reference.is_none()
        && datatype.is_temporal()
        && target.scalar(datatype, mode) != target.scalars.string;

    ResolvedField {
        name: field.name.clone(),
        notrequired: !field.required,
        serializer_type: serializer_type(field, reference),
        description: normalize_description(field.description.as_deref()),
        readonly,
        reference: reference.cloned(),
        max_cardinality: field.max_cardinality,
        is_date,
        is_multiple: reference.is_some() && !field.is_single_valued(),
        type_name,
    }
}

fn normalize_description(description: Option<&str>) -> String {
    description
        .map(|d| d.replace('"', "'"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Api, TargetKind, xsd};

    fn resolve(resource: &Resource, kind: TargetKind) -> ResolvedResource {
        let index = ReferenceIndex::new(std::slice::from_ref(resource), None);
        resolve_resource(resource, &index, kind.descriptor(), Mode::Default)
    }

    #[test]
    fn test_scalar_resource_end_to_end() {
        let foo = Resource::new("urn:foo", "foos", "Foo")
            .with_writable(Field::new("bar").with_range(xsd::STRING).required());

        let resolved = resolve(&foo, TargetKind::Angular);
        assert!(resolved.imports.is_empty());
        assert_eq!(resolved.fields.len(), 2);

        let bar = &resolved.fields[0];
        assert_eq!(bar.name, "bar");
        assert!(!bar.notrequired);
        assert_eq!(bar.type_name, "string");
        assert!(!bar.readonly);

        let id = &resolved.fields[1];
        assert_eq!(id.name, "id");
        assert!(id.notrequired);
        assert_eq!(id.type_name, "string");
        assert!(!id.readonly);
        assert_eq!(id.reference, None);
    }

    #[test]
    fn test_reference_resource_end_to_end() {
        let api = Api::new("http://example.com")
            .with_resource(
                Resource::new("urn:foo", "foos", "Foo").with_writable(
                    Field::new("baz")
                        .with_reference("urn:bar")
                        .with_max_cardinality(1),
                ),
            )
            .with_resource(Resource::new("urn:bar", "bars", "Bar"));
        let index = ReferenceIndex::from_api(&api);
        let target = TargetKind::AngularV2.descriptor();

        let resolved = resolve_resource(&api.resources[0], &index, target, Mode::Default);
        assert_eq!(resolved.fields[0].type_name, "Bar");
        assert_eq!(resolved.fields[0].serializer_type, "Bar");
        assert!(!resolved.fields[0].is_multiple);
        assert_eq!(
            resolved.imports,
            vec![ImportEntry {
                type_name: "Bar".to_string(),
                file: "./bar".to_string()
            }]
        );
    }

    #[test]
    fn test_writable_declaration_wins_over_readable() {
        let writable = Field::new("x")
            .with_id("urn:foo/x")
            .with_description("writable copy");
        let readable = Field::new("x")
            .with_id("urn:foo/x")
            .with_description("readable copy");
        let mut foo = Resource::new("urn:foo", "foos", "Foo");
        foo.readable_fields.push(readable);
        foo.writable_fields.push(writable);

        let resolved = resolve(&foo, TargetKind::Angular);
        let x: Vec<_> = resolved.fields.iter().filter(|f| f.name == "x").collect();
        assert_eq!(x.len(), 1);
        assert!(!x[0].readonly);
        assert_eq!(x[0].description, "writable copy");
    }

    #[test]
    fn test_first_declaration_wins_within_a_list() {
        let mut foo = Resource::new("urn:foo", "foos", "Foo");
        foo.readable_fields
            .push(Field::new("x").with_description("first"));
        foo.readable_fields
            .push(Field::new("x").with_description("second"));

        let resolved = resolve(&foo, TargetKind::Angular);
        assert_eq!(resolved.fields.len(), 2);
        assert_eq!(resolved.fields[0].description, "first");
        assert!(resolved.fields[0].readonly);
    }

    #[test]
    fn test_order_is_writable_then_readable_then_id() {
        let foo = Resource::new("urn:foo", "foos", "Foo")
            .with_readable(Field::new("createdAt").with_range(xsd::DATE_TIME))
            .with_writable(Field::new("title").with_range(xsd::STRING))
            .with_field(Field::new("body").with_range(xsd::STRING));

        let resolved = resolve(&foo, TargetKind::Angular);
        let names: Vec<_> = resolved.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["title", "body", "createdAt", "id"]);
    }

    #[test]
    fn test_declared_id_is_not_synthesized_again() {
        let foo = Resource::new("urn:foo", "foos", "Foo")
            .with_readable(Field::new("id").with_range(xsd::INTEGER).required());

        let resolved = resolve(&foo, TargetKind::Angular);
        assert_eq!(resolved.fields.len(), 1);
        assert_eq!(resolved.fields[0].type_name, "number");
        assert!(resolved.fields[0].readonly);
    }

    #[test]
    fn test_synthesized_id_uses_target_string_type() {
        let foo = Resource::new("urn:foo", "foos", "Foo");

        let resolved = resolve(&foo, TargetKind::FlutterDio);
        assert_eq!(resolved.fields[0].name, "id");
        assert_eq!(resolved.fields[0].type_name, "String");
        assert_eq!(resolved.fields[0].description, ID_FIELD_DESCRIPTION);
    }

    #[test]
    fn test_description_quotes_are_normalized() {
        let foo = Resource::new("urn:foo", "foos", "Foo")
            .with_field(Field::new("name").with_description(r#"The "display" name"#));

        let resolved = resolve(&foo, TargetKind::Angular);
        assert_eq!(resolved.fields[0].description, "The 'display' name");
    }

    #[test]
    fn test_unresolved_reference_falls_back_to_range() {
        let foo = Resource::new("urn:foo", "foos", "Foo").with_field(
            Field::new("ghost")
                .with_reference("urn:missing")
                .with_range(xsd::STRING),
        );

        let resolved = resolve(&foo, TargetKind::Angular);
        assert_eq!(resolved.fields[0].type_name, "string");
        assert_eq!(resolved.fields[0].reference, None);
        assert!(resolved.imports.is_empty());
    }

    #[test]
    fn test_date_flags_follow_mode() {
        let foo = Resource::new("urn:foo", "foos", "Foo")
            .with_field(Field::new("at").with_range(xsd::DATE_TIME));
        let index = ReferenceIndex::new(std::slice::from_ref(&foo), None);
        let target = TargetKind::AngularV2.descriptor();

        let default = resolve_fields(&foo, &index, target, Mode::Default);
        let raw = resolve_fields(&foo, &index, target, Mode::Raw);
        assert!(default[0].is_date);
        assert!(!raw[0].is_date);
        assert_eq!(raw[0].type_name, "string");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let api = Api::new("http://example.com")
            .with_resource(
                Resource::new("urn:foo", "foos", "Foo")
                    .with_field(Field::new("a").with_reference("urn:c"))
                    .with_field(Field::new("b").with_reference("urn:b"))
                    .with_readable(Field::new("z").with_range(xsd::TIME))
                    .with_field(Field::new("y").with_reference("urn:c")),
            )
            .with_resource(Resource::new("urn:b", "bs", "Bee"))
            .with_resource(Resource::new("urn:c", "cs", "Cee"));
        let index = ReferenceIndex::from_api(&api);

        for kind in TargetKind::ALL {
            for &mode in kind.descriptor().modes {
                let first = resolve_resource(&api.resources[0], &index, kind.descriptor(), mode);
                let second = resolve_resource(&api.resources[0], &index, kind.descriptor(), mode);
                assert_eq!(first, second);
                let types: Vec<_> = first.imports.iter().map(|i| i.type_name.as_str()).collect();
                assert_eq!(types.len(), 2);
            }
        }
    }
}
