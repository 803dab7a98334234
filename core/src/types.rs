//! Resource graph type definitions.
//!
//! This module defines the data model handed over by the external API
//! documentation parser: an [`Api`] holding ordered [`Resource`]s, each with
//! its [`Field`]s. The types serialize with camelCase keys so a resource dump
//! produced by the documentation parser can be read back directly.
//!
//! References between resources are stored as resource ids and looked up
//! through a [`ReferenceIndex`], never as owning pointers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::target::TitleSource;

/// Name of the identifier field every resolved resource carries.
pub const ID_FIELD: &str = "id";

/// One property of a [`Resource`].
///
/// A field either carries a datatype `range` (an XSD URI such as
/// `http://www.w3.org/2001/XMLSchema#string`) or a `reference` to another
/// resource id. `max_cardinality == Some(1)` marks a single-valued field;
/// anything else is treated as multi-valued.
///
/// # Examples
///
/// ```
/// use clientgen_core::{Field, xsd};
///
/// let field = Field::new("author")
///     .with_reference("http://example.com/docs.jsonld#Person")
///     .with_max_cardinality(1)
///     .required();
/// assert!(field.is_single_valued());
/// assert!(field.required);
///
/// let tags = Field::new("tags").with_range(xsd::STRING);
/// assert!(!tags.is_single_valued());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Property name as exposed by the API.
    pub name: String,
    /// Property URI.
    #[serde(default)]
    pub id: String,
    /// Datatype URI, absent for references and untyped properties.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de::optional_string"
    )]
    pub range: Option<String>,
    /// Id of the referenced resource.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de::reference_id"
    )]
    pub reference: Option<String>,
    /// Whether the API requires the property. Missing means not required.
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub required: bool,
    /// Maximum number of values (`1` = single-valued).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de::cardinality"
    )]
    pub max_cardinality: Option<u32>,
    /// Human readable description.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de::optional_string"
    )]
    pub description: Option<String>,
    /// Deprecated fields are dropped before generation.
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub deprecated: bool,
}

impl Field {
    /// Creates a field with the given name and nothing else set.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the property URI.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Sets the datatype range URI.
    pub fn with_range(mut self, range: &str) -> Self {
        self.range = Some(range.to_string());
        self
    }

    /// Sets the referenced resource id.
    pub fn with_reference(mut self, resource_id: &str) -> Self {
        self.reference = Some(resource_id.to_string());
        self
    }

    /// Sets the maximum cardinality.
    pub fn with_max_cardinality(mut self, max: u32) -> Self {
        self.max_cardinality = Some(max);
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field as deprecated.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Returns `true` when the field holds at most one value.
    pub fn is_single_valued(&self) -> bool {
        self.max_cardinality == Some(1)
    }
}

/// One API entity description.
///
/// `fields` lists every property; `readable_fields` and `writable_fields`
/// list the ones exposed for reading and writing. The three lists overlap
/// and hold copies of the same field, matched by [`Field::id`].
///
/// # Examples
///
/// ```
/// use clientgen_core::{Field, Resource, xsd};
///
/// let book = Resource::new("http://example.com/docs.jsonld#Book", "books", "Book")
///     .with_field(Field::new("isbn").with_range(xsd::STRING))
///     .with_readable(Field::new("createdAt").with_range(xsd::DATE_TIME));
///
/// assert_eq!(book.fields.len(), 2);
/// assert_eq!(book.readable_fields.len(), 2);
/// assert_eq!(book.writable_fields.len(), 1);
/// assert_eq!(book.display_title(), "Book");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Resource URI.
    pub id: String,
    /// Machine key (usually the collection path segment).
    pub name: String,
    /// Display/type name.
    pub title: String,
    /// Title with the user-supplied disambiguation prefix applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefixed_title: Option<String>,
    /// Deprecated resources are skipped entirely.
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub deprecated: bool,
    /// All properties.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Properties returned by the API.
    #[serde(default)]
    pub readable_fields: Vec<Field>,
    /// Properties accepted by the API.
    #[serde(default)]
    pub writable_fields: Vec<Field>,
}

impl Resource {
    /// Creates a resource without fields.
    pub fn new(id: &str, name: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// Adds a field that is both readable and writable.
    pub fn with_field(mut self, field: Field) -> Self {
        self.readable_fields.push(field.clone());
        self.writable_fields.push(field.clone());
        self.fields.push(field);
        self
    }

    /// Adds a read-only field.
    pub fn with_readable(mut self, field: Field) -> Self {
        self.readable_fields.push(field.clone());
        self.fields.push(field);
        self
    }

    /// Adds a write-only field.
    pub fn with_writable(mut self, field: Field) -> Self {
        self.writable_fields.push(field.clone());
        self.fields.push(field);
        self
    }

    /// Marks the resource as deprecated.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Returns the prefixed title when assigned, else the title.
    pub fn display_title(&self) -> &str {
        self.prefixed_title.as_deref().unwrap_or(&self.title)
    }

    /// Finds a field of the `fields` list by id.
    pub fn find_field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }
}

/// Root of a parsed API documentation.
///
/// # Examples
///
/// ```
/// use clientgen_core::{Api, Resource};
///
/// let api = Api::new("http://example.com")
///     .with_resource(Resource::new("http://example.com/docs.jsonld#Book", "books", "Book"));
///
/// assert_eq!(api.entrypoint_with_slash(), "http://example.com/");
/// assert!(api.find_resource("http://example.com/docs.jsonld#Book").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Api {
    /// API entrypoint URL.
    pub entrypoint: String,
    /// API title, when the documentation declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Resources in documentation order.
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Api {
    /// Creates an empty API rooted at `entrypoint`.
    pub fn new(entrypoint: &str) -> Self {
        Self {
            entrypoint: entrypoint.to_string(),
            ..Default::default()
        }
    }

    /// Appends a resource.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Returns the entrypoint with exactly one trailing slash.
    pub fn entrypoint_with_slash(&self) -> String {
        if self.entrypoint.ends_with('/') {
            self.entrypoint.clone()
        } else {
            format!("{}/", self.entrypoint)
        }
    }

    /// Finds a resource by id.
    pub fn find_resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }
}

/// Resolved view of a referenced resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    pub id: String,
    pub name: String,
    pub title: String,
    pub prefixed_title: String,
}

impl ResourceRef {
    /// Builds a reference view of `resource`.
    ///
    /// An already assigned `prefixed_title` wins over `prefix`. Use this for
    /// resources that went through
    /// [`prepare_resources`](crate::prepare_resources).
    pub fn from_resource(resource: &Resource, prefix: Option<&str>) -> Self {
        match &resource.prefixed_title {
            Some(prefixed) => Self::named(resource, prefixed.clone()),
            None => Self::with_prefix(resource, prefix),
        }
    }

    /// Builds a reference view of `resource` whose prefixed title is
    /// `prefix` + title, ignoring any stored `prefixed_title`.
    pub fn with_prefix(resource: &Resource, prefix: Option<&str>) -> Self {
        let prefixed_title = match prefix {
            Some(prefix) => format!("{prefix}{}", resource.title),
            None => resource.title.clone(),
        };
        Self::named(resource, prefixed_title)
    }

    fn named(resource: &Resource, prefixed_title: String) -> Self {
        Self {
            id: resource.id.clone(),
            name: resource.name.clone(),
            title: resource.title.clone(),
            prefixed_title,
        }
    }

    /// Returns the title a target names this resource by.
    pub fn key_title(&self, source: TitleSource) -> &str {
        match source {
            TitleSource::Title => &self.title,
            TitleSource::PrefixedTitle => &self.prefixed_title,
        }
    }
}

/// Lookup from resource id to [`ResourceRef`].
///
/// Built once per run from the complete resource list, so references to
/// resources filtered out of generation still resolve to a title.
///
/// # Examples
///
/// ```
/// use clientgen_core::{ReferenceIndex, Resource};
///
/// let resources = vec![Resource::new("urn:book", "books", "Book")];
/// let index = ReferenceIndex::new(&resources, Some("Api"));
///
/// let book = index.get("urn:book").unwrap();
/// assert_eq!(book.prefixed_title, "ApiBook");
/// assert!(index.get("urn:missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    by_id: HashMap<String, ResourceRef>,
}

impl ReferenceIndex {
    /// Indexes `resources`; the first resource wins on duplicate ids.
    ///
    /// Prefixed titles are always derived from `prefix`, so a stale
    /// `prefixed_title` (from a reloaded dump, say) never leaks into type
    /// names.
    pub fn new(resources: &[Resource], prefix: Option<&str>) -> Self {
        let mut by_id = HashMap::with_capacity(resources.len());
        for resource in resources {
            by_id
                .entry(resource.id.clone())
                .or_insert_with(|| ResourceRef::with_prefix(resource, prefix));
        }
        Self { by_id }
    }

    /// Indexes every resource of `api` without a title prefix.
    pub fn from_api(api: &Api) -> Self {
        Self::new(&api.resources, None)
    }

    pub fn get(&self, id: &str) -> Option<&ResourceRef> {
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Lenient deserializers for values the documentation parser emits loosely
/// (empty strings for absent values, embedded objects for references).
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    pub(super) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.is_empty()))
    }

    pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ReferenceRepr {
        Id(String),
        Embedded { id: String },
    }

    pub(super) fn reference_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<ReferenceRepr>::deserialize(deserializer)? {
            Some(ReferenceRepr::Id(id) | ReferenceRepr::Embedded { id }) if !id.is_empty() => {
                Some(id)
            }
            _ => None,
        })
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CardinalityRepr {
        Number(u32),
        Text(String),
    }

    pub(super) fn cardinality<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<CardinalityRepr>::deserialize(deserializer)? {
            Some(CardinalityRepr::Number(n)) => Some(n),
            Some(CardinalityRepr::Text(text)) => text.trim().parse().ok(),
            None => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xsd;

    #[test]
    fn test_field_deserializes_parser_dump_shape() {
        let json = r#"{
            "name": "author",
            "id": "http://example.com/docs.jsonld#Book/author",
            "range": "",
            "reference": { "id": "http://example.com/docs.jsonld#Person", "title": "Person" },
            "required": null,
            "maxCardinality": "",
            "description": "",
            "deprecated": false
        }"#;
        let field: Field = serde_json::from_str(json).unwrap();

        assert_eq!(field.range, None);
        assert_eq!(
            field.reference.as_deref(),
            Some("http://example.com/docs.jsonld#Person")
        );
        assert!(!field.required);
        assert_eq!(field.max_cardinality, None);
        assert_eq!(field.description, None);
    }

    #[test]
    fn test_field_deserializes_plain_reference_and_cardinality() {
        let json = r#"{"name": "owner", "reference": "urn:person", "maxCardinality": 1}"#;
        let field: Field = serde_json::from_str(json).unwrap();

        assert_eq!(field.reference.as_deref(), Some("urn:person"));
        assert!(field.is_single_valued());
        assert_eq!(field.id, "");
    }

    #[test]
    fn test_resource_builders_keep_lists_in_sync() {
        let resource = Resource::new("urn:book", "books", "Book")
            .with_field(Field::new("title").with_range(xsd::STRING))
            .with_writable(Field::new("secret"))
            .with_readable(Field::new("createdAt"));

        assert_eq!(resource.fields.len(), 3);
        assert_eq!(resource.writable_fields.len(), 2);
        assert_eq!(resource.readable_fields.len(), 2);
    }

    #[test]
    fn test_reference_index_ignores_stored_prefixed_title() {
        let mut book = Resource::new("urn:book", "books", "Book");
        book.prefixed_title = Some("MyBook".to_string());

        let index = ReferenceIndex::new(std::slice::from_ref(&book), Some("Other"));
        assert_eq!(index.get("urn:book").unwrap().prefixed_title, "OtherBook");

        let index = ReferenceIndex::new(std::slice::from_ref(&book), None);
        assert_eq!(index.get("urn:book").unwrap().prefixed_title, "Book");
    }

    #[test]
    fn test_from_resource_prefers_assigned_prefixed_title() {
        let mut book = Resource::new("urn:book", "books", "Book");
        assert_eq!(ResourceRef::from_resource(&book, Some("Api")).prefixed_title, "ApiBook");

        book.prefixed_title = Some("MyBook".to_string());
        assert_eq!(ResourceRef::from_resource(&book, Some("Api")).prefixed_title, "MyBook");
    }

    #[test]
    fn test_reference_index_first_resource_wins() {
        let resources = vec![
            Resource::new("urn:dup", "first", "First"),
            Resource::new("urn:dup", "second", "Second"),
        ];
        let index = ReferenceIndex::new(&resources, None);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("urn:dup").unwrap().title, "First");
    }

    #[test]
    fn test_api_entrypoint_with_slash_is_stable() {
        assert_eq!(
            Api::new("http://example.com/").entrypoint_with_slash(),
            "http://example.com/"
        );
        assert_eq!(
            Api::new("http://example.com").entrypoint_with_slash(),
            "http://example.com/"
        );
    }
}
