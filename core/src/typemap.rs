//! Field type mapping.
//!
//! [`map_type`] turns a field into a target type expression. References are
//! named after the referenced resource and widened by cardinality; scalar
//! fields go through the target's datatype table. Both functions here are
//! pure.
//!
//! A multi-valued field without a reference is never wrapped in a
//! collection type: `max_cardinality` only widens references.

use crate::types::{Field, ResourceRef};
use crate::{Datatype, Mode, TargetDescriptor};

/// Maps `field` to a type expression of `target`.
///
/// `reference` is the resolved view of `field.reference`; pass `None` for
/// scalar fields and for references that could not be resolved, which are
/// then typed from their range.
///
/// # Examples
///
/// ```
/// use clientgen_core::{Field, Mode, ResourceRef, TargetKind, map_type, xsd};
///
/// let bar = ResourceRef {
///     id: "urn:bar".into(),
///     name: "bars".into(),
///     title: "Bar".into(),
///     prefixed_title: "Bar".into(),
/// };
/// let target = TargetKind::AngularV2.descriptor();
///
/// let one = Field::new("bar").with_reference("urn:bar").with_max_cardinality(1);
/// assert_eq!(map_type(&one, Some(&bar), target, Mode::Default), "Bar");
/// assert_eq!(map_type(&one, Some(&bar), target, Mode::Raw), "RawBar | string");
///
/// let many = Field::new("bars").with_reference("urn:bar");
/// assert_eq!(map_type(&many, Some(&bar), target, Mode::Default), "Bar[]");
/// assert_eq!(map_type(&many, Some(&bar), target, Mode::Raw), "RawBar[] | string[]");
///
/// let count = Field::new("count").with_range(xsd::INTEGER);
/// assert_eq!(map_type(&count, None, target, Mode::Default), "number");
/// ```
pub fn map_type(
    field: &Field,
    reference: Option<&ResourceRef>,
    target: &TargetDescriptor,
    mode: Mode,
) -> String {
    let Some(reference) = reference else {
        let datatype = Datatype::from_range(field.range.as_deref());
        return target.scalar(datatype, mode).to_string();
    };

    let name = target.type_name(reference, mode);
    let with_id = target.id_union.applies(mode);
    let string = target.scalars.string;

    if field.is_single_valued() {
        if with_id {
            target.union(&name, string)
        } else {
            name
        }
    } else {
        let many = target.collection.wrap(&name);
        if with_id {
            target.union(&many, &target.collection.wrap(string))
        } else {
            many
        }
    }
}

/// Returns the serializer kind of a field.
///
/// Serializer kinds are target independent: references serialize as the
/// referenced title, temporal values as `date` or `time`.
///
/// # Examples
///
/// ```
/// use clientgen_core::{Field, serializer_type, xsd};
///
/// assert_eq!(serializer_type(&Field::new("at").with_range(xsd::DATE_TIME), None), "date");
/// assert_eq!(serializer_type(&Field::new("at").with_range(xsd::TIME), None), "time");
/// assert_eq!(serializer_type(&Field::new("blob"), None), "any");
/// ```
pub fn serializer_type(field: &Field, reference: Option<&ResourceRef>) -> String {
    if let Some(reference) = reference {
        return reference.title.clone();
    }

    let kind = match Datatype::from_range(field.range.as_deref()) {
        Datatype::Integer | Datatype::Decimal => "number",
        Datatype::Boolean => "boolean",
        Datatype::Date | Datatype::DateTime => "date",
        Datatype::Time => "time",
        Datatype::String => "string",
        Datatype::Unknown => "any",
    };
    kind.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TargetKind, xsd};

    fn person() -> ResourceRef {
        ResourceRef {
            id: "urn:person".to_string(),
            name: "people".to_string(),
            title: "Person".to_string(),
            prefixed_title: "ApiPerson".to_string(),
        }
    }

    #[test]
    fn test_single_reference_maps_to_singular_type() {
        let field = Field::new("author")
            .with_reference("urn:person")
            .with_max_cardinality(1);
        let target = TargetKind::AngularV2.descriptor();

        assert_eq!(map_type(&field, Some(&person()), target, Mode::Default), "Person");
    }

    #[test]
    fn test_multi_reference_maps_to_collection_for_any_other_cardinality() {
        let target = TargetKind::AngularV2.descriptor();
        let absent = Field::new("authors").with_reference("urn:person");
        let five = Field::new("authors")
            .with_reference("urn:person")
            .with_max_cardinality(5);

        assert_eq!(map_type(&absent, Some(&person()), target, Mode::Default), "Person[]");
        assert_eq!(map_type(&five, Some(&person()), target, Mode::Default), "Person[]");
    }

    #[test]
    fn test_angular_always_unions_references_with_string_ids() {
        let target = TargetKind::Angular.descriptor();
        let one = Field::new("author")
            .with_reference("urn:person")
            .with_max_cardinality(1);
        let many = Field::new("authors").with_reference("urn:person");

        assert_eq!(
            map_type(&one, Some(&person()), target, Mode::Default),
            "Person | string"
        );
        assert_eq!(
            map_type(&many, Some(&person()), target, Mode::Default),
            "Person[] | string[]"
        );
    }

    #[test]
    fn test_flutter_uses_prefixed_title_and_generic_list() {
        let target = TargetKind::FlutterDio.descriptor();
        let one = Field::new("author")
            .with_reference("urn:person")
            .with_max_cardinality(1);
        let many = Field::new("authors").with_reference("urn:person");

        assert_eq!(map_type(&one, Some(&person()), target, Mode::Default), "ApiPerson");
        assert_eq!(
            map_type(&many, Some(&person()), target, Mode::Default),
            "List<ApiPerson>"
        );
    }

    #[test]
    fn test_multi_valued_scalar_is_not_wrapped() {
        let field = Field::new("tags").with_range(xsd::STRING);
        for kind in TargetKind::ALL {
            let target = kind.descriptor();
            assert_eq!(
                map_type(&field, None, target, Mode::Default),
                target.scalars.string
            );
        }
    }

    #[test]
    fn test_scalar_table_per_target() {
        let date = Field::new("at").with_range(xsd::DATE);
        let flag = Field::new("on").with_range(xsd::BOOLEAN);
        let price = Field::new("price").with_range(xsd::DECIMAL);

        let angular = TargetKind::AngularV2.descriptor();
        assert_eq!(map_type(&date, None, angular, Mode::Default), "Date");
        assert_eq!(map_type(&date, None, angular, Mode::Raw), "string");
        assert_eq!(map_type(&flag, None, angular, Mode::Default), "boolean");

        let flutter = TargetKind::FlutterDio.descriptor();
        assert_eq!(map_type(&date, None, flutter, Mode::Default), "String");
        assert_eq!(map_type(&flag, None, flutter, Mode::Default), "bool");
        assert_eq!(map_type(&price, None, flutter, Mode::Default), "num");
    }

    #[test]
    fn test_unknown_range_degrades_to_dynamic() {
        let field = Field::new("payload").with_range("http://schema.org/Thing");
        assert_eq!(
            map_type(&field, None, TargetKind::Angular.descriptor(), Mode::Default),
            "any"
        );
        assert_eq!(
            map_type(&field, None, TargetKind::FlutterDio.descriptor(), Mode::Default),
            "dynamic"
        );
    }

    #[test]
    fn test_serializer_type_uses_plain_title_for_references() {
        let field = Field::new("author").with_reference("urn:person");
        assert_eq!(serializer_type(&field, Some(&person())), "Person");
    }
}
