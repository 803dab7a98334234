//! Target descriptors.
//!
//! Each supported client platform is described by a [`TargetDescriptor`]
//! value: its scalar type table, how references are widened by cardinality,
//! which title names a referenced type, and how import paths are spelled.
//! The resolution core is shared; targets differ only in these values.
//!
//! # Example
//!
//! ```
//! use clientgen_core::{Datatype, Mode, TargetKind};
//!
//! let angular = TargetKind::AngularV2.descriptor();
//! assert_eq!(angular.scalar(Datatype::DateTime, Mode::Default), "Date");
//! assert_eq!(angular.scalar(Datatype::DateTime, Mode::Raw), "string");
//!
//! let flutter = TargetKind::FlutterDio.descriptor();
//! assert_eq!(flutter.scalar(Datatype::Unknown, Mode::Default), "dynamic");
//! assert_eq!(flutter.collection.wrap("Book"), "List<Book>");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Datatype;
use crate::naming::camel_case_to_kebab_case;
use crate::types::ResourceRef;

/// Built-in generation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// Angular interfaces and services.
    #[default]
    Angular,
    /// Angular interfaces, raw interfaces and a serializer registry.
    AngularV2,
    /// Vue plugin interfaces and axios services.
    VuePluginAxios,
    /// Dart models and dio services.
    FlutterDio,
}

impl TargetKind {
    /// Every built-in target, in declaration order.
    pub const ALL: [TargetKind; 4] = [
        TargetKind::Angular,
        TargetKind::AngularV2,
        TargetKind::VuePluginAxios,
        TargetKind::FlutterDio,
    ];

    /// Returns the target identifier (`angular`, `angular-v2`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Angular => "angular",
            TargetKind::AngularV2 => "angular-v2",
            TargetKind::VuePluginAxios => "vue-plugin-axios",
            TargetKind::FlutterDio => "flutter-dio",
        }
    }

    /// Returns the descriptor for this target.
    pub fn descriptor(self) -> &'static TargetDescriptor {
        match self {
            TargetKind::Angular => &ANGULAR,
            TargetKind::AngularV2 => &ANGULAR_V2,
            TargetKind::VuePluginAxios => &VUE_PLUGIN_AXIOS,
            TargetKind::FlutterDio => &FLUTTER_DIO,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown target identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown target: {0}")]
pub struct UnknownTarget(pub String);

impl FromStr for TargetKind {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TargetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownTarget(s.to_string()))
    }
}

/// Artifact variant a type is resolved for.
///
/// `Raw` describes the wire shape (temporal values as strings, references
/// possibly given as ids) for targets that generate both shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Default,
    Raw,
}

/// Scalar type table of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarTypes {
    pub number: &'static str,
    pub boolean: &'static str,
    pub string: &'static str,
    /// Type of date, dateTime and time values.
    pub temporal: &'static str,
    /// Type of temporal values in [`Mode::Raw`].
    pub raw_temporal: &'static str,
    /// Fallback for unknown or absent ranges.
    pub dynamic: &'static str,
}

/// How a multi-valued type is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionSyntax {
    /// `T[]`
    ArraySuffix,
    /// `Name<T>`
    Generic(&'static str),
}

impl CollectionSyntax {
    pub fn wrap(self, inner: &str) -> String {
        match self {
            CollectionSyntax::ArraySuffix => format!("{inner}[]"),
            CollectionSyntax::Generic(name) => format!("{name}<{inner}>"),
        }
    }
}

/// Whether a reference type also accepts a bare string id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdUnion {
    Never,
    Always,
    /// Only in [`Mode::Raw`].
    RawOnly,
}

impl IdUnion {
    pub fn applies(self, mode: Mode) -> bool {
        match self {
            IdUnion::Never => false,
            IdUnion::Always => true,
            IdUnion::RawOnly => mode == Mode::Raw,
        }
    }
}

/// Which title names a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    Title,
    PrefixedTitle,
}

/// How import file paths are derived from a type title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStyle {
    pub prefix: &'static str,
    pub extension: &'static str,
}

/// Value object describing one generation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDescriptor {
    pub kind: TargetKind,
    pub scalars: ScalarTypes,
    pub collection: CollectionSyntax,
    pub id_union: IdUnion,
    pub title_source: TitleSource,
    /// Prefix of type names in [`Mode::Raw`].
    pub raw_prefix: &'static str,
    pub imports: ImportStyle,
    /// Modes an artifact is generated for, in order.
    pub modes: &'static [Mode],
    /// Whether the finalize pass builds a cross-resource aggregate.
    pub aggregate: bool,
    /// What the help pass reports as generated.
    pub summary: &'static str,
    /// Union operator of the target language, if it has one.
    pub union_operator: &'static str,
}

impl TargetDescriptor {
    /// Maps a datatype kind to this target's scalar type.
    pub fn scalar(&self, datatype: Datatype, mode: Mode) -> &'static str {
        match datatype {
            Datatype::Integer | Datatype::Decimal => self.scalars.number,
            Datatype::Boolean => self.scalars.boolean,
            Datatype::Date | Datatype::DateTime | Datatype::Time => match mode {
                Mode::Default => self.scalars.temporal,
                Mode::Raw => self.scalars.raw_temporal,
            },
            Datatype::String => self.scalars.string,
            Datatype::Unknown => self.scalars.dynamic,
        }
    }

    /// Returns the title this target names `resource` by.
    pub fn key_title<'a>(&self, resource: &'a ResourceRef) -> &'a str {
        resource.key_title(self.title_source)
    }

    /// Returns the type name of `resource` in `mode`.
    pub fn type_name(&self, resource: &ResourceRef, mode: Mode) -> String {
        self.type_name_for_title(self.key_title(resource), mode)
    }

    /// Returns the type name for a key title in `mode`.
    pub fn type_name_for_title(&self, title: &str, mode: Mode) -> String {
        match mode {
            Mode::Raw if !self.raw_prefix.is_empty() => format!("{}{title}", self.raw_prefix),
            _ => title.to_string(),
        }
    }

    /// Returns the import path of the type titled `title`.
    pub fn import_file(&self, title: &str) -> String {
        format!(
            "{}{}{}",
            self.imports.prefix,
            camel_case_to_kebab_case(title),
            self.imports.extension
        )
    }

    /// Unions `ty` with `alternative` using the target's union operator.
    pub fn union(&self, ty: &str, alternative: &str) -> String {
        format!("{ty}{}{alternative}", self.union_operator)
    }
}

const TYPESCRIPT_SCALARS: ScalarTypes = ScalarTypes {
    number: "number",
    boolean: "boolean",
    string: "string",
    temporal: "string",
    raw_temporal: "string",
    dynamic: "any",
};

pub const ANGULAR: TargetDescriptor = TargetDescriptor {
    kind: TargetKind::Angular,
    scalars: TYPESCRIPT_SCALARS,
    collection: CollectionSyntax::ArraySuffix,
    id_union: IdUnion::Always,
    title_source: TitleSource::Title,
    raw_prefix: "",
    imports: ImportStyle {
        prefix: "./",
        extension: "",
    },
    modes: &[Mode::Default],
    aggregate: false,
    summary: "Angular interface and service",
    union_operator: " | ",
};

pub const ANGULAR_V2: TargetDescriptor = TargetDescriptor {
    kind: TargetKind::AngularV2,
    scalars: ScalarTypes {
        temporal: "Date",
        ..TYPESCRIPT_SCALARS
    },
    collection: CollectionSyntax::ArraySuffix,
    id_union: IdUnion::RawOnly,
    title_source: TitleSource::Title,
    raw_prefix: "Raw",
    imports: ImportStyle {
        prefix: "./",
        extension: "",
    },
    modes: &[Mode::Default, Mode::Raw],
    aggregate: true,
    summary: "Angular interface, raw interface and service",
    union_operator: " | ",
};

pub const VUE_PLUGIN_AXIOS: TargetDescriptor = TargetDescriptor {
    kind: TargetKind::VuePluginAxios,
    scalars: TYPESCRIPT_SCALARS,
    collection: CollectionSyntax::ArraySuffix,
    id_union: IdUnion::Always,
    title_source: TitleSource::Title,
    raw_prefix: "",
    imports: ImportStyle {
        prefix: "./",
        extension: "",
    },
    modes: &[Mode::Default],
    aggregate: false,
    summary: "Vue plugin interface and service",
    union_operator: " | ",
};

pub const FLUTTER_DIO: TargetDescriptor = TargetDescriptor {
    kind: TargetKind::FlutterDio,
    scalars: ScalarTypes {
        number: "num",
        boolean: "bool",
        string: "String",
        temporal: "String",
        raw_temporal: "String",
        dynamic: "dynamic",
    },
    collection: CollectionSyntax::Generic("List"),
    id_union: IdUnion::Never,
    title_source: TitleSource::PrefixedTitle,
    raw_prefix: "",
    imports: ImportStyle {
        prefix: "",
        extension: ".dart",
    },
    modes: &[Mode::Default],
    aggregate: true,
    summary: "Flutter model and service",
    union_operator: "",
};

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> ResourceRef {
        ResourceRef {
            id: "urn:book".to_string(),
            name: "books".to_string(),
            title: "BookSeries".to_string(),
            prefixed_title: "ApiBookSeries".to_string(),
        }
    }

    #[test]
    fn test_target_kind_round_trips_through_str() {
        for kind in TargetKind::ALL {
            assert_eq!(kind.as_str().parse::<TargetKind>().unwrap(), kind);
            assert_eq!(kind.descriptor().kind, kind);
        }
        assert_eq!(
            "Angular-V2".parse::<TargetKind>().unwrap(),
            TargetKind::AngularV2
        );
        assert_eq!(
            "react".parse::<TargetKind>(),
            Err(UnknownTarget("react".to_string()))
        );
    }

    #[test]
    fn test_raw_prefix_only_applies_in_raw_mode() {
        assert_eq!(ANGULAR_V2.type_name(&book(), Mode::Default), "BookSeries");
        assert_eq!(ANGULAR_V2.type_name(&book(), Mode::Raw), "RawBookSeries");
        assert_eq!(ANGULAR.type_name(&book(), Mode::Raw), "BookSeries");
    }

    #[test]
    fn test_flutter_names_by_prefixed_title() {
        assert_eq!(FLUTTER_DIO.type_name(&book(), Mode::Default), "ApiBookSeries");
        assert_eq!(
            FLUTTER_DIO.import_file("ApiBookSeries"),
            "api-book-series.dart"
        );
    }

    #[test]
    fn test_typescript_import_file_is_relative() {
        assert_eq!(ANGULAR.import_file("BookSeries"), "./book-series");
    }

    #[test]
    fn test_unknown_datatype_falls_back_to_dynamic_everywhere() {
        for kind in TargetKind::ALL {
            let target = kind.descriptor();
            assert_eq!(
                target.scalar(Datatype::Unknown, Mode::Default),
                target.scalars.dynamic
            );
        }
    }
}
