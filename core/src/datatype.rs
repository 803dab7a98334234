//! Datatype ranges.
//!
//! API documentations express scalar property types as XML Schema datatype
//! URIs. [`Datatype`] is the closed set of kinds the type mapper dispatches
//! on; every other range falls into [`Datatype::Unknown`].

use serde::{Deserialize, Serialize};

/// XML Schema datatype URIs understood by the type mapper.
pub mod xsd {
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    pub const TIME: &str = "http://www.w3.org/2001/XMLSchema#time";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}

/// Kind of a field's datatype range.
///
/// # Examples
///
/// ```
/// use clientgen_core::{Datatype, xsd};
///
/// assert_eq!(Datatype::from_range(Some(xsd::DATE_TIME)), Datatype::DateTime);
/// assert_eq!(Datatype::from_range(Some("http://schema.org/Text")), Datatype::Unknown);
/// assert_eq!(Datatype::from_range(None), Datatype::Unknown);
/// assert!(Datatype::Time.is_temporal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Datatype {
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Time,
    String,
    /// Any other or absent range.
    Unknown,
}

impl Datatype {
    /// Classifies a range URI.
    pub fn from_range(range: Option<&str>) -> Self {
        match range {
            Some(xsd::INTEGER) => Self::Integer,
            Some(xsd::DECIMAL) => Self::Decimal,
            Some(xsd::BOOLEAN) => Self::Boolean,
            Some(xsd::DATE) => Self::Date,
            Some(xsd::DATE_TIME) => Self::DateTime,
            Some(xsd::TIME) => Self::Time,
            Some(xsd::STRING) => Self::String,
            _ => Self::Unknown,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::Time)
    }
}
