//! Case conversion for generated file and identifier names.
//!
//! Renderers receive these names precomputed; nothing downstream has to
//! call back into a shared helper registry.

use std::sync::LazyLock;

use regex::Regex;

static CAMEL_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("static regex must compile"));

/// Converts `camelCase`/`PascalCase` to `kebab-case`.
///
/// Only lower-to-upper boundaries are split, so acronyms stay together.
///
/// # Examples
///
/// ```
/// use clientgen_core::camel_case_to_kebab_case;
///
/// assert_eq!(camel_case_to_kebab_case("BookSeries"), "book-series");
/// assert_eq!(camel_case_to_kebab_case("ISBNCode"), "isbncode");
/// ```
pub fn camel_case_to_kebab_case(value: &str) -> String {
    CAMEL_BOUNDARY_RE
        .replace_all(value, "$1-$2")
        .to_lowercase()
}

/// Converts `camelCase`/`PascalCase` to `snake_case`.
///
/// # Examples
///
/// ```
/// use clientgen_core::camel_case_to_snake_case;
///
/// assert_eq!(camel_case_to_snake_case("createdAt"), "created_at");
/// ```
pub fn camel_case_to_snake_case(value: &str) -> String {
    CAMEL_BOUNDARY_RE
        .replace_all(value, "${1}_$2")
        .to_lowercase()
}
