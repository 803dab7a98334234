//! Generation orchestration.
//!
//! [`run`] filters the resources of an [`Api`] and drives a [`Generator`]
//! through three passes: `generate` once per resource, `help` once per
//! resource, then a single `finalize` over everything processed.

use tracing::{debug, info};

use crate::types::{Api, Field, ReferenceIndex, Resource};

/// Which resources a run covers and how their types are prefixed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Only generate the resource whose name or title matches
    /// (case-insensitive).
    pub resource: Option<String>,
    /// Prefix prepended to every title to form the prefixed title.
    pub resource_prefix: Option<String>,
}

impl Selection {
    /// Selects every resource.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the selection to one resource.
    pub fn with_resource(mut self, resource: &str) -> Self {
        self.resource = Some(resource.to_string());
        self
    }

    /// Sets the title prefix.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.resource_prefix = Some(prefix.to_string());
        self
    }

    /// Returns `true` when `resource` passes the selector.
    pub fn matches(&self, resource: &Resource) -> bool {
        match self.resource.as_deref() {
            None => true,
            Some(wanted) => {
                resource.name.eq_ignore_ascii_case(wanted)
                    || resource.title.eq_ignore_ascii_case(wanted)
            }
        }
    }

    fn prefix(&self) -> Option<&str> {
        self.resource_prefix.as_deref().filter(|p| !p.is_empty())
    }
}

/// A per-target code generator driven by [`run`].
pub trait Generator {
    type Error;

    /// Produces the artifacts of one resource.
    fn generate(&mut self, index: &ReferenceIndex, resource: &Resource) -> Result<(), Self::Error>;

    /// Reports what was generated for `resource`. Runs after every
    /// `generate` call, with the full processed list.
    fn help(&mut self, _resource: &Resource, _processed: &[Resource]) {}

    /// Produces cross-resource artifacts.
    fn finalize(&mut self, index: &ReferenceIndex, processed: &[Resource])
    -> Result<(), Self::Error>;
}

/// Result of a [`run`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    /// Resources handed to the generator, in order.
    pub processed: Vec<Resource>,
}

/// Applies the filtering pipeline.
///
/// In order: deprecated resources are dropped, the selector is applied,
/// `prefixed_title` is assigned and deprecated fields are removed from all
/// three field lists.
///
/// # Examples
///
/// ```
/// use clientgen_core::*;
///
/// let api = Api::new("http://example.com")
///     .with_resource(Resource::new("urn:book", "books", "Book"))
///     .with_resource(Resource::new("urn:old", "olds", "Old").deprecated());
///
/// let resources = prepare_resources(&api, &Selection::all().with_prefix("Api"));
/// assert_eq!(resources.len(), 1);
/// assert_eq!(resources[0].prefixed_title.as_deref(), Some("ApiBook"));
/// ```
pub fn prepare_resources(api: &Api, selection: &Selection) -> Vec<Resource> {
    let prefix = selection.prefix();

    api.resources
        .iter()
        .filter(|r| {
            if r.deprecated {
                debug!(resource = %r.title, "Skipping deprecated resource");
            }
            !r.deprecated
        })
        .filter(|r| selection.matches(r))
        .map(|r| {
            let mut resource = r.clone();
            resource.prefixed_title = Some(match prefix {
                Some(prefix) => format!("{prefix}{}", resource.title),
                None => resource.title.clone(),
            });
            drop_deprecated(&mut resource.fields);
            drop_deprecated(&mut resource.readable_fields);
            drop_deprecated(&mut resource.writable_fields);
            resource
        })
        .collect()
}

fn drop_deprecated(fields: &mut Vec<Field>) {
    fields.retain(|f| !f.deprecated);
}

/// Runs `generator` over the resources of `api` picked by `selection`.
///
/// References resolve against every resource of `api`, including those
/// filtered out, so a type can still be named when its resource is not
/// generated.
///
/// # Errors
///
/// Stops at the first error returned by `generate` or `finalize`.
pub fn run<G: Generator>(
    api: &Api,
    selection: &Selection,
    generator: &mut G,
) -> Result<RunOutcome, G::Error> {
    let index = ReferenceIndex::new(&api.resources, selection.prefix());
    let processed = prepare_resources(api, selection);
    info!(
        resources = processed.len(),
        total = api.resources.len(),
        "Generating resources"
    );

    for resource in &processed {
        debug!(resource = %resource.title, "Generating");
        generator.generate(&index, resource)?;
    }

    for resource in &processed {
        generator.help(resource, &processed);
    }

    generator.finalize(&index, &processed)?;

    Ok(RunOutcome { processed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        fail_on: Option<String>,
    }

    impl Generator for Recorder {
        type Error = String;

        fn generate(&mut self, _index: &ReferenceIndex, resource: &Resource) -> Result<(), String> {
            if self.fail_on.as_deref() == Some(resource.title.as_str()) {
                return Err(format!("cannot generate {}", resource.title));
            }
            self.calls.push(format!("generate:{}", resource.title));
            Ok(())
        }

        fn help(&mut self, resource: &Resource, processed: &[Resource]) {
            self.calls
                .push(format!("help:{}:{}", resource.title, processed.len()));
        }

        fn finalize(&mut self, index: &ReferenceIndex, processed: &[Resource]) -> Result<(), String> {
            self.calls
                .push(format!("finalize:{}:{}", processed.len(), index.len()));
            Ok(())
        }
    }

    fn api() -> Api {
        Api::new("http://example.com")
            .with_resource(
                Resource::new("urn:book", "books", "Book")
                    .with_field(Field::new("title"))
                    .with_field(Field::new("legacyCode").deprecated())
                    .with_readable(Field::new("oldRating").deprecated()),
            )
            .with_resource(Resource::new("urn:archive", "archives", "Archive").deprecated())
            .with_resource(Resource::new("urn:review", "reviews", "Review"))
    }

    #[test]
    fn test_prepare_drops_deprecated_resources_and_fields() {
        let resources = prepare_resources(&api(), &Selection::all());
        let titles: Vec<_> = resources.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Book", "Review"]);

        let book = &resources[0];
        assert_eq!(book.fields.len(), 1);
        assert_eq!(book.readable_fields.len(), 1);
        assert_eq!(book.writable_fields.len(), 1);
        assert_eq!(book.prefixed_title.as_deref(), Some("Book"));
    }

    #[test]
    fn test_selector_is_case_insensitive_on_name_or_title() {
        let by_name = prepare_resources(&api(), &Selection::all().with_resource("REVIEWS"));
        let by_title = prepare_resources(&api(), &Selection::all().with_resource("review"));
        assert_eq!(by_name, by_title);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].title, "Review");
    }

    #[test]
    fn test_selector_never_revives_deprecated_resources() {
        let resources = prepare_resources(&api(), &Selection::all().with_resource("archive"));
        assert!(resources.is_empty());
    }

    #[test]
    fn test_run_calls_passes_in_order() {
        let mut recorder = Recorder::default();
        let outcome = run(&api(), &Selection::all().with_prefix("My"), &mut recorder).unwrap();

        assert_eq!(
            recorder.calls,
            [
                "generate:Book",
                "generate:Review",
                "help:Book:2",
                "help:Review:2",
                "finalize:2:3",
            ]
        );
        assert_eq!(outcome.processed[1].prefixed_title.as_deref(), Some("MyReview"));
    }

    #[test]
    fn test_run_stops_at_first_error() {
        let mut recorder = Recorder {
            fail_on: Some("Review".to_string()),
            ..Default::default()
        };

        let err = run(&api(), &Selection::all(), &mut recorder).unwrap_err();
        assert_eq!(err, "cannot generate Review");
        assert_eq!(recorder.calls, ["generate:Book"]);
    }
}
