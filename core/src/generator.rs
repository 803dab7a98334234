//! Built-in model generator.
//!
//! [`ModelGenerator`] is the [`Generator`] the CLI runs. Instead of writing
//! source files it collects, for one target, everything a template renderer
//! needs into a serializable [`ModelBundle`].

use std::collections::HashSet;
use std::convert::Infallible;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::imports::ImportEntry;
use crate::naming::camel_case_to_kebab_case;
use crate::orchestrate::Generator;
use crate::resolve::{ResolvedField, resolve_resource};
use crate::types::{ReferenceIndex, Resource, ResourceRef};
use crate::{Mode, TargetDescriptor, TargetKind};

/// Resolved output of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelBundle {
    pub target: TargetKind,
    /// RFC 3339 timestamp, stamped by the writer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    pub resources: Vec<ResourceModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateModel>,
    #[serde(default)]
    pub missing_dependencies: Vec<MissingDependency>,
}

impl ModelBundle {
    pub fn new(target: TargetKind) -> Self {
        Self {
            target,
            generated_at: None,
            resources: Vec::new(),
            aggregate: None,
            missing_dependencies: Vec::new(),
        }
    }

    /// Finds a resource model by title.
    pub fn find_resource(&self, title: &str) -> Option<&ResourceModel> {
        self.resources.iter().find(|r| r.title == title)
    }
}

/// Per-resource artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceModel {
    pub id: String,
    pub name: String,
    pub title: String,
    pub prefixed_title: String,
    /// Kebab-case file name of the generated artifacts.
    pub file_stem: String,
    /// One entry per target mode.
    pub artifacts: Vec<ArtifactModel>,
}

impl ResourceModel {
    pub fn artifact(&self, mode: Mode) -> Option<&ArtifactModel> {
        self.artifacts.iter().find(|a| a.mode == mode)
    }
}

/// One interface (or model class) of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactModel {
    pub mode: Mode,
    pub type_name: String,
    pub fields: Vec<ResolvedField>,
    pub imports: Vec<ImportEntry>,
}

/// Cross-resource context built by the finalize pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateModel {
    /// Serializer registry entries, in processing order.
    pub resources: Vec<ResourceWithFields>,
    /// Types of every processed resource and everything they import.
    pub imports: Vec<ImportEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceWithFields {
    pub name: String,
    pub title: String,
    pub prefixed_title: String,
    pub interface_file: String,
    pub fields: Vec<ResolvedField>,
}

/// An import whose resource is not part of the generated set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingDependency {
    /// Title of the importing resource.
    pub resource: String,
    /// Title of the resource that will not be generated.
    pub dependency: String,
    /// File the import points at.
    pub file: String,
}

/// Collects a [`ModelBundle`] for one target.
///
/// # Examples
///
/// ```
/// use clientgen_core::*;
///
/// let api = Api::new("http://example.com")
///     .with_resource(
///         Resource::new("urn:book", "books", "Book")
///             .with_field(Field::new("author").with_reference("urn:person").with_max_cardinality(1)),
///     )
///     .with_resource(Resource::new("urn:person", "people", "Person"));
///
/// let mut generator = ModelGenerator::new(TargetKind::AngularV2);
/// run(&api, &Selection::all(), &mut generator).unwrap();
/// let bundle = generator.into_bundle();
///
/// let book = bundle.find_resource("Book").unwrap();
/// assert_eq!(book.artifacts.len(), 2);
/// assert_eq!(book.artifact(Mode::Raw).unwrap().type_name, "RawBook");
/// assert_eq!(bundle.aggregate.unwrap().resources.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ModelGenerator {
    target: &'static TargetDescriptor,
    bundle: ModelBundle,
}

impl ModelGenerator {
    pub fn new(kind: TargetKind) -> Self {
        Self {
            target: kind.descriptor(),
            bundle: ModelBundle::new(kind),
        }
    }

    pub fn target(&self) -> &'static TargetDescriptor {
        self.target
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    pub fn into_bundle(self) -> ModelBundle {
        self.bundle
    }

    fn owner(resource: &Resource) -> ResourceRef {
        ResourceRef::from_resource(resource, None)
    }
}

impl Generator for ModelGenerator {
    type Error = Infallible;

    fn generate(&mut self, index: &ReferenceIndex, resource: &Resource) -> Result<(), Infallible> {
        let target = self.target;
        let owner = Self::owner(resource);

        let artifacts = target
            .modes
            .iter()
            .map(|&mode| {
                let resolved = resolve_resource(resource, index, target, mode);
                ArtifactModel {
                    mode,
                    type_name: target.type_name(&owner, mode),
                    fields: resolved.fields,
                    imports: resolved.imports,
                }
            })
            .collect();

        self.bundle.resources.push(ResourceModel {
            id: owner.id.clone(),
            name: owner.name.clone(),
            title: owner.title.clone(),
            file_stem: camel_case_to_kebab_case(target.key_title(&owner)),
            prefixed_title: owner.prefixed_title,
            artifacts,
        });
        Ok(())
    }

    fn help(&mut self, resource: &Resource, processed: &[Resource]) {
        info!(
            resource = %resource.title,
            target = %self.target.kind,
            "{} generated",
            self.target.summary
        );

        let Some(model) = self.bundle.resources.iter().find(|m| m.id == resource.id) else {
            return;
        };
        let generated: HashSet<&str> = processed.iter().map(|r| r.id.as_str()).collect();

        let mut seen = HashSet::new();
        let mut missing = Vec::new();
        let references = model
            .artifacts
            .iter()
            .flat_map(|a| &a.fields)
            .filter_map(|f| f.reference.as_ref());
        for reference in references {
            if generated.contains(reference.id.as_str()) || !seen.insert(reference.id.as_str()) {
                continue;
            }
            let title = self.target.key_title(reference);
            warn!(
                resource = %resource.title,
                dependency = %reference.title,
                "Referenced resource is not generated"
            );
            missing.push(MissingDependency {
                resource: resource.title.clone(),
                dependency: reference.title.clone(),
                file: self.target.import_file(title),
            });
        }
        self.bundle.missing_dependencies.extend(missing);
    }

    fn finalize(&mut self, index: &ReferenceIndex, processed: &[Resource]) -> Result<(), Infallible> {
        if !self.target.aggregate {
            return Ok(());
        }
        let target = self.target;

        let entries: Vec<(ResourceWithFields, Vec<ImportEntry>)> = processed
            .par_iter()
            .map(|resource| {
                let owner = Self::owner(resource);
                let title = target.key_title(&owner);
                let resolved = resolve_resource(resource, index, target, Mode::Default);

                let mut imports = Vec::with_capacity(resolved.imports.len() + 1);
                imports.push(ImportEntry {
                    type_name: target.type_name(&owner, Mode::Default),
                    file: target.import_file(title),
                });
                imports.extend(resolved.imports);

                let entry = ResourceWithFields {
                    name: owner.name.clone(),
                    title: owner.title.clone(),
                    interface_file: target.import_file(title),
                    prefixed_title: owner.prefixed_title,
                    fields: resolved.fields,
                };
                (entry, imports)
            })
            .collect();

        let mut aggregate = AggregateModel::default();
        let mut seen = HashSet::new();
        for (entry, imports) in entries {
            aggregate.resources.push(entry);
            for import in imports {
                if seen.insert(import.type_name.clone()) {
                    aggregate.imports.push(import);
                }
            }
        }

        info!(
            resources = aggregate.resources.len(),
            imports = aggregate.imports.len(),
            "Aggregate resolved"
        );
        self.bundle.aggregate = Some(aggregate);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrate::{Selection, run};
    use crate::{Api, Field, xsd};

    fn library() -> Api {
        Api::new("http://example.com")
            .with_resource(
                Resource::new("urn:book", "books", "Book")
                    .with_field(Field::new("title").with_range(xsd::STRING))
                    .with_field(
                        Field::new("author")
                            .with_reference("urn:person")
                            .with_max_cardinality(1),
                    )
                    .with_field(Field::new("reviews").with_reference("urn:review")),
            )
            .with_resource(
                Resource::new("urn:person", "people", "Person")
                    .with_field(Field::new("books").with_reference("urn:book")),
            )
            .with_resource(
                Resource::new("urn:review", "reviews", "BookReview")
                    .with_field(Field::new("book").with_reference("urn:book").with_max_cardinality(1)),
            )
    }

    fn generate(kind: TargetKind, selection: &Selection) -> ModelBundle {
        let mut generator = ModelGenerator::new(kind);
        run(&library(), selection, &mut generator).unwrap();
        generator.into_bundle()
    }

    #[test]
    fn test_one_artifact_per_mode() {
        let bundle = generate(TargetKind::AngularV2, &Selection::all());
        let book = bundle.find_resource("Book").unwrap();

        assert_eq!(book.artifacts.len(), 2);
        let raw = book.artifact(Mode::Raw).unwrap();
        assert_eq!(raw.type_name, "RawBook");
        let author = raw.fields.iter().find(|f| f.name == "author").unwrap();
        assert_eq!(author.type_name, "RawPerson | string");

        let angular = generate(TargetKind::Angular, &Selection::all());
        assert_eq!(angular.find_resource("Book").unwrap().artifacts.len(), 1);
        assert!(angular.aggregate.is_none());
    }

    #[test]
    fn test_file_stem_follows_key_title() {
        let bundle = generate(TargetKind::FlutterDio, &Selection::all().with_prefix("Api"));
        let review = bundle.find_resource("BookReview").unwrap();
        assert_eq!(review.file_stem, "api-book-review");
        assert_eq!(review.prefixed_title, "ApiBookReview");
        assert_eq!(
            review.artifact(Mode::Default).unwrap().type_name,
            "ApiBookReview"
        );

        let angular = generate(TargetKind::Angular, &Selection::all().with_prefix("Api"));
        assert_eq!(angular.find_resource("BookReview").unwrap().file_stem, "book-review");
    }

    #[test]
    fn test_aggregate_collects_maker_imports_without_duplicates() {
        let bundle = generate(TargetKind::FlutterDio, &Selection::all());
        let aggregate = bundle.aggregate.unwrap();

        let titles: Vec<_> = aggregate.resources.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Book", "Person", "BookReview"]);

        let types: Vec<_> = aggregate.imports.iter().map(|i| i.type_name.as_str()).collect();
        assert_eq!(types, ["Book", "Person", "BookReview"]);
        assert_eq!(aggregate.imports[2].file, "book-review.dart");
        assert_eq!(aggregate.resources[0].interface_file, "book.dart");
    }

    #[test]
    fn test_missing_dependencies_are_recorded() {
        let bundle = generate(TargetKind::Angular, &Selection::all().with_resource("book"));

        assert_eq!(bundle.resources.len(), 1);
        let missing: Vec<_> = bundle
            .missing_dependencies
            .iter()
            .map(|m| (m.dependency.as_str(), m.file.as_str()))
            .collect();
        assert_eq!(missing, [("Person", "./person"), ("BookReview", "./book-review")]);
    }

    #[test]
    fn test_full_run_has_no_missing_dependencies() {
        let bundle = generate(TargetKind::VuePluginAxios, &Selection::all());
        assert!(bundle.missing_dependencies.is_empty());
    }

    #[test]
    fn test_bundle_serializes_camel_case() {
        let bundle = generate(TargetKind::AngularV2, &Selection::all());
        let json = serde_json::to_value(&bundle).unwrap();

        assert_eq!(json["target"], "angular-v2");
        assert_eq!(json["resources"][0]["fileStem"], "book");
        assert_eq!(json["resources"][0]["artifacts"][1]["mode"], "raw");
        assert_eq!(json["resources"][0]["artifacts"][0]["fields"][0]["type"], "string");
        assert!(json.get("generatedAt").is_none());
    }
}
