//! File loading and model output for clientgen.
//!
//! This crate is the I/O shell around `clientgen-core`: it reads resource
//! graphs and patch documents from JSON, dumps filtered resources, writes
//! resolved [`ModelBundle`](clientgen_core::ModelBundle)s as JSON or YAML,
//! and loads the YAML [`GeneratorConfig`].
//!
//! # Quick start
//!
//! ```no_run
//! use clientgen_core::{ModelGenerator, TargetKind, run};
//! use clientgen_io::{GeneratorConfig, OutputFormat, apply_patch_file, load_api, write_bundle};
//!
//! let config = GeneratorConfig::load("clientgen.yml").unwrap();
//! let mut api = load_api("api.json", config.entrypoint.as_deref()).unwrap();
//! if let Some(patch) = &config.patch_schema {
//!     apply_patch_file(&mut api, patch).unwrap();
//! }
//!
//! let mut generator = ModelGenerator::new(config.target);
//! run(&api, &config.selection(), &mut generator).unwrap();
//!
//! let mut bundle = generator.into_bundle();
//! write_bundle(&mut bundle, "model.json", OutputFormat::Json).unwrap();
//! ```

mod config;
mod error;
mod loader;
mod output;

pub use config::GeneratorConfig;
pub use error::{LoadError, Result};
pub use loader::{apply_patch_file, dump_resources, load_api, load_patch, parse_api};
pub use output::{OutputFormat, render_bundle, stamp, write_bundle};
