//! Generator configuration.
//!
//! Defines the YAML-serializable settings of a generation run. Every key is
//! optional; command-line flags override whatever the file sets.
//!
//! # Example YAML
//!
//! ```yaml
//! target: angular-v2
//! entrypoint: https://demo.example.com
//! resource: books
//! resource_prefix: Api
//! patch_schema: patch.json
//! dump_schema: resources.json
//! output: model.yaml
//! format: yaml
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use clientgen_core::{Selection, TargetKind};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::output::OutputFormat;

/// Settings of one generation run.
///
/// # Examples
///
/// ```
/// use clientgen_core::TargetKind;
/// use clientgen_io::GeneratorConfig;
///
/// let config: GeneratorConfig = serde_yaml::from_str("target: flutter-dio").unwrap();
/// assert_eq!(config.target, TargetKind::FlutterDio);
/// assert!(config.resource.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Target client platform.
    pub target: TargetKind,
    /// Entrypoint overriding the one in the documentation file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    /// Generate only the resource with this name or title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// Prefix for prefixed titles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_prefix: Option<String>,
    /// Patch document merged before generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_schema: Option<PathBuf>,
    /// Dump the filtered resources here instead of generating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump_schema: Option<PathBuf>,
    /// Where to write the model bundle (stdout when absent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Bundle format; guessed from `output` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::LoadError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::LoadError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::LoadError::Io) if the file cannot be written,
    /// or [`Yaml`](crate::LoadError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Returns the configured format, else the one implied by `output`.
    ///
    /// # Examples
    ///
    /// ```
    /// use clientgen_io::{GeneratorConfig, OutputFormat};
    ///
    /// let config: GeneratorConfig = serde_yaml::from_str("output: model.yml").unwrap();
    /// assert_eq!(config.output_format(), OutputFormat::Yaml);
    /// assert_eq!(GeneratorConfig::default().output_format(), OutputFormat::Json);
    /// ```
    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_else(|| {
            self.output
                .as_deref()
                .map(OutputFormat::from_path)
                .unwrap_or_default()
        })
    }

    /// Returns the resource selection described by this configuration.
    pub fn selection(&self) -> Selection {
        Selection {
            resource: self.resource.clone(),
            resource_prefix: self.resource_prefix.clone(),
        }
    }
}
