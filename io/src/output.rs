//! Model bundle output.

use std::io::{BufWriter, Write};
use std::path::Path;

use clientgen_core::ModelBundle;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// Serialization format of a written [`ModelBundle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// Guesses the format from a file extension, defaulting to JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use clientgen_io::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("model.yml"), OutputFormat::Yaml);
    /// assert_eq!(OutputFormat::from_path("model.json"), OutputFormat::Json);
    /// assert_eq!(OutputFormat::from_path("model"), OutputFormat::Json);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Sets `generated_at` to the current time unless already set.
pub fn stamp(bundle: &mut ModelBundle) {
    if bundle.generated_at.is_none() {
        bundle.generated_at = Some(chrono::Utc::now().to_rfc3339());
    }
}

/// Serializes `bundle` to a string.
///
/// # Errors
///
/// Returns [`LoadError::Json`](crate::LoadError::Json) or
/// [`LoadError::Yaml`](crate::LoadError::Yaml) if serialization fails.
pub fn render_bundle(bundle: &ModelBundle, format: OutputFormat) -> Result<String> {
    let mut text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(bundle)?,
        OutputFormat::Yaml => serde_yaml::to_string(bundle)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Stamps `bundle` and writes it to `path`.
///
/// # Errors
///
/// Returns [`LoadError::Io`](crate::LoadError::Io) if the file cannot be
/// written, or a serialization error.
pub fn write_bundle(
    bundle: &mut ModelBundle,
    path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<()> {
    let path = path.as_ref();
    stamp(bundle);
    let text = render_bundle(bundle, format)?;

    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;

    info!(
        path = %path.display(),
        target = %bundle.target,
        resources = bundle.resources.len(),
        "Wrote model bundle"
    );
    Ok(())
}
