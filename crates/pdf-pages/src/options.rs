use crate::constants::{DEFAULT_EXPORT_FILENAME, FALLBACK_EXPORT_FILENAME};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output quality tier. Its effect is entirely in the save parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Quality {
    /// Compressed streams, unused objects pruned
    Low,
    /// Compressed streams
    Medium,
    /// Streams written as they are
    #[default]
    High,
}

/// Which pages an operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum SelectionMode {
    /// The whole active collection
    #[default]
    All,
    /// Only selected pages, in collection order
    Selection,
}

/// Export configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ExportOptions {
    pub filename: String,
    pub quality: Quality,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            filename: DEFAULT_EXPORT_FILENAME.to_string(),
            quality: Quality::High,
        }
    }
}

impl ExportOptions {
    /// Filename to write; blank names fall back to `merged.pdf`.
    pub fn resolved_filename(&self) -> &str {
        let name = self.filename.trim();
        if name.is_empty() {
            FALLBACK_EXPORT_FILENAME
        } else {
            name
        }
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| PagesError::Config(format!("Failed to parse export options: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            PagesError::Config(format!("Failed to serialize export options: {}", e))
        })?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let name = self.resolved_filename();
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(PagesError::Config(format!(
                "Export filename '{}' must be a plain file name",
                name
            )));
        }
        Ok(())
    }
}
