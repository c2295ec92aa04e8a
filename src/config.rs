//! PDF layout configuration file
//!
//! ```yaml
//! header_text: "ACCEPTED AS @ ANBP DN ZONE 2025"
//! height_multiplier: 1.18
//! brand_mark: assets/brand-mark.png   # relative to this file
//! ```
//!
//! Every key is optional. Command-line flags and environment variables take
//! precedence over the file, which takes precedence over built-in defaults.

use crate::error::{AdvisorError, AdvisorResult};
use crate::pdf::BrandMark;
use crate::types::{ExportLayoutParams, DEFAULT_HEADER_TEXT, DEFAULT_HEIGHT_MULTIPLIER};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    #[serde(default)]
    pub header_text: Option<String>,
    #[serde(default)]
    pub height_multiplier: Option<f64>,
    #[serde(default)]
    pub brand_mark: Option<PathBuf>,
}

impl LayoutConfig {
    /// Parse YAML text
    pub fn from_yaml(text: &str) -> AdvisorResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a config file; a relative `brand_mark` resolves against the file's directory
    pub fn load(path: &Path) -> AdvisorResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AdvisorError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&text)
            .map_err(|e| AdvisorError::Config(format!("{}: {}", path.display(), e)))?;

        if let (Some(mark), Some(dir)) = (&config.brand_mark, path.parent()) {
            if mark.is_relative() {
                config.brand_mark = Some(dir.join(mark));
            }
        }
        debug!(path = %path.display(), ?config, "Loaded layout config");
        Ok(config)
    }

    /// Layer explicit values (flags / env) over the file values
    pub fn with_overrides(
        self,
        header_text: Option<String>,
        height_multiplier: Option<f64>,
        brand_mark: Option<PathBuf>,
    ) -> Self {
        Self {
            header_text: header_text.or(self.header_text),
            height_multiplier: height_multiplier.or(self.height_multiplier),
            brand_mark: brand_mark.or(self.brand_mark),
        }
    }

    /// Validated layout parameters, falling back to defaults
    pub fn layout_params(&self) -> AdvisorResult<ExportLayoutParams> {
        ExportLayoutParams::new(
            self.header_text
                .clone()
                .unwrap_or_else(|| DEFAULT_HEADER_TEXT.to_string()),
            self.height_multiplier.unwrap_or(DEFAULT_HEIGHT_MULTIPLIER),
        )
    }

    /// Configured brand image, or the bundled one
    pub fn brand_mark(&self) -> AdvisorResult<BrandMark> {
        match &self.brand_mark {
            Some(path) => BrandMark::from_path(path),
            None => BrandMark::bundled(),
        }
    }
}
