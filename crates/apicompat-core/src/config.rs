//! Compatibility policy and `.apicompat.toml` loading.
//!
//! Configuration is optional. Every section and key has a default, and a
//! missing file yields [`CompatConfig::default`].
//!
//! # Example Configuration
//!
//! ```toml
//! [policy]
//! allow_result_extension = false
//! named_basic_compatible = true
//! max_depth = 32
//!
//! [output]
//! show_unchanged = true
//! color = false
//! ```

use crate::errors::{ExError, ExErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name searched by [`CompatConfig::discover`].
pub const CONFIG_FILE_NAME: &str = ".apicompat.toml";

/// Rule variants for the comparators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatPolicy {
    /// Appending results to a function that already returns something is
    /// compatible. When `false`, any extra trailing result is breaking.
    pub allow_result_extension: bool,

    /// Typed basic kinds sharing a representation under different names
    /// (`byte`/`uint8`, `type A uint8` vs `type B uint8`) are compatible.
    pub named_basic_compatible: bool,

    /// Nesting bound for structural comparison. Deeper shapes compare as
    /// incompatible.
    pub max_depth: usize,
}

impl CompatPolicy {
    pub const DEFAULT: CompatPolicy = CompatPolicy {
        allow_result_extension: true,
        named_basic_compatible: true,
        max_depth: 64,
    };
}

impl Default for CompatPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Presentation preferences. CLI flags override these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// List unchanged declarations too.
    pub show_unchanged: bool,

    /// Colour the change marks. `None` means "decide from the terminal".
    pub color: Option<bool>,
}

/// Root of `.apicompat.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    pub policy: CompatPolicy,
    pub output: OutputSettings,
}

impl CompatConfig {
    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the text is not valid TOML or a key has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: CompatConfig = toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_message(e.to_string())
        })?;
        if config.policy.max_depth == 0 {
            return Err(ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_message("policy.max_depth must be at least 1"));
        }
        Ok(config)
    }

    /// Load an explicit config file.
    ///
    /// # Errors
    ///
    /// - `Io`: the file cannot be read
    /// - `InvalidConfig`: the contents do not parse
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_message(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `.apicompat.toml` from `dir`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Same as [`CompatConfig::load`] when the file exists.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }
}
