//! Bake configuration
//!
//! Settings can be built in code, parsed from TOML and overridden from
//! `SHAPEBAKE_*` environment variables.

use serde::{Deserialize, Serialize};
use shapebake_core::{Error, Result};
use std::env;
use std::fs;
use std::path::Path;

/// Settings shared by every bake of an `ExpressionBaker`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeConfig {
    /// Name given to a basis created implicitly by the first bake
    pub basis_name: String,
    /// Name used when the caller supplies a blank one
    pub default_key_name: String,
    /// Longest accepted key name in bytes; longer names are truncated
    pub max_name_len: usize,
    /// Vertex count from which the delta batch runs on the rayon pool
    pub parallel_threshold: usize,
    /// Local delta magnitude above which a vertex counts as displaced
    pub displacement_epsilon: f32,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            basis_name: "Basis".to_string(),
            default_key_name: "Expression".to_string(),
            max_name_len: 63,
            parallel_threshold: 4096,
            displacement_epsilon: 1e-6,
        }
    }
}

impl BakeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the implicit basis name
    pub fn with_basis_name(mut self, name: impl Into<String>) -> Self {
        self.basis_name = name.into();
        self
    }

    /// Set the fallback key name
    pub fn with_default_key_name(mut self, name: impl Into<String>) -> Self {
        self.default_key_name = name.into();
        self
    }

    /// Set the parallel threshold; `usize::MAX` keeps every batch sequential
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_displacement_epsilon(mut self, epsilon: f32) -> Self {
        self.displacement_epsilon = epsilon;
        self
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `SHAPEBAKE_*` environment variables.
    ///
    /// Unparsable values are ignored and leave the field unchanged.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("SHAPEBAKE_BASIS_NAME") {
            self.basis_name = val;
        }
        if let Ok(val) = env::var("SHAPEBAKE_DEFAULT_KEY_NAME") {
            self.default_key_name = val;
        }
        if let Ok(val) = env::var("SHAPEBAKE_PARALLEL_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                self.parallel_threshold = threshold;
            }
        }
        if let Ok(val) = env::var("SHAPEBAKE_DISPLACEMENT_EPSILON") {
            if let Ok(epsilon) = val.parse() {
                self.displacement_epsilon = epsilon;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.basis_name.trim().is_empty() {
            return Err(Error::Config("basis_name must not be empty".to_string()));
        }
        if self.default_key_name.trim().is_empty() {
            return Err(Error::Config("default_key_name must not be empty".to_string()));
        }
        if truncate_name(&self.default_key_name, self.max_name_len).trim().is_empty() {
            return Err(Error::Config(format!(
                "max_name_len {} leaves default_key_name '{}' blank",
                self.max_name_len, self.default_key_name
            )));
        }
        if !self.displacement_epsilon.is_finite() || self.displacement_epsilon < 0.0 {
            return Err(Error::Config(format!(
                "displacement_epsilon must be finite and non-negative, got {}",
                self.displacement_epsilon
            )));
        }
        Ok(())
    }

    /// Resolve the name a new key will carry.
    ///
    /// Long names are cut at the last character boundary within
    /// `max_name_len` bytes; a name that is blank after cutting falls back to
    /// `default_key_name`. Uniqueness is not checked.
    pub fn resolve_key_name(&self, requested: &str) -> String {
        let name = truncate_name(requested, self.max_name_len);
        if name.trim().is_empty() {
            truncate_name(&self.default_key_name, self.max_name_len).to_string()
        } else {
            name.to_string()
        }
    }
}

fn truncate_name(name: &str, max_len: usize) -> &str {
    if name.len() <= max_len {
        return name;
    }
    let mut end = max_len;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
