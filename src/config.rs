//! Index and ingestion settings.
//!
//! Every field has a default, so an empty TOML document is a valid configuration:
//!
//! ```toml
//! [index]
//! dimension = 1280
//! strategy = "sort"
//!
//! [ingest]
//! path = "data/vectors.csv"
//! limit = 5000
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Feature length produced by the MobileNetV2 extractor.
pub const DEFAULT_DIMENSION: usize = 1280;
pub const DEFAULT_LIMIT: usize = 5000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub dimension: usize,
    pub strategy: BuildStrategy,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            strategy: BuildStrategy::default(),
        }
    }
}

impl IndexConfig {
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            ..Self::default()
        }
    }

    pub fn strategy(mut self, strategy: BuildStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// How the builder brings the median to `n / 2` at each level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStrategy {
    /// Stable sort on the split coordinate. Equal keys keep their input order,
    /// which makes tie placement and search tie-breaks reproducible.
    #[default]
    Sort,
    /// `select_nth_unstable_by`: expected linear time per level, only the
    /// median position is fixed.
    Select,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub path: PathBuf,
    /// Maximum number of rows to read; `None` reads the whole file.
    pub limit: Option<usize>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/vectors.csv"),
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.index.validate()
    }
}

impl IndexConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(Error::config("dimension cannot be 0"));
        }
        Ok(())
    }
}
