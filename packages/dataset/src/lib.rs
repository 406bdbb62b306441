#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident dataset loader.
//!
//! Reads a CSV export from a local file or URL (optionally gzip-compressed)
//! and materializes it into an immutable [`Dataset`]. Which header feeds
//! which field is described by a [`DatasetConfig`]. The filter engine never
//! sees a partially loaded dataset: [`load_dataset`] either returns the
//! whole table or an error, and [`DatasetStatus`] carries that outcome to
//! the presentation layer.

pub mod config;
pub mod fetch;
pub mod parse;

use std::sync::Arc;

use terror_map_incident_models::Dataset;

pub use config::{ColumnMapping, Compression, DatasetConfig, DatasetSource, parse_dataset_toml};

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// I/O error (file read, decompression).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The dataset config is malformed.
    #[error("Invalid dataset config: {0}")]
    Config(#[from] toml::de::Error),

    /// A mapped column is absent from the header row.
    #[error("Missing column '{column}'")]
    MissingColumn {
        /// Header name that was expected.
        column: String,
    },

    /// A required cell could not be parsed.
    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        /// 1-based data row number (header excluded).
        row: u64,
        /// Header name of the cell.
        column: String,
        /// Raw cell contents.
        value: String,
    },

    /// The file is structurally unusable.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Fetches and parses the dataset described by `config`.
///
/// # Errors
///
/// Returns [`LoadError`] if acquisition or parsing fails.
pub async fn load_dataset(config: &DatasetConfig) -> Result<Dataset, LoadError> {
    let bytes = fetch::fetch_bytes(config).await?;
    let dataset = parse::parse_dataset(bytes.as_slice(), config)?;

    if let Some(bounds) = dataset.year_bounds() {
        log::info!(
            "[{}] Loaded {} incidents spanning {}-{}",
            config.id,
            dataset.len(),
            bounds.min,
            bounds.max
        );
    } else {
        log::warn!("[{}] Dataset is empty", config.id);
    }

    Ok(dataset)
}

/// Outcome of the start-up load, as seen by the presentation layer.
#[derive(Debug, Clone)]
pub enum DatasetStatus {
    /// The dataset is fully loaded.
    Ready(Arc<Dataset>),
    /// Loading failed; no filtering is possible.
    Unavailable {
        /// Why the dataset could not be loaded.
        reason: String,
    },
}

impl DatasetStatus {
    /// Loads `config` and records the outcome instead of failing.
    pub async fn load(config: &DatasetConfig) -> Self {
        let result = load_dataset(config).await;
        if let Err(e) = &result {
            log::error!("[{}] Dataset unavailable: {e}", config.id);
        }
        result.into()
    }

    /// The dataset, if it loaded.
    #[must_use]
    pub const fn dataset(&self) -> Option<&Arc<Dataset>> {
        match self {
            Self::Ready(dataset) => Some(dataset),
            Self::Unavailable { .. } => None,
        }
    }

    /// Returns `true` if the dataset loaded.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl From<Result<Dataset, LoadError>> for DatasetStatus {
    fn from(result: Result<Dataset, LoadError>) -> Self {
        match result {
            Ok(dataset) => Self::Ready(Arc::new(dataset)),
            Err(e) => Self::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}
