//! Dataset source configuration.
//!
//! A [`DatasetConfig`] says where the incident table lives, how it is
//! encoded, and which CSV header feeds each [`Incident`] field. The
//! default configuration for the Global Terrorism Database export is
//! baked into the binary via [`include_str!`]; alternative layouts are
//! loaded from a TOML file at runtime.
//!
//! [`Incident`]: terror_map_incident_models::Incident

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::LoadError;

/// Embedded default configuration.
const DEFAULT_DATASET_TOML: &str = include_str!("../sources/global_terrorism.toml");

/// A complete dataset source definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetConfig {
    /// Unique identifier (e.g. `"global_terrorism"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Where to read the CSV from.
    pub source: DatasetSource,
    /// Compression of the raw bytes.
    #[serde(default)]
    pub compressed: Option<Compression>,
    /// Field delimiter (default: comma).
    #[serde(default)]
    pub delimiter: Option<String>,
    /// Maximum number of rows to parse.
    #[serde(default)]
    pub max_records: Option<u64>,
    /// Header names for each incident field.
    #[serde(default)]
    pub columns: ColumnMapping,
}

/// Location of the raw CSV.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatasetSource {
    /// A file on the local filesystem.
    File {
        /// Path to the file, relative to the working directory.
        path: PathBuf,
    },
    /// An HTTP(S) download.
    Url {
        /// Address of the file.
        url: String,
    },
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { path } => write!(f, "{}", path.display()),
            Self::Url { url } => write!(f, "{url}"),
        }
    }
}

/// Supported compression formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    /// gzip-compressed body.
    Gzip,
}

/// CSV header names for each incident field.
///
/// Defaults match the Global Terrorism Database export. `province` and
/// `city` are display-only and may be disabled by setting them to an
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Year column.
    pub year: String,
    /// Region label column.
    pub region: String,
    /// Country label column.
    pub country: String,
    /// Attack type label column.
    pub attack_type: String,
    /// Latitude column.
    pub latitude: String,
    /// Longitude column.
    pub longitude: String,
    /// Fatality count column.
    pub kill_count: String,
    /// Province/state column.
    pub province: String,
    /// City column.
    pub city: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            year: "iyear".to_string(),
            region: "region_txt".to_string(),
            country: "country_txt".to_string(),
            attack_type: "attacktype1_txt".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
            kill_count: "nkill".to_string(),
            province: "provstate".to_string(),
            city: "city".to_string(),
        }
    }
}

impl DatasetConfig {
    /// The embedded Global Terrorism Database configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed, which the crate's tests
    /// rule out.
    #[must_use]
    pub fn embedded() -> Self {
        parse_dataset_toml(DEFAULT_DATASET_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded dataset config: {e}"))
    }

    /// Reads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or is not a valid
    /// dataset config.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path)?;
        parse_dataset_toml(&contents)
    }

    /// Points the config at a local file, replacing its source.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = DatasetSource::File { path: path.into() };
        self
    }

    /// Points the config at a URL, replacing its source.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.source = DatasetSource::Url { url: url.into() };
        self
    }

    /// Caps the number of rows parsed.
    #[must_use]
    pub const fn with_max_records(mut self, max: u64) -> Self {
        self.max_records = Some(max);
        self
    }

    /// The delimiter byte, defaulting to `,`.
    #[must_use]
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter
            .as_deref()
            .and_then(|d| d.as_bytes().first().copied())
            .unwrap_or(b',')
    }
}

/// Parses a [`DatasetConfig`] from a TOML string.
///
/// # Errors
///
/// Returns [`LoadError::Config`] if the TOML is malformed or missing
/// required fields.
pub fn parse_dataset_toml(toml_str: &str) -> Result<DatasetConfig, LoadError> {
    Ok(toml::de::from_str(toml_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config = DatasetConfig::embedded();
        assert_eq!(config.id, "global_terrorism");
        assert_eq!(config.columns, ColumnMapping::default());
        assert_eq!(
            config.source,
            DatasetSource::File {
                path: PathBuf::from("data/global_terror.csv")
            }
        );
        assert_eq!(config.delimiter_byte(), b',');
    }

    #[test]
    fn parses_url_source_with_gzip_and_custom_columns() {
        let config = parse_dataset_toml(
            r#"
            id = "mirror"
            name = "Mirror"
            compressed = "gzip"
            delimiter = "\t"
            max_records = 100

            [source]
            type = "url"
            url = "https://example.org/gtd.tsv.gz"

            [columns]
            year = "year"
            city = ""
            "#,
        )
        .unwrap();

        assert_eq!(config.compressed, Some(Compression::Gzip));
        assert_eq!(config.delimiter_byte(), b'\t');
        assert_eq!(config.max_records, Some(100));
        assert_eq!(config.columns.year, "year");
        assert_eq!(config.columns.region, "region_txt");
        assert!(config.columns.city.is_empty());
        assert_eq!(config.source.to_string(), "https://example.org/gtd.tsv.gz");
    }

    #[test]
    fn rejects_unknown_source_type() {
        let result = parse_dataset_toml(
            r#"
            id = "x"
            name = "X"
            [source]
            type = "ftp"
            url = "ftp://example.org"
            "#,
        );
        assert!(matches!(result, Err(LoadError::Config(_))));
    }

    #[test]
    fn overrides_replace_source() {
        let config = DatasetConfig::embedded()
            .with_url("https://example.org/a.csv")
            .with_max_records(5);
        assert_eq!(
            config.source,
            DatasetSource::Url {
                url: "https://example.org/a.csv".to_string()
            }
        );
        assert_eq!(config.max_records, Some(5));
    }
}
