//! CSV to [`Dataset`] conversion.
//!
//! Rows are read as raw bytes and decoded lossily: exports of the Global
//! Terrorism Database are not reliably UTF-8, and a stray Latin-1 city name
//! should not sink the whole load.

use std::collections::BTreeMap;
use std::io::Read;

use terror_map_incident_models::{Dataset, Incident, IncidentDetails};

use crate::LoadError;
use crate::config::{ColumnMapping, DatasetConfig};

/// Header positions resolved against a [`ColumnMapping`].
struct ColumnIndex {
    year: usize,
    region: usize,
    country: usize,
    attack_type: usize,
    latitude: usize,
    longitude: usize,
    kill_count: usize,
    province: Option<usize>,
    city: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &[String], columns: &ColumnMapping) -> Result<Self, LoadError> {
        let positions: BTreeMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();

        let required = |name: &str| {
            positions
                .get(name)
                .copied()
                .ok_or_else(|| LoadError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let optional = |name: &str| {
            if name.is_empty() {
                Ok(None)
            } else {
                required(name).map(Some)
            }
        };

        Ok(Self {
            year: required(&columns.year)?,
            region: required(&columns.region)?,
            country: required(&columns.country)?,
            attack_type: required(&columns.attack_type)?,
            latitude: required(&columns.latitude)?,
            longitude: required(&columns.longitude)?,
            kill_count: required(&columns.kill_count)?,
            province: optional(&columns.province)?,
            city: optional(&columns.city)?,
        })
    }
}

/// Parses CSV bytes into a [`Dataset`] according to `config`.
///
/// # Errors
///
/// Returns [`LoadError`] if the CSV is malformed, a mapped column is
/// missing from the header row, or a year cell cannot be parsed.
pub fn parse_dataset<R: Read>(reader: R, config: &DatasetConfig) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter_byte())
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(LoadError::Parse(
            "CSV file contains no header row".to_owned(),
        ));
    }

    let index = ColumnIndex::resolve(&headers, &config.columns)?;
    let mut incidents = Vec::new();
    let mut without_coordinates: u64 = 0;

    for (i, result) in reader.byte_records().enumerate() {
        if let Some(max) = config.max_records
            && incidents.len() as u64 >= max
        {
            log::info!("[{}] Reached limit of {max} records", config.id);
            break;
        }

        let record = result?;
        let row = i as u64 + 1;
        let cell = |pos: usize| {
            record
                .get(pos)
                .map(|b| String::from_utf8_lossy(b).trim().to_owned())
                .unwrap_or_default()
        };

        let year_raw = cell(index.year);
        let year = parse_year(&year_raw).ok_or_else(|| LoadError::InvalidValue {
            row,
            column: config.columns.year.clone(),
            value: year_raw.clone(),
        })?;

        let incident = Incident {
            year,
            region: cell(index.region),
            country: cell(index.country),
            attack_type: cell(index.attack_type),
            latitude: parse_optional_f64(&cell(index.latitude)),
            longitude: parse_optional_f64(&cell(index.longitude)),
            kill_count: parse_kill_count(&cell(index.kill_count)),
            details: IncidentDetails {
                province: index.province.map(&cell).filter(|s| !s.is_empty()),
                city: index.city.map(&cell).filter(|s| !s.is_empty()),
            },
        };

        if incident.coordinates().is_none() {
            without_coordinates += 1;
        }
        incidents.push(incident);
    }

    log::info!(
        "[{}] Parsed {} incidents ({without_coordinates} without coordinates)",
        config.id,
        incidents.len()
    );

    Ok(Dataset::new(incidents))
}

/// Parses a year cell. Accepts integers and floats, truncating any
/// fractional part (`"2001.5"` is 2001).
#[must_use]
pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let value = s.parse::<f64>().ok()?.trunc();
    if !value.is_finite() || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(value as i32)
}

/// Parses a kill count cell. Negative counts are treated as missing.
#[must_use]
pub fn parse_kill_count(s: &str) -> Option<f64> {
    parse_optional_f64(s).filter(|&value| value >= 0.0)
}

/// Parses an optional numeric cell. Blank, unparseable, and non-finite
/// values all become `None`.
#[must_use]
pub fn parse_optional_f64(s: &str) -> Option<f64> {
    let value = s.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}
