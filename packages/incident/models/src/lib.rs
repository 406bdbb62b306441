#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record and dataset types.
//!
//! An [`Incident`] is one geolocated event with a fixed, typed schema that
//! is decided once at load time. A [`Dataset`] is the immutable, ordered
//! collection of every incident the application knows about. Nothing in
//! the workspace mutates a dataset after it has been constructed.

use serde::{Deserialize, Serialize};

/// Display-only fields carried alongside an incident.
///
/// These are never interpreted by the filter engine; they are passed
/// through untouched to whatever renders the incident.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetails {
    /// Province or state name.
    pub province: Option<String>,
    /// City name.
    pub city: Option<String>,
}

/// A single incident observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Year the incident occurred.
    pub year: i32,
    /// Region label (e.g. "Middle East & North Africa").
    pub region: String,
    /// Country label.
    pub country: String,
    /// Attack category label (e.g. "Bombing/Explosion").
    pub attack_type: String,
    /// Latitude, if the incident was geolocated.
    pub latitude: Option<f64>,
    /// Longitude, if the incident was geolocated.
    pub longitude: Option<f64>,
    /// Number of fatalities. `None` when casualty data is absent.
    pub kill_count: Option<f64>,
    /// Passthrough display fields.
    #[serde(flatten)]
    pub details: IncidentDetails,
}

impl Incident {
    /// Returns `(latitude, longitude)` when both coordinates are present.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Inclusive range of years observed in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearBounds {
    /// Earliest observed year.
    pub min: i32,
    /// Latest observed year.
    pub max: i32,
}

/// The immutable collection of incidents.
///
/// Order is preserved from construction but carries no meaning of its own.
/// Share it behind an `Arc` when several consumers need it at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    incidents: Vec<Incident>,
    year_bounds: Option<YearBounds>,
}

impl Dataset {
    /// Builds a dataset from fully materialized incidents.
    #[must_use]
    pub fn new(incidents: Vec<Incident>) -> Self {
        let year_bounds = incidents.iter().fold(None, |acc: Option<YearBounds>, i| {
            Some(acc.map_or(
                YearBounds {
                    min: i.year,
                    max: i.year,
                },
                |b| YearBounds {
                    min: b.min.min(i.year),
                    max: b.max.max(i.year),
                },
            ))
        });

        Self {
            incidents,
            year_bounds,
        }
    }

    /// All incidents in load order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Iterates over incidents in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, Incident> {
        self.incidents.iter()
    }

    /// Number of incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Returns `true` if the dataset holds no incidents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Earliest and latest year present, or `None` for an empty dataset.
    #[must_use]
    pub const fn year_bounds(&self) -> Option<YearBounds> {
        self.year_bounds
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Incident;
    type IntoIter = std::slice::Iter<'a, Incident>;

    fn into_iter(self) -> Self::IntoIter {
        self.incidents.iter()
    }
}

impl FromIterator<Incident> for Dataset {
    fn from_iter<T: IntoIterator<Item = Incident>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
