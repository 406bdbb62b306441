#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the terror map server.
//!
//! These types are serialized to JSON for the REST API. They wrap the
//! filter engine's value types so the API contract can evolve separately
//! from the engine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use terror_map_filter_models::{
    FilterOptions, FilterState, MapPoint, OptionSet, PanelEntry, Statistics, YearRange,
};
use terror_map_incident_models::YearBounds;

/// Query parameters shared by every filtered endpoint.
///
/// List parameters are comma-separated. Omitted year bounds default to the
/// dataset's observed bounds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQueryParams {
    /// Comma-separated region labels.
    pub regions: Option<String>,
    /// Comma-separated country labels.
    pub countries: Option<String>,
    /// Comma-separated attack type labels.
    pub attack_types: Option<String>,
    /// First year to include.
    pub year_from: Option<i32>,
    /// Last year to include.
    pub year_to: Option<i32>,
}

impl FilterQueryParams {
    /// Builds the filter state these parameters describe, clamped into
    /// `bounds`.
    #[must_use]
    pub fn to_filter_state(&self, bounds: Option<YearBounds>) -> FilterState {
        let defaults = FilterState::for_bounds(bounds).year_range;
        // A missing end defaults to the dataset bound, but never past the
        // given end, so `yearFrom` alone cannot be swapped into the data.
        let year_range = match (self.year_from, self.year_to) {
            (Some(from), Some(to)) => YearRange::new(from, to),
            (Some(from), None) => YearRange::new(from, defaults.max().max(from)),
            (None, Some(to)) => YearRange::new(defaults.min().min(to), to),
            (None, None) => defaults,
        };

        FilterState::new(year_range)
            .with_regions(parse_list(self.regions.as_deref()))
            .with_countries(parse_list(self.countries.as_deref()))
            .with_attack_types(parse_list(self.attack_types.as_deref()))
            .normalized(bounds)
    }
}

/// Query parameters for the country options endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryOptionsParams {
    /// Comma-separated region labels.
    pub regions: Option<String>,
}

impl CountryOptionsParams {
    /// The selected regions.
    #[must_use]
    pub fn selected_regions(&self) -> BTreeSet<String> {
        parse_list(self.regions.as_deref())
    }
}

/// Pagination parameters for the incidents endpoint.
///
/// Kept separate from [`FilterQueryParams`] so both can be extracted from
/// the same query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitParams {
    /// Maximum number of points to return.
    pub limit: Option<usize>,
}

/// Splits a comma-separated list, trimming entries and dropping blanks.
#[must_use]
pub fn parse_list(s: Option<&str>) -> BTreeSet<String> {
    s.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Whether the dataset finished loading.
    pub dataset_loaded: bool,
}

/// Country option list for a region selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCountryOptions {
    /// Regions the list was derived from.
    pub regions: BTreeSet<String>,
    /// Valid countries.
    pub countries: OptionSet,
}

/// Map points for a filtered subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIncidents {
    /// Number of incidents matching the filter.
    pub total: u64,
    /// Number of matching incidents with coordinates.
    pub plottable: u64,
    /// Whether `points` was cut short by the limit.
    pub truncated: bool,
    /// The points, in dataset order.
    pub points: Vec<MapPoint>,
}

/// Statistics for a filtered subset plus their rendered panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatistics {
    /// Raw statistics.
    pub statistics: Statistics,
    /// Formatted panel entries.
    pub panel: Vec<PanelEntry>,
}

impl From<Statistics> for ApiStatistics {
    fn from(statistics: Statistics) -> Self {
        let panel = statistics.panel();
        Self { statistics, panel }
    }
}

/// One full recomputation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboard {
    /// The effective filter state.
    pub filter_state: FilterState,
    /// Option lists for every filter widget.
    pub options: FilterOptions,
    /// Plottable points.
    pub map_points: Vec<MapPoint>,
    /// Statistics and panel.
    pub statistics: ApiStatistics,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Short error code.
    pub error: String,
    /// Extra detail, if any.
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: YearBounds = YearBounds {
        min: 1970,
        max: 2017,
    };

    #[test]
    fn parse_list_trims_and_drops_blanks() {
        let list = parse_list(Some(" South Asia, ,Western Europe,,"));
        let expected: BTreeSet<String> = ["South Asia", "Western Europe"]
            .into_iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(list, expected);
        assert!(parse_list(None).is_empty());
        assert!(parse_list(Some("")).is_empty());
    }

    #[test]
    fn empty_params_give_default_state() {
        let state = FilterQueryParams::default().to_filter_state(Some(BOUNDS));
        assert_eq!(state, FilterState::for_bounds(Some(BOUNDS)));
    }

    #[test]
    fn year_params_are_reordered_and_clamped() {
        let params = FilterQueryParams {
            year_from: Some(2030),
            year_to: Some(2000),
            ..FilterQueryParams::default()
        };
        let state = params.to_filter_state(Some(BOUNDS));
        assert_eq!(state.year_range, YearRange::new(2000, 2017));
    }

    #[test]
    fn years_outside_dataset_stay_outside() {
        let after = FilterQueryParams {
            year_from: Some(2020),
            year_to: Some(2030),
            ..FilterQueryParams::default()
        };
        assert_eq!(
            after.to_filter_state(Some(BOUNDS)).year_range,
            YearRange::new(2020, 2030)
        );

        let from_only = FilterQueryParams {
            year_from: Some(2020),
            ..FilterQueryParams::default()
        };
        assert_eq!(
            from_only.to_filter_state(Some(BOUNDS)).year_range,
            YearRange::new(2020, 2020)
        );

        let to_only = FilterQueryParams {
            year_to: Some(1960),
            ..FilterQueryParams::default()
        };
        assert_eq!(
            to_only.to_filter_state(Some(BOUNDS)).year_range,
            YearRange::new(1960, 1960)
        );
    }

    #[test]
    fn list_params_populate_selections() {
        let params = FilterQueryParams {
            regions: Some("MENA".to_string()),
            countries: Some("Iraq,Syria".to_string()),
            attack_types: Some("Bombing/Explosion".to_string()),
            ..FilterQueryParams::default()
        };
        let state = params.to_filter_state(Some(BOUNDS));
        assert_eq!(state.regions.len(), 1);
        assert_eq!(state.countries.len(), 2);
        assert!(state.attack_types.contains("Bombing/Explosion"));
    }

    #[test]
    fn statistics_panel_is_attached() {
        let api: ApiStatistics = Statistics {
            total_incidents: 1_500,
            total_casualties: 2_000.0,
            top_country: Some("Iraq".to_string()),
            top_attack_type: None,
        }
        .into();
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["statistics"]["totalIncidents"], 1_500);
        assert_eq!(json["panel"][0]["value"], "1,500");
        assert_eq!(json["panel"][3]["value"], "N/A");
    }
}
