#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Value types exchanged between the filter engine and its callers.
//!
//! [`FilterState`] is what the user has selected, [`OptionSet`] is what
//! they are allowed to select, and [`Statistics`] is what the current
//! selection adds up to. All of them are plain values: they are rebuilt
//! from scratch on every edit and never hold references into a dataset.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use terror_map_incident_models::{Incident, YearBounds};

/// Default spacing between year slider marks.
pub const DEFAULT_YEAR_MARK_STEP: u16 = 5;

/// Inclusive year interval. Always satisfies `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawYearRange")]
pub struct YearRange {
    min: i32,
    max: i32,
}

/// Wire form of [`YearRange`], reordered on the way in.
#[derive(Deserialize)]
struct RawYearRange {
    min: i32,
    max: i32,
}

impl From<RawYearRange> for YearRange {
    fn from(raw: RawYearRange) -> Self {
        Self::new(raw.min, raw.max)
    }
}

impl YearRange {
    /// Creates a range, swapping the arguments if they arrive reversed.
    #[must_use]
    pub const fn new(a: i32, b: i32) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub const fn min(self) -> i32 {
        self.min
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub const fn max(self) -> i32 {
        self.max
    }

    /// Returns `true` if `year` lies within the range.
    #[must_use]
    pub const fn contains(self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }

    /// Returns `true` if the range shares at least one year with `bounds`.
    #[must_use]
    pub const fn overlaps(self, bounds: YearBounds) -> bool {
        self.min <= bounds.max && self.max >= bounds.min
    }

    /// Clamps both ends into `bounds`.
    ///
    /// A range disjoint from `bounds` is returned unchanged, so it keeps
    /// matching nothing instead of collapsing onto a boundary year.
    #[must_use]
    pub fn clamp_to(self, bounds: YearBounds) -> Self {
        if !self.overlaps(bounds) {
            return self;
        }
        Self::new(
            self.min.clamp(bounds.min, bounds.max),
            self.max.clamp(bounds.min, bounds.max),
        )
    }
}

impl From<YearBounds> for YearRange {
    fn from(bounds: YearBounds) -> Self {
        Self::new(bounds.min, bounds.max)
    }
}

/// The user's current selection across every filter dimension.
///
/// An empty selection set places no constraint on its dimension. It never
/// means "match nothing".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Selected region labels.
    #[serde(default)]
    pub regions: BTreeSet<String>,
    /// Selected country labels.
    #[serde(default)]
    pub countries: BTreeSet<String>,
    /// Selected attack type labels.
    #[serde(default)]
    pub attack_types: BTreeSet<String>,
    /// Inclusive year range.
    pub year_range: YearRange,
}

impl FilterState {
    /// Creates a state with empty selections over `year_range`.
    #[must_use]
    pub const fn new(year_range: YearRange) -> Self {
        Self {
            regions: BTreeSet::new(),
            countries: BTreeSet::new(),
            attack_types: BTreeSet::new(),
            year_range,
        }
    }

    /// The default state for a dataset: full year bounds, nothing selected.
    ///
    /// An empty dataset has no bounds; `year 0` is used as a placeholder
    /// since there is nothing to match anyway.
    #[must_use]
    pub fn for_bounds(bounds: Option<YearBounds>) -> Self {
        Self::new(bounds.map_or(YearRange::new(0, 0), YearRange::from))
    }

    /// Replaces the region selection.
    #[must_use]
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the country selection.
    #[must_use]
    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the attack type selection.
    #[must_use]
    pub fn with_attack_types<I, S>(mut self, attack_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attack_types = attack_types.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the year range.
    #[must_use]
    pub const fn with_year_range(mut self, year_range: YearRange) -> Self {
        self.year_range = year_range;
        self
    }

    /// Returns a copy whose year range is clamped into `bounds`.
    ///
    /// With no bounds (empty dataset), or a range outside them, the state
    /// is returned unchanged.
    #[must_use]
    pub fn normalized(mut self, bounds: Option<YearBounds>) -> Self {
        if let Some(bounds) = bounds {
            self.year_range = self.year_range.clamp_to(bounds);
        }
        self
    }

    /// Returns `true` if no selection set is populated.
    #[must_use]
    pub fn has_no_selections(&self) -> bool {
        self.regions.is_empty() && self.countries.is_empty() && self.attack_types.is_empty()
    }
}

/// A sorted, duplicate-free list of option labels for one dropdown.
///
/// Deserialized lists go through [`OptionSet::from_labels`], so the
/// ordering holds whatever the input looked like.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct OptionSet(Vec<String>);

impl From<Vec<String>> for OptionSet {
    fn from(labels: Vec<String>) -> Self {
        Self::from_labels(labels)
    }
}

impl OptionSet {
    /// Builds an option set from arbitrary labels, sorting ascending by raw
    /// string and dropping duplicates. Comparison is case-sensitive.
    #[must_use]
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        Self(unique.into_iter().collect())
    }

    /// Returns `true` if `label` is one of the options.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0
            .binary_search_by(|option| option.as_str().cmp(label))
            .is_ok()
    }

    /// Returns `true` if every option here is also in `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.0.iter().all(|label| other.contains(label))
    }

    /// The options in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterates over the options in ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Summary statistics over a filtered subset.
///
/// `None` in the `top_*` fields means the subset was empty, not that the
/// value is unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of incidents in the subset.
    pub total_incidents: u64,
    /// Sum of kill counts, missing values counted as zero.
    pub total_casualties: f64,
    /// Most frequent country.
    pub top_country: Option<String>,
    /// Most frequent attack type.
    pub top_attack_type: Option<String>,
}

impl Statistics {
    /// Statistics of an empty subset.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            total_incidents: 0,
            total_casualties: 0.0,
            top_country: None,
            top_attack_type: None,
        }
    }

    /// Renders the four summary metrics as display strings, in panel order.
    #[must_use]
    pub fn panel(&self) -> Vec<PanelEntry> {
        StatMetric::ALL
            .iter()
            .map(|&metric| PanelEntry {
                metric,
                label: metric.to_string(),
                value: self.display_value(metric),
            })
            .collect()
    }

    /// Formats a single metric for display.
    #[must_use]
    pub fn display_value(&self, metric: StatMetric) -> String {
        match metric {
            StatMetric::TotalIncidents => format_count(self.total_incidents),
            StatMetric::TotalCasualties => format_casualties(self.total_casualties),
            StatMetric::MostAffectedCountry => {
                self.top_country.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
            }
            StatMetric::MostCommonAttackType => self
                .top_attack_type
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

const NOT_AVAILABLE: &str = "N/A";

/// The four metrics shown on the statistics panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
pub enum StatMetric {
    /// Number of incidents.
    #[strum(serialize = "Total Incidents")]
    TotalIncidents,
    /// Sum of fatalities.
    #[strum(serialize = "Total Casualties")]
    TotalCasualties,
    /// Country with the most incidents.
    #[strum(serialize = "Most Affected Country")]
    MostAffectedCountry,
    /// Attack type with the most incidents.
    #[strum(serialize = "Most Common Attack Type")]
    MostCommonAttackType,
}

impl StatMetric {
    /// Every metric in panel order.
    pub const ALL: &[Self] = &[
        Self::TotalIncidents,
        Self::TotalCasualties,
        Self::MostAffectedCountry,
        Self::MostCommonAttackType,
    ];
}

/// One rendered metric on the statistics panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelEntry {
    /// Which metric this is.
    pub metric: StatMetric,
    /// Human-readable heading.
    pub label: String,
    /// Formatted value.
    pub value: String,
}

/// Formats an integer with `,` thousands separators.
#[must_use]
pub fn format_count(n: u64) -> String {
    group_thousands(&n.to_string())
}

/// Formats a casualty total rounded to a whole number with `,` thousands
/// separators.
#[must_use]
pub fn format_casualties(total: f64) -> String {
    let rounded = format!("{total:.0}");
    rounded.strip_prefix('-').map_or_else(
        || group_thousands(&rounded),
        |digits| format!("-{}", group_thousands(digits)),
    )
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// A plottable incident: coordinates, the colour grouping key, and the
/// fields shown on hover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Attack type. Doubles as the colour grouping key.
    pub attack_type: String,
    /// Region label.
    pub region: String,
    /// Country label.
    pub country: String,
    /// Province or state.
    pub province: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Fatalities, if known.
    pub kill_count: Option<f64>,
    /// Year of the incident.
    pub year: i32,
}

impl MapPoint {
    /// Builds a map point, or `None` if the incident lacks coordinates.
    #[must_use]
    pub fn from_incident(incident: &Incident) -> Option<Self> {
        let (latitude, longitude) = incident.coordinates()?;
        Some(Self {
            latitude,
            longitude,
            attack_type: incident.attack_type.clone(),
            region: incident.region.clone(),
            country: incident.country.clone(),
            province: incident.details.province.clone(),
            city: incident.details.city.clone(),
            kill_count: incident.kill_count,
            year: incident.year,
        })
    }
}

/// A labelled tick on the year slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearMark {
    /// Year the mark sits on.
    pub year: i32,
    /// Label text.
    pub label: String,
}

/// Every option list the filter widgets need, derived from one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// All regions in the dataset.
    pub regions: OptionSet,
    /// Countries valid for the selected regions.
    pub countries: OptionSet,
    /// All attack types in the dataset.
    pub attack_types: OptionSet,
    /// Observed year bounds, `None` for an empty dataset.
    pub year_bounds: Option<YearBounds>,
    /// Slider marks across the year bounds.
    pub year_marks: Vec<YearMark>,
}

/// Output of one full recomputation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// The state the pass was computed from, after normalization and
    /// dropping of countries outside the selected regions.
    pub filter_state: FilterState,
    /// Option lists for every filter widget.
    pub options: FilterOptions,
    /// Filtered incidents that can be plotted.
    pub map_points: Vec<MapPoint>,
    /// Summary over every filtered incident, plotted or not.
    pub statistics: Statistics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use terror_map_incident_models::IncidentDetails;

    #[test]
    fn year_range_swaps_reversed_bounds() {
        let range = YearRange::new(2010, 2001);
        assert_eq!(range.min(), 2001);
        assert_eq!(range.max(), 2010);
    }

    #[test]
    fn year_range_clamps_into_bounds() {
        let bounds = YearBounds {
            min: 1970,
            max: 2017,
        };
        let range = YearRange::new(1900, 2050).clamp_to(bounds);
        assert_eq!(range, YearRange::new(1970, 2017));

        let partial = YearRange::new(2010, 2030).clamp_to(bounds);
        assert_eq!(partial, YearRange::new(2010, 2017));
    }

    #[test]
    fn disjoint_year_range_is_left_alone() {
        let bounds = YearBounds {
            min: 1970,
            max: 2017,
        };
        let after = YearRange::new(2020, 2030);
        assert!(!after.overlaps(bounds));
        assert_eq!(after.clamp_to(bounds), after);

        let before = YearRange::new(1900, 1969);
        assert_eq!(before.clamp_to(bounds), before);
        assert!(YearRange::new(2017, 2030).overlaps(bounds));
    }

    #[test]
    fn normalized_without_bounds_is_unchanged() {
        let state = FilterState::new(YearRange::new(1, 2));
        assert_eq!(state.clone().normalized(None), state);
    }

    #[test]
    fn option_set_sorts_and_dedups_case_sensitively() {
        let set = OptionSet::from_labels(["Iraq", "India", "iraq", "Iraq", "Afghanistan"]);
        assert_eq!(set.as_slice(), ["Afghanistan", "India", "Iraq", "iraq"]);
        assert!(set.contains("iraq"));
        assert!(!set.contains("Peru"));
    }

    #[test]
    fn deserialized_option_set_is_sorted_and_unique() {
        let set: OptionSet = serde_json::from_str(r#"["Peru","Chad","Peru","Iraq"]"#).unwrap();
        assert_eq!(set.as_slice(), ["Chad", "Iraq", "Peru"]);
        assert!(set.contains("Peru"));
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["Chad","Iraq","Peru"]"#);
    }

    #[test]
    fn option_set_subset() {
        let all = OptionSet::from_labels(["A", "B", "C"]);
        let some = OptionSet::from_labels(["C", "A"]);
        assert!(some.is_subset_of(&all));
        assert!(!all.is_subset_of(&some));
        assert!(OptionSet::default().is_subset_of(&some));
    }

    #[test]
    fn formats_counts_with_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(181_691), "181,691");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn formats_casualties_rounded() {
        assert_eq!(format_casualties(0.0), "0");
        assert_eq!(format_casualties(5.0), "5");
        assert_eq!(format_casualties(1_234.4), "1,234");
        assert_eq!(format_casualties(411_868.0), "411,868");
    }

    #[test]
    fn empty_statistics_panel_shows_placeholders() {
        let panel = Statistics::empty().panel();
        let values: Vec<&str> = panel.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["0", "0", "N/A", "N/A"]);
        assert_eq!(panel[2].label, "Most Affected Country");
    }

    #[test]
    fn map_point_requires_coordinates() {
        let mut incident = Incident {
            year: 2001,
            region: "MENA".to_string(),
            country: "Iraq".to_string(),
            attack_type: "Bombing".to_string(),
            latitude: Some(33.3),
            longitude: None,
            kill_count: Some(5.0),
            details: IncidentDetails {
                province: Some("Baghdad".to_string()),
                city: Some("Baghdad".to_string()),
            },
        };
        assert!(MapPoint::from_incident(&incident).is_none());

        incident.longitude = Some(44.4);
        let point = MapPoint::from_incident(&incident).unwrap();
        assert_eq!(point.attack_type, "Bombing");
        assert_eq!(point.city.as_deref(), Some("Baghdad"));
    }

    #[test]
    fn filter_state_deserializes_with_missing_sets() {
        let state: FilterState =
            serde_json::from_str(r#"{"regions":["MENA"],"yearRange":{"min":2000,"max":2020}}"#)
                .unwrap();
        assert!(state.countries.is_empty());
        assert!(state.regions.contains("MENA"));
        assert_eq!(state.year_range, YearRange::new(2000, 2020));
    }

    #[test]
    fn deserialized_year_range_is_reordered() {
        let range: YearRange = serde_json::from_str(r#"{"min":2020,"max":2000}"#).unwrap();
        assert_eq!(range.min(), 2000);
        assert_eq!(range.max(), 2020);
    }
}
