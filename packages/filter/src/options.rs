//! Option list derivation for the filter widgets.
//!
//! Region and attack type lists always cover the whole dataset. The country
//! list cascades from the region selection: with no regions selected it
//! lists every country, otherwise only countries that appear under one of
//! the selected regions. None of these functions touch a [`FilterState`];
//! dropping selections that fall out of a narrowed list is the job of
//! whoever owns the state (see [`crate::dashboard`]).
//!
//! [`FilterState`]: terror_map_filter_models::FilterState

use std::collections::BTreeSet;

use terror_map_filter_models::{DEFAULT_YEAR_MARK_STEP, FilterOptions, OptionSet, YearMark};
use terror_map_incident_models::{Dataset, YearBounds};

/// Country options for the given region selection.
///
/// An empty `selected_regions` yields every distinct country in the
/// dataset. The result is always a subset of that full list.
#[must_use]
pub fn country_options(dataset: &Dataset, selected_regions: &BTreeSet<String>) -> OptionSet {
    OptionSet::from_labels(
        dataset
            .iter()
            .filter(|i| selected_regions.is_empty() || selected_regions.contains(&i.region))
            .map(|i| i.country.as_str()),
    )
}

/// Every distinct region in the dataset.
#[must_use]
pub fn region_options(dataset: &Dataset) -> OptionSet {
    OptionSet::from_labels(dataset.iter().map(|i| i.region.as_str()))
}

/// Every distinct attack type in the dataset.
#[must_use]
pub fn attack_type_options(dataset: &Dataset) -> OptionSet {
    OptionSet::from_labels(dataset.iter().map(|i| i.attack_type.as_str()))
}

/// Slider marks every `step` years from the lower bound up to and including
/// the upper bound when it falls on a step.
///
/// A `step` of zero is treated as one.
#[must_use]
pub fn year_marks(bounds: Option<YearBounds>, step: u16) -> Vec<YearMark> {
    let Some(bounds) = bounds else {
        return Vec::new();
    };

    (bounds.min..=bounds.max)
        .step_by(usize::from(step.max(1)))
        .map(|year| YearMark {
            year,
            label: year.to_string(),
        })
        .collect()
}

/// Every option list for the given region selection.
#[must_use]
pub fn filter_options(
    dataset: &Dataset,
    selected_regions: &BTreeSet<String>,
    year_mark_step: u16,
) -> FilterOptions {
    let year_bounds = dataset.year_bounds();

    FilterOptions {
        regions: region_options(dataset),
        countries: country_options(dataset, selected_regions),
        attack_types: attack_type_options(dataset),
        year_bounds,
        year_marks: year_marks(year_bounds, year_mark_step),
    }
}

/// [`filter_options`] with the default year mark spacing.
#[must_use]
pub fn default_filter_options(
    dataset: &Dataset,
    selected_regions: &BTreeSet<String>,
) -> FilterOptions {
    filter_options(dataset, selected_regions, DEFAULT_YEAR_MARK_STEP)
}
