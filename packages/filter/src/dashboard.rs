//! The recomputation chain and the owner of the current filter state.
//!
//! [`recompute`] is the whole pipeline as one pure function: normalize the
//! incoming state, derive the option lists, drop countries that fell out of
//! the narrowed country list, filter, and summarize. [`Dashboard`] keeps a
//! state snapshot between edits and reruns the chain from scratch after
//! each one, so there is never a partially updated view.

use std::collections::BTreeSet;
use std::sync::Arc;

use terror_map_filter_models::{
    DEFAULT_YEAR_MARK_STEP, DashboardView, FilterState, OptionSet, YearRange,
};
use terror_map_incident_models::Dataset;

use crate::aggregate::summarize;
use crate::filter::{apply, map_points};
use crate::options::filter_options;

/// Removes selected countries that are not in `country_options`.
///
/// Returns the number of countries dropped.
pub fn reconcile_countries(state: &mut FilterState, country_options: &OptionSet) -> usize {
    let before = state.countries.len();
    state
        .countries
        .retain(|country| country_options.contains(country));
    before - state.countries.len()
}

/// Runs one full recomputation pass for `state`.
#[must_use]
pub fn recompute(dataset: &Dataset, state: FilterState, year_mark_step: u16) -> DashboardView {
    let mut state = state.normalized(dataset.year_bounds());
    let options = filter_options(dataset, &state.regions, year_mark_step);

    let dropped = reconcile_countries(&mut state, &options.countries);
    if dropped > 0 {
        log::debug!("Dropped {dropped} selected country(ies) outside the selected regions");
    }

    let filtered = apply(dataset, &state);
    let statistics = summarize(filtered.iter().copied());
    let map_points = map_points(filtered.iter().copied());

    log::debug!(
        "Recomputed view: {} incident(s), {} plottable, {} casualties",
        statistics.total_incidents,
        map_points.len(),
        statistics.total_casualties,
    );

    DashboardView {
        filter_state: state,
        options,
        map_points,
        statistics,
    }
}

/// Holds the dataset handle and the current filter state.
///
/// Every setter replaces one dimension of the state and returns the freshly
/// recomputed view.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    state: FilterState,
    year_mark_step: u16,
}

impl Dashboard {
    /// Creates a dashboard with the default state: full year bounds and no
    /// selections.
    #[must_use]
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let state = FilterState::for_bounds(dataset.year_bounds());
        Self {
            dataset,
            state,
            year_mark_step: DEFAULT_YEAR_MARK_STEP,
        }
    }

    /// Overrides the spacing between year slider marks.
    #[must_use]
    pub const fn with_year_mark_step(mut self, step: u16) -> Self {
        self.year_mark_step = step;
        self
    }

    /// The dataset this dashboard filters.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The current filter state.
    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.state
    }

    /// Recomputes the view for the current state.
    #[must_use]
    pub fn view(&self) -> DashboardView {
        recompute(&self.dataset, self.state.clone(), self.year_mark_step)
    }

    /// Replaces the whole state, e.g. with a snapshot from a client.
    pub fn set_state(&mut self, state: FilterState) -> DashboardView {
        let view = recompute(&self.dataset, state, self.year_mark_step);
        self.state = view.filter_state.clone();
        view
    }

    /// Replaces the region selection. Countries outside the new regions are
    /// dropped from the selection.
    pub fn set_regions(&mut self, regions: BTreeSet<String>) -> DashboardView {
        let mut state = self.state.clone();
        state.regions = regions;
        self.set_state(state)
    }

    /// Replaces the country selection.
    pub fn set_countries(&mut self, countries: BTreeSet<String>) -> DashboardView {
        let mut state = self.state.clone();
        state.countries = countries;
        self.set_state(state)
    }

    /// Replaces the attack type selection.
    pub fn set_attack_types(&mut self, attack_types: BTreeSet<String>) -> DashboardView {
        let mut state = self.state.clone();
        state.attack_types = attack_types;
        self.set_state(state)
    }

    /// Replaces the year range. It is clamped into the dataset's bounds.
    pub fn set_year_range(&mut self, year_range: YearRange) -> DashboardView {
        let state = self.state.clone().with_year_range(year_range);
        self.set_state(state)
    }

    /// Restores the default state.
    pub fn reset(&mut self) -> DashboardView {
        self.set_state(FilterState::for_bounds(self.dataset.year_bounds()))
    }
}
