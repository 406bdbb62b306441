//! Conjunctive record filtering.
//!
//! A record passes when it satisfies all four clauses: the year range, and
//! membership in each non-empty selection set. Empty sets are vacuously
//! satisfied. The clauses are independent, so an impossible combination
//! (a country outside every selected region) simply produces an empty
//! subset rather than an error.

use terror_map_filter_models::{FilterState, MapPoint};
use terror_map_incident_models::{Dataset, Incident};

/// Returns `true` if `incident` satisfies every clause of `state`.
#[must_use]
pub fn matches(incident: &Incident, state: &FilterState) -> bool {
    state.year_range.contains(incident.year)
        && (state.regions.is_empty() || state.regions.contains(&incident.region))
        && (state.countries.is_empty() || state.countries.contains(&incident.country))
        && (state.attack_types.is_empty() || state.attack_types.contains(&incident.attack_type))
}

/// Returns the incidents matching `state`, in dataset order.
#[must_use]
pub fn apply<'a>(dataset: &'a Dataset, state: &FilterState) -> Vec<&'a Incident> {
    let filtered: Vec<&Incident> = dataset.iter().filter(|i| matches(i, state)).collect();

    log::trace!(
        "apply: {}/{} incidents match years {}..={}",
        filtered.len(),
        dataset.len(),
        state.year_range.min(),
        state.year_range.max(),
    );

    filtered
}

/// Projects a filtered subset onto plottable points, skipping incidents
/// without coordinates.
#[must_use]
pub fn map_points<'a, I>(incidents: I) -> Vec<MapPoint>
where
    I: IntoIterator<Item = &'a Incident>,
{
    incidents
        .into_iter()
        .filter_map(MapPoint::from_incident)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use terror_map_filter_models::YearRange;

    fn full_range(dataset: &Dataset) -> FilterState {
        FilterState::for_bounds(dataset.year_bounds())
    }

    #[test]
    fn region_and_year_filter_keeps_matching_records_in_order() {
        let dataset = fixtures::scenario();
        let state = FilterState::new(YearRange::new(2000, 2020)).with_regions(["MENA"]);

        let filtered = apply(&dataset, &state);
        let years: Vec<i32> = filtered.iter().map(|i| i.year).collect();
        assert_eq!(years, vec![2001, 2005]);
    }

    #[test]
    fn year_range_is_inclusive_on_both_ends() {
        let dataset = fixtures::scenario();
        let state = FilterState::new(YearRange::new(2005, 2010));
        let years: Vec<i32> = apply(&dataset, &state).iter().map(|i| i.year).collect();
        assert_eq!(years, vec![2005, 2010]);
    }

    #[test]
    fn gap_in_years_yields_empty_subset() {
        let dataset = fixtures::scenario();
        let state = FilterState::new(YearRange::new(2006, 2009));
        assert!(apply(&dataset, &state).is_empty());
    }

    #[test]
    fn default_state_is_identity() {
        let dataset = fixtures::wide();
        let filtered = apply(&dataset, &full_range(&dataset));
        assert_eq!(filtered.len(), dataset.len());
        assert!(
            filtered
                .iter()
                .zip(dataset.iter())
                .all(|(a, b)| std::ptr::eq(*a, b))
        );
    }

    #[test]
    fn apply_is_idempotent() {
        let dataset = fixtures::wide();
        let state = full_range(&dataset).with_attack_types(["Armed Assault"]);
        assert_eq!(apply(&dataset, &state), apply(&dataset, &state));
    }

    #[test]
    fn impossible_combination_is_empty_not_an_error() {
        let dataset = fixtures::scenario();
        let state = full_range(&dataset)
            .with_regions(["Asia"])
            .with_countries(["Iraq"]);
        assert!(apply(&dataset, &state).is_empty());
    }

    #[test]
    fn adding_a_constraint_never_grows_the_subset() {
        let dataset = fixtures::wide();
        let base = full_range(&dataset);
        let base_len = apply(&dataset, &base).len();

        let constrained = [
            base.clone().with_regions(["South Asia"]),
            base.clone().with_countries(["Spain", "Iraq"]),
            base.clone().with_attack_types(["Bombing/Explosion"]),
            base.clone().with_year_range(YearRange::new(1980, 2000)),
        ];

        for state in &constrained {
            let len = apply(&dataset, state).len();
            assert!(len <= base_len, "{state:?} grew the subset to {len}");
        }
    }

    #[test]
    fn clause_order_does_not_matter() {
        let dataset = fixtures::wide();
        let state = full_range(&dataset)
            .with_regions(["South Asia", "Western Europe"])
            .with_attack_types(["Bombing/Explosion"]);

        let by_region_first: Vec<&Incident> = dataset
            .iter()
            .filter(|i| state.regions.contains(&i.region))
            .filter(|i| state.attack_types.contains(&i.attack_type))
            .collect();
        let by_attack_first: Vec<&Incident> = dataset
            .iter()
            .filter(|i| state.attack_types.contains(&i.attack_type))
            .filter(|i| state.regions.contains(&i.region))
            .collect();

        assert_eq!(apply(&dataset, &state), by_region_first);
        assert_eq!(by_region_first, by_attack_first);
    }

    #[test]
    fn map_points_skip_missing_coordinates() {
        let mut dataset_incidents = fixtures::scenario().incidents().to_vec();
        dataset_incidents[1].latitude = None;
        let dataset = Dataset::new(dataset_incidents);

        let filtered = apply(&dataset, &full_range(&dataset));
        let points = map_points(filtered.iter().copied());
        assert_eq!(filtered.len(), 3);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].country, "India");
    }
}
