//! Summary statistics over a filtered subset.

use std::collections::HashMap;

use terror_map_filter_models::Statistics;
use terror_map_incident_models::Incident;

/// Reduces a subset to its [`Statistics`].
///
/// Missing kill counts contribute nothing to the casualty total, which is
/// therefore always defined. The `top_*` fields are `None` only when the
/// subset is empty. Identical input in identical order always produces
/// identical output.
#[must_use]
pub fn summarize<'a, I>(incidents: I) -> Statistics
where
    I: IntoIterator<Item = &'a Incident>,
{
    let mut total_incidents: u64 = 0;
    let mut total_casualties = 0.0;
    let mut countries = FrequencyCounter::default();
    let mut attack_types = FrequencyCounter::default();

    for incident in incidents {
        total_incidents += 1;
        total_casualties += incident.kill_count.unwrap_or(0.0);
        countries.observe(&incident.country);
        attack_types.observe(&incident.attack_type);
    }

    Statistics {
        total_incidents,
        total_casualties,
        top_country: countries.most_frequent().map(str::to_string),
        top_attack_type: attack_types.most_frequent().map(str::to_string),
    }
}

/// Values ranked by descending occurrence count.
///
/// Equal counts keep first-encountered order, so the ranking is fully
/// determined by the input sequence.
#[must_use]
pub fn frequency_ranking<'a, I>(values: I) -> Vec<(&'a str, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counter = FrequencyCounter::default();
    for value in values {
        counter.observe(value);
    }
    counter.ranking()
}

/// The most frequent value, ties going to whichever appeared first.
#[must_use]
pub fn most_frequent<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counter = FrequencyCounter::default();
    for value in values {
        counter.observe(value);
    }
    counter.most_frequent()
}

/// Occurrence counts in first-seen order.
#[derive(Default)]
struct FrequencyCounter<'a> {
    index: HashMap<&'a str, usize>,
    counts: Vec<(&'a str, u64)>,
}

impl<'a> FrequencyCounter<'a> {
    fn observe(&mut self, value: &'a str) {
        if let Some(&slot) = self.index.get(value) {
            self.counts[slot].1 += 1;
        } else {
            self.index.insert(value, self.counts.len());
            self.counts.push((value, 1));
        }
    }

    fn most_frequent(&self) -> Option<&'a str> {
        // Strict comparison keeps the earliest value on ties.
        let mut best: Option<(&'a str, u64)> = None;
        for &(value, count) in &self.counts {
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value)
    }

    fn ranking(mut self) -> Vec<(&'a str, u64)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
    }
}
