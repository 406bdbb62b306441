//! Plain-text output for the terminal.

use terror_map_filter_models::{FilterOptions, FilterState, OptionSet, Statistics};
use terror_map_incident_models::Incident;

const NONE_SELECTED: &str = "(all)";

pub fn print_panel(stats: &Statistics) {
    println!();
    for entry in stats.panel() {
        println!("  {:<25} {}", entry.label, entry.value);
    }
    println!();
}

pub fn print_options(options: &FilterOptions) {
    print_option_list("Regions", &options.regions);
    print_option_list("Countries", &options.countries);
    print_option_list("Attack types", &options.attack_types);

    match options.year_bounds {
        Some(bounds) => println!("Years: {}-{}", bounds.min, bounds.max),
        None => println!("Years: (no data)"),
    }
}

fn print_option_list(title: &str, options: &OptionSet) {
    println!("{title} ({}):", options.len());
    for label in options {
        println!("  {label}");
    }
    println!();
}

pub fn print_filter_state(state: &FilterState) {
    println!("Regions:      {}", selection_summary(&state.regions));
    println!("Countries:    {}", selection_summary(&state.countries));
    println!("Attack types: {}", selection_summary(&state.attack_types));
    println!(
        "Years:        {}-{}",
        state.year_range.min(),
        state.year_range.max()
    );
}

/// Joins a selection for display, or `(all)` when nothing is selected.
fn selection_summary<'a, I>(selection: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let joined = selection
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        NONE_SELECTED.to_string()
    } else {
        joined
    }
}

pub fn print_incidents(incidents: &[&Incident], limit: usize) {
    println!(
        "{:<6} {:<28} {:<24} {:<32} {:>6}  LOCATION",
        "YEAR", "REGION", "COUNTRY", "ATTACK TYPE", "KILLED"
    );
    for incident in incidents.iter().take(limit) {
        println!("{}", incident_row(incident));
    }

    if incidents.len() > limit {
        println!("... {} more", incidents.len() - limit);
    }
    println!("{} incident(s)", incidents.len());
}

fn incident_row(incident: &Incident) -> String {
    let killed = incident
        .kill_count
        .map_or_else(|| "-".to_string(), |k| format!("{k:.0}"));
    let location = [
        incident.details.city.as_deref(),
        incident.details.province.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ");

    format!(
        "{:<6} {:<28} {:<24} {:<32} {:>6}  {}",
        incident.year,
        incident.region,
        incident.country,
        incident.attack_type,
        killed,
        location
    )
}
