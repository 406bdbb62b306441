//! Interactive dashboard session.
//!
//! Walks through the filters once in cascade order (regions, then the
//! countries those regions allow, attack types, years) and then drops into
//! a menu loop. Every edit goes through [`Dashboard`], so the panel printed
//! after it always reflects a full recomputation.

use std::collections::BTreeSet;
use std::sync::Arc;

use dialoguer::{Input, MultiSelect, Select};
use terror_map_filter::dashboard::Dashboard;
use terror_map_filter::filter::apply;
use terror_map_filter_models::{DashboardView, OptionSet, YearRange};
use terror_map_incident_models::Dataset;

use crate::render;

const INCIDENT_PAGE: usize = 20;

/// Menu actions available once the initial selection is made.
enum Action {
    Regions,
    Countries,
    AttackTypes,
    Years,
    ShowIncidents,
    Reset,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Regions,
        Self::Countries,
        Self::AttackTypes,
        Self::Years,
        Self::ShowIncidents,
        Self::Reset,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Regions => "Change regions",
            Self::Countries => "Change countries",
            Self::AttackTypes => "Change attack types",
            Self::Years => "Change year range",
            Self::ShowIncidents => "List matching incidents",
            Self::Reset => "Reset all filters",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive session until the user quits.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails.
pub fn run(dataset: Arc<Dataset>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Terror Map ({} incidents)", dataset.len());
    println!();

    let mut dashboard = Dashboard::new(dataset);
    let mut view = dashboard.view();

    view = edit_regions(&mut dashboard, &view)?;
    view = edit_countries(&mut dashboard, &view)?;
    view = edit_attack_types(&mut dashboard, &view)?;
    view = edit_years(&mut dashboard, &view)?;

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        render::print_filter_state(&view.filter_state);
        render::print_panel(&view.statistics);

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        view = match Action::ALL[idx] {
            Action::Regions => edit_regions(&mut dashboard, &view)?,
            Action::Countries => edit_countries(&mut dashboard, &view)?,
            Action::AttackTypes => edit_attack_types(&mut dashboard, &view)?,
            Action::Years => edit_years(&mut dashboard, &view)?,
            Action::ShowIncidents => {
                let incidents = apply(dashboard.dataset(), dashboard.state());
                render::print_incidents(&incidents, INCIDENT_PAGE);
                continue;
            }
            Action::Reset => dashboard.reset(),
            Action::Quit => break,
        };
    }

    Ok(())
}

fn edit_regions(
    dashboard: &mut Dashboard,
    view: &DashboardView,
) -> Result<DashboardView, dialoguer::Error> {
    let regions = pick(
        "Regions (none = all)",
        &view.options.regions,
        &view.filter_state.regions,
    )?;
    Ok(dashboard.set_regions(regions))
}

fn edit_countries(
    dashboard: &mut Dashboard,
    view: &DashboardView,
) -> Result<DashboardView, dialoguer::Error> {
    let countries = pick(
        "Countries (none = all)",
        &view.options.countries,
        &view.filter_state.countries,
    )?;
    Ok(dashboard.set_countries(countries))
}

fn edit_attack_types(
    dashboard: &mut Dashboard,
    view: &DashboardView,
) -> Result<DashboardView, dialoguer::Error> {
    let attack_types = pick(
        "Attack types (none = all)",
        &view.options.attack_types,
        &view.filter_state.attack_types,
    )?;
    Ok(dashboard.set_attack_types(attack_types))
}

fn edit_years(
    dashboard: &mut Dashboard,
    view: &DashboardView,
) -> Result<DashboardView, dialoguer::Error> {
    let Some(bounds) = view.options.year_bounds else {
        println!("No years to choose from.");
        return Ok(dashboard.view());
    };

    let current = view.filter_state.year_range;
    let from: i32 = Input::new()
        .with_prompt(format!("From year ({}-{})", bounds.min, bounds.max))
        .default(current.min())
        .interact_text()?;
    let to: i32 = Input::new()
        .with_prompt(format!("To year ({}-{})", bounds.min, bounds.max))
        .default(current.max())
        .interact_text()?;

    Ok(dashboard.set_year_range(YearRange::new(from, to)))
}

/// Prompts a multi-select over `options` with `selected` pre-checked.
fn pick(
    prompt: &str,
    options: &OptionSet,
    selected: &BTreeSet<String>,
) -> Result<BTreeSet<String>, dialoguer::Error> {
    if options.is_empty() {
        println!("{prompt}: nothing to choose from.");
        return Ok(BTreeSet::new());
    }

    let chosen = MultiSelect::new()
        .with_prompt(prompt)
        .items(options.as_slice())
        .defaults(&checked(options, selected))
        .interact()?;

    Ok(labels_at(options, &chosen))
}

fn checked(options: &OptionSet, selected: &BTreeSet<String>) -> Vec<bool> {
    options.iter().map(|o| selected.contains(o)).collect()
}

fn labels_at(options: &OptionSet, indices: &[usize]) -> BTreeSet<String> {
    indices
        .iter()
        .filter_map(|&i| options.as_slice().get(i).cloned())
        .collect()
}
