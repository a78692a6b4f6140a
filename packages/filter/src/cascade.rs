//! Option derivation for the dependent geographic selectors.
//!
//! When a selector changes, the one below it is offered the union of the
//! children of every selected value. An empty selection yields
//! [`Update::PreventRender`]: there are no candidates to show and the
//! caller must not fall back to listing everything.

use std::collections::BTreeSet;

use terror_map_dataset::GeoHierarchy;
use terror_map_filter_models::{Selection, SubtabSelectors, Update};
use terror_map_incident_models::MapTab;

/// Candidate countries for the selected `regions`.
#[must_use]
pub fn countries_for(hierarchy: &GeoHierarchy, regions: &Selection) -> Update<Selection> {
    union_of(regions, |region| hierarchy.countries_of(region))
}

/// Candidate states for the selected `countries`.
#[must_use]
pub fn states_for(hierarchy: &GeoHierarchy, countries: &Selection) -> Update<Selection> {
    union_of(countries, |country| hierarchy.states_of(country))
}

/// Candidate cities for the selected `states`, keyed by state name alone.
#[must_use]
pub fn cities_for(hierarchy: &GeoHierarchy, states: &Selection) -> Update<Selection> {
    union_of(states, |state| hierarchy.cities_of(state))
}

/// Candidate cities for the selected `states` restricted to the selected
/// `countries`, so equally named states in other countries do not
/// contribute.
#[must_use]
pub fn cities_within(
    hierarchy: &GeoHierarchy,
    countries: &Selection,
    states: &Selection,
) -> Update<Selection> {
    if states.is_empty() {
        return Update::PreventRender;
    }
    Update::Render(
        countries
            .iter()
            .flat_map(move |country| {
                states
                    .iter()
                    .flat_map(move |state| hierarchy.cities_within(country, state))
            })
            .cloned()
            .collect(),
    )
}

/// Selector values and locks for a map subtab.
///
/// The India subtab pins region and country to the India slice and locks
/// both; the World subtab clears and unlocks them.
#[must_use]
pub fn subtab_selectors(tab: MapTab) -> SubtabSelectors {
    match tab {
        MapTab::World => SubtabSelectors::default(),
        MapTab::India => SubtabSelectors::india(),
    }
}

/// Day options offered for a month selection: every day once a month is
/// chosen, none before.
#[must_use]
pub fn day_options(months: &BTreeSet<u8>) -> Vec<u8> {
    if months.is_empty() {
        Vec::new()
    } else {
        (1..=31).collect()
    }
}

fn union_of<'a>(
    selected: &Selection,
    children: impl Fn(&str) -> &'a BTreeSet<String>,
) -> Update<Selection> {
    if selected.is_empty() {
        return Update::PreventRender;
    }
    Update::Render(
        selected
            .iter()
            .flat_map(|parent| children(parent.as_str()).iter().cloned())
            .collect(),
    )
}
