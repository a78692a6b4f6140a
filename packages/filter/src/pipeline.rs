//! Map-mode restriction pipeline.
//!
//! [`select`] narrows the record set through a fixed sequence of steps:
//! years, calendar, geography, attack type. Each step is a pure function
//! from a subset and one selector to a smaller subset, and every step
//! preserves record order.

use std::collections::BTreeSet;

use terror_map_filter_models::{FilterState, Selection, YearRange};
use terror_map_incident_models::Incident;

/// Levels of the geographic cascade, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoLevel {
    Region,
    Country,
    State,
    City,
}

impl GeoLevel {
    /// The cascade in precedence order.
    pub const CHAIN: [Self; 4] = [Self::Region, Self::Country, Self::State, Self::City];

    /// The selection `filter` holds for this level.
    #[must_use]
    pub const fn selection(self, filter: &FilterState) -> &Selection {
        match self {
            Self::Region => &filter.regions,
            Self::Country => &filter.countries,
            Self::State => &filter.states,
            Self::City => &filter.cities,
        }
    }

    /// The value `incident` holds for this level.
    #[must_use]
    pub fn value(self, incident: &Incident) -> Option<&str> {
        match self {
            Self::Region => Some(incident.region.as_str()),
            Self::Country => Some(incident.country.as_str()),
            Self::State => incident.state.as_deref(),
            Self::City => incident.city.as_deref(),
        }
    }
}

/// Levels whose selection takes effect: the longest prefix of
/// [`GeoLevel::CHAIN`] with non-empty selections. A selector below an empty
/// one is ignored.
#[must_use]
pub fn active_geo_levels(filter: &FilterState) -> Vec<GeoLevel> {
    GeoLevel::CHAIN
        .into_iter()
        .take_while(|level| !level.selection(filter).is_empty())
        .collect()
}

/// Runs every restriction step over `records`.
#[must_use]
pub fn select<'a>(records: &'a [Incident], filter: &FilterState) -> Vec<&'a Incident> {
    let subset = records.iter().collect();
    let subset = restrict_years(subset, filter.years);
    let subset = restrict_calendar(subset, &filter.months, &filter.days);
    let subset = restrict_geography(subset, filter);
    restrict_attack_types(subset, &filter.attack_types)
}

/// Keeps records whose year lies in `years`. Always applied.
#[must_use]
pub fn restrict_years(mut subset: Vec<&Incident>, years: YearRange) -> Vec<&Incident> {
    subset.retain(|r| years.contains(r.year));
    subset
}

/// Keeps records in `months`, then in `days`. Days are ignored unless
/// months are selected.
#[must_use]
pub fn restrict_calendar<'a>(
    mut subset: Vec<&'a Incident>,
    months: &BTreeSet<u8>,
    days: &BTreeSet<u8>,
) -> Vec<&'a Incident> {
    if months.is_empty() {
        return subset;
    }
    subset.retain(|r| months.contains(&r.month) && (days.is_empty() || days.contains(&r.day)));
    subset
}

/// Keeps records matching every active geographic level.
#[must_use]
pub fn restrict_geography<'a>(
    mut subset: Vec<&'a Incident>,
    filter: &FilterState,
) -> Vec<&'a Incident> {
    let levels = active_geo_levels(filter);
    if levels.is_empty() {
        return subset;
    }
    subset.retain(|r| {
        levels.iter().all(|level| {
            level
                .value(r)
                .is_some_and(|v| level.selection(filter).contains(v))
        })
    });
    subset
}

/// Keeps records whose attack type is in `attack_types`, if any are given.
#[must_use]
pub fn restrict_attack_types<'a>(
    mut subset: Vec<&'a Incident>,
    attack_types: &Selection,
) -> Vec<&'a Incident> {
    if attack_types.is_empty() {
        return subset;
    }
    subset.retain(|r| attack_types.contains(&r.attack_type));
    subset
}
