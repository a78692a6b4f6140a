#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter state and query result types.
//!
//! The presentation layer sends a [`FilterState`] snapshot on every map
//! interaction and receives either a record subset or an [`Update`]
//! wrapping chart series or selector options. These types are plain data
//! so they can cross a JSON boundary unchanged.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use terror_map_incident_models::{INDIA_COUNTRY, INDIA_REGION};

/// A multi-select value set. Empty means "no restriction".
pub type Selection = BTreeSet<String>;

/// Inclusive year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// First year included.
    pub min: i32,
    /// Last year included.
    pub max: i32,
}

impl YearRange {
    /// Creates a range covering `min..=max`.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Whether `year` lies inside the range.
    #[must_use]
    pub const fn contains(self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/// Active selection constraints driving the map query.
///
/// Geographic selectors form a cascade: a lower selector only takes effect
/// while every selector above it is non-empty. The `set_*` methods clear
/// descendant selections whenever an ancestor changes, and refuse edits to
/// a selector that the active subtab has locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Year range, always applied.
    pub years: YearRange,
    /// Months (1-12).
    #[serde(default)]
    pub months: BTreeSet<u8>,
    /// Days of month (1-31). Only applied together with `months`.
    #[serde(default)]
    pub days: BTreeSet<u8>,
    /// Regions.
    #[serde(default)]
    pub regions: Selection,
    /// Countries. Only applied together with `regions`.
    #[serde(default)]
    pub countries: Selection,
    /// States or provinces. Only applied together with `countries`.
    #[serde(default)]
    pub states: Selection,
    /// Cities. Only applied together with `states`.
    #[serde(default)]
    pub cities: Selection,
    /// Attack types.
    #[serde(default)]
    pub attack_types: Selection,
    /// Whether the region selector is locked by the active subtab.
    #[serde(default)]
    pub region_locked: bool,
    /// Whether the country selector is locked by the active subtab.
    #[serde(default)]
    pub country_locked: bool,
}

impl FilterState {
    /// A filter restricted only by `years`.
    #[must_use]
    pub const fn new(years: YearRange) -> Self {
        Self {
            years,
            months: BTreeSet::new(),
            days: BTreeSet::new(),
            regions: BTreeSet::new(),
            countries: BTreeSet::new(),
            states: BTreeSet::new(),
            cities: BTreeSet::new(),
            attack_types: BTreeSet::new(),
            region_locked: false,
            country_locked: false,
        }
    }

    /// Replaces the region selection and clears countries, states, and
    /// cities. Returns `false` without changing anything if the region
    /// selector is locked.
    pub fn set_regions(&mut self, regions: Selection) -> bool {
        if self.region_locked {
            return false;
        }
        self.regions = regions;
        self.countries.clear();
        self.states.clear();
        self.cities.clear();
        true
    }

    /// Replaces the country selection and clears states and cities.
    /// Returns `false` without changing anything if the country selector
    /// is locked.
    pub fn set_countries(&mut self, countries: Selection) -> bool {
        if self.country_locked {
            return false;
        }
        self.countries = countries;
        self.states.clear();
        self.cities.clear();
        true
    }

    /// Replaces the state selection and clears cities.
    pub fn set_states(&mut self, states: Selection) {
        self.states = states;
        self.cities.clear();
    }

    /// Replaces the city selection.
    pub fn set_cities(&mut self, cities: Selection) {
        self.cities = cities;
    }

    /// Applies the selector values and locks produced by a subtab change.
    ///
    /// This bypasses existing locks and always clears states and cities.
    pub fn apply_subtab(&mut self, selectors: &SubtabSelectors) {
        self.region_locked = false;
        self.country_locked = false;

        self.set_regions(selectors.regions.clone().unwrap_or_default());
        self.set_countries(selectors.countries.clone().unwrap_or_default());

        self.region_locked = selectors.region_locked;
        self.country_locked = selectors.country_locked;
    }
}

/// Result of a query that may decline to produce output.
///
/// `PreventRender` means the input has no defined output yet and the
/// presentation layer should keep its previous view. It is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Update<T> {
    /// Fresh output to draw.
    Render(T),
    /// Keep the previous view.
    PreventRender,
}

impl<T> Update<T> {
    /// Whether this is [`Update::PreventRender`].
    #[must_use]
    pub const fn is_prevent_render(&self) -> bool {
        matches!(self, Self::PreventRender)
    }

    /// Returns the rendered value, if any.
    #[must_use]
    pub fn into_render(self) -> Option<T> {
        match self {
            Self::Render(value) => Some(value),
            Self::PreventRender => None,
        }
    }
}

/// One point of a chart series: `count` records in `year` whose grouping
/// field equals `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Year.
    pub year: i32,
    /// Grouping field value.
    pub category: String,
    /// Number of records.
    pub count: u64,
}

/// Region and country selector values and lock flags for a map subtab.
///
/// `None` means the selector is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtabSelectors {
    /// Forced region selection.
    pub regions: Option<Selection>,
    /// Whether the region selector accepts edits.
    pub region_locked: bool,
    /// Forced country selection.
    pub countries: Option<Selection>,
    /// Whether the country selector accepts edits.
    pub country_locked: bool,
}

impl SubtabSelectors {
    /// Region and country pinned to the India slice and locked.
    #[must_use]
    pub fn india() -> Self {
        Self {
            regions: Some(BTreeSet::from([INDIA_REGION.to_string()])),
            region_locked: true,
            countries: Some(BTreeSet::from([INDIA_COUNTRY.to_string()])),
            country_locked: true,
        }
    }
}
