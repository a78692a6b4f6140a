#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter and aggregation engine for the incident dashboard.
//!
//! [`FilterEngine`] borrows a loaded [`DatasetHandle`] and answers the
//! three kinds of question the presentation layer asks:
//!
//! * map mode: which records match a [`FilterState`]
//! * chart mode: yearly counts per grouping value for a [`Partition`]
//! * selector cascade: which options a dependent selector should offer
//!
//! Every query is a pure function of the dataset and its arguments, so one
//! engine can serve concurrent callers without locking.

pub mod cascade;
pub mod chart;
pub mod pipeline;

use std::collections::BTreeSet;

use terror_map_dataset::DatasetHandle;
use terror_map_filter_models::{
    FilterState, Selection, SeriesPoint, SubtabSelectors, Update, YearRange,
};
use terror_map_incident_models::{GroupField, Incident, MapTab, Partition};

/// Query interface over one loaded dataset.
#[derive(Debug, Clone, Copy)]
pub struct FilterEngine<'a> {
    dataset: &'a DatasetHandle,
}

impl<'a> FilterEngine<'a> {
    /// Creates an engine over `dataset`.
    #[must_use]
    pub const fn new(dataset: &'a DatasetHandle) -> Self {
        Self { dataset }
    }

    /// The dataset this engine queries.
    #[must_use]
    pub const fn dataset(&self) -> &'a DatasetHandle {
        self.dataset
    }

    /// Initial map filter: the dataset's full year span, nothing else
    /// selected.
    #[must_use]
    pub fn default_filter(&self) -> FilterState {
        let (min, max) = self.dataset.year_span().unwrap_or((0, 0));
        FilterState::new(YearRange::new(min, max))
    }

    /// Records matching `filter`, in dataset order.
    ///
    /// An empty result is returned as an empty vector; drawing an empty
    /// map is up to the caller.
    #[must_use]
    pub fn select_records(&self, filter: &FilterState) -> Vec<&'a Incident> {
        let subset = pipeline::select(self.dataset.records(), filter);
        log::debug!(
            "selected {} of {} incidents for years {}-{}",
            subset.len(),
            self.dataset.len(),
            filter.years.min,
            filter.years.max
        );
        subset
    }

    /// Yearly counts per `field` value within `partition`.
    ///
    /// Returns [`Update::PreventRender`] when no `field` is chosen.
    #[must_use]
    pub fn aggregate(
        &self,
        partition: Partition,
        field: Option<GroupField>,
        search: Option<&str>,
    ) -> Update<Vec<SeriesPoint>> {
        chart::aggregate(self.dataset.records(), partition, field, search)
    }

    /// Country options after the region selection changed.
    #[must_use]
    pub fn on_region_changed(&self, regions: &Selection) -> Update<Selection> {
        cascade::countries_for(self.dataset.hierarchy(), regions)
    }

    /// State options after the country selection changed.
    #[must_use]
    pub fn on_country_changed(&self, countries: &Selection) -> Update<Selection> {
        cascade::states_for(self.dataset.hierarchy(), countries)
    }

    /// City options after the state selection changed, matching states by
    /// name in any country.
    #[must_use]
    pub fn on_state_changed(&self, states: &Selection) -> Update<Selection> {
        cascade::cities_for(self.dataset.hierarchy(), states)
    }

    /// City options after the state selection changed, matching states
    /// only within the selected `countries`.
    #[must_use]
    pub fn on_state_changed_in(
        &self,
        countries: &Selection,
        states: &Selection,
    ) -> Update<Selection> {
        cascade::cities_within(self.dataset.hierarchy(), countries, states)
    }

    /// Region and country values and locks for a map subtab. Apply the
    /// result with [`FilterState::apply_subtab`] before calling
    /// [`Self::select_records`] for that tab.
    #[must_use]
    pub fn on_subtab_changed(&self, tab: MapTab) -> SubtabSelectors {
        cascade::subtab_selectors(tab)
    }

    /// Day options for the current month selection.
    #[must_use]
    pub fn day_options(&self, months: &BTreeSet<u8>) -> Vec<u8> {
        cascade::day_options(months)
    }
}
