#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for querying the terrorism incident dataset.

mod args;
mod config;

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use terror_map_cli_utils::{IndicatifProgress, init_logger};
use terror_map_dataset::DatasetHandle;
use terror_map_filter::FilterEngine;
use terror_map_filter_models::{FilterState, Update, YearRange};
use terror_map_incident_models::{GroupField, MapTab, Partition};

use crate::config::HierarchyMode;

#[derive(Parser)]
#[command(name = "terror_map", about = "Global terrorism incident explorer")]
struct Cli {
    /// Config file (overrides `TERROR_MAP_CONFIG`, default `terror_map.toml`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Incident CSV (overrides `TERROR_MAP_DATASET` and the config file)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every selector's options and the grouping catalog
    Catalog,
    /// Print the records matching a map filter
    Map(MapArgs),
    /// Print yearly counts per grouping value
    Chart {
        /// Chart partition (`world` or `india`)
        #[arg(long, default_value = "world", value_parser = args::named::<Partition>)]
        partition: Partition,
        /// Grouping column, e.g. `gname` or `attacktype1_txt`
        #[arg(
            long,
            default_value_t = GroupField::DEFAULT,
            value_parser = args::named::<GroupField>
        )]
        group: GroupField,
        /// Draw no grouping; prints the keep-previous-view marker
        #[arg(long, conflicts_with = "group")]
        ungrouped: bool,
        /// Keep only categories containing this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the options a dependent selector offers after a change
    Options {
        /// The selector whose value changed
        selector: ChangedSelector,
        /// Comma-separated values now selected in it
        #[arg(long)]
        values: Option<String>,
        /// Comma-separated selected countries, used to qualify state names
        /// when `hierarchy_mode = "qualified"`
        #[arg(long)]
        countries: Option<String>,
    },
    /// Print record count, year span, and catalog sizes
    Summary,
}

#[derive(Args)]
struct MapArgs {
    /// Year range, e.g. "1990-2000" or "2001". Defaults to every year.
    #[arg(long, value_parser = args::years)]
    years: Option<YearRange>,
    /// Comma-separated months, by name or number
    #[arg(long)]
    months: Option<String>,
    /// Comma-separated days of month. Ignored without `--months`.
    #[arg(long)]
    days: Option<String>,
    /// Comma-separated regions
    #[arg(long)]
    regions: Option<String>,
    /// Comma-separated countries. Ignored without `--regions`.
    #[arg(long)]
    countries: Option<String>,
    /// Comma-separated states or provinces. Ignored without `--countries`.
    #[arg(long)]
    states: Option<String>,
    /// Comma-separated cities. Ignored without `--states`.
    #[arg(long)]
    cities: Option<String>,
    /// Comma-separated attack types
    #[arg(long)]
    attack_types: Option<String>,
    /// Map subtab (`World` or `India`)
    #[arg(long, default_value = "World", value_parser = args::named::<MapTab>)]
    tab: MapTab,
}

impl MapArgs {
    /// Builds the filter the way the dashboard does: subtab first, then
    /// each selector top-down so ancestor changes reset descendants.
    fn filter(&self, engine: FilterEngine<'_>) -> Result<FilterState, args::ArgError> {
        let tab = self.tab;
        let mut filter = engine.default_filter();
        if let Some(years) = self.years {
            filter.years = years;
        }

        filter.months = args::months(self.months.as_deref())?;
        filter.days = args::days(self.days.as_deref())?;
        if !filter.days.is_empty() && engine.day_options(&filter.months).is_empty() {
            log::warn!("--days has no effect without --months");
        }

        filter.apply_subtab(&engine.on_subtab_changed(tab));

        let regions = args::selection(self.regions.as_deref());
        if !regions.is_empty() && !filter.set_regions(regions) {
            log::warn!("Region selector is locked on the {tab} tab, ignoring --regions");
        }
        let countries = args::selection(self.countries.as_deref());
        if !countries.is_empty() && !filter.set_countries(countries) {
            log::warn!("Country selector is locked on the {tab} tab, ignoring --countries");
        }
        filter.set_states(args::selection(self.states.as_deref()));
        filter.set_cities(args::selection(self.cities.as_deref()));
        filter.attack_types = args::selection(self.attack_types.as_deref());

        log::debug!("Map filter: {filter:?}");
        Ok(filter)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ChangedSelector {
    Region,
    Country,
    State,
}

/// Selector options for the `catalog` command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Catalog<'a> {
    months: Vec<LabelledValue<u8>>,
    days: Vec<u8>,
    years: Option<YearRange>,
    year_marks: BTreeMap<i32, String>,
    regions: &'a BTreeSet<String>,
    attack_types: &'a BTreeSet<String>,
    groupings: Vec<LabelledValue<GroupField>>,
    default_grouping: GroupField,
}

#[derive(Serialize)]
struct LabelledValue<T> {
    label: &'static str,
    value: T,
}

impl<'a> Catalog<'a> {
    fn of(dataset: &'a DatasetHandle) -> Self {
        Self {
            months: dataset
                .distinct_months()
                .into_iter()
                .map(|(label, value)| LabelledValue { label, value })
                .collect(),
            days: dataset.distinct_days(),
            years: dataset
                .year_span()
                .map(|(min, max)| YearRange::new(min, max)),
            year_marks: dataset.year_marks(),
            regions: dataset.distinct_regions(),
            attack_types: dataset.distinct_attack_types(),
            groupings: dataset
                .grouping_catalog()
                .into_iter()
                .map(|(label, value)| LabelledValue { label, value })
                .collect(),
            default_grouping: GroupField::DEFAULT,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreventRender {
    prevent_render: bool,
}

fn print_json(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_update<T: Serialize>(update: Update<T>) -> Result<(), serde_json::Error> {
    if update.is_prevent_render() {
        log::info!("Nothing to render for this selection");
    }
    match update.into_render() {
        Some(value) => print_json(&value),
        None => print_json(&PreventRender {
            prevent_render: true,
        }),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();
    let cli = Cli::parse();

    let config = config::resolve(cli.config.as_deref(), cli.dataset.as_deref())?;
    let options = config.load_options()?;

    let progress = IndicatifProgress::rows_spinner(&multi, "Loading incidents");
    let dataset = terror_map_dataset::load_with(&config.dataset, &options, &progress)?;
    let engine = FilterEngine::new(&dataset);

    match cli.command {
        Commands::Catalog => print_json(&Catalog::of(engine.dataset()))?,
        Commands::Map(map) => {
            let filter = map.filter(engine)?;
            let records = engine.select_records(&filter);
            log::info!("{} incidents match", records.len());
            print_json(&records)?;
        }
        Commands::Chart {
            partition,
            group,
            ungrouped,
            search,
        } => {
            let field = (!ungrouped).then_some(group);
            print_update(engine.aggregate(partition, field, search.as_deref()))?;
        }
        Commands::Options {
            selector,
            values,
            countries,
        } => {
            let values = args::selection(values.as_deref());
            let update = match selector {
                ChangedSelector::Region => engine.on_region_changed(&values),
                ChangedSelector::Country => engine.on_country_changed(&values),
                ChangedSelector::State => match config.hierarchy_mode {
                    HierarchyMode::ParentName => engine.on_state_changed(&values),
                    HierarchyMode::Qualified => engine
                        .on_state_changed_in(&args::selection(countries.as_deref()), &values),
                },
            };
            print_update(update)?;
        }
        Commands::Summary => print_json(&engine.dataset().summary())?,
    }

    Ok(())
}
