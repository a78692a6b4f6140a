#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident dataset index.
//!
//! Loads the geocoded incident CSV once and builds the derived catalogs the
//! dashboard selectors are populated from: months, days, years, regions,
//! the region → country → state → city hierarchy, attack types, and the
//! grouping catalog. The resulting [`DatasetHandle`] is immutable; callers
//! share it by reference (or behind an `Arc`) for the lifetime of the
//! process.

pub mod hierarchy;
pub mod progress;
pub mod reader;

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use terror_map_incident_models::{GroupField, Incident, Month};
use thiserror::Error;

pub use hierarchy::GeoHierarchy;
use progress::{ProgressCallback, null_progress};

/// Errors that make the dataset unusable. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset file does not exist.
    #[error("Dataset not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: String,
    },

    /// The dataset file exists but could not be opened.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The header row could not be read.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// Path or label of the CSV input.
        path: String,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// A required column is absent from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// A data row could not be parsed.
    #[error("Invalid row at line {line}: {message}")]
    InvalidRow {
        /// 1-based line number in the CSV input.
        line: u64,
        /// Description of what went wrong.
        message: String,
    },
}

/// Options controlling how the CSV is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Loads the dataset at `path` with default options and no progress output.
///
/// # Errors
///
/// Returns [`LoadError`] if the file is missing, unreadable, lacks a
/// required column, or contains an unparseable row.
pub fn load(path: &Path) -> Result<DatasetHandle, LoadError> {
    load_with(path, &LoadOptions::default(), &null_progress())
}

/// Loads the dataset at `path`, reporting rows read to `progress`.
///
/// # Errors
///
/// Returns [`LoadError`] if the file is missing, unreadable, lacks a
/// required column, or contains an unparseable row.
pub fn load_with(
    path: &Path,
    options: &LoadOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<DatasetHandle, LoadError> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(LoadError::NotFound { path: display });
    }

    log::info!("Loading incidents from {display}...");
    progress.set_message(format!("Loading {display}"));

    let file = File::open(path).map_err(|e| LoadError::Io {
        path: display.clone(),
        source: e,
    })?;

    let records =
        reader::read_incidents(BufReader::new(file), options.delimiter, &display, progress)?;
    let handle = DatasetHandle::from_records(records);

    progress.finish(format!("Loaded {} incidents", handle.len()));
    log::info!(
        "Loaded {} incidents: {} years, {} regions, {} attack types",
        handle.len(),
        handle.years.len(),
        handle.regions.len(),
        handle.attack_types.len()
    );

    let collisions = handle.hierarchy.colliding_state_names();
    if collisions > 0 {
        log::debug!("{collisions} state names are shared by more than one country");
    }

    Ok(handle)
}

/// Immutable record set plus the catalogs derived from it at load time.
#[derive(Debug, Clone)]
pub struct DatasetHandle {
    records: Vec<Incident>,
    years: Vec<i32>,
    regions: BTreeSet<String>,
    attack_types: BTreeSet<String>,
    hierarchy: GeoHierarchy,
}

impl DatasetHandle {
    /// Builds the index over an already-parsed record set.
    #[must_use]
    pub fn from_records(records: Vec<Incident>) -> Self {
        let years: Vec<i32> = records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let regions = records
            .iter()
            .filter(|r| !r.region.is_empty())
            .map(|r| r.region.clone())
            .collect();

        let attack_types = records
            .iter()
            .filter(|r| !r.attack_type.is_empty())
            .map(|r| r.attack_type.clone())
            .collect();

        let hierarchy = GeoHierarchy::build(&records);

        Self {
            records,
            years,
            regions,
            attack_types,
            hierarchy,
        }
    }

    /// All records in file order.
    #[must_use]
    pub fn records(&self) -> &[Incident] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the record set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Month selector options as `(label, value)` in calendar order.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn distinct_months(&self) -> Vec<(&'static str, u8)> {
        Month::all()
            .iter()
            .map(|m| (m.as_ref(), m.value()))
            .collect()
    }

    /// Day selector options, `1..=31`.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn distinct_days(&self) -> Vec<u8> {
        (1..=31).collect()
    }

    /// Distinct years, ascending.
    #[must_use]
    pub fn distinct_years(&self) -> &[i32] {
        &self.years
    }

    /// First and last year in the dataset, if any records exist.
    #[must_use]
    pub fn year_span(&self) -> Option<(i32, i32)> {
        Some((*self.years.first()?, *self.years.last()?))
    }

    /// Slider marks: every distinct year mapped to its label.
    #[must_use]
    pub fn year_marks(&self) -> BTreeMap<i32, String> {
        self.years.iter().map(|y| (*y, y.to_string())).collect()
    }

    /// Distinct regions, sorted.
    #[must_use]
    pub fn distinct_regions(&self) -> &BTreeSet<String> {
        &self.regions
    }

    /// Countries with at least one record in `region`.
    #[must_use]
    pub fn countries_of(&self, region: &str) -> &BTreeSet<String> {
        self.hierarchy.countries_of(region)
    }

    /// States with at least one record in `country`.
    #[must_use]
    pub fn states_of(&self, country: &str) -> &BTreeSet<String> {
        self.hierarchy.states_of(country)
    }

    /// Cities recorded under any state named `state`.
    #[must_use]
    pub fn cities_of(&self, state: &str) -> &BTreeSet<String> {
        self.hierarchy.cities_of(state)
    }

    /// The full geographic hierarchy.
    #[must_use]
    pub const fn hierarchy(&self) -> &GeoHierarchy {
        &self.hierarchy
    }

    /// Distinct attack types, sorted.
    #[must_use]
    pub fn distinct_attack_types(&self) -> &BTreeSet<String> {
        &self.attack_types
    }

    /// The fixed grouping catalog as `(label, field)` in display order.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn grouping_catalog(&self) -> Vec<(&'static str, GroupField)> {
        GroupField::all().iter().map(|f| (f.label(), *f)).collect()
    }

    /// Record count, year span, and catalog sizes.
    #[must_use]
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            records: self.records.len(),
            first_year: self.years.first().copied(),
            last_year: self.years.last().copied(),
            regions: self.regions.len(),
            attack_types: self.attack_types.len(),
            with_coordinates: self
                .records
                .iter()
                .filter(|r| r.latitude.is_some() && r.longitude.is_some())
                .count(),
        }
    }
}

/// Operator-facing overview of a loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    /// Total records.
    pub records: usize,
    /// Earliest year present.
    pub first_year: Option<i32>,
    /// Latest year present.
    pub last_year: Option<i32>,
    /// Distinct regions.
    pub regions: usize,
    /// Distinct attack types.
    pub attack_types: usize,
    /// Records that can be placed on a map.
    pub with_coordinates: usize,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    fn incident(year: i32, region: &str, country: &str, attack_type: &str) -> Incident {
        Incident {
            year,
            month: 3,
            day: 14,
            region: region.to_string(),
            country: country.to_string(),
            state: None,
            city: None,
            latitude: Some(1.0),
            longitude: None,
            attack_type: attack_type.to_string(),
            weapon_type: None,
            target_type: None,
            target_nationality: None,
            organization: None,
            fatalities: None,
        }
    }

    fn handle() -> DatasetHandle {
        DatasetHandle::from_records(vec![
            incident(1992, "Western Europe", "Spain", "Hijacking"),
            incident(1970, "South America", "Peru", "Bombing/Explosion"),
            incident(1992, "South America", "Chile", "Armed Assault"),
        ])
    }

    #[test]
    fn catalogs_are_sorted_and_distinct() {
        let handle = handle();
        assert_eq!(handle.distinct_years(), [1970, 1992]);
        assert_eq!(handle.year_span(), Some((1970, 1992)));
        assert_eq!(
            handle.distinct_regions().iter().collect::<Vec<_>>(),
            ["South America", "Western Europe"]
        );
        assert_eq!(
            handle.distinct_attack_types().iter().collect::<Vec<_>>(),
            ["Armed Assault", "Bombing/Explosion", "Hijacking"]
        );
        assert_eq!(
            handle.countries_of("South America").iter().collect::<Vec<_>>(),
            ["Chile", "Peru"]
        );
        assert_eq!(handle.year_marks().get(&1992).map(String::as_str), Some("1992"));
    }

    #[test]
    fn fixed_catalogs() {
        let handle = handle();
        let months = handle.distinct_months();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], ("January", 1));
        assert_eq!(months[11], ("December", 12));

        let days = handle.distinct_days();
        assert_eq!(days.first(), Some(&1));
        assert_eq!(days.last(), Some(&31));

        let catalog = handle.grouping_catalog();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog[0], ("Terrorist Organisation", GroupField::Organization));
        assert_eq!(catalog[6], ("Country Attacked", GroupField::Country));
    }

    #[test]
    fn empty_dataset_has_no_year_span() {
        let handle = DatasetHandle::from_records(Vec::new());
        assert!(handle.is_empty());
        assert_eq!(handle.year_span(), None);
        assert!(handle.countries_of("South Asia").is_empty());
    }

    #[test]
    fn summary_counts() {
        let summary = handle().summary();
        assert_eq!(summary.records, 3);
        assert_eq!(summary.first_year, Some(1970));
        assert_eq!(summary.last_year, Some(1992));
        assert_eq!(summary.with_coordinates, 0);
    }

    struct CountingProgress {
        rows: AtomicU64,
        finished: Mutex<Option<String>>,
    }

    impl ProgressCallback for CountingProgress {
        fn inc(&self, delta: u64) {
            self.rows.fetch_add(delta, Ordering::Relaxed);
        }

        fn set_message(&self, _msg: String) {}

        fn finish(&self, msg: String) {
            *self.finished.lock().unwrap() = Some(msg);
        }
    }

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "terror_map_dataset_{}_{name}",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_file_with_delimiter_and_reports_rows() {
        let header = reader::REQUIRED_COLUMNS.join("\t");
        let contents = format!(
            "{header}\n\
             2008\t11\t26\tIndia\tSouth Asia\tMaharashtra\tMumbai\t18.93\t72.83\tArmed Assault\t\tLashkar-e-Taiba (LeT)\tIndia\tBusiness\tFirearms\n\
             2011\t7\t22\tNorway\tWestern Europe\tOslo\tOslo\t59.91\t10.75\tBombing/Explosion\t8\t\tNorway\tGovernment (General)\tExplosives\n"
        );
        let path = temp_file("tabs.tsv", contents.as_bytes());

        let counter = Arc::new(CountingProgress {
            rows: AtomicU64::new(0),
            finished: Mutex::new(None),
        });
        let progress: Arc<dyn ProgressCallback> = counter.clone();
        let handle = load_with(&path, &LoadOptions { delimiter: b'\t' }, &progress).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(handle.len(), 2);
        assert_eq!(handle.distinct_years(), [2008, 2011]);
        assert_eq!(handle.records()[0].city.as_deref(), Some("Mumbai"));
        assert_eq!(handle.records()[0].fatalities, None);
        assert_eq!(handle.records()[1].organization, None);
        assert_eq!(handle.records()[1].fatalities, Some(8));
        assert_eq!(counter.rows.load(Ordering::Relaxed), 2);
        assert_eq!(
            counter.finished.lock().unwrap().as_deref(),
            Some("Loaded 2 incidents")
        );
    }

    #[test]
    fn unreadable_header_is_csv_error() {
        let path = temp_file("bad_header.csv", b"iyear,\xff\xfe\n1970,1\n");
        let err = load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, LoadError::Csv { .. }), "unexpected: {err}");
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }), "unexpected: {err}");
    }
}
