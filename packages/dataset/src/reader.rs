//! CSV parsing for the incident dataset.

use std::io::Read;
use std::sync::Arc;

use serde::Deserialize;
use terror_map_incident_models::Incident;

use crate::LoadError;
use crate::progress::ProgressCallback;

/// Columns the loader requires in the header row.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "iyear",
    "imonth",
    "iday",
    "country_txt",
    "region_txt",
    "provstate",
    "city",
    "latitude",
    "longitude",
    "attacktype1_txt",
    "nkill",
    "gname",
    "natlty1_txt",
    "targtype1_txt",
    "weaptype1_txt",
];

const PROGRESS_BATCH: u64 = 10_000;

/// One raw CSV row. Extra columns in the file are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    iyear: i32,
    imonth: u8,
    iday: u8,
    country_txt: String,
    region_txt: String,
    provstate: Option<String>,
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    attacktype1_txt: String,
    nkill: Option<f64>,
    gname: Option<String>,
    natlty1_txt: Option<String>,
    targtype1_txt: Option<String>,
    weaptype1_txt: Option<String>,
}

impl CsvRow {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn into_incident(self) -> Incident {
        Incident {
            year: self.iyear,
            month: self.imonth,
            day: self.iday,
            region: self.region_txt,
            country: self.country_txt,
            state: non_empty(self.provstate),
            city: non_empty(self.city),
            latitude: self.latitude.filter(|v| v.is_finite()),
            longitude: self.longitude.filter(|v| v.is_finite()),
            attack_type: self.attacktype1_txt,
            weapon_type: non_empty(self.weaptype1_txt),
            target_type: non_empty(self.targtype1_txt),
            target_nationality: non_empty(self.natlty1_txt),
            organization: non_empty(self.gname),
            fatalities: self
                .nkill
                .filter(|n| n.is_finite() && *n >= 0.0)
                .map(|n| n as u32),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parses incident rows from any `Read` source.
///
/// `source` names the input in error messages.
///
/// # Errors
///
/// * [`LoadError::Csv`] if the header row cannot be read
/// * [`LoadError::MissingColumn`] if a [`REQUIRED_COLUMNS`] entry is absent
/// * [`LoadError::InvalidRow`] if a data row cannot be parsed
pub fn read_incidents(
    reader: impl Read,
    delimiter: u8,
    source: &str,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<Incident>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| LoadError::Csv {
        path: source.to_string(),
        source: e,
    })?;

    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(LoadError::MissingColumn {
            column: (*missing).to_string(),
        });
    }

    let mut incidents = Vec::new();
    let mut pending = 0u64;

    for result in csv_reader.deserialize::<CsvRow>() {
        let row = result.map_err(|e| LoadError::InvalidRow {
            line: e.position().map_or(0, csv::Position::line),
            message: e.to_string(),
        })?;
        incidents.push(row.into_incident());

        pending += 1;
        if pending == PROGRESS_BATCH {
            progress.inc(pending);
            pending = 0;
        }
    }
    progress.inc(pending);

    Ok(incidents)
}
