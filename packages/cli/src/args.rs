//! Parsing of comma-separated selector arguments.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::str::FromStr;

use terror_map_filter_models::{Selection, YearRange};
use terror_map_incident_models::Month;

/// Errors in selector argument values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArgError {
    /// Year range not of the form `FIRST-LAST` or `YEAR`.
    #[error("Invalid year range '{0}': expected YEAR or FIRST-LAST")]
    Years(String),

    /// Month neither a name nor a number in 1-12.
    #[error("Invalid month '{0}': expected a name (e.g. March) or 1-12")]
    Month(String),

    /// Day not a number in 1-31.
    #[error("Invalid day '{0}': expected 1-31")]
    Day(String),
}

/// Splits a comma-separated list into a selection, dropping blank items.
#[must_use]
pub fn selection(list: Option<&str>) -> Selection {
    items(list).map(str::to_string).collect()
}

/// Parses `"1990-2000"` or `"1990"` into an inclusive range.
///
/// # Errors
///
/// Returns [`ArgError::Years`] if either bound is not an integer.
pub fn years(value: &str) -> Result<YearRange, ArgError> {
    let err = || ArgError::Years(value.to_string());
    let (first, last) = value.split_once('-').unwrap_or((value, value));
    let min = first.trim().parse().map_err(|_| err())?;
    let max = last.trim().parse().map_err(|_| err())?;
    Ok(YearRange::new(min, max))
}

/// Parses month names or numbers.
///
/// # Errors
///
/// Returns [`ArgError::Month`] for the first unrecognised item.
pub fn months(list: Option<&str>) -> Result<BTreeSet<u8>, ArgError> {
    items(list)
        .map(|item| {
            item.parse::<u8>()
                .ok()
                .and_then(|n| Month::from_value(n).ok())
                .or_else(|| Month::from_str(item).ok())
                .map(Month::value)
                .ok_or_else(|| ArgError::Month(item.to_string()))
        })
        .collect()
}

/// Parses day numbers.
///
/// # Errors
///
/// Returns [`ArgError::Day`] for the first item outside 1-31.
pub fn days(list: Option<&str>) -> Result<BTreeSet<u8>, ArgError> {
    items(list)
        .map(|item| {
            item.parse::<u8>()
                .ok()
                .filter(|d| (1..=31).contains(d))
                .ok_or_else(|| ArgError::Day(item.to_string()))
        })
        .collect()
}

/// Parses a value through its [`FromStr`] impl, rendering the error as
/// text for clap.
///
/// # Errors
///
/// Returns the parse error message if `value` is not a valid `T`.
pub fn named<T>(value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Debug,
{
    value.parse().map_err(|e: T::Err| format!("invalid value '{value}': {e:?}"))
}

fn items(list: Option<&str>) -> impl Iterator<Item = &str> {
    list.into_iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_trims_and_drops_blanks() {
        let parsed = selection(Some(" South Asia, ,Western Europe,"));
        assert_eq!(
            parsed.iter().collect::<Vec<_>>(),
            ["South Asia", "Western Europe"]
        );
        assert!(selection(None).is_empty());
    }

    #[test]
    fn year_ranges() {
        assert_eq!(years("1990-2000"), Ok(YearRange::new(1990, 2000)));
        assert_eq!(years("2001"), Ok(YearRange::new(2001, 2001)));
        assert_eq!(years("19x0-2000"), Err(ArgError::Years("19x0-2000".to_string())));
    }

    #[test]
    fn months_accept_names_and_numbers() {
        assert_eq!(
            months(Some("March,12,January")),
            Ok(BTreeSet::from([1, 3, 12]))
        );
        assert_eq!(months(Some("13")), Err(ArgError::Month("13".to_string())));
        assert_eq!(months(Some("Smarch")), Err(ArgError::Month("Smarch".to_string())));
    }

    #[test]
    fn named_values_use_display_names() {
        use terror_map_incident_models::{GroupField, MapTab, Partition};

        assert_eq!(named::<Partition>("india"), Ok(Partition::India));
        assert_eq!(named::<MapTab>("IndiaMap"), Ok(MapTab::India));
        assert_eq!(named::<GroupField>("gname"), Ok(GroupField::Organization));
        let err = named::<GroupField>("Terrorist Organisation").unwrap_err();
        assert!(err.starts_with("invalid value 'Terrorist Organisation'"), "{err}");
    }

    #[test]
    fn days_are_bounded() {
        assert_eq!(days(Some("1, 31")), Ok(BTreeSet::from([1, 31])));
        assert_eq!(days(Some("0")), Err(ArgError::Day("0".to_string())));
        assert_eq!(days(None), Ok(BTreeSet::new()));
    }
}
