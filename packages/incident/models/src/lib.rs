#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record type, calendar labels, and grouping catalog.
//!
//! This crate defines the row shape shared by the dataset loader and the
//! filter engine, plus the small fixed vocabularies the dashboard offers:
//! month labels, the grouping-field catalog used by chart mode, the map
//! subtabs, and the chart partitions.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Region name of the fixed India slice.
pub const INDIA_REGION: &str = "South Asia";

/// Country name of the fixed India slice.
pub const INDIA_COUNTRY: &str = "India";

/// One geocoded incident row. Loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Year of the incident (`iyear`).
    pub year: i32,
    /// Month of the incident (`imonth`). `0` marks an unknown month.
    pub month: u8,
    /// Day of the month (`iday`). `0` marks an unknown day.
    pub day: u8,
    /// World region (`region_txt`).
    pub region: String,
    /// Country (`country_txt`).
    pub country: String,
    /// State or province (`provstate`).
    pub state: Option<String>,
    /// City (`city`).
    pub city: Option<String>,
    /// Latitude in WGS84 degrees.
    pub latitude: Option<f64>,
    /// Longitude in WGS84 degrees.
    pub longitude: Option<f64>,
    /// Primary attack type (`attacktype1_txt`).
    pub attack_type: String,
    /// Primary weapon type (`weaptype1_txt`).
    pub weapon_type: Option<String>,
    /// Primary target type (`targtype1_txt`).
    pub target_type: Option<String>,
    /// Nationality of the primary target (`natlty1_txt`).
    pub target_nationality: Option<String>,
    /// Perpetrator organisation (`gname`).
    pub organization: Option<String>,
    /// Number of fatalities (`nkill`).
    pub fatalities: Option<u32>,
}

impl Incident {
    /// Returns the value this record contributes to a chart grouped by
    /// `field`, or `None` when the cell is missing.
    #[must_use]
    pub fn group_value(&self, field: GroupField) -> Option<&str> {
        match field {
            GroupField::Organization => self.organization.as_deref(),
            GroupField::TargetNationality => self.target_nationality.as_deref(),
            GroupField::TargetType => self.target_type.as_deref(),
            GroupField::AttackType => Some(self.attack_type.as_str()),
            GroupField::WeaponType => self.weapon_type.as_deref(),
            GroupField::Region => Some(self.region.as_str()),
            GroupField::Country => Some(self.country.as_str()),
        }
        .filter(|value| !value.is_empty())
    }

    /// Whether this record belongs to the fixed India slice.
    #[must_use]
    pub fn is_india(&self) -> bool {
        self.region == INDIA_REGION && self.country == INDIA_COUNTRY
    }
}

/// Calendar month, valued 1-12.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl Month {
    /// Returns the numeric value (1-12) of this month.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a month from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-12.
    pub const fn from_value(value: u8) -> Result<Self, InvalidMonthError> {
        match value {
            1 => Ok(Self::January),
            2 => Ok(Self::February),
            3 => Ok(Self::March),
            4 => Ok(Self::April),
            5 => Ok(Self::May),
            6 => Ok(Self::June),
            7 => Ok(Self::July),
            8 => Ok(Self::August),
            9 => Ok(Self::September),
            10 => Ok(Self::October),
            11 => Ok(Self::November),
            12 => Ok(Self::December),
            _ => Err(InvalidMonthError { value }),
        }
    }

    /// Returns all months in calendar order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::January,
            Self::February,
            Self::March,
            Self::April,
            Self::May,
            Self::June,
            Self::July,
            Self::August,
            Self::September,
            Self::October,
            Self::November,
            Self::December,
        ]
    }
}

/// Error returned when attempting to create a [`Month`] from an invalid
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMonthError {
    /// The invalid month value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidMonthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid month value {}: expected 1-12", self.value)
    }
}

impl std::error::Error for InvalidMonthError {}

/// Record field a chart can be grouped by.
///
/// Serializes and parses as the dataset column it aggregates, so the
/// values round-trip through the CSV header names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
pub enum GroupField {
    #[serde(rename = "gname")]
    #[strum(serialize = "gname")]
    Organization,
    #[serde(rename = "natlty1_txt")]
    #[strum(serialize = "natlty1_txt")]
    TargetNationality,
    #[serde(rename = "targtype1_txt")]
    #[strum(serialize = "targtype1_txt")]
    TargetType,
    #[serde(rename = "attacktype1_txt")]
    #[strum(serialize = "attacktype1_txt")]
    AttackType,
    #[serde(rename = "weaptype1_txt")]
    #[strum(serialize = "weaptype1_txt")]
    WeaponType,
    #[serde(rename = "region_txt")]
    #[strum(serialize = "region_txt")]
    Region,
    #[serde(rename = "country_txt")]
    #[strum(serialize = "country_txt")]
    Country,
}

impl GroupField {
    /// Grouping applied when a chart tab first opens.
    pub const DEFAULT: Self = Self::Region;

    /// Human-readable label shown in the grouping selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Organization => "Terrorist Organisation",
            Self::TargetNationality => "Target Nationality",
            Self::TargetType => "Target Type",
            Self::AttackType => "Type of Attack",
            Self::WeaponType => "Weapon Type",
            Self::Region => "Region",
            Self::Country => "Country Attacked",
        }
    }

    /// Dataset column this field aggregates.
    #[must_use]
    pub fn column(self) -> &'static str {
        self.into()
    }

    /// Returns the catalog in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Organization,
            Self::TargetNationality,
            Self::TargetType,
            Self::AttackType,
            Self::WeaponType,
            Self::Region,
            Self::Country,
        ]
    }
}

/// Map-tool subtab. Selecting a subtab constrains the geographic selectors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum MapTab {
    #[strum(to_string = "WorldMap", serialize = "World")]
    World,
    #[strum(to_string = "IndiaMap", serialize = "India")]
    India,
}

/// Named slice of the dataset a chart is drawn from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    /// Every record.
    #[strum(to_string = "world", serialize = "WorldChart")]
    World,
    /// Records with region [`INDIA_REGION`] and country [`INDIA_COUNTRY`].
    #[strum(to_string = "india", serialize = "IndiaChart")]
    India,
}

impl Partition {
    /// Whether `incident` falls inside this partition.
    #[must_use]
    pub fn contains(self, incident: &Incident) -> bool {
        match self {
            Self::World => true,
            Self::India => incident.is_india(),
        }
    }
}
