//! Region → country → state → city containment maps.
//!
//! Each level is built by grouping the child field per distinct parent
//! value, so a child only ever appears under a parent it shares at least
//! one record with. States and cities are keyed by their immediate
//! parent's name alone; identically named states in two countries share
//! one city list. The `(country, state)` keyed map avoids that collision
//! for callers that opt into qualified lookups.

use std::collections::{BTreeMap, BTreeSet};

use terror_map_incident_models::Incident;

static EMPTY: BTreeSet<String> = BTreeSet::new();

/// Read-only geographic containment tree derived from the record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoHierarchy {
    countries_by_region: BTreeMap<String, BTreeSet<String>>,
    states_by_country: BTreeMap<String, BTreeSet<String>>,
    cities_by_state: BTreeMap<String, BTreeSet<String>>,
    cities_by_country_state: BTreeMap<(String, String), BTreeSet<String>>,
}

impl GeoHierarchy {
    /// Groups `records` into the four-level containment tree.
    ///
    /// Missing or empty state and city cells are skipped: they are neither
    /// keys nor members.
    #[must_use]
    pub fn build(records: &[Incident]) -> Self {
        let mut hierarchy = Self::default();

        for record in records {
            if record.region.is_empty() || record.country.is_empty() {
                continue;
            }

            hierarchy
                .countries_by_region
                .entry(record.region.clone())
                .or_default()
                .insert(record.country.clone());

            let Some(state) = present(record.state.as_deref()) else {
                continue;
            };

            hierarchy
                .states_by_country
                .entry(record.country.clone())
                .or_default()
                .insert(state.to_string());

            let Some(city) = present(record.city.as_deref()) else {
                continue;
            };

            hierarchy
                .cities_by_state
                .entry(state.to_string())
                .or_default()
                .insert(city.to_string());
            hierarchy
                .cities_by_country_state
                .entry((record.country.clone(), state.to_string()))
                .or_default()
                .insert(city.to_string());
        }

        hierarchy
    }

    /// Countries with at least one record in `region`.
    #[must_use]
    pub fn countries_of(&self, region: &str) -> &BTreeSet<String> {
        lookup(&self.countries_by_region, region)
    }

    /// States with at least one record in `country`.
    #[must_use]
    pub fn states_of(&self, country: &str) -> &BTreeSet<String> {
        lookup(&self.states_by_country, country)
    }

    /// Cities recorded under any state named `state`, in any country.
    #[must_use]
    pub fn cities_of(&self, state: &str) -> &BTreeSet<String> {
        lookup(&self.cities_by_state, state)
    }

    /// Cities recorded under `state` within `country` only.
    #[must_use]
    pub fn cities_within(&self, country: &str, state: &str) -> &BTreeSet<String> {
        self.cities_by_country_state
            .get(&(country.to_string(), state.to_string()))
            .unwrap_or(&EMPTY)
    }

    /// Number of distinct state names that occur in more than one country.
    #[must_use]
    pub fn colliding_state_names(&self) -> usize {
        let mut owners: BTreeMap<&str, usize> = BTreeMap::new();
        for states in self.states_by_country.values() {
            for state in states {
                *owners.entry(state.as_str()).or_insert(0) += 1;
            }
        }
        owners.values().filter(|count| **count > 1).count()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn lookup<'a>(map: &'a BTreeMap<String, BTreeSet<String>>, key: &str) -> &'a BTreeSet<String> {
    map.get(key).unwrap_or_else(|| {
        log::trace!("no hierarchy entry for '{key}'");
        &EMPTY
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(region: &str, country: &str, state: Option<&str>, city: Option<&str>) -> Incident {
        Incident {
            year: 2010,
            month: 1,
            day: 1,
            region: region.to_string(),
            country: country.to_string(),
            state: state.map(str::to_string),
            city: city.map(str::to_string),
            latitude: None,
            longitude: None,
            attack_type: "Armed Assault".to_string(),
            weapon_type: None,
            target_type: None,
            target_nationality: None,
            organization: None,
            fatalities: None,
        }
    }

    fn records() -> Vec<Incident> {
        vec![
            place("South Asia", "India", Some("Punjab"), Some("Amritsar")),
            place("South Asia", "Pakistan", Some("Punjab"), Some("Lahore")),
            place("South Asia", "India", Some("Kerala"), None),
            place("Western Europe", "France", Some(""), Some("Paris")),
            place("Western Europe", "Spain", None, None),
        ]
    }

    #[test]
    fn children_only_listed_under_parents_they_share_records_with() {
        let records = records();
        let hierarchy = GeoHierarchy::build(&records);

        for region in ["South Asia", "Western Europe"] {
            for country in hierarchy.countries_of(region) {
                assert!(
                    records
                        .iter()
                        .any(|r| r.region == region && &r.country == country),
                    "{country} listed under {region} without a record"
                );
            }
        }

        assert_eq!(
            hierarchy.countries_of("South Asia").iter().collect::<Vec<_>>(),
            ["India", "Pakistan"]
        );
        assert_eq!(
            hierarchy.states_of("India").iter().collect::<Vec<_>>(),
            ["Kerala", "Punjab"]
        );
    }

    #[test]
    fn missing_cells_are_not_keys_or_members() {
        let hierarchy = GeoHierarchy::build(&records());
        assert!(hierarchy.states_of("France").is_empty());
        assert!(hierarchy.states_of("Spain").is_empty());
        assert!(hierarchy.cities_of("Kerala").is_empty());
        assert!(hierarchy.cities_of("").is_empty());
    }

    #[test]
    fn lookup_misses_are_empty() {
        let hierarchy = GeoHierarchy::build(&records());
        assert!(hierarchy.countries_of("Antarctica").is_empty());
        assert!(hierarchy.cities_within("India", "Sindh").is_empty());
    }

    #[test]
    fn same_state_name_collides_unless_qualified() {
        let hierarchy = GeoHierarchy::build(&records());

        assert_eq!(
            hierarchy.cities_of("Punjab").iter().collect::<Vec<_>>(),
            ["Amritsar", "Lahore"]
        );
        assert_eq!(
            hierarchy
                .cities_within("India", "Punjab")
                .iter()
                .collect::<Vec<_>>(),
            ["Amritsar"]
        );
        assert_eq!(hierarchy.colliding_state_names(), 1);
    }
}
