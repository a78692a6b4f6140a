//! Chart-mode aggregation: yearly counts per grouping value.

use std::collections::BTreeMap;

use terror_map_filter_models::{SeriesPoint, Update};
use terror_map_incident_models::{GroupField, Incident, Partition};

/// Counts `records` in `partition` by `(year, field value)`.
///
/// Points are ordered by year, then by first appearance of the category
/// within that year. Records whose field value is missing are not counted.
/// A non-empty `search` keeps only categories containing it,
/// case-insensitively. With no `field` there is nothing to draw yet, so the
/// result is [`Update::PreventRender`].
#[must_use]
pub fn aggregate(
    records: &[Incident],
    partition: Partition,
    field: Option<GroupField>,
    search: Option<&str>,
) -> Update<Vec<SeriesPoint>> {
    let Some(field) = field else {
        log::debug!("no grouping field selected, keeping previous chart");
        return Update::PreventRender;
    };

    let mut by_year: BTreeMap<i32, Vec<SeriesPoint>> = BTreeMap::new();
    let mut positions: BTreeMap<(i32, &str), usize> = BTreeMap::new();

    for record in records.iter().filter(|r| partition.contains(r)) {
        let Some(value) = record.group_value(field) else {
            continue;
        };
        let points = by_year.entry(record.year).or_default();
        let position = *positions.entry((record.year, value)).or_insert_with(|| {
            points.push(SeriesPoint {
                year: record.year,
                category: value.to_string(),
                count: 0,
            });
            points.len() - 1
        });
        points[position].count += 1;
    }

    let needle = search.filter(|s| !s.is_empty()).map(str::to_lowercase);

    let series: Vec<SeriesPoint> = by_year
        .into_values()
        .flatten()
        .filter(|point| {
            needle
                .as_deref()
                .is_none_or(|n| point.category.to_lowercase().contains(n))
        })
        .collect();

    log::debug!(
        "aggregated {partition} by {field}: {} points (search: {search:?})",
        series.len()
    );

    Update::Render(series)
}
