//! Profile aggregation
//!
//! Collapses every raw observation of a catalog item into one
//! [`RepresentativeProfile`]: numeric attributes by mean, categorical ones
//! (plus brand and display name) by mode.

use crate::record::{Categorical, RawRecord, RepresentativeProfile};
use ahash::AHashMap;
use std::collections::BTreeMap;

/// Builds representative profiles from raw records
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileAggregator;

impl ProfileAggregator {
    /// Group `records` by model identifier and summarize each group.
    ///
    /// Profiles come back sorted by identifier. No row is dropped and
    /// duplicate rows count with full weight.
    pub fn build(records: &[RawRecord]) -> Vec<RepresentativeProfile> {
        let mut groups: AHashMap<&str, Vec<&RawRecord>> = AHashMap::new();
        for record in records {
            groups.entry(record.model_id.as_str()).or_default().push(record);
        }

        let mut ids: Vec<&str> = groups.keys().copied().collect();
        ids.sort_unstable();

        let profiles: Vec<RepresentativeProfile> = ids
            .into_iter()
            .map(|id| summarize(id, &groups[id]))
            .collect();

        tracing::debug!(
            records = records.len(),
            profiles = profiles.len(),
            "aggregated representative profiles"
        );
        profiles
    }
}

fn summarize(model_id: &str, rows: &[&RawRecord]) -> RepresentativeProfile {
    let mut profile = RepresentativeProfile {
        model_id: model_id.to_string(),
        brand: mode(rows.iter().filter_map(|r| r.brand.as_deref())),
        model_name: mode(rows.iter().filter_map(|r| r.model_name.as_deref())),
        capacity: mean(rows.iter().filter_map(|r| r.capacity)),
        unit_price: mean(rows.iter().filter_map(|r| r.unit_price)),
        observations: rows.len(),
        first_period: rows.iter().filter_map(|r| r.period.as_deref()).min().map(str::to_string),
        last_period: rows.iter().filter_map(|r| r.period.as_deref()).max().map(str::to_string),
        ..Default::default()
    };

    for attribute in Categorical::ALL {
        *profile.categorical_mut(attribute) =
            mode(rows.iter().filter_map(|r| r.categorical(attribute)));
    }

    profile
}

/// Arithmetic mean; `None` when there are no values
pub fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0f64, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Most frequent value; ties go to the lexicographically smallest.
pub fn mode<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        // ascending key order: only a strictly larger count replaces the leader
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}
