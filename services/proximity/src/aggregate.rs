//! Country-level aggregation of stored selections.
//!
//! # Purpose
//! Groups selections by exact `country` value and computes the mean of each
//! proximity metric plus the number of contributing rows.
//!
//! # Key invariants
//! - Grouping uses exact string equality (no trimming or case folding).
//! - Averages use floating-point division.
//! - Output order is the order in which countries are first seen; callers must
//!   not rely on it.
use crate::model::{ProximityLabel, Selection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct ProximityAverage {
    pub label: ProximityLabel,
    pub average: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct CountryResult {
    pub country: String,
    pub proximities: Vec<ProximityAverage>,
    #[serde(rename = "participantCount")]
    pub participant_count: u64,
}

#[derive(Default)]
struct Totals {
    sums: [i64; 3],
    count: u64,
}

/// Aggregate selections into per-country averages.
///
/// Returns an empty vector for an empty input.
pub fn aggregate_by_country(selections: &[Selection]) -> Vec<CountryResult> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Totals)> = Vec::new();

    for selection in selections {
        let slot = *index.entry(selection.country.as_str()).or_insert_with(|| {
            groups.push((selection.country.as_str(), Totals::default()));
            groups.len() - 1
        });
        let totals = &mut groups[slot].1;
        for label in ProximityLabel::ALL {
            totals.sums[label.index()] += i64::from(selection.value(label));
        }
        totals.count += 1;
    }

    groups
        .into_iter()
        .map(|(country, totals)| CountryResult {
            country: country.to_string(),
            proximities: ProximityLabel::ALL
                .iter()
                .map(|label| ProximityAverage {
                    label: *label,
                    average: totals.sums[label.index()] as f64 / totals.count as f64,
                })
                .collect(),
            participant_count: totals.count,
        })
        .collect()
}
