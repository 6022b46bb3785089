use crate::models::{Candidate, StatField};
use crate::voting::VoteSnapshot;
use crate::voting::stats::clean;
use log::warn;
use std::collections::HashMap;

/// One row of the rankings board.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing<'a> {
    pub position: usize, // 1-based
    pub candidate: &'a Candidate,
    pub votes: i64,
    pub percentage: f64,
    pub is_leader: bool,
}

impl Standing<'_> {
    pub fn medal(&self) -> String {
        medal(self.position)
    }
}

/// One (candidate, field, value) triple for grouped/faceted charts.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub candidate: String,
    pub field: StatField,
    pub value: f64,
}

pub type NormalizedSeries = HashMap<String, HashMap<StatField, f64>>;

pub fn total_votes(snapshot: &VoteSnapshot) -> i64 {
    snapshot.counts().values().sum()
}

pub fn percentage(snapshot: &VoteSnapshot, candidate_name: &str) -> f64 {
    let total = total_votes(snapshot);
    if total == 0 {
        return 0.0;
    }
    snapshot.count(candidate_name) as f64 / total as f64 * 100.0
}

/// Candidates by descending vote count. `sort_by` is stable, so ties keep
/// registry order.
pub fn ranked_order<'a>(candidates: &'a [Candidate], snapshot: &VoteSnapshot) -> Vec<&'a Candidate> {
    let mut ranked: Vec<&Candidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| snapshot.count(&b.name).cmp(&snapshot.count(&a.name)));
    ranked
}

// Only the first-ranked candidate can lead, and only with at least one vote
pub fn leader<'a>(ranked: &[&'a Candidate], snapshot: &VoteSnapshot) -> Option<&'a Candidate> {
    ranked
        .first()
        .copied()
        .filter(|candidate| snapshot.count(&candidate.name) > 0)
}

pub fn medal(position: usize) -> String {
    match position {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{}.", n),
    }
}

pub fn standings<'a>(candidates: &'a [Candidate], snapshot: &VoteSnapshot) -> Vec<Standing<'a>> {
    let ranked = ranked_order(candidates, snapshot);
    let leader_name = leader(&ranked, snapshot).map(|c| c.name.as_str());

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, candidate)| Standing {
            position: i + 1,
            candidate,
            votes: snapshot.count(&candidate.name),
            percentage: percentage(snapshot, &candidate.name),
            is_leader: i == 0 && leader_name == Some(candidate.name.as_str()),
        })
        .collect()
}

/// Min-max normalization of each field across the whole roster, in `[0, 1]`.
///
/// A field where every candidate has the same value normalizes to `0.0`.
/// A value that fails to parse is logged and treated as the field minimum.
pub fn normalized_series(candidates: &[Candidate], fields: &[StatField]) -> NormalizedSeries {
    let mut series: NormalizedSeries = candidates
        .iter()
        .map(|c| (c.name.clone(), HashMap::new()))
        .collect();

    for &field in fields {
        let values: Vec<Option<f64>> = candidates
            .iter()
            .map(|candidate| match clean(candidate.raw_stat(field)) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Skipping {} for {} in normalization: {}", field, candidate.name, e);
                    None
                }
            })
            .collect();

        let parsed = values.iter().flatten().copied();
        let min = parsed.clone().fold(f64::INFINITY, f64::min);
        let max = parsed.fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;

        for (candidate, value) in candidates.iter().zip(values) {
            let normalized = match value {
                Some(v) if span > 0.0 => (v - min) / span,
                _ => 0.0,
            };
            if let Some(row) = series.get_mut(&candidate.name) {
                row.insert(field, normalized);
            }
        }
    }

    series
}

/// Candidate-major, then field order as given. Unparseable values are omitted.
pub fn long_form_series(candidates: &[Candidate], fields: &[StatField]) -> Vec<SeriesPoint> {
    let mut points = Vec::with_capacity(candidates.len() * fields.len());

    for candidate in candidates {
        for &field in fields {
            match clean(candidate.raw_stat(field)) {
                Ok(value) => points.push(SeriesPoint {
                    candidate: candidate.name.clone(),
                    field,
                    value,
                }),
                Err(e) => warn!("Omitting {} for {} from series: {}", field, candidate.name, e),
            }
        }
    }

    points
}
