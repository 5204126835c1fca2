use serde::Serialize;

use super::palette::BUCKET_COLORS;
use super::stats::pct;
use crate::parser::types::TicketRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBucket {
    pub label: &'static str,
    /// Inclusive upper bound in minutes; `None` for the open-ended bucket.
    pub upper_minutes: Option<f64>,
    pub count: usize,
    pub pct: u32,
    pub color: &'static str,
}

const RESPONSE_EDGES: [f64; 3] = [5.0, 15.0, 60.0];
const RESPONSE_LABELS: [&str; 4] = ["0–5 min", "5–15 min", "15–60 min", "+60 min"];

const RESOLUTION_EDGES: [f64; 3] = [60.0, 240.0, 480.0];
const RESOLUTION_LABELS: [&str; 4] = ["0–1h", "1–4h", "4–8h", "+8h"];

fn bucketize(values: &[f64], edges: &[f64; 3], labels: &[&'static str; 4]) -> Vec<TimeBucket> {
    let mut counts = [0usize; 4];
    for &v in values {
        let slot = edges.iter().position(|&e| v <= e).unwrap_or(3);
        counts[slot] += 1;
    }
    let total = values.len();

    (0..4)
        .map(|i| TimeBucket {
            label: labels[i],
            upper_minutes: edges.get(i).copied(),
            count: counts[i],
            pct: pct(counts[i], total),
            color: BUCKET_COLORS[i],
        })
        .collect()
}

/// First-response buckets: [0,5], (5,15], (15,60], (60,∞) minutes.
pub fn response_time_buckets(values: &[f64]) -> Vec<TimeBucket> {
    bucketize(values, &RESPONSE_EDGES, &RESPONSE_LABELS)
}

/// Resolution buckets: [0,60], (60,240], (240,480], (480,∞) minutes.
pub fn resolution_time_buckets(values: &[f64]) -> Vec<TimeBucket> {
    bucketize(values, &RESOLUTION_EDGES, &RESOLUTION_LABELS)
}

/// Share of samples at or under `limit`, rounded. 0 without samples.
pub fn share_within(values: &[f64], limit: f64) -> u32 {
    pct(values.iter().filter(|&&v| v <= limit).count(), values.len())
}

// ─── Sample extraction (nulls excluded) ──────────────────────────────────────

pub fn first_response_values(records: &[&TicketRecord]) -> Vec<f64> {
    records.iter().filter_map(|r| r.first_response_minutes).collect()
}

pub fn resolution_values(records: &[&TicketRecord]) -> Vec<f64> {
    records.iter().filter_map(|r| r.resolution_minutes).collect()
}

pub fn assign_to_resolution_values(records: &[&TicketRecord]) -> Vec<f64> {
    records
        .iter()
        .filter_map(|r| r.assign_to_resolution_minutes)
        .collect()
}
