use serde::Serialize;

use super::grouping::{count_by, sort_desc};
use super::stats::pct;
use crate::parser::types::TicketRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoEntry {
    pub rank: usize,
    /// "tabulation-or-reason › sub-reason".
    pub key: String,
    pub count: usize,
    pub share_pct: u32,
    /// Running share of total volume up to and including this entry.
    pub cumulative_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoAnalysis {
    pub entries: Vec<ParetoEntry>,
    pub total: usize,
    /// First entry whose cumulative share reaches the threshold.
    pub threshold_index: Option<usize>,
}

impl ParetoAnalysis {
    /// Display window of the ranking. Cumulative shares stay relative to the full list.
    pub fn top(&self, n: usize) -> &[ParetoEntry] {
        &self.entries[..n.min(self.entries.len())]
    }
}

pub fn pareto(records: &[&TicketRecord], threshold_pct: u32) -> ParetoAnalysis {
    let ranked = sort_desc(count_by(records, |r| Some(r.pareto_key())));
    let total: usize = ranked.iter().map(|(_, c)| c).sum();

    let mut running = 0usize;
    let entries: Vec<ParetoEntry> = ranked
        .into_iter()
        .enumerate()
        .map(|(i, (key, count))| {
            running += count;
            ParetoEntry {
                rank: i + 1,
                key,
                count,
                share_pct: pct(count, total),
                cumulative_pct: pct(running, total),
            }
        })
        .collect();

    let threshold_index = entries
        .iter()
        .position(|e| e.cumulative_pct >= threshold_pct);

    ParetoAnalysis {
        entries,
        total,
        threshold_index,
    }
}
