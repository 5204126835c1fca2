/// Agent leaderboard: one grouping, three ranked views.
use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use super::stats::{mean_or_none, median_or_none, pct, round1};
use crate::config::RatingThresholds;
use crate::parser::types::TicketRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStats {
    pub agent: String,
    pub tickets: usize,
    /// Non-null first-response samples.
    pub first_response: Vec<f64>,
    /// Non-null resolution samples.
    pub resolution: Vec<f64>,
}

impl AgentStats {
    pub fn mean_first_response(&self) -> Option<f64> {
        mean_or_none(&self.first_response)
    }

    pub fn mean_resolution(&self) -> Option<f64> {
        mean_or_none(&self.resolution)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AgentOrder {
    /// Most tickets first.
    Volume,
    /// Fastest mean first response first.
    FirstResponse,
    /// Fastest mean resolution first.
    Resolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rating {
    Good,
    Warn,
    Bad,
    NoData,
}

impl Rating {
    pub fn of(value: Option<f64>, thresholds: RatingThresholds) -> Rating {
        match value {
            None => Rating::NoData,
            Some(v) if v <= thresholds.good => Rating::Good,
            Some(v) if v <= thresholds.warn => Rating::Warn,
            Some(_) => Rating::Bad,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Rating::Good => "#10b981",
            Rating::Warn => "#f59e0b",
            Rating::Bad => "#ef4444",
            Rating::NoData => "#64748b",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRow {
    pub rank: usize,
    pub agent: String,
    pub tickets: usize,
    pub share_pct: u32,
    /// Bar length relative to the busiest agent, 0–100.
    pub bar_pct: u32,
    pub mean_first_response: Option<f64>,
    pub median_first_response: Option<f64>,
    pub mean_resolution: Option<f64>,
    pub median_resolution: Option<f64>,
    pub first_response_rating: Rating,
    pub resolution_rating: Rating,
}

/// Groups by agent in first-seen order; an empty agent groups under "(Sem info)".
pub fn agent_stats(records: &[&TicketRecord]) -> Vec<AgentStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<AgentStats> = Vec::new();
    for r in records {
        let name = r.agent_label();
        let i = *index.entry(name).or_insert_with(|| {
            stats.push(AgentStats {
                agent: name.to_string(),
                tickets: 0,
                first_response: Vec::new(),
                resolution: Vec::new(),
            });
            stats.len() - 1
        });
        let entry = &mut stats[i];
        entry.tickets += 1;
        entry.first_response.extend(r.first_response_minutes);
        entry.resolution.extend(r.resolution_minutes);
    }
    stats
}

fn cmp_mean(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable ranking. Agents without samples sort last in the time-based views.
pub fn ranked(stats: &[AgentStats], order: AgentOrder) -> Vec<&AgentStats> {
    let mut view: Vec<&AgentStats> = stats.iter().collect();
    match order {
        AgentOrder::Volume => view.sort_by(|a, b| b.tickets.cmp(&a.tickets)),
        AgentOrder::FirstResponse => {
            view.sort_by(|a, b| cmp_mean(a.mean_first_response(), b.mean_first_response()))
        }
        AgentOrder::Resolution => {
            view.sort_by(|a, b| cmp_mean(a.mean_resolution(), b.mean_resolution()))
        }
    }
    view
}

/// Replaces names with "Agente N", N being the volume rank.
pub fn anonymize(stats: &mut [AgentStats]) {
    let mut order: Vec<usize> = (0..stats.len()).collect();
    order.sort_by(|&a, &b| stats[b].tickets.cmp(&stats[a].tickets));
    for (rank, i) in order.into_iter().enumerate() {
        stats[i].agent = format!("Agente {}", rank + 1);
    }
}

/// Table rows for one ranked view.
pub fn agent_rows(
    stats: &[AgentStats],
    order: AgentOrder,
    fr_rating: RatingThresholds,
    tr_rating: RatingThresholds,
) -> Vec<AgentRow> {
    let total: usize = stats.iter().map(|s| s.tickets).sum();
    let busiest = stats.iter().map(|s| s.tickets).max().unwrap_or(0);

    ranked(stats, order)
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let mean_fr = s.mean_first_response();
            let mean_tr = s.mean_resolution();
            AgentRow {
                rank: i + 1,
                agent: s.agent.clone(),
                tickets: s.tickets,
                share_pct: pct(s.tickets, total),
                bar_pct: pct(s.tickets, busiest),
                mean_first_response: mean_fr.map(round1),
                median_first_response: median_or_none(&s.first_response).map(round1),
                mean_resolution: mean_tr.map(round1),
                median_resolution: median_or_none(&s.resolution).map(round1),
                first_response_rating: Rating::of(mean_fr, fr_rating),
                resolution_rating: Rating::of(mean_tr, tr_rating),
            }
        })
        .collect()
}
