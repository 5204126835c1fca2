/// Dashboard assembly: every view computed from one Working Subset.
use std::time::Instant;

use serde::Serialize;

use super::agents::{agent_rows, agent_stats, anonymize, AgentOrder, AgentRow};
use super::clients::{client_recurrence, top_clients, ClientRecurrence, TopClient};
use super::distribution::{
    assign_to_resolution_values, first_response_values, resolution_time_buckets,
    resolution_values, response_time_buckets, share_within, TimeBucket,
};
use super::grouping::{
    active_days, count_by_month, count_by_weekday, filled_reason_counts, pivot_by_month,
    reason_counts, status_counts, sub_reason_counts, tabulation_counts, volume_by_date,
    CategoryCount, DatePoint, PivotTable,
};
use super::heatmap::{heatmap, Heatmap, HeatmapMetric};
use super::pareto::{pareto, ParetoAnalysis, ParetoEntry};
use super::stats::{format_minutes, mean_or_none, median_or_none, pct, round1};
use super::temporal::{
    first_response_by_hour, first_response_by_weekday, monthly_trend, volume_by_hour, HourCount,
    HourMean, MonthlyTrend, WeekdayMean,
};
use crate::config::AppConfig;
use crate::parser::types::{Month, SubReasonCategory, TicketRecord, Weekday};
use crate::store::dataset::DateSpan;

// ─── Data Structures ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub meta: DashboardMeta,
    pub executive: ExecutiveView,
    pub sla: SlaView,
    pub team: TeamView,
    pub causes: CausesView,
    pub operational: OperationalView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    pub total_tickets: usize,
    pub date_span: Option<DateSpan>,
    pub computed_in_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveKpis {
    pub total: usize,
    pub closed: usize,
    pub closed_pct: u32,
    pub open: usize,
    pub active_days: usize,
    pub daily_average: f64,
    pub mean_first_response: Option<f64>,
    pub mean_first_response_display: String,
    pub mean_resolution: Option<f64>,
    pub mean_resolution_display: String,
    pub clients: ClientRecurrence,
    pub fr_sla_pct: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthVolume {
    pub month: Month,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayVolume {
    pub weekday: Weekday,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveView {
    pub kpis: ExecutiveKpis,
    pub volume_by_date: Vec<DatePoint>,
    pub status: Vec<CategoryCount>,
    pub months: Vec<MonthVolume>,
    pub weekdays: Vec<WeekdayVolume>,
    pub reasons: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaView {
    pub first_response_samples: usize,
    pub mean_first_response: Option<f64>,
    pub median_first_response: Option<f64>,
    pub fr_within_sla_pct: u32,
    pub fr_within_extended_pct: u32,
    pub first_response_buckets: Vec<TimeBucket>,
    pub resolution_samples: usize,
    pub mean_resolution: Option<f64>,
    pub median_resolution: Option<f64>,
    pub tr_within_sla_pct: u32,
    pub mean_assign_to_resolution: Option<f64>,
    pub resolution_buckets: Vec<TimeBucket>,
    pub monthly_trend: Vec<MonthlyTrend>,
    pub first_response_by_weekday: Vec<WeekdayMean>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub agent_count: usize,
    pub by_volume: Vec<AgentRow>,
    pub by_first_response: Vec<AgentRow>,
    pub by_resolution: Vec<AgentRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubReasonBreakdown {
    pub category: SubReasonCategory,
    pub label: &'static str,
    pub counts: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CausesView {
    pub reasons: Vec<CategoryCount>,
    pub tabulations: Vec<CategoryCount>,
    pub sub_reasons: Vec<SubReasonBreakdown>,
    pub pareto: ParetoAnalysis,
    /// Display window of `pareto`.
    pub pareto_top: Vec<ParetoEntry>,
    pub reason_by_month: PivotTable,
    pub tabulation_by_month: PivotTable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalView {
    pub volume_heatmap: Heatmap,
    pub first_response_heatmap: Heatmap,
    pub volume_by_hour: Vec<HourCount>,
    pub first_response_by_hour: Vec<HourMean>,
    pub top_clients: Vec<TopClient>,
}

// ─── Views ───────────────────────────────────────────────────────────────────

fn executive_view(records: &[&TicketRecord], config: &AppConfig) -> ExecutiveView {
    let total = records.len();
    let closed = records.iter().filter(|r| r.status.is_closed()).count();
    let days = active_days(records);
    let fr = first_response_values(records);
    let tr = resolution_values(records);
    let mean_fr = mean_or_none(&fr).map(round1);
    let mean_tr = mean_or_none(&tr).map(round1);

    let kpis = ExecutiveKpis {
        total,
        closed,
        closed_pct: pct(closed, total),
        open: total - closed,
        active_days: days,
        daily_average: if days == 0 {
            0.0
        } else {
            round1(total as f64 / days as f64)
        },
        mean_first_response: mean_fr,
        mean_first_response_display: format_minutes(mean_fr),
        mean_resolution: mean_tr,
        mean_resolution_display: format_minutes(mean_tr),
        clients: client_recurrence(records),
        fr_sla_pct: share_within(&fr, config.fr_sla_minutes),
    };

    ExecutiveView {
        kpis,
        volume_by_date: volume_by_date(records),
        status: status_counts(records),
        months: count_by_month(records)
            .into_iter()
            .map(|(month, count)| MonthVolume { month, count })
            .collect(),
        weekdays: count_by_weekday(records)
            .into_iter()
            .map(|(weekday, count)| WeekdayVolume { weekday, count })
            .collect(),
        reasons: filled_reason_counts(records),
    }
}

fn sla_view(records: &[&TicketRecord], config: &AppConfig) -> SlaView {
    let fr = first_response_values(records);
    let tr = resolution_values(records);
    let assign = assign_to_resolution_values(records);

    SlaView {
        first_response_samples: fr.len(),
        mean_first_response: mean_or_none(&fr).map(round1),
        median_first_response: median_or_none(&fr).map(round1),
        fr_within_sla_pct: share_within(&fr, config.fr_sla_minutes),
        fr_within_extended_pct: share_within(&fr, config.fr_sla_extended_minutes),
        first_response_buckets: response_time_buckets(&fr),
        resolution_samples: tr.len(),
        mean_resolution: mean_or_none(&tr).map(round1),
        median_resolution: median_or_none(&tr).map(round1),
        tr_within_sla_pct: share_within(&tr, config.tr_sla_minutes),
        mean_assign_to_resolution: mean_or_none(&assign).map(round1),
        resolution_buckets: resolution_time_buckets(&tr),
        monthly_trend: monthly_trend(records),
        first_response_by_weekday: first_response_by_weekday(records),
    }
}

fn team_view(records: &[&TicketRecord], config: &AppConfig) -> TeamView {
    let mut stats = agent_stats(records);
    if config.anonymize_agents {
        anonymize(&mut stats);
    }
    let rows = |order| agent_rows(&stats, order, config.fr_rating, config.tr_rating);

    TeamView {
        agent_count: stats.len(),
        by_volume: rows(AgentOrder::Volume),
        by_first_response: rows(AgentOrder::FirstResponse),
        by_resolution: rows(AgentOrder::Resolution),
    }
}

fn causes_view(records: &[&TicketRecord], config: &AppConfig) -> CausesView {
    let analysis = pareto(records, config.pareto_threshold_pct);
    let pareto_top = analysis.top(config.pareto_display_limit).to_vec();

    CausesView {
        reasons: reason_counts(records),
        tabulations: tabulation_counts(records),
        sub_reasons: SubReasonCategory::PRIORITY
            .into_iter()
            .map(|category| SubReasonBreakdown {
                category,
                label: category.label(),
                counts: sub_reason_counts(records, category),
            })
            .collect(),
        pareto: analysis,
        pareto_top,
        reason_by_month: pivot_by_month(records, |r| Some(r.reason_label().to_string()), None),
        tabulation_by_month: pivot_by_month(
            records,
            |r| r.tabulation.clone().filter(|t| !t.is_empty()),
            Some(config.top_tabulations_by_month),
        ),
    }
}

fn operational_view(records: &[&TicketRecord], config: &AppConfig) -> OperationalView {
    OperationalView {
        volume_heatmap: heatmap(records, config.heatmap_hours(), HeatmapMetric::Volume),
        first_response_heatmap: heatmap(
            records,
            config.heatmap_hours(),
            HeatmapMetric::MeanFirstResponse,
        ),
        volume_by_hour: volume_by_hour(records, config.heatmap_hours()),
        first_response_by_hour: first_response_by_hour(records, config.heatmap_hours()),
        top_clients: top_clients(records, config.top_clients_limit),
    }
}

/// Recomputes every view from `records`. Never fails: an empty subset yields
/// zero counts, empty series and "—" placeholders.
pub fn build_dashboard(records: &[&TicketRecord], config: &AppConfig) -> DashboardSnapshot {
    let start = Instant::now();

    let executive = executive_view(records, config);
    let sla = sla_view(records, config);
    let team = team_view(records, config);
    let causes = causes_view(records, config);
    let operational = operational_view(records, config);

    let date_span = DateSpan::of(records.iter().copied());

    DashboardSnapshot {
        meta: DashboardMeta {
            total_tickets: records.len(),
            date_span,
            computed_in_ms: start.elapsed().as_millis() as u64,
        },
        executive,
        sla,
        team,
        causes,
        operational,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::types::{Status, NO_INFO};
    use crate::store::dataset::test_support::record;

    fn ticket(date: &str, agent: &str, client: &str, fr: Option<f64>) -> TicketRecord {
        let mut r = record(agent, Some(date));
        r.client_id = client.into();
        r.first_response_minutes = fr;
        r
    }

    #[test]
    fn test_response_time_example() {
        let records = vec![
            ticket("2025-03-03", "Ana", "A", Some(4.0)),
            ticket("2025-03-03", "Ana", "A", Some(10.0)),
            ticket("2025-03-04", "Bia", "B", Some(70.0)),
        ];
        let refs: Vec<&TicketRecord> = records.iter().collect();
        let d = build_dashboard(&refs, &AppConfig::default());

        let counts: Vec<usize> = d.sla.first_response_buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 0, 1]);
        assert_eq!(d.sla.fr_within_sla_pct, 33);
        assert_eq!(d.executive.kpis.fr_sla_pct, 33);

        assert_eq!(d.executive.kpis.clients.unique_clients, 2);
        assert_eq!(d.executive.kpis.clients.recurrent_clients, 1);
        assert_eq!(d.executive.kpis.clients.recurrence_pct, 50);

        assert_eq!(d.executive.kpis.active_days, 2);
        assert!((d.executive.kpis.daily_average - 1.5).abs() < 1e-10);
        assert_eq!(d.executive.kpis.mean_first_response, Some(28.0));
        assert_eq!(d.executive.kpis.mean_first_response_display, "28 min");
        assert_eq!(d.meta.date_span.as_ref().unwrap().to, "2025-03-04");
    }

    #[test]
    fn test_closed_and_open_counts() {
        let mut records = vec![
            ticket("2025-03-03", "Ana", "A", None),
            ticket("2025-03-03", "Ana", "A", None),
            ticket("2025-03-03", "Ana", "A", None),
            ticket("2025-03-03", "Ana", "A", None),
        ];
        records[0].status = Status::Closed;
        records[1].status = Status::Solved;
        records[2].status = Status::Missing;
        let refs: Vec<&TicketRecord> = records.iter().collect();
        let d = build_dashboard(&refs, &AppConfig::default());
        assert_eq!(d.executive.kpis.closed, 2);
        assert_eq!(d.executive.kpis.open, 2);
        assert_eq!(d.executive.kpis.closed_pct, 50);
        assert!(d.executive.status.iter().any(|s| s.label == NO_INFO));
        assert_eq!(d.executive.kpis.mean_resolution_display, "—");
    }

    #[test]
    fn test_empty_subset_degrades_to_placeholders() {
        let d = build_dashboard(&[], &AppConfig::default());
        let k = &d.executive.kpis;
        assert_eq!(k.total, 0);
        assert_eq!(k.closed_pct, 0);
        assert_eq!(k.daily_average, 0.0);
        assert_eq!(k.mean_first_response, None);
        assert_eq!(k.mean_first_response_display, "—");
        assert_eq!(d.executive.weekdays.len(), 5);
        assert!(d.sla.first_response_buckets.iter().all(|b| b.count == 0));
        assert!(d.causes.pareto.entries.is_empty());
        assert!(d.team.by_volume.is_empty());
        assert_eq!(d.operational.volume_heatmap.max, 0.0);
        assert!(d.meta.date_span.is_none());
        // serialisable for the rendering layer
        assert!(serde_json::to_string(&d).is_ok());
    }

    #[test]
    fn test_config_drives_windows_and_anonymisation() {
        let mut records = Vec::new();
        for i in 0..20 {
            let mut r = ticket("2025-03-03", &format!("Agent{i}"), "A", Some(1.0));
            r.reason_category = format!("Motivo {i}");
            records.push(r);
        }
        let refs: Vec<&TicketRecord> = records.iter().collect();
        let config = AppConfig {
            pareto_display_limit: 3,
            anonymize_agents: true,
            heatmap_hour_start: 9,
            heatmap_hour_end: 10,
            ..AppConfig::default()
        };
        let d = build_dashboard(&refs, &config);
        assert_eq!(d.causes.pareto.entries.len(), 20);
        assert_eq!(d.causes.pareto_top.len(), 3);
        assert_eq!(d.causes.pareto.entries.last().unwrap().cumulative_pct, 100);
        assert!(d.team.by_volume.iter().all(|r| r.agent.starts_with("Agente ")));
        assert_eq!(d.team.agent_count, 20);
        assert_eq!(d.operational.volume_heatmap.hours, vec![9, 10]);
        assert_eq!(d.causes.sub_reasons.len(), 5);
    }
}
