use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::Serialize;

use super::grouping::months_present;
use super::stats::average;
use crate::parser::types::{Month, TicketRecord, Weekday};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    pub month: Month,
    pub tickets: usize,
    pub mean_first_response: f64,
    pub mean_resolution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayMean {
    pub weekday: Weekday,
    pub mean_first_response: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourCount {
    pub hour: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourMean {
    pub hour: u8,
    pub mean_first_response: f64,
    pub samples: usize,
}

/// Mean FR and TR per month present, calendar order. Means are 0 without samples.
pub fn monthly_trend(records: &[&TicketRecord]) -> Vec<MonthlyTrend> {
    months_present(records)
        .into_iter()
        .map(|month| {
            let in_month: Vec<&&TicketRecord> =
                records.iter().filter(|r| r.month == Some(month)).collect();
            let fr: Vec<f64> = in_month
                .iter()
                .filter_map(|r| r.first_response_minutes)
                .collect();
            let tr: Vec<f64> = in_month
                .iter()
                .filter_map(|r| r.resolution_minutes)
                .collect();
            MonthlyTrend {
                month,
                tickets: in_month.len(),
                mean_first_response: average(&fr),
                mean_resolution: average(&tr),
            }
        })
        .collect()
}

/// Mean FR for each business day, Monday → Friday.
pub fn first_response_by_weekday(records: &[&TicketRecord]) -> Vec<WeekdayMean> {
    Weekday::ALL
        .into_iter()
        .map(|weekday| {
            let fr: Vec<f64> = records
                .iter()
                .filter(|r| r.day_of_week == Some(weekday))
                .filter_map(|r| r.first_response_minutes)
                .collect();
            WeekdayMean {
                weekday,
                mean_first_response: average(&fr),
                samples: fr.len(),
            }
        })
        .collect()
}

/// Volume per hour: every hour of `window` (zero-filled) plus any other hour
/// seen, ascending.
pub fn volume_by_hour(records: &[&TicketRecord], window: RangeInclusive<u8>) -> Vec<HourCount> {
    let mut counts: BTreeMap<u8, usize> = window.map(|h| (h, 0)).collect();
    for r in records {
        *counts.entry(r.hour).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(hour, count)| HourCount { hour, count })
        .collect()
}

/// Mean FR for each hour of `window`.
pub fn first_response_by_hour(
    records: &[&TicketRecord],
    window: RangeInclusive<u8>,
) -> Vec<HourMean> {
    window
        .map(|hour| {
            let fr: Vec<f64> = records
                .iter()
                .filter(|r| r.hour == hour)
                .filter_map(|r| r.first_response_minutes)
                .collect();
            HourMean {
                hour,
                mean_first_response: average(&fr),
                samples: fr.len(),
            }
        })
        .collect()
}
