use std::ops::RangeInclusive;

use serde::Serialize;

use super::stats::average;
use crate::parser::types::{TicketRecord, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HeatmapMetric {
    Volume,
    MeanFirstResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRow {
    pub weekday: Weekday,
    /// One cell per hour of `Heatmap::hours`; empty combinations are 0.
    pub cells: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heatmap {
    pub metric: HeatmapMetric,
    pub hours: Vec<u8>,
    pub rows: Vec<HeatmapRow>,
    /// Largest cell, for colour scaling. 0 on an empty matrix.
    pub max: f64,
}

impl Heatmap {
    pub fn cell(&self, weekday: Weekday, hour: u8) -> Option<f64> {
        let col = self.hours.iter().position(|&h| h == hour)?;
        self.rows
            .iter()
            .find(|r| r.weekday == weekday)
            .and_then(|r| r.cells.get(col).copied())
    }
}

/// Weekday × hour matrix over `hours`. Records outside the window or without
/// a business-day label are left out.
pub fn heatmap(
    records: &[&TicketRecord],
    hours: RangeInclusive<u8>,
    metric: HeatmapMetric,
) -> Heatmap {
    let hours: Vec<u8> = hours.collect();
    let rows: Vec<HeatmapRow> = Weekday::ALL
        .into_iter()
        .map(|weekday| {
            let cells = hours
                .iter()
                .map(|&hour| {
                    let in_cell = records
                        .iter()
                        .filter(|r| r.day_of_week == Some(weekday) && r.hour == hour);
                    match metric {
                        HeatmapMetric::Volume => in_cell.count() as f64,
                        HeatmapMetric::MeanFirstResponse => {
                            let fr: Vec<f64> =
                                in_cell.filter_map(|r| r.first_response_minutes).collect();
                            average(&fr)
                        }
                    }
                })
                .collect();
            HeatmapRow { weekday, cells }
        })
        .collect();

    let max = rows
        .iter()
        .flat_map(|r| r.cells.iter().copied())
        .fold(0.0_f64, f64::max);

    Heatmap {
        metric,
        hours,
        rows,
        max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::dataset::test_support::record;

    fn ticket(day: Option<Weekday>, hour: u8, fr: Option<f64>) -> TicketRecord {
        let mut r = record("Ana", None);
        r.day_of_week = day;
        r.hour = hour;
        r.first_response_minutes = fr;
        r
    }

    fn sample() -> Vec<TicketRecord> {
        vec![
            ticket(Some(Weekday::Monday), 9, Some(4.0)),
            ticket(Some(Weekday::Monday), 9, Some(8.0)),
            ticket(Some(Weekday::Monday), 9, None),
            ticket(Some(Weekday::Friday), 16, Some(30.0)),
            ticket(Some(Weekday::Friday), 17, Some(99.0)),
            ticket(None, 10, Some(1.0)),
        ]
    }

    #[test]
    fn test_volume_heatmap() {
        let records = sample();
        let refs: Vec<&TicketRecord> = records.iter().collect();
        let h = heatmap(&refs, 8..=16, HeatmapMetric::Volume);
        assert_eq!(h.rows.len(), 5);
        assert_eq!(h.hours.len(), 9);
        assert_eq!(h.cell(Weekday::Monday, 9), Some(3.0));
        assert_eq!(h.cell(Weekday::Friday, 16), Some(1.0));
        assert_eq!(h.cell(Weekday::Friday, 17), None);
        assert_eq!(h.cell(Weekday::Tuesday, 12), Some(0.0));
        assert_eq!(h.max, 3.0);
    }

    #[test]
    fn test_mean_first_response_heatmap() {
        let records = sample();
        let refs: Vec<&TicketRecord> = records.iter().collect();
        let h = heatmap(&refs, 8..=16, HeatmapMetric::MeanFirstResponse);
        assert!((h.cell(Weekday::Monday, 9).unwrap() - 6.0).abs() < 1e-10);
        assert_eq!(h.cell(Weekday::Wednesday, 9), Some(0.0));
        assert_eq!(h.max, 30.0);
    }

    #[test]
    fn test_empty_matrix_is_zero_filled() {
        let h = heatmap(&[], 8..=16, HeatmapMetric::Volume);
        assert!(h.rows.iter().all(|r| r.cells.iter().all(|&c| c == 0.0)));
        assert_eq!(h.max, 0.0);
    }
}
