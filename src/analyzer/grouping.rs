/// Grouped counts over the Working Subset, in insertion, calendar or ranked order.
use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::palette::color_at;
use super::stats::pct;
use crate::parser::deserializers::{fmt_date, is_iso_date};
use crate::parser::types::{Month, SubReasonCategory, TicketRecord, Weekday};

// ─── Data Structures ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
    /// Share of the counted records, rounded.
    pub pct: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatePoint {
    pub label: String,
    pub iso: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotRow {
    pub label: String,
    /// One value per entry of `PivotTable::months`.
    pub values: Vec<usize>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotTable {
    pub months: Vec<Month>,
    pub rows: Vec<PivotRow>,
}

// ─── Generic grouping ────────────────────────────────────────────────────────

/// Counts per key in first-seen order. Records whose key is `None` are skipped.
pub fn count_by<F>(records: &[&TicketRecord], key: F) -> Vec<(String, usize)>
where
    F: Fn(&TicketRecord) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for r in records {
        let Some(k) = key(*r) else { continue };
        match index.get(&k) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(k.clone(), counts.len());
                counts.push((k, 1));
            }
        }
    }
    counts
}

/// Stable sort, largest count first; ties keep first-seen order.
pub fn sort_desc(mut counts: Vec<(String, usize)>) -> Vec<(String, usize)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Attaches shares and palette colours.
pub fn to_category_counts(counts: Vec<(String, usize)>) -> Vec<CategoryCount> {
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    counts
        .into_iter()
        .enumerate()
        .map(|(i, (label, count))| CategoryCount {
            label,
            count,
            pct: pct(count, total),
            color: color_at(i),
        })
        .collect()
}

// ─── Fixed-order groupings ───────────────────────────────────────────────────

/// Months present in the subset, in calendar order.
pub fn months_present(records: &[&TicketRecord]) -> Vec<Month> {
    let set: BTreeSet<Month> = records.iter().filter_map(|r| r.month).collect();
    set.into_iter().collect()
}

/// Volume per month present, January → December.
pub fn count_by_month(records: &[&TicketRecord]) -> Vec<(Month, usize)> {
    let mut counts = [0usize; 12];
    for r in records {
        if let Some(m) = r.month {
            counts[m as usize] += 1;
        }
    }
    Month::ALL
        .into_iter()
        .zip(counts)
        .filter(|(_, c)| *c > 0)
        .collect()
}

/// Volume per business day, Monday → Friday, zero-filled.
pub fn count_by_weekday(records: &[&TicketRecord]) -> Vec<(Weekday, usize)> {
    let mut counts = [0usize; 5];
    for r in records {
        if let Some(d) = r.day_of_week {
            counts[d as usize] += 1;
        }
    }
    Weekday::ALL.into_iter().zip(counts).collect()
}

// ─── Categorical breakdowns ──────────────────────────────────────────────────

/// Status doughnut: insertion order, fixed colour for known statuses.
pub fn status_counts(records: &[&TicketRecord]) -> Vec<CategoryCount> {
    let counts = count_by(records, |r| Some(r.status.label().to_string()));
    let mut items = to_category_counts(counts);
    for item in &mut items {
        // Labels are unique per status, so the first match is the one
        if let Some(r) = records.iter().find(|r| r.status.label() == item.label) {
            if let Some(color) = r.status.color() {
                item.color = color;
            }
        }
    }
    items
}

/// Reason counts with an empty reason reported as "(Sem info)".
pub fn reason_counts(records: &[&TicketRecord]) -> Vec<CategoryCount> {
    to_category_counts(count_by(records, |r| Some(r.reason_label().to_string())))
}

/// Non-empty reasons only, insertion order.
pub fn filled_reason_counts(records: &[&TicketRecord]) -> Vec<CategoryCount> {
    to_category_counts(count_by(records, |r| {
        Some(r.reason_category.clone()).filter(|s| !s.is_empty())
    }))
}

/// Tabulated records only, largest first.
pub fn tabulation_counts(records: &[&TicketRecord]) -> Vec<CategoryCount> {
    to_category_counts(sort_desc(count_by(records, |r| {
        r.tabulation.clone().filter(|t| !t.is_empty())
    })))
}

pub fn sub_reason_counts(
    records: &[&TicketRecord],
    category: SubReasonCategory,
) -> Vec<CategoryCount> {
    to_category_counts(sort_desc(count_by(records, |r| {
        r.sub_reasons.get(category).map(str::to_string)
    })))
}

/// Volume per creation date. ISO-dated groups come first in chronological
/// order; undated values follow in first-seen order.
pub fn volume_by_date(records: &[&TicketRecord]) -> Vec<DatePoint> {
    let counts = count_by(records, |r| {
        Some(r.date_iso.clone().unwrap_or_else(|| r.date.clone())).filter(|d| !d.is_empty())
    });
    let (mut dated, undated): (Vec<_>, Vec<_>) = counts
        .into_iter()
        .partition(|(key, _)| is_iso_date(key));
    dated.sort_by(|a, b| a.0.cmp(&b.0));

    dated
        .into_iter()
        .map(|(iso, count)| DatePoint {
            label: fmt_date(&iso),
            iso: Some(iso),
            count,
        })
        .chain(undated.into_iter().map(|(raw, count)| DatePoint {
            label: raw,
            iso: None,
            count,
        }))
        .collect()
}

/// Number of distinct creation dates.
pub fn active_days(records: &[&TicketRecord]) -> usize {
    volume_by_date(records).len()
}

// ─── Pivots ──────────────────────────────────────────────────────────────────

/// Category × month counts over the months present. Rows are ordered by total,
/// largest first, and cut to `limit` when given.
pub fn pivot_by_month<F>(records: &[&TicketRecord], key: F, limit: Option<usize>) -> PivotTable
where
    F: Fn(&TicketRecord) -> Option<String>,
{
    let months = months_present(records);
    let ranked = sort_desc(count_by(records, &key));
    let keep = limit.unwrap_or(ranked.len());

    let rows = ranked
        .into_iter()
        .take(keep)
        .map(|(label, total)| {
            let values = months
                .iter()
                .map(|m| {
                    records
                        .iter()
                        .filter(|r| {
                            r.month == Some(*m) && key(**r).as_deref() == Some(label.as_str())
                        })
                        .count()
                })
                .collect();
            PivotRow {
                label,
                values,
                total,
            }
        })
        .collect();

    PivotTable { months, rows }
}
