use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::parser::decoder::TextEncoding;
use crate::parser::types::{Month, TicketRecord, Weekday};

/// Inclusive ISO date range, `yyyy-mm-dd` on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSpan {
    pub from: String,
    pub to: String,
}

impl DateSpan {
    /// Min/max over the records carrying an ISO date; `None` when none does.
    pub fn of<'a>(records: impl IntoIterator<Item = &'a TicketRecord>) -> Option<DateSpan> {
        let mut dates = records.into_iter().filter_map(|r| r.date_iso.as_deref());
        let first = dates.next()?;
        let (from, to) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(DateSpan {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// Values offered by the filter controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub agents: Vec<String>,
    pub tabulations: Vec<String>,
    pub months: Vec<Month>,
    pub statuses: Vec<String>,
    pub reasons: Vec<String>,
    pub weekdays: Vec<Weekday>,
    pub date_span: Option<DateSpan>,
}

/// One imported CSV, immutable once built. Replaced wholesale on the next import.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[TicketRecord]>,
    source_name: String,
    encoding: TextEncoding,
    imported_at: NaiveDateTime,
    date_span: Option<DateSpan>,
}

impl Dataset {
    pub fn new(records: Vec<TicketRecord>, source_name: &str, encoding: TextEncoding) -> Self {
        let date_span = DateSpan::of(&records);
        Dataset {
            records: records.into(),
            source_name: source_name.to_string(),
            encoding,
            imported_at: chrono::Local::now().naive_local(),
            date_span,
        }
    }

    pub fn records(&self) -> &[TicketRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn imported_at(&self) -> NaiveDateTime {
        self.imported_at
    }

    pub fn date_span(&self) -> Option<&DateSpan> {
        self.date_span.as_ref()
    }

    pub fn filter_options(&self) -> FilterOptions {
        let mut agents = BTreeSet::new();
        let mut tabulations = BTreeSet::new();
        let mut months = BTreeSet::new();
        let mut statuses = BTreeSet::new();
        let mut reasons = BTreeSet::new();

        for r in self.records.iter() {
            if !r.agent.is_empty() {
                agents.insert(r.agent.clone());
            }
            if let Some(t) = r.tabulation.as_deref().filter(|t| !t.is_empty()) {
                tabulations.insert(t.to_string());
            }
            if let Some(m) = r.month {
                months.insert(m);
            }
            statuses.insert(r.status.label().to_string());
            if !r.reason_category.is_empty() {
                reasons.insert(r.reason_category.clone());
            }
        }

        FilterOptions {
            agents: agents.into_iter().collect(),
            tabulations: tabulations.into_iter().collect(),
            // Month derives Ord in calendar order
            months: months.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
            reasons: reasons.into_iter().collect(),
            weekdays: Weekday::ALL.to_vec(),
            date_span: self.date_span.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::parser::types::{Status, SubReasons, TicketRecord};

    /// Minimal record for analyzer and filter tests.
    pub fn record(agent: &str, date_iso: Option<&str>) -> TicketRecord {
        TicketRecord {
            date: date_iso.unwrap_or("").to_string(),
            date_iso: date_iso.map(str::to_string),
            month: None,
            day_of_week: None,
            hour: 0,
            ticket_id: String::new(),
            status: Status::Open,
            channel: String::new(),
            agent: agent.to_string(),
            client_id: String::new(),
            reason_category: String::new(),
            tabulation: None,
            sub_reasons: SubReasons::default(),
            first_response_minutes: None,
            resolution_minutes: None,
            assign_to_resolution_minutes: None,
        }
    }
}
