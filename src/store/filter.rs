use serde::{Deserialize, Serialize};

use crate::parser::types::{Month, TicketRecord, Weekday};
use crate::store::dataset::Dataset;

/// Optional equality constraints plus an inclusive ISO date range.
/// `None` or an empty string means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub month: Option<String>,
    pub agent: Option<String>,
    pub status: Option<String>,
    pub reason: Option<String>,
    pub tabulation: Option<String>,
    pub weekday: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl FilterCriteria {
    /// Criteria with every constraint cleared and the range set to the full
    /// span of `dataset`.
    pub fn reset_for(dataset: &Dataset) -> FilterCriteria {
        let span = dataset.date_span();
        FilterCriteria {
            date_from: span.map(|s| s.from.clone()),
            date_to: span.map(|s| s.to.clone()),
            ..FilterCriteria::default()
        }
    }

    pub fn matches(&self, record: &TicketRecord) -> bool {
        if let Some(month) = active(&self.month) {
            if record.month.is_none() || record.month != Month::from_label(month) {
                return false;
            }
        }
        if let Some(agent) = active(&self.agent) {
            if record.agent != agent {
                return false;
            }
        }
        if let Some(status) = active(&self.status) {
            if record.status.label() != status {
                return false;
            }
        }
        if let Some(reason) = active(&self.reason) {
            if record.reason_category != reason {
                return false;
            }
        }
        if let Some(tabulation) = active(&self.tabulation) {
            if record.tabulation.as_deref() != Some(tabulation) {
                return false;
            }
        }
        if let Some(weekday) = active(&self.weekday) {
            if record.day_of_week.is_none() || record.day_of_week != Weekday::from_label(weekday) {
                return false;
            }
        }

        // Records without an ISO date pass through the range
        if let Some(iso) = record.date_iso.as_deref() {
            if let Some(from) = active(&self.date_from) {
                if iso < from {
                    return false;
                }
            }
            if let Some(to) = active(&self.date_to) {
                if iso > to {
                    return false;
                }
            }
        }
        true
    }
}

/// Working Subset: records passing every active constraint, in import order.
pub fn apply_filters<'a>(
    records: &'a [TicketRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a TicketRecord> {
    let subset: Vec<&TicketRecord> = records.iter().filter(|r| criteria.matches(r)).collect();
    log::debug!("Filter kept {} of {} records", subset.len(), records.len());
    subset
}
