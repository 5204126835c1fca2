use serde::Serialize;

use super::grouping::{count_by, sort_desc};
use super::stats::pct;
use crate::parser::types::TicketRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecurrence {
    pub unique_clients: usize,
    /// Clients with more than one ticket in the subset.
    pub recurrent_clients: usize,
    pub recurrence_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonShare {
    pub reason: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopClient {
    pub client_id: String,
    /// Last 8 characters of the id, for narrow table cells.
    pub short_id: String,
    pub tickets: usize,
    pub reasons: Vec<ReasonShare>,
}

fn client_key(r: &TicketRecord) -> Option<String> {
    Some(r.client_id.clone()).filter(|c| !c.is_empty())
}

/// Records without a client id are not counted.
pub fn client_recurrence(records: &[&TicketRecord]) -> ClientRecurrence {
    let per_client = count_by(records, client_key);
    let unique_clients = per_client.len();
    let recurrent_clients = per_client.iter().filter(|(_, n)| *n > 1).count();
    ClientRecurrence {
        unique_clients,
        recurrent_clients,
        recurrence_pct: pct(recurrent_clients, unique_clients),
    }
}

fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    chars[chars.len().saturating_sub(8)..].iter().collect()
}

/// Clients with the most tickets, each with its reasons ranked by count.
pub fn top_clients(records: &[&TicketRecord], limit: usize) -> Vec<TopClient> {
    sort_desc(count_by(records, client_key))
        .into_iter()
        .take(limit)
        .map(|(client_id, tickets)| {
            let own: Vec<&TicketRecord> = records
                .iter()
                .copied()
                .filter(|r| r.client_id == client_id)
                .collect();
            let reasons = sort_desc(count_by(&own, |r| Some(r.reason_label().to_string())))
                .into_iter()
                .map(|(reason, count)| ReasonShare { reason, count })
                .collect();
            TopClient {
                short_id: short_id(&client_id),
                client_id,
                tickets,
                reasons,
            }
        })
        .collect()
}
