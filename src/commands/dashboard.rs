use std::sync::Arc;

use serde::Serialize;

use crate::analyzer::dashboard::{build_dashboard, DashboardSnapshot};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::parser::types::TicketRecord;
use crate::state::AppState;
use crate::store::apply_filters;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPage {
    pub total: usize,
    pub offset: usize,
    pub tickets: Vec<TicketRecord>,
}

/// Runs `f` over the Working Subset of the active criteria.
pub(crate) fn with_working_subset<F, T>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&[&TicketRecord], &AppConfig) -> Result<T, AppError>,
{
    let config = state.config_snapshot()?;
    let (dataset, criteria) = state.with_selection(|ds, c| (Arc::clone(ds), c.clone()))?;
    let subset = apply_filters(dataset.records(), &criteria);
    f(&subset, &config)
}

pub fn get_dashboard(state: &AppState) -> Result<DashboardSnapshot, AppError> {
    with_working_subset(state, |subset, config| Ok(build_dashboard(subset, config)))
}

/// One page of the Working Subset for the ticket table.
pub fn get_tickets(state: &AppState, offset: usize, limit: usize) -> Result<TicketPage, AppError> {
    with_working_subset(state, |subset, _| {
        Ok(TicketPage {
            total: subset.len(),
            offset,
            tickets: subset
                .iter()
                .skip(offset)
                .take(limit)
                .map(|r| (*r).clone())
                .collect(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::filters;
    use crate::commands::import::import_bytes;
    use crate::store::FilterCriteria;

    const CSV: &str = "Criação do ticket - Data,ID do ticket,Nome do atribuído,Tempo da primeira resposta (min)\n\
                       2025-03-03,T1,Ana,4\n\
                       2025-03-04,T2,Bia,10\n\
                       2025-03-05,T3,Ana,70\n";

    #[test]
    fn test_dashboard_follows_active_filter() {
        let state = AppState::default();
        import_bytes(&state, "t.csv", CSV.as_bytes(), |_| {}).unwrap();

        let all = get_dashboard(&state).unwrap();
        assert_eq!(all.meta.total_tickets, 3);
        assert_eq!(all.sla.fr_within_sla_pct, 33);

        filters::apply_filters(
            &state,
            FilterCriteria {
                agent: Some("Bia".into()),
                ..Default::default()
            },
        )
        .unwrap();
        let bia = get_dashboard(&state).unwrap();
        assert_eq!(bia.meta.total_tickets, 1);
        assert_eq!(bia.sla.fr_within_sla_pct, 0);
    }

    #[test]
    fn test_filter_to_empty_subset() {
        let state = AppState::default();
        import_bytes(&state, "t.csv", CSV.as_bytes(), |_| {}).unwrap();
        filters::apply_filters(
            &state,
            FilterCriteria {
                agent: Some("Ninguém".into()),
                ..Default::default()
            },
        )
        .unwrap();
        let d = get_dashboard(&state).unwrap();
        assert_eq!(d.meta.total_tickets, 0);
        assert_eq!(d.executive.kpis.mean_first_response_display, "—");
    }

    #[test]
    fn test_ticket_pages() {
        let state = AppState::default();
        import_bytes(&state, "t.csv", CSV.as_bytes(), |_| {}).unwrap();
        let page = get_tickets(&state, 1, 10).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.tickets.len(), 2);
        assert_eq!(page.tickets[0].ticket_id, "T2");
        assert!(get_tickets(&state, 5, 10).unwrap().tickets.is_empty());
    }

    #[test]
    fn test_dashboard_without_dataset() {
        let state = AppState::default();
        assert!(matches!(get_dashboard(&state), Err(AppError::NoDataset)));
    }
}
