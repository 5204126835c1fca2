use std::sync::Arc;

use serde::Serialize;

use crate::error::AppError;
use crate::state::{AppState, DatasetAccess};
use crate::store::{FilterCriteria, FilterOptions};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    pub criteria: FilterCriteria,
    pub matched: usize,
    pub total: usize,
}

/// Stores `criteria` as the active filter and reports the subset size over
/// the dataset it was stored against.
pub fn apply_filters(
    state: &AppState,
    criteria: FilterCriteria,
) -> Result<FilterSummary, AppError> {
    let dataset = state.with_selection(|ds, current| {
        *current = criteria.clone();
        Arc::clone(ds)
    })?;
    let matched = crate::store::apply_filters(dataset.records(), &criteria).len();
    Ok(FilterSummary {
        criteria,
        matched,
        total: dataset.len(),
    })
}

/// Clears every constraint and restores the full date span.
pub fn clear_filters(state: &AppState) -> Result<FilterCriteria, AppError> {
    state.with_selection(|ds, current| {
        *current = FilterCriteria::reset_for(ds);
        current.clone()
    })
}

pub fn get_filters(state: &AppState) -> Result<FilterCriteria, AppError> {
    state.criteria_snapshot()
}

pub fn get_filter_options(state: &AppState) -> Result<FilterOptions, AppError> {
    state.dataset(|ds| Ok(ds.filter_options()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::import::import_bytes;

    const CSV: &str = "Criação do ticket - Data,ID do ticket,Nome do atribuído,Motivo do Contato:\n\
                       2025-03-03,T1,Ana,Pedidos\n\
                       2025-03-04,T2,Bia,Entrega\n\
                       2025-03-05,T3,Ana,Pedidos\n";

    fn loaded() -> AppState {
        let state = AppState::default();
        import_bytes(&state, "t.csv", CSV.as_bytes(), |_| {}).unwrap();
        state
    }

    /// GIVEN no import
    /// WHEN filters are applied
    /// THEN NoDataset is returned
    #[test]
    fn test_apply_without_dataset() {
        let state = AppState::default();
        let err = apply_filters(&state, FilterCriteria::default()).unwrap_err();
        assert!(matches!(err, AppError::NoDataset));
    }

    #[test]
    fn test_apply_stores_criteria() {
        let state = loaded();
        let summary = apply_filters(
            &state,
            FilterCriteria {
                agent: Some("Ana".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.total, 3);
        assert_eq!(get_filters(&state).unwrap().agent.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_clear_restores_span() {
        let state = loaded();
        apply_filters(
            &state,
            FilterCriteria {
                reason: Some("Entrega".into()),
                date_from: Some("2025-03-04".into()),
                ..Default::default()
            },
        )
        .unwrap();
        let cleared = clear_filters(&state).unwrap();
        assert!(cleared.reason.is_none());
        assert_eq!(cleared.date_from.as_deref(), Some("2025-03-03"));
        assert_eq!(cleared.date_to.as_deref(), Some("2025-03-05"));
        assert_eq!(get_filters(&state).unwrap(), cleared);
    }

    /// GIVEN imports replacing the dataset while filters are applied
    /// WHEN each apply returns
    /// THEN its total is the size of the dataset its criteria were stored against
    #[test]
    fn test_apply_during_imports_counts_against_stored_dataset() {
        const SHORT: &str = "Criação do ticket - Data,ID do ticket,Nome do atribuído\n\
                             2025-04-01,T9,Ana\n";
        let state = loaded();
        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..100 {
                    let csv = if i % 2 == 0 { SHORT } else { CSV };
                    import_bytes(&state, "t.csv", csv.as_bytes(), |_| {}).unwrap();
                }
            });
            for _ in 0..100 {
                let summary = apply_filters(
                    &state,
                    FilterCriteria {
                        agent: Some("Ana".into()),
                        ..Default::default()
                    },
                )
                .unwrap();
                // Ana holds every row of SHORT and two of the three rows of CSV
                match summary.total {
                    1 => assert_eq!(summary.matched, 1),
                    3 => assert_eq!(summary.matched, 2),
                    other => panic!("unexpected dataset size {other}"),
                }
            }
        });
    }

    #[test]
    fn test_filter_options() {
        let state = loaded();
        let opts = get_filter_options(&state).unwrap();
        assert_eq!(opts.agents, vec!["Ana", "Bia"]);
        assert_eq!(opts.reasons, vec!["Entrega", "Pedidos"]);
        assert_eq!(opts.months.len(), 1);
    }
}
