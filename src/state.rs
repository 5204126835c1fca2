use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::store::{Dataset, FilterCriteria};

/// Controller state: the current dataset snapshot, the active filter
/// criteria and the configuration.
pub struct AppState {
    pub dataset: Mutex<Option<Arc<Dataset>>>,
    pub criteria: Mutex<FilterCriteria>,
    pub config: Mutex<AppConfig>,
    importing: AtomicBool,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(AppConfig::default())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex
        .lock()
        .map_err(|e| AppError::Custom(format!("Mutex poisoned: {}", e)))
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        AppState {
            dataset: Mutex::new(None),
            criteria: Mutex::new(FilterCriteria::default()),
            config: Mutex::new(config),
            importing: AtomicBool::new(false),
        }
    }

    /// Claims the import slot. Fails with `ImportInProgress` while another
    /// guard is alive; the slot is released when the guard drops.
    pub fn begin_import(&self) -> Result<ImportGuard<'_>, AppError> {
        self.importing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::ImportInProgress)?;
        Ok(ImportGuard { state: self })
    }

    pub fn is_importing(&self) -> bool {
        self.importing.load(Ordering::Acquire)
    }

    /// Swaps in a new dataset and resets the criteria to its full date span.
    /// Both locks are held, dataset first, so [`AppState::with_selection`]
    /// always sees a dataset together with the criteria that belong to it.
    pub fn set_dataset(&self, dataset: Dataset) -> Result<Arc<Dataset>, AppError> {
        let dataset = Arc::new(dataset);
        let mut current = lock(&self.dataset)?;
        let mut criteria = lock(&self.criteria)?;
        *criteria = FilterCriteria::reset_for(&dataset);
        *current = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Runs `f` with the dataset and the active criteria locked together,
    /// in the same order as `set_dataset`. Keep `f` short: imports wait on it.
    pub fn with_selection<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Arc<Dataset>, &mut FilterCriteria) -> T,
    {
        let current = lock(&self.dataset)?;
        let dataset = current.as_ref().ok_or(AppError::NoDataset)?;
        let mut criteria = lock(&self.criteria)?;
        Ok(f(dataset, &mut criteria))
    }

    pub fn config_snapshot(&self) -> Result<AppConfig, AppError> {
        Ok(lock(&self.config)?.clone())
    }

    pub fn criteria_snapshot(&self) -> Result<FilterCriteria, AppError> {
        Ok(lock(&self.criteria)?.clone())
    }
}

pub struct ImportGuard<'a> {
    state: &'a AppState,
}

impl Drop for ImportGuard<'_> {
    fn drop(&mut self) {
        self.state.importing.store(false, Ordering::Release);
    }
}

/// Closure-based access to the current dataset.
pub trait DatasetAccess {
    fn dataset<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Dataset) -> Result<T, AppError>;
}

impl DatasetAccess for AppState {
    fn dataset<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Dataset) -> Result<T, AppError>,
    {
        // Clone the Arc so the lock is not held while `f` runs
        let snapshot = lock(&self.dataset)?
            .as_ref()
            .map(Arc::clone)
            .ok_or(AppError::NoDataset)?;
        f(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::decoder::TextEncoding;
    use crate::store::dataset::test_support::record;

    #[test]
    fn test_no_dataset_before_import() {
        let state = AppState::default();
        let err = state.dataset(|d| Ok(d.len())).unwrap_err();
        assert!(matches!(err, AppError::NoDataset));
    }

    #[test]
    fn test_import_guard_serialises_imports() {
        let state = AppState::default();
        let guard = state.begin_import().unwrap();
        assert!(state.is_importing());
        assert!(matches!(state.begin_import(), Err(AppError::ImportInProgress)));
        drop(guard);
        assert!(!state.is_importing());
        assert!(state.begin_import().is_ok());
    }

    #[test]
    fn test_set_dataset_resets_criteria() {
        let state = AppState::default();
        state.criteria.lock().unwrap().agent = Some("Ana".into());
        let ds = Dataset::new(
            vec![record("Ana", Some("2025-01-02")), record("Bia", Some("2025-02-03"))],
            "t.csv",
            TextEncoding::Utf8,
        );
        state.set_dataset(ds).unwrap();
        let criteria = state.criteria_snapshot().unwrap();
        assert!(criteria.agent.is_none());
        assert_eq!(criteria.date_from.as_deref(), Some("2025-01-02"));
        assert_eq!(state.dataset(|d| Ok(d.len())).unwrap(), 2);
    }

    fn dataset_spanning(name: &str, first: &str, last: &str) -> Dataset {
        Dataset::new(
            vec![record("Ana", Some(first)), record("Bia", Some(last))],
            name,
            TextEncoding::Utf8,
        )
    }

    #[test]
    fn test_with_selection_requires_dataset() {
        let state = AppState::default();
        assert!(matches!(
            state.with_selection(|_, _| ()),
            Err(AppError::NoDataset)
        ));
    }

    #[test]
    fn test_selection_pairs_criteria_with_its_dataset_during_imports() {
        let state = AppState::default();
        state
            .set_dataset(dataset_spanning("march.csv", "2025-03-01", "2025-03-31"))
            .unwrap();

        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..200 {
                    let ds = if i % 2 == 0 {
                        dataset_spanning("april.csv", "2025-04-01", "2025-04-30")
                    } else {
                        dataset_spanning("march.csv", "2025-03-01", "2025-03-31")
                    };
                    state.set_dataset(ds).unwrap();
                }
            });
            for _ in 0..200 {
                let (span_from, criteria_from) = state
                    .with_selection(|ds, c| {
                        (ds.date_span().map(|span| span.from.clone()), c.date_from.clone())
                    })
                    .unwrap();
                assert_eq!(span_from, criteria_from);
            }
        });
    }
}
