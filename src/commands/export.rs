use std::path::Path;
use std::time::Instant;

use serde::Serialize;

use crate::analyzer::dashboard::build_dashboard;
use crate::commands::dashboard::with_working_subset;
use crate::error::AppError;
use crate::export::summary_report::generate_summary_report;
use crate::export::tickets_csv::tickets_csv_bytes;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub path: String,
    pub size_bytes: u64,
    pub duration_ms: u64,
}

fn write_export(path: &Path, bytes: &[u8], start: Instant) -> Result<ExportResult, AppError> {
    std::fs::write(path, bytes)?;
    let result = ExportResult {
        path: path.display().to_string(),
        size_bytes: bytes.len() as u64,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    log::info!(
        "Exported {} ({} bytes, {}ms)",
        result.path,
        result.size_bytes,
        result.duration_ms
    );
    Ok(result)
}

/// Writes the Working Subset back out as CSV.
pub fn export_tickets_csv(
    state: &AppState,
    path: impl AsRef<Path>,
) -> Result<ExportResult, AppError> {
    let start = Instant::now();
    let bytes = with_working_subset(state, |subset, _| tickets_csv_bytes(subset))?;
    write_export(path.as_ref(), &bytes, start)
}

/// Writes the summary workbook of the Working Subset.
pub fn export_summary_xlsx(
    state: &AppState,
    path: impl AsRef<Path>,
) -> Result<ExportResult, AppError> {
    let start = Instant::now();
    let bytes = with_working_subset(state, |subset, config| {
        let snapshot = build_dashboard(subset, config);
        generate_summary_report(&snapshot, config)
    })?;
    write_export(path.as_ref(), &bytes, start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::filters::apply_filters;
    use crate::commands::import::import_bytes;
    use crate::store::FilterCriteria;

    const CSV: &str = "Criação do ticket - Data,ID do ticket,Nome do atribuído\n\
                       2025-03-03,T1,Ana\n\
                       2025-03-04,T2,Bia\n";

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("ticket_dash_{}_{}", std::process::id(), name))
    }

    /// GIVEN a dataset filtered to one agent
    /// WHEN the tickets are exported as CSV
    /// THEN only that agent's rows are written
    #[test]
    fn test_csv_export_follows_filter() {
        let state = AppState::default();
        import_bytes(&state, "t.csv", CSV.as_bytes(), |_| {}).unwrap();
        apply_filters(
            &state,
            FilterCriteria {
                agent: Some("Bia".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let path = temp_path("filtered.csv");
        let result = export_tickets_csv(&state, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(result.size_bytes, written.len() as u64);
        assert_eq!(written.lines().count(), 2);
        assert!(written.contains("T2"));
        assert!(!written.contains("T1"));
    }

    #[test]
    fn test_xlsx_export_writes_workbook() {
        let state = AppState::default();
        import_bytes(&state, "t.csv", CSV.as_bytes(), |_| {}).unwrap();

        let path = temp_path("summary.xlsx");
        let result = export_summary_xlsx(&state, &path).unwrap();
        let written = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(result.size_bytes > 0);
        assert_eq!(&written[..2], b"PK");
    }

    #[test]
    fn test_export_without_dataset() {
        let state = AppState::default();
        let path = temp_path("none.csv");
        assert!(matches!(
            export_tickets_csv(&state, &path),
            Err(AppError::NoDataset)
        ));
        assert!(!path.exists());
    }
}
