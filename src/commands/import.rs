use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

use crate::error::AppError;
use crate::parser::decoder::TextEncoding;
use crate::parser::types::ParseWarning;
use crate::state::{AppState, DatasetAccess};
use crate::store::{DateSpan, Dataset};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "event", content = "data")]
pub enum ImportEvent {
    #[serde(rename_all = "camelCase")]
    Progress {
        rows_parsed: usize,
        records_accepted: usize,
    },
    #[serde(rename_all = "camelCase")]
    Complete {
        duration_ms: u64,
        total_tickets: usize,
        closed: usize,
        open: usize,
    },
    #[serde(rename_all = "camelCase")]
    Warning { line: usize, message: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub filename: String,
    pub encoding: TextEncoding,
    pub total_rows: usize,
    pub total_tickets: usize,
    pub closed_count: usize,
    pub open_count: usize,
    pub skipped_rows: usize,
    pub warnings: Vec<ParseWarning>,
    pub detected_columns: Vec<String>,
    pub unknown_columns: Vec<String>,
    pub missing_columns: Vec<String>,
    pub unique_statuses: Vec<String>,
    pub date_span: Option<DateSpan>,
    pub imported_at: NaiveDateTime,
    pub parse_duration_ms: u64,
    pub duration_ms: u64,
}

/// Reads and imports the export at `path`. The file read happens while the
/// import slot is held.
pub fn import_csv(
    state: &AppState,
    path: impl AsRef<Path>,
    on_event: impl Fn(ImportEvent),
) -> Result<ImportResult, AppError> {
    let _guard = state.begin_import()?;
    let path = path.as_ref();
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string());
    let bytes = std::fs::read(path)?;
    ingest(state, &filename, &bytes, on_event)
}

/// Imports an already loaded file. The previous dataset stays active on error.
pub fn import_bytes(
    state: &AppState,
    filename: &str,
    bytes: &[u8],
    on_event: impl Fn(ImportEvent),
) -> Result<ImportResult, AppError> {
    let _guard = state.begin_import()?;
    ingest(state, filename, bytes, on_event)
}

fn ingest(
    state: &AppState,
    filename: &str,
    bytes: &[u8],
    on_event: impl Fn(ImportEvent),
) -> Result<ImportResult, AppError> {
    let start = Instant::now();
    log::info!("Importing {} ({} bytes)", filename, bytes.len());

    // Progress callback sends ImportEvent::Progress every 500 rows
    let output = crate::parser::parse_bytes(bytes, |rows_parsed, records_accepted| {
        on_event(ImportEvent::Progress {
            rows_parsed,
            records_accepted,
        })
    });

    if output.records.is_empty() {
        log::warn!(
            "{}: no records after {} rows, keeping the current dataset",
            filename,
            output.total_rows_processed
        );
        return Err(AppError::EmptyFile);
    }

    let is_duplicate = state
        .dataset(|current| Ok(current.source_name() == filename))
        .unwrap_or(false);

    let total_tickets = output.records.len();
    let closed_count = output
        .records
        .iter()
        .filter(|r| r.status.is_closed())
        .count();
    let open_count = total_tickets - closed_count;

    let dataset = Dataset::new(output.records, filename, output.encoding);
    let date_span = dataset.date_span().cloned();
    let imported_at = dataset.imported_at();
    state.set_dataset(dataset)?;

    let duration_ms = start.elapsed().as_millis() as u64;
    log::info!(
        "Imported {} tickets from {} in {} ms ({})",
        total_tickets,
        filename,
        duration_ms,
        output.encoding.label()
    );

    let mut warnings = output.warnings;
    if is_duplicate {
        warnings.insert(
            0,
            ParseWarning {
                line: 0,
                message: format!("Arquivo '{}' já importado (possível duplicata)", filename),
            },
        );
    }
    for w in &warnings {
        on_event(ImportEvent::Warning {
            line: w.line,
            message: w.message.clone(),
        });
    }
    on_event(ImportEvent::Complete {
        duration_ms,
        total_tickets,
        closed: closed_count,
        open: open_count,
    });

    Ok(ImportResult {
        filename: filename.to_string(),
        encoding: output.encoding,
        total_rows: output.total_rows_processed,
        total_tickets,
        closed_count,
        open_count,
        skipped_rows: output.skipped_rows,
        warnings,
        detected_columns: output.detected_columns,
        unknown_columns: output.unknown_columns,
        missing_columns: output.missing_columns,
        unique_statuses: output.unique_statuses,
        date_span,
        imported_at,
        parse_duration_ms: output.parse_duration_ms,
        duration_ms,
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
