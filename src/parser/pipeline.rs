use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use chrono::Datelike;

use crate::error::AppError;
use crate::parser::columns::{CanonicalField, ColumnMap};
use crate::parser::decoder::{decode_with_fallback, TextEncoding};
use crate::parser::deserializers::{
    clean_agent, clean_cell, is_iso_date, parse_hour, parse_iso_date, parse_minutes, to_iso,
};
use crate::parser::tokenizer::{tokenize_document, TokenRow};
use crate::parser::types::{
    Month, ParseWarning, Status, SubReasons, TicketRaw, TicketRecord, Weekday,
};

/// Output of a parse — normalized records plus import metadata.
#[derive(Debug)]
pub struct ParseOutput {
    pub records: Vec<TicketRecord>,
    pub warnings: Vec<ParseWarning>,
    pub encoding: TextEncoding,
    pub total_rows_processed: usize,
    pub skipped_rows: usize,
    pub detected_columns: Vec<String>,
    pub unknown_columns: Vec<String>,
    pub missing_columns: Vec<String>,
    pub unique_statuses: Vec<String>,
    pub parse_duration_ms: u64,
}

/// Parse an export file from `path`.
/// `progress_cb(rows_processed, records_accepted)` is called every 500 rows.
pub fn parse_csv(
    path: impl AsRef<Path>,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let bytes = std::fs::read(path)?;
    Ok(parse_bytes(&bytes, progress_cb))
}

/// Decodes raw bytes (UTF-8, falling back to Windows-1252 when the first
/// record's month is garbled) and parses the result.
pub fn parse_bytes(bytes: &[u8], progress_cb: impl Fn(usize, usize)) -> ParseOutput {
    let start = Instant::now();
    let decoded = decode_with_fallback(bytes, first_month_is_known);
    let mut output = parse_text(&decoded.text, decoded.encoding, progress_cb);
    output.parse_duration_ms = start.elapsed().as_millis() as u64;
    output
}

/// Core parsing logic over already decoded text. Never fails: an empty or
/// header-only document yields zero records.
pub fn parse_text(
    text: &str,
    encoding: TextEncoding,
    progress_cb: impl Fn(usize, usize),
) -> ParseOutput {
    let start = Instant::now();
    let doc = tokenize_document(text);
    let col_map = ColumnMap::from_headers(&doc.header);

    let mut records: Vec<TicketRecord> = Vec::with_capacity(doc.rows.len());
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut unique_statuses: BTreeSet<String> = BTreeSet::new();

    for (idx, row) in doc.rows.iter().enumerate() {
        if (idx + 1) % 500 == 0 {
            progress_cb(idx + 1, records.len());
        }
        if row.cells.len() > doc.header.len() {
            warnings.push(ParseWarning {
                line: row.line,
                message: format!(
                    "{} colunas encontradas, {} esperadas; excedentes ignoradas",
                    row.cells.len(),
                    doc.header.len()
                ),
            });
        }
        let raw = record_to_raw(&col_map, &row.cells);
        let record = normalize_ticket(&raw, row, &mut warnings);
        unique_statuses.insert(record.status.label().to_string());
        records.push(record);
    }

    let total_rows_processed = doc.rows.len() + doc.blank_rows;
    log::info!(
        "Parsed {} records ({} blank rows skipped, {} warnings, {})",
        records.len(),
        doc.blank_rows,
        warnings.len(),
        encoding.label()
    );

    ParseOutput {
        records,
        warnings,
        encoding,
        total_rows_processed,
        skipped_rows: doc.blank_rows,
        detected_columns: col_map.all_headers().to_vec(),
        unknown_columns: col_map.unknown_headers().to_vec(),
        missing_columns: col_map
            .missing_fields()
            .into_iter()
            .map(|f| f.header().to_string())
            .collect(),
        unique_statuses: unique_statuses.into_iter().collect(),
        parse_duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Encoding validator: the month cell of the first record must be empty or a
/// known month name. Without a month column, the header must be free of
/// replacement characters. Documents without records are accepted as-is.
pub fn first_month_is_known(text: &str) -> bool {
    let doc = tokenize_document(text);
    let Some(first) = doc.rows.first() else {
        return true;
    };
    let col_map = ColumnMap::from_headers(&doc.header);
    match col_map.get(&first.cells, CanonicalField::Month).map(clean_cell) {
        Some(month) => month.is_empty() || Month::from_label(&month).is_some(),
        None if col_map.has(CanonicalField::Month) => true,
        None => !doc.header.iter().any(|h| h.contains('\u{FFFD}')),
    }
}

fn record_to_raw(col_map: &ColumnMap, row: &[String]) -> TicketRaw {
    let cell = |field| col_map.get(row, field).map(clean_cell);
    TicketRaw {
        date: cell(CanonicalField::Date),
        month: cell(CanonicalField::Month),
        day_of_week: cell(CanonicalField::DayOfWeek),
        hour: cell(CanonicalField::Hour),
        ticket_id: cell(CanonicalField::TicketId),
        status: cell(CanonicalField::Status),
        channel: cell(CanonicalField::Channel),
        agent: cell(CanonicalField::Agent),
        client_id: cell(CanonicalField::ClientId),
        reason_category: cell(CanonicalField::ReasonCategory),
        tabulation: cell(CanonicalField::Tabulation),
        sub_orders: cell(CanonicalField::SubOrders),
        sub_delivery: cell(CanonicalField::SubDelivery),
        sub_technical_assistance: cell(CanonicalField::SubTechnicalAssistance),
        sub_service: cell(CanonicalField::SubService),
        sub_internal_complaints: cell(CanonicalField::SubInternalComplaints),
        first_response: cell(CanonicalField::FirstResponseMinutes),
        resolution: cell(CanonicalField::ResolutionMinutes),
        assign_to_resolution: cell(CanonicalField::AssignToResolutionMinutes),
    }
}

fn normalize_ticket(
    raw: &TicketRaw,
    row: &TokenRow,
    warnings: &mut Vec<ParseWarning>,
) -> TicketRecord {
    let mut warn = |message: String| {
        warnings.push(ParseWarning {
            line: row.line,
            message,
        })
    };

    // Date: keep the exported text, derive the comparable ISO form
    let date = raw.date.clone().unwrap_or_default();
    let date_iso = to_iso(&date).filter(|iso| is_iso_date(iso));
    if !date.is_empty() && date_iso.is_none() {
        warn(format!("Data não reconhecida: {:?}", date));
    }
    let calendar = date_iso.as_deref().and_then(parse_iso_date);

    // Month / weekday labels, derived from the date when the column is empty or unknown
    let month_raw = raw.month.as_deref().unwrap_or("");
    let month = Month::from_label(month_raw)
        .or_else(|| calendar.and_then(|d| Month::from_number(d.month())));
    if !month_raw.is_empty() && Month::from_label(month_raw).is_none() {
        warn(format!("Mês não reconhecido: {:?}", month_raw));
    }
    let day_of_week = Weekday::from_label(raw.day_of_week.as_deref().unwrap_or(""))
        .or_else(|| calendar.and_then(|d| Weekday::from_chrono(d.weekday())));

    let hour = parse_hour(raw.hour.as_deref().unwrap_or(""));

    let mut minutes = |value: &Option<String>, column: &str| -> Option<f64> {
        let s = value.as_deref().unwrap_or("");
        let parsed = parse_minutes(s);
        if parsed.is_none() && !s.is_empty() {
            warn(format!("{column}: valor inválido {:?}", s));
        }
        parsed
    };
    let first_response_minutes = minutes(&raw.first_response, "Tempo da primeira resposta");
    let resolution_minutes = minutes(&raw.resolution, "Tempo total de resolução");
    let assign_to_resolution_minutes =
        minutes(&raw.assign_to_resolution, "Tempo da atribuição até a resolução");

    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let optional = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

    TicketRecord {
        date,
        date_iso,
        month,
        day_of_week,
        hour,
        ticket_id: text(&raw.ticket_id),
        status: Status::parse(raw.status.as_deref().unwrap_or("")),
        channel: text(&raw.channel),
        agent: clean_agent(raw.agent.as_deref().unwrap_or("")),
        client_id: text(&raw.client_id),
        reason_category: text(&raw.reason_category),
        tabulation: optional(&raw.tabulation),
        sub_reasons: SubReasons {
            orders: optional(&raw.sub_orders),
            delivery: optional(&raw.sub_delivery),
            technical_assistance: optional(&raw.sub_technical_assistance),
            service: optional(&raw.sub_service),
            internal_complaints: optional(&raw.sub_internal_complaints),
        },
        first_response_minutes,
        resolution_minutes,
        assign_to_resolution_minutes,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
