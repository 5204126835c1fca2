use std::io::Write;

use crate::error::AppError;
use crate::parser::columns::CanonicalField;
use crate::parser::types::{Status, SubReasonCategory, TicketRecord};

fn minutes(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn field_value(r: &TicketRecord, field: CanonicalField) -> String {
    match field {
        CanonicalField::Date => {
            if r.date.is_empty() {
                String::new()
            } else {
                r.display_date()
            }
        }
        CanonicalField::Month => r.month.map(|m| m.label().to_string()).unwrap_or_default(),
        CanonicalField::DayOfWeek => r
            .day_of_week
            .map(|d| d.label().to_string())
            .unwrap_or_default(),
        CanonicalField::Hour => r.hour.to_string(),
        CanonicalField::TicketId => r.ticket_id.clone(),
        // Missing stays empty so the file re-imports to the same status
        CanonicalField::Status => match r.status {
            Status::Missing => String::new(),
            ref s => s.label().to_string(),
        },
        CanonicalField::Channel => r.channel.clone(),
        CanonicalField::Agent => r.agent.clone(),
        CanonicalField::ClientId => r.client_id.clone(),
        CanonicalField::ReasonCategory => r.reason_category.clone(),
        CanonicalField::Tabulation => r.tabulation.clone().unwrap_or_default(),
        CanonicalField::SubOrders => sub(r, SubReasonCategory::Orders),
        CanonicalField::SubDelivery => sub(r, SubReasonCategory::Delivery),
        CanonicalField::SubTechnicalAssistance => sub(r, SubReasonCategory::TechnicalAssistance),
        CanonicalField::SubService => sub(r, SubReasonCategory::Service),
        CanonicalField::SubInternalComplaints => sub(r, SubReasonCategory::InternalComplaints),
        CanonicalField::FirstResponseMinutes => minutes(r.first_response_minutes),
        CanonicalField::ResolutionMinutes => minutes(r.resolution_minutes),
        CanonicalField::AssignToResolutionMinutes => minutes(r.assign_to_resolution_minutes),
    }
}

fn sub(r: &TicketRecord, category: SubReasonCategory) -> String {
    r.sub_reasons.get(category).unwrap_or_default().to_string()
}

/// Writes `records` under the current export header names, dates as dd/mm/yyyy.
pub fn write_tickets_csv<W: Write>(writer: W, records: &[&TicketRecord]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CanonicalField::ALL.iter().map(|f| f.header()))?;
    for r in records {
        wtr.write_record(CanonicalField::ALL.iter().map(|&f| field_value(r, f)))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn tickets_csv_bytes(records: &[&TicketRecord]) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();
    write_tickets_csv(&mut buf, records)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::decoder::TextEncoding;
    use crate::parser::pipeline::parse_text;
    use crate::parser::types::{Month, Weekday};
    use crate::store::dataset::test_support::record;

    fn sample() -> TicketRecord {
        let mut r = record("Ana Souza", Some("2025-03-07"));
        r.month = Some(Month::March);
        r.day_of_week = Some(Weekday::Friday);
        r.hour = 14;
        r.ticket_id = "T-1".into();
        r.status = Status::Solved;
        r.client_id = "C1".into();
        r.reason_category = "Troca, devolução".into();
        r.tabulation = Some("Logística".into());
        r.sub_reasons.delivery = Some("Atraso \"grave\"".into());
        r.first_response_minutes = Some(0.0);
        r.resolution_minutes = Some(12.5);
        r
    }

    #[test]
    fn test_header_and_display_date() {
        let bytes = tickets_csv_bytes(&[&sample()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Criação do ticket - Data,Criação do ticket - Mês"));
        assert!(lines.next().unwrap().starts_with("07/03/2025,Março,Sexta-feira,14,T-1,Resolvido"));
    }

    #[test]
    fn test_export_reimports_to_same_records() {
        let mut missing = record("", None);
        missing.status = Status::Missing;
        let original = vec![sample(), missing];
        let refs: Vec<&TicketRecord> = original.iter().collect();
        let text = String::from_utf8(tickets_csv_bytes(&refs).unwrap()).unwrap();

        let parsed = parse_text(&text, TextEncoding::Utf8, |_, _| {});
        assert_eq!(parsed.records.len(), 2);
        let back = &parsed.records[0];
        assert_eq!(back.date_iso, original[0].date_iso);
        assert_eq!(back.status, Status::Solved);
        assert_eq!(back.reason_category, "Troca, devolução");
        assert_eq!(back.sub_reasons.delivery.as_deref(), Some("Atraso \"grave\""));
        assert_eq!(back.first_response_minutes, Some(0.0));
        assert_eq!(back.resolution_minutes, Some(12.5));
        assert_eq!(back.assign_to_resolution_minutes, None);
        assert_eq!(parsed.records[1].status, Status::Missing);
        assert!(parsed.unknown_columns.is_empty());
        assert!(parsed.missing_columns.is_empty());
    }

    #[test]
    fn test_empty_subset_writes_header_only() {
        let text = String::from_utf8(tickets_csv_bytes(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
