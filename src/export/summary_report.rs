use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::analyzer::agents::AgentRow;
use crate::analyzer::dashboard::DashboardSnapshot;
use crate::analyzer::distribution::TimeBucket;
use crate::analyzer::pareto::ParetoAnalysis;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::export::{
    apply_rating_format, create_header_format, create_integer_format, create_number_format,
    create_percent_format,
};

/// Four-sheet summary workbook of a dashboard snapshot, as XLSX bytes.
pub fn generate_summary_report(
    snapshot: &DashboardSnapshot,
    config: &AppConfig,
) -> Result<Vec<u8>, AppError> {
    let mut wb = Workbook::new();
    write_indicators(&mut wb, snapshot)?;
    write_agents(&mut wb, &snapshot.team.by_volume, config)?;
    write_pareto(&mut wb, &snapshot.causes.pareto)?;
    write_buckets(
        &mut wb,
        &snapshot.sla.first_response_buckets,
        &snapshot.sla.resolution_buckets,
    )?;
    Ok(wb.save_to_buffer()?)
}

fn write_optional(
    ws: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
    fmt: &Format,
) -> Result<(), XlsxError> {
    match value {
        Some(v) => ws.write_with_format(row, col, v, fmt)?,
        None => ws.write(row, col, "—")?,
    };
    Ok(())
}

// ─── Indicadores ─────────────────────────────────────────────────────────────

fn write_indicators(wb: &mut Workbook, s: &DashboardSnapshot) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Indicadores")?;

    let hdr = create_header_format();
    let int = create_integer_format();
    let num = create_number_format();
    let pct = create_percent_format();

    ws.write_with_format(0, 0, "Indicador", &hdr)?;
    ws.write_with_format(0, 1, "Valor", &hdr)?;

    let k = &s.executive.kpis;
    let counts: &[(&str, usize)] = &[
        ("Total de tickets", k.total),
        ("Fechados", k.closed),
        ("Em aberto", k.open),
        ("Dias com atendimento", k.active_days),
        ("Clientes únicos", k.clients.unique_clients),
        ("Clientes recorrentes", k.clients.recurrent_clients),
    ];
    let mut row = 1u32;
    for (label, value) in counts {
        ws.write(row, 0, *label)?;
        ws.write_with_format(row, 1, *value as f64, &int)?;
        row += 1;
    }

    let shares: &[(&str, u32)] = &[
        ("Taxa de fechamento", k.closed_pct),
        ("Recorrência de clientes", k.clients.recurrence_pct),
        ("1ª resposta dentro do SLA", s.sla.fr_within_sla_pct),
        ("1ª resposta dentro do SLA estendido", s.sla.fr_within_extended_pct),
        ("Resolução dentro do SLA", s.sla.tr_within_sla_pct),
    ];
    for (label, value) in shares {
        ws.write(row, 0, *label)?;
        ws.write_with_format(row, 1, f64::from(*value) / 100.0, &pct)?;
        row += 1;
    }

    ws.write(row, 0, "Média diária")?;
    ws.write_with_format(row, 1, k.daily_average, &num)?;
    row += 1;

    let minutes: &[(&str, Option<f64>)] = &[
        ("1ª resposta média (min)", s.sla.mean_first_response),
        ("1ª resposta mediana (min)", s.sla.median_first_response),
        ("Resolução média (min)", s.sla.mean_resolution),
        ("Resolução mediana (min)", s.sla.median_resolution),
        ("Atribuição até resolução média (min)", s.sla.mean_assign_to_resolution),
    ];
    for (label, value) in minutes {
        ws.write(row, 0, *label)?;
        write_optional(ws, row, 1, *value, &num)?;
        row += 1;
    }

    if let Some(span) = &s.meta.date_span {
        ws.write(row, 0, "Período")?;
        ws.write(row, 1, format!("{} a {}", span.from, span.to).as_str())?;
    }

    ws.set_column_width(0, 38)?;
    ws.set_column_width(1, 18)?;
    Ok(())
}

// ─── Agentes ─────────────────────────────────────────────────────────────────

fn write_agents(wb: &mut Workbook, rows: &[AgentRow], config: &AppConfig) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Agentes")?;

    let hdr = create_header_format();
    let int = create_integer_format();
    let num = create_number_format();
    let pct = create_percent_format();

    let headers = [
        "#",
        "Agente",
        "Tickets",
        "% do total",
        "1ª resposta média",
        "1ª resposta mediana",
        "Resolução média",
        "Resolução mediana",
    ];
    for (col, h) in headers.iter().enumerate() {
        ws.write_with_format(0, col as u16, *h, &hdr)?;
    }

    for (i, a) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write_with_format(row, 0, a.rank as f64, &int)?;
        ws.write(row, 1, a.agent.as_str())?;
        ws.write_with_format(row, 2, a.tickets as f64, &int)?;
        ws.write_with_format(row, 3, f64::from(a.share_pct) / 100.0, &pct)?;
        write_optional(ws, row, 4, a.mean_first_response, &num)?;
        write_optional(ws, row, 5, a.median_first_response, &num)?;
        write_optional(ws, row, 6, a.mean_resolution, &num)?;
        write_optional(ws, row, 7, a.median_resolution, &num)?;
    }

    if !rows.is_empty() {
        let last = rows.len() as u32;
        apply_rating_format(ws, 1, 4, last, config.fr_rating)?;
        apply_rating_format(ws, 1, 6, last, config.tr_rating)?;
        ws.autofilter(0, 0, last, (headers.len() - 1) as u16)?;
    }

    ws.set_freeze_panes(1, 0)?;
    ws.set_column_width(1, 30)?;
    for col in 4..headers.len() as u16 {
        ws.set_column_width(col, 18)?;
    }
    Ok(())
}

// ─── Pareto ──────────────────────────────────────────────────────────────────

fn write_pareto(wb: &mut Workbook, p: &ParetoAnalysis) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Pareto")?;

    let hdr = create_header_format();
    let int = create_integer_format();
    let pct = create_percent_format();
    let cutoff = Format::new().set_bold().set_background_color("FFEB9C");

    let headers = ["#", "Área › Submotivo", "Tickets", "%", "% acumulado"];
    for (col, h) in headers.iter().enumerate() {
        ws.write_with_format(0, col as u16, *h, &hdr)?;
    }

    for (i, e) in p.entries.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write_with_format(row, 0, e.rank as f64, &int)?;
        if p.threshold_index == Some(i) {
            ws.write_with_format(row, 1, e.key.as_str(), &cutoff)?;
        } else {
            ws.write(row, 1, e.key.as_str())?;
        }
        ws.write_with_format(row, 2, e.count as f64, &int)?;
        ws.write_with_format(row, 3, f64::from(e.share_pct) / 100.0, &pct)?;
        ws.write_with_format(row, 4, f64::from(e.cumulative_pct) / 100.0, &pct)?;
    }

    if !p.entries.is_empty() {
        ws.autofilter(0, 0, p.entries.len() as u32, (headers.len() - 1) as u16)?;
    }
    ws.set_freeze_panes(1, 0)?;
    ws.set_column_width(1, 60)?;
    ws.set_column_width(4, 14)?;
    Ok(())
}

// ─── Tempos ──────────────────────────────────────────────────────────────────

fn write_buckets(
    wb: &mut Workbook,
    first_response: &[TimeBucket],
    resolution: &[TimeBucket],
) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Tempos")?;

    let hdr = create_header_format();
    let int = create_integer_format();
    let pct = create_percent_format();

    let mut row = 0u32;
    for (title, buckets) in [
        ("1ª resposta", first_response),
        ("Resolução", resolution),
    ] {
        ws.write_with_format(row, 0, title, &hdr)?;
        ws.write_with_format(row, 1, "Tickets", &hdr)?;
        ws.write_with_format(row, 2, "%", &hdr)?;
        row += 1;
        for b in buckets {
            ws.write(row, 0, b.label)?;
            ws.write_with_format(row, 1, b.count as f64, &int)?;
            ws.write_with_format(row, 2, f64::from(b.pct) / 100.0, &pct)?;
            row += 1;
        }
        row += 1;
    }

    ws.set_column_width(0, 22)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::dashboard::build_dashboard;
    use crate::parser::types::TicketRecord;
    use crate::store::dataset::test_support::record;

    fn snapshot(records: &[TicketRecord]) -> DashboardSnapshot {
        let refs: Vec<&TicketRecord> = records.iter().collect();
        build_dashboard(&refs, &AppConfig::default())
    }

    #[test]
    fn test_report_is_xlsx() {
        let mut a = record("Ana", Some("2025-03-03"));
        a.first_response_minutes = Some(4.0);
        a.resolution_minutes = Some(100.0);
        let mut b = record("Bia", Some("2025-03-04"));
        b.first_response_minutes = Some(70.0);
        let snap = snapshot(&[a, b]);

        let bytes = generate_summary_report(&snap, &AppConfig::default()).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_report_for_empty_subset() {
        let snap = snapshot(&[]);
        let bytes = generate_summary_report(&snap, &AppConfig::default()).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
