use std::collections::HashMap;

use crate::parser::deserializers::clean_cell;

/// Canonical ticket fields recognised in the export header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Date,
    Month,
    DayOfWeek,
    Hour,
    TicketId,
    Status,
    Channel,
    Agent,
    ClientId,
    ReasonCategory,
    Tabulation,
    SubOrders,
    SubDelivery,
    SubTechnicalAssistance,
    SubService,
    SubInternalComplaints,
    FirstResponseMinutes,
    ResolutionMinutes,
    AssignToResolutionMinutes,
}

/// Header spellings → field. Both creation-date spellings are accepted: the
/// export switched from "Criação do ticket Data" to "Criação do ticket - Data".
const HEADER_TABLE: &[(&str, CanonicalField)] = &[
    ("Criação do ticket Data", CanonicalField::Date),
    ("Criação do ticket - Data", CanonicalField::Date),
    ("Criação do ticket - Mês", CanonicalField::Month),
    ("Criação do ticket - Dia da semana", CanonicalField::DayOfWeek),
    ("Criação do ticket - Hora", CanonicalField::Hour),
    ("ID do ticket", CanonicalField::TicketId),
    ("Status do ticket", CanonicalField::Status),
    ("Canal do ticket", CanonicalField::Channel),
    ("Nome do atribuído", CanonicalField::Agent),
    ("ID do solicitante", CanonicalField::ClientId),
    ("Motivo do Contato:", CanonicalField::ReasonCategory),
    ("Tabulação Whatsapp:", CanonicalField::Tabulation),
    ("Submotivo: Pedidos", CanonicalField::SubOrders),
    ("Submotivo: Ocorrência na Entrega", CanonicalField::SubDelivery),
    ("Submotivo: Assistência Técnica", CanonicalField::SubTechnicalAssistance),
    ("Submotivo: Atendimento", CanonicalField::SubService),
    ("Submotivo: Reclamações Internas", CanonicalField::SubInternalComplaints),
    ("Tempo da primeira resposta (min)", CanonicalField::FirstResponseMinutes),
    ("Tempo total de resolução (min)", CanonicalField::ResolutionMinutes),
    (
        "Tempo da primeira atribuição até a resolução (min)",
        CanonicalField::AssignToResolutionMinutes,
    ),
];

impl CanonicalField {
    pub const ALL: [CanonicalField; 19] = [
        CanonicalField::Date,
        CanonicalField::Month,
        CanonicalField::DayOfWeek,
        CanonicalField::Hour,
        CanonicalField::TicketId,
        CanonicalField::Status,
        CanonicalField::Channel,
        CanonicalField::Agent,
        CanonicalField::ClientId,
        CanonicalField::ReasonCategory,
        CanonicalField::Tabulation,
        CanonicalField::SubOrders,
        CanonicalField::SubDelivery,
        CanonicalField::SubTechnicalAssistance,
        CanonicalField::SubService,
        CanonicalField::SubInternalComplaints,
        CanonicalField::FirstResponseMinutes,
        CanonicalField::ResolutionMinutes,
        CanonicalField::AssignToResolutionMinutes,
    ];

    /// Exact match on the cleaned header name.
    pub fn from_header(header: &str) -> Option<CanonicalField> {
        let name = clean_cell(header);
        HEADER_TABLE
            .iter()
            .find(|(h, _)| *h == name)
            .map(|(_, field)| *field)
    }

    /// Current export spelling, used when writing files back out.
    pub fn header(self) -> &'static str {
        match self {
            CanonicalField::Date => "Criação do ticket - Data",
            _ => HEADER_TABLE
                .iter()
                .find(|(_, f)| *f == self)
                .map(|(h, _)| *h)
                .unwrap_or_default(),
        }
    }
}

/// Maps canonical fields to their index in a tokenized row.
pub struct ColumnMap {
    indices: HashMap<CanonicalField, usize>,
    headers: Vec<String>,
    unknown: Vec<String>,
}

impl ColumnMap {
    /// Later columns win when two headers resolve to the same field.
    pub fn from_headers(headers: &[String]) -> Self {
        let mut indices = HashMap::new();
        let mut header_list = Vec::with_capacity(headers.len());
        let mut unknown = Vec::new();
        for (i, field) in headers.iter().enumerate() {
            let name = clean_cell(field);
            match CanonicalField::from_header(&name) {
                Some(canonical) => {
                    indices.insert(canonical, i);
                }
                None if !name.is_empty() => unknown.push(name.clone()),
                None => {}
            }
            header_list.push(name);
        }
        ColumnMap {
            indices,
            headers: header_list,
            unknown,
        }
    }

    /// Cell of `field` in `row`; `None` if the column is absent or the row is short.
    pub fn get<'a>(&self, row: &'a [String], field: CanonicalField) -> Option<&'a str> {
        self.indices
            .get(&field)
            .and_then(|&i| row.get(i))
            .map(String::as_str)
    }

    pub fn has(&self, field: CanonicalField) -> bool {
        self.indices.contains_key(&field)
    }

    pub fn all_headers(&self) -> &[String] {
        &self.headers
    }

    /// Headers outside the lookup table. Their values are never read.
    pub fn unknown_headers(&self) -> &[String] {
        &self.unknown
    }

    /// Canonical fields with no column in this file, in canonical order.
    pub fn missing_fields(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .filter(|f| !self.has(*f))
            .collect()
    }
}
