use serde::{Serialize, Serializer};

use crate::parser::deserializers::fmt_date;

/// Label shown wherever an empty status, reason or agent is displayed or grouped.
pub const NO_INFO: &str = "(Sem info)";

/// Pareto fallback when none of the sub-reason columns is filled.
pub const NO_SUBREASON: &str = "(sem submotivo)";

// ─── Month ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// Calendar order, used for every month-keyed series.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Month::January => "Janeiro",
            Month::February => "Fevereiro",
            Month::March => "Março",
            Month::April => "Abril",
            Month::May => "Maio",
            Month::June => "Junho",
            Month::July => "Julho",
            Month::August => "Agosto",
            Month::September => "Setembro",
            Month::October => "Outubro",
            Month::November => "Novembro",
            Month::December => "Dezembro",
        }
    }

    /// Case-insensitive match against the localized month names.
    pub fn from_label(s: &str) -> Option<Month> {
        let needle = s.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        Month::ALL
            .into_iter()
            .find(|m| m.label().to_lowercase() == needle)
    }

    /// 1 = January.
    pub fn from_number(n: u32) -> Option<Month> {
        Month::ALL.get((n as usize).checked_sub(1)?).copied()
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ─── Weekday ─────────────────────────────────────────────────────────────────

/// Business days only: the source export never carries weekend tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Segunda-feira",
            Weekday::Tuesday => "Terça-feira",
            Weekday::Wednesday => "Quarta-feira",
            Weekday::Thursday => "Quinta-feira",
            Weekday::Friday => "Sexta-feira",
        }
    }

    /// Chart axis label ("Segunda").
    pub fn short_label(self) -> &'static str {
        self.label().trim_end_matches("-feira")
    }

    /// Accepts the full or the short form, case-insensitive.
    pub fn from_label(s: &str) -> Option<Weekday> {
        let needle = s.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        Weekday::ALL.into_iter().find(|d| {
            d.label().to_lowercase() == needle || d.short_label().to_lowercase() == needle
        })
    }

    pub fn from_chrono(day: chrono::Weekday) -> Option<Weekday> {
        match day {
            chrono::Weekday::Mon => Some(Weekday::Monday),
            chrono::Weekday::Tue => Some(Weekday::Tuesday),
            chrono::Weekday::Wed => Some(Weekday::Wednesday),
            chrono::Weekday::Thu => Some(Weekday::Thursday),
            chrono::Weekday::Fri => Some(Weekday::Friday),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Open,
    Closed,
    Solved,
    Pending,
    Hold,
    New,
    InProgress,
    /// Non-empty value outside the translation table, kept verbatim.
    Other(String),
    Missing,
}

impl Status {
    /// English and Portuguese tokens, case-insensitive.
    pub fn parse(raw: &str) -> Status {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Status::Missing,
            "open" | "aberto" => Status::Open,
            "closed" | "fechado" => Status::Closed,
            "solved" | "resolvido" => Status::Solved,
            "pending" | "pendente" => Status::Pending,
            "hold" | "on-hold" | "on hold" | "em espera" => Status::Hold,
            "new" | "novo" => Status::New,
            "in-progress" | "in progress" | "em andamento" => Status::InProgress,
            _ => Status::Other(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Status::Open => "Aberto",
            Status::Closed => "Fechado",
            Status::Solved => "Resolvido",
            Status::Pending => "Pendente",
            Status::Hold => "Em Espera",
            Status::New => "Novo",
            Status::InProgress => "Em Andamento",
            Status::Other(s) => s,
            Status::Missing => NO_INFO,
        }
    }

    /// Counted in the closing rate.
    pub fn is_closed(&self) -> bool {
        matches!(self, Status::Closed | Status::Solved)
    }

    pub fn color(&self) -> Option<&'static str> {
        match self {
            Status::Closed => Some("#10b981"),
            Status::Solved => Some("#00d4ff"),
            Status::Open => Some("#f59e0b"),
            Status::Pending => Some("#a855f7"),
            Status::Hold => Some("#f97316"),
            Status::New => Some("#ef4444"),
            Status::InProgress | Status::Other(_) | Status::Missing => None,
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ─── Sub-reasons ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubReasonCategory {
    Orders,
    Delivery,
    TechnicalAssistance,
    Service,
    InternalComplaints,
}

impl SubReasonCategory {
    /// Resolution order for the most specific sub-reason.
    pub const PRIORITY: [SubReasonCategory; 5] = [
        SubReasonCategory::Orders,
        SubReasonCategory::Delivery,
        SubReasonCategory::TechnicalAssistance,
        SubReasonCategory::Service,
        SubReasonCategory::InternalComplaints,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SubReasonCategory::Orders => "Pedidos",
            SubReasonCategory::Delivery => "Ocorrência na Entrega",
            SubReasonCategory::TechnicalAssistance => "Assistência Técnica",
            SubReasonCategory::Service => "Atendimento",
            SubReasonCategory::InternalComplaints => "Reclamações Internas",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubReasons {
    pub orders: Option<String>,
    pub delivery: Option<String>,
    pub technical_assistance: Option<String>,
    pub service: Option<String>,
    pub internal_complaints: Option<String>,
}

impl SubReasons {
    pub fn get(&self, category: SubReasonCategory) -> Option<&str> {
        let slot = match category {
            SubReasonCategory::Orders => &self.orders,
            SubReasonCategory::Delivery => &self.delivery,
            SubReasonCategory::TechnicalAssistance => &self.technical_assistance,
            SubReasonCategory::Service => &self.service,
            SubReasonCategory::InternalComplaints => &self.internal_complaints,
        };
        slot.as_deref().filter(|s| !s.is_empty())
    }

    pub fn most_specific(&self) -> Option<&str> {
        SubReasonCategory::PRIORITY
            .into_iter()
            .find_map(|c| self.get(c))
    }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One CSV row keyed by canonical field, before coercion.
#[derive(Debug, Clone, Default)]
pub struct TicketRaw {
    pub date: Option<String>,
    pub month: Option<String>,
    pub day_of_week: Option<String>,
    pub hour: Option<String>,
    pub ticket_id: Option<String>,
    pub status: Option<String>,
    pub channel: Option<String>,
    pub agent: Option<String>,
    pub client_id: Option<String>,
    pub reason_category: Option<String>,
    pub tabulation: Option<String>,
    pub sub_orders: Option<String>,
    pub sub_delivery: Option<String>,
    pub sub_technical_assistance: Option<String>,
    pub sub_service: Option<String>,
    pub sub_internal_complaints: Option<String>,
    pub first_response: Option<String>,
    pub resolution: Option<String>,
    pub assign_to_resolution: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    /// Creation date as exported (cleaned).
    pub date: String,
    /// `yyyy-mm-dd`, only when the export value has a recognisable date shape.
    pub date_iso: Option<String>,
    pub month: Option<Month>,
    pub day_of_week: Option<Weekday>,
    pub hour: u8,
    pub ticket_id: String,
    pub status: Status,
    pub channel: String,
    pub agent: String,
    pub client_id: String,
    pub reason_category: String,
    pub tabulation: Option<String>,
    pub sub_reasons: SubReasons,
    pub first_response_minutes: Option<f64>,
    pub resolution_minutes: Option<f64>,
    pub assign_to_resolution_minutes: Option<f64>,
}

impl TicketRecord {
    pub fn display_date(&self) -> String {
        fmt_date(self.date_iso.as_deref().unwrap_or(&self.date))
    }

    pub fn agent_label(&self) -> &str {
        label_or_na(&self.agent)
    }

    pub fn reason_label(&self) -> &str {
        label_or_na(&self.reason_category)
    }

    /// Tabulation when assigned, otherwise the top-level reason.
    pub fn tabulation_or_reason(&self) -> &str {
        match self.tabulation.as_deref().filter(|t| !t.is_empty()) {
            Some(t) => t,
            None => self.reason_label(),
        }
    }

    /// Compound "area › sub-reason" key used by the Pareto ranking.
    pub fn pareto_key(&self) -> String {
        let sub = self.sub_reasons.most_specific().unwrap_or(NO_SUBREASON);
        format!("{} › {}", self.tabulation_or_reason(), sub)
    }
}

/// Returns the value, or [`NO_INFO`] when it is blank.
pub fn label_or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        NO_INFO
    } else {
        s
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}
