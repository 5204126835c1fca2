pub mod columns;
pub mod decoder;
pub mod deserializers;
pub mod pipeline;
pub mod tokenizer;
pub mod types;

pub use decoder::TextEncoding;
pub use pipeline::{parse_bytes, parse_csv, parse_text, ParseOutput};
pub use types::{Month, ParseWarning, Status, TicketRecord, Weekday};
