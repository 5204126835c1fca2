pub mod summary_report;
pub mod tickets_csv;

use rust_xlsxwriter::{
    ConditionalFormatCell, ConditionalFormatCellRule, Format, FormatBorder, Worksheet, XlsxError,
};

use crate::config::RatingThresholds;

/// Header row: white bold text on #2C5F8A, thin border.
pub fn create_header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color("2C5F8A")
        .set_font_color("FFFFFF")
        .set_font_size(11)
        .set_border(FormatBorder::Thin)
        .set_text_wrap()
}

pub fn create_number_format() -> Format {
    Format::new().set_num_format("#,##0.0")
}

pub fn create_integer_format() -> Format {
    Format::new().set_num_format("#,##0")
}

/// Expects a 0–1 fraction.
pub fn create_percent_format() -> Format {
    Format::new().set_num_format("0%")
}

/// Green / amber / red fill on a minutes column.
/// Green ≤ good | Amber good..=warn | Red > warn
pub fn apply_rating_format(
    ws: &mut Worksheet,
    first_row: u32,
    col: u16,
    last_row: u32,
    thresholds: RatingThresholds,
) -> Result<(), XlsxError> {
    let green = Format::new()
        .set_background_color("C6EFCE")
        .set_font_color("006100");
    let amber = Format::new()
        .set_background_color("FFEB9C")
        .set_font_color("9C6500");
    let red = Format::new()
        .set_background_color("FFC7CE")
        .set_font_color("9C0006");

    ws.add_conditional_format(
        first_row,
        col,
        last_row,
        col,
        &ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::LessThanOrEqualTo(thresholds.good))
            .set_format(&green),
    )?;
    ws.add_conditional_format(
        first_row,
        col,
        last_row,
        col,
        &ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::Between(
                thresholds.good,
                thresholds.warn,
            ))
            .set_format(&amber),
    )?;
    ws.add_conditional_format(
        first_row,
        col,
        last_row,
        col,
        &ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::GreaterThan(thresholds.warn))
            .set_format(&red),
    )?;

    Ok(())
}
