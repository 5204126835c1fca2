/// A data row together with its 1-based line number in the normalized text.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRow {
    pub line: usize,
    pub cells: Vec<String>,
}

/// Header plus data rows of one CSV document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenizedCsv {
    pub header: Vec<String>,
    pub rows: Vec<TokenRow>,
    /// Data lines dropped because every cell was blank.
    pub blank_rows: usize,
}

/// Splits decoded text into rows of cells. The header row comes first.
/// Returns an empty vector when fewer than two non-blank lines are present.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    let doc = tokenize_document(text);
    if doc.header.is_empty() {
        return Vec::new();
    }
    std::iter::once(doc.header)
        .chain(doc.rows.into_iter().map(|r| r.cells))
        .collect()
}

/// Same rules as [`tokenize`], keeping line numbers for diagnostics.
pub fn tokenize_document(text: &str) -> TokenizedCsv {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<(usize, &str)> = normalized
        .split('\n')
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| (i + 1, l))
        .collect();

    if lines.len() < 2 {
        return TokenizedCsv::default();
    }

    let header = split_line(lines[0].1);
    let mut rows = Vec::with_capacity(lines.len() - 1);
    let mut blank_rows = 0usize;

    for &(line, text) in &lines[1..] {
        let cells = split_line(text);
        if cells.iter().all(|c| c.trim().is_empty()) {
            blank_rows += 1;
            continue;
        }
        rows.push(TokenRow { line, cells });
    }

    TokenizedCsv {
        header,
        rows,
        blank_rows,
    }
}

/// Splits one line on `,` or `;` outside double quotes.
/// `""` inside a quoted span is a literal quote.
pub fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' | ';' if !in_quotes => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_comma_and_semicolon() {
        assert_eq!(split_line("a,b;c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quoted_comma_and_escaped_quote() {
        assert_eq!(split_line(r#""a,b""c",d"#), vec![r#"a,b"c"#, "d"]);
    }

    #[test]
    fn test_quoted_semicolon() {
        assert_eq!(split_line(r#"x;"1;2";y"#), vec!["x", "1;2", "y"]);
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_cell() {
        assert_eq!(split_line("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_line_endings_normalized() {
        let rows = tokenize("h1,h2\r\n1,2\r3,4\n5,6");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2], vec!["3", "4"]);
    }

    #[test]
    fn test_blank_lines_and_blank_rows_dropped() {
        let doc = tokenize_document("h1;h2\n\n   \n1;2\n ; \n3;4\n");
        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.blank_rows, 1);
        assert_eq!(doc.rows[0].line, 4);
        assert_eq!(doc.rows[1].cells, vec!["3", "4"]);
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(tokenize("h1,h2\n").is_empty());
        assert!(tokenize("").is_empty());
        assert!(tokenize_document("h1,h2").header.is_empty());
    }
}
