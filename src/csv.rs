/// One parsed logical record: trimmed fields in column order.
pub type Row = Vec<String>;

/// Splits published-sheet CSV text into rows.
///
/// Quoted fields may contain commas and line breaks, and `""` inside a quoted
/// field is a literal quote. Blank lines are dropped. An unterminated quote
/// swallows the rest of the input as field content; no error is reported.
pub fn parse_csv(text: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut row: Row = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                cur.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                row.push(cur.trim().to_string());
                cur.clear();
            }
            '\n' | '\r' if !in_quotes => {
                finish_row(&mut rows, &mut row, &mut cur);
            }
            _ => cur.push(c),
        }
    }

    finish_row(&mut rows, &mut row, &mut cur);
    rows
}

fn finish_row(rows: &mut Vec<Row>, row: &mut Row, cur: &mut String) {
    if !cur.is_empty() || !row.is_empty() {
        row.push(cur.trim().to_string());
    }
    cur.clear();

    let done = std::mem::take(row);
    if done.iter().any(|field| !field.is_empty()) {
        rows.push(done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_rows_and_trims_fields() {
        let rows = parse_csv("date, venue ,city\n2024-03-01,The Hall,  Leeds\n");
        assert_eq!(
            rows,
            vec![
                vec!["date", "venue", "city"],
                vec!["2024-03-01", "The Hall", "Leeds"],
            ]
        );
    }

    #[test]
    fn row_count_matches_non_blank_lines() {
        let text = "date,venue\n\n2024-01-01,A\r\n2024-01-02,B\r\n   \n,\n2024-01-03,C";
        let rows = parse_csv(text);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3], vec!["2024-01-03", "C"]);
    }

    #[test]
    fn doubled_quote_becomes_one_literal_quote() {
        let rows = parse_csv("name\n\"The \"\"Moon\"\" Room\"\n");
        assert_eq!(rows[1], vec!["The \"Moon\" Room"]);
    }

    #[test]
    fn quoted_commas_and_newlines_stay_in_field() {
        let rows = parse_csv("venue,city\n\"Bar, Upstairs\",\"Line one\nLine two\"\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["Bar, Upstairs", "Line one\nLine two"]);
    }

    #[test]
    fn trailing_field_without_newline_is_emitted() {
        let rows = parse_csv("a,b\n1,");
        assert_eq!(rows[1], vec!["1", ""]);
    }

    #[test]
    fn unterminated_quote_consumes_rest_of_input() {
        // Known sharp edge: the open quote never closes, so the remaining
        // lines collapse into one field of the second row.
        let rows = parse_csv("a,b\n\"open,still open\nnext,row\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["open,still open\nnext,row"]);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("\r\n\r\n").is_empty());
    }
}
