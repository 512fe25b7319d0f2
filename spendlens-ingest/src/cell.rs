//! Field parsers over workbook cells.
//!
//! Statement cells are irregular: amounts arrive as numbers or as decorated
//! strings like `45.00 ₪` / `16.25 $` (sometimes with an RTL mark), dates as
//! native date cells or as text in one of three layouts. Both parsers are
//! fail-soft: a value that cannot be read becomes the zero/absent sentinel
//! and the row dies later on the required-field check.

use calamine::Data;
use chrono::NaiveDate;

/// Textual date layouts accepted, tried in order.
const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Trimmed string content of a cell; `""` for an absent or empty cell.
pub fn cell_str(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) => format!("{f}"),
        Some(Data::Int(i)) => format!("{i}"),
        Some(Data::Bool(b)) => format!("{b}"),
        Some(Data::DateTimeIso(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// True when the cell is missing entirely or holds no value.
pub fn is_empty_cell(cell: Option<&Data>) -> bool {
    matches!(cell, None | Some(Data::Empty))
}

/// True when the cell is missing, empty, or whitespace-only text.
pub fn is_blank(cell: Option<&Data>) -> bool {
    match cell {
        None | Some(Data::Empty) => true,
        Some(Data::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

/// Parse an amount cell. Numeric cells pass through; strings are stripped of
/// currency signs, thousands commas, and RTL marks before parsing. Anything
/// unreadable yields `0.0`.
pub fn parse_amount(cell: Option<&Data>) -> f64 {
    match cell {
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        Some(Data::String(s)) => parse_amount_str(s),
        _ => 0.0,
    }
}

pub fn parse_amount_str(raw: &str) -> f64 {
    let stripped = raw
        .trim()
        .replace('\u{20aa}', "")
        .replace('$', "")
        .replace(',', "")
        .replace('\u{200f}', "");
    let stripped = stripped.trim();
    let (negative, body) = match stripped.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, stripped),
    };
    match body.parse::<f64>() {
        Ok(v) if negative => -v,
        Ok(v) => v,
        Err(_) => 0.0,
    }
}

/// Parse a date cell. Native date cells convert directly; strings are tried
/// against the supported layouts in order. `None` means the row has no date.
pub fn parse_date(cell: Option<&Data>) -> Option<NaiveDate> {
    match cell {
        Some(Data::DateTime(dt)) => dt.as_datetime().map(|ndt| ndt.date()),
        Some(Data::DateTimeIso(s)) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        Some(Data::String(s)) => parse_date_str(s),
        _ => None,
    }
}

pub fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_decorated_strings() {
        assert_eq!(parse_amount_str("45.00 ₪"), 45.0);
        assert_eq!(parse_amount_str("16.25 $"), 16.25);
        assert_eq!(parse_amount_str("1,234.56 ₪"), 1234.56);
        assert_eq!(parse_amount_str("\u{200f}89.90 ₪"), 89.9);
    }

    #[test]
    fn test_amount_sign_reapplied() {
        assert_eq!(parse_amount_str("-45.00 ₪"), -45.0);
        assert_eq!(parse_amount_str("- 12.00"), -12.0);
    }

    #[test]
    fn test_amount_fail_soft() {
        assert_eq!(parse_amount_str(""), 0.0);
        assert_eq!(parse_amount_str("abc"), 0.0);
        assert_eq!(parse_amount(None), 0.0);
        assert_eq!(parse_amount(Some(&Data::Empty)), 0.0);
        assert_eq!(parse_amount(Some(&Data::Bool(true))), 0.0);
    }

    #[test]
    fn test_amount_numeric_cells() {
        assert_eq!(parse_amount(Some(&Data::Float(120.5))), 120.5);
        assert_eq!(parse_amount(Some(&Data::Int(3))), 3.0);
    }

    #[test]
    fn test_date_formats_in_order() {
        let expected = NaiveDate::from_ymd_opt(2025, 10, 5).unwrap();
        assert_eq!(parse_date_str("05/10/2025"), Some(expected));
        assert_eq!(parse_date_str("05-10-2025"), Some(expected));
        assert_eq!(parse_date_str("2025-10-05"), Some(expected));
        assert_eq!(parse_date_str(" 05/10/2025 "), Some(expected));
    }

    #[test]
    fn test_date_fail_soft() {
        assert_eq!(parse_date_str("not a date"), None);
        assert_eq!(parse_date_str("13/13/2025"), None);
        assert_eq!(parse_date(None), None);
        assert_eq!(parse_date(Some(&Data::Empty)), None);
    }

    #[test]
    fn test_date_iso_cell() {
        let cell = Data::DateTimeIso("2025-11-02T00:00:00".to_string());
        assert_eq!(
            parse_date(Some(&cell)),
            NaiveDate::from_ymd_opt(2025, 11, 2)
        );
    }

    #[test]
    fn test_cell_str() {
        assert_eq!(cell_str(Some(&Data::String("  Wolt  ".into()))), "Wolt");
        assert_eq!(cell_str(Some(&Data::Int(4581))), "4581");
        assert_eq!(cell_str(Some(&Data::Empty)), "");
        assert_eq!(cell_str(None), "");
    }

    #[test]
    fn test_blankness() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&Data::Empty)));
        assert!(is_blank(Some(&Data::String("   ".into()))));
        assert!(!is_blank(Some(&Data::String("x".into()))));
        assert!(!is_blank(Some(&Data::Float(0.0))));
        assert!(is_empty_cell(Some(&Data::Empty)));
        assert!(!is_empty_cell(Some(&Data::String(String::new()))));
    }
}
