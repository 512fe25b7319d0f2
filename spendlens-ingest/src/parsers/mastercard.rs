//! Mastercard statement importer (files named "... מאסטרקארד ...").
//!
//! Same header search as the Visa sheets, but a single known card, an
//! issuer-supplied category column, and statements that sometimes leave the
//! charged-amount column empty; the transaction amount then applies.

use calamine::{Data, Range};
use std::path::Path;

use anyhow::Result;
use spendlens_core::{Source, Transaction};

use crate::cell::{cell_str, is_empty_cell, parse_amount, parse_date};
use crate::parsers::{
    discover_files, find_header_row, import_workbook, row_bounds, HEADER_MARKER,
};
use crate::types::{Import, RowOutcome, SkipReason};

pub const FILE_MARKER: &str = "מאסטרקארד";

struct Columns {
    date: u32,
    name: u32,
    original: u32,
    charged: u32,
    category: u32,
}

const COLUMNS: Columns = Columns {
    date: 0,
    name: 1,
    original: 2,
    charged: 3,
    category: 5,
};

/// Import every Mastercard statement found in `dir`.
pub fn import_dir(dir: &Path) -> Result<Import> {
    let files = discover_files(dir, |name| name.contains(FILE_MARKER))?;
    let mut import = Import::default();
    for path in &files {
        import_workbook(path, &mut import, import_sheet)?;
    }
    Ok(import)
}

pub(crate) fn import_sheet(range: &Range<Data>, import: &mut Import) {
    let Some((_, bottom)) = row_bounds(range) else {
        return;
    };
    let Some(header) = find_header_row(range, HEADER_MARKER) else {
        import.stats.sheets_without_header += 1;
        return;
    };

    for row in header + 1..=bottom {
        import.push(parse_row(range, row));
    }
}

fn parse_row(range: &Range<Data>, row: u32) -> RowOutcome {
    let first = range.get_value((row, COLUMNS.date));
    if is_empty_cell(first) {
        return RowOutcome::Skipped(SkipReason::Blank);
    }

    // Total rows carry text in the date column and die here.
    let Some(date) = parse_date(first) else {
        return RowOutcome::Skipped(SkipReason::MissingDate);
    };
    let name = cell_str(range.get_value((row, COLUMNS.name)));
    if name.is_empty() {
        return RowOutcome::Skipped(SkipReason::MissingName);
    }
    let orig_amount = parse_amount(range.get_value((row, COLUMNS.original)));
    let mut amount = parse_amount(range.get_value((row, COLUMNS.charged)));
    if amount == 0.0 {
        amount = orig_amount;
    }
    if amount <= 0.0 {
        return RowOutcome::Skipped(SkipReason::NonPositiveAmount);
    }
    let category = cell_str(range.get_value((row, COLUMNS.category)));

    RowOutcome::Imported(Transaction {
        date,
        name,
        amount,
        orig_amount,
        source: Source::Mastercard4045,
        installment: String::new(),
        category,
        billing: String::new(),
    })
}
