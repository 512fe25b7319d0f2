//! Bank debit importer (files named "transaction-details...").
//!
//! The export has a fixed preamble instead of a discoverable header, so data
//! rows start at a constant offset. Description and amount sit in different
//! columns than the card statements, and the installment annotation lives
//! far to the right; short rows simply don't have it.

use calamine::{Data, Range};
use std::path::Path;

use anyhow::Result;
use spendlens_core::{Source, Transaction};

use crate::cell::{cell_str, is_empty_cell, parse_amount, parse_date};
use crate::parsers::{discover_files, import_workbook, row_bounds};
use crate::types::{Import, RowOutcome, SkipReason};

pub const FILE_PREFIX: &str = "transaction-details";

const SUMMARY_MARKER: &str = "סה\"כ";

/// First data row (0-based); everything above is export preamble.
const DATA_START_ROW: u32 = 4;

struct Columns {
    date: u32,
    description: u32,
    amount: u32,
    installments: u32,
}

const COLUMNS: Columns = Columns {
    date: 0,
    description: 2,
    amount: 5,
    installments: 10,
};

/// Import every bank debit export found in `dir`.
pub fn import_dir(dir: &Path) -> Result<Import> {
    let files = discover_files(dir, |name| name.starts_with(FILE_PREFIX))?;
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

    for row in DATA_START_ROW..=bottom {
        import.push(parse_row(range, row));
    }
}

fn parse_row(range: &Range<Data>, row: u32) -> RowOutcome {
    let first = range.get_value((row, COLUMNS.date));
    if is_empty_cell(first) {
        return RowOutcome::Skipped(SkipReason::Blank);
    }
    let first_text = cell_str(first);
    if first_text.is_empty() {
        return RowOutcome::Skipped(SkipReason::Blank);
    }
    if first_text.contains(SUMMARY_MARKER) {
        return RowOutcome::Skipped(SkipReason::SummaryRow);
    }

    let Some(date) = parse_date(first) else {
        return RowOutcome::Skipped(SkipReason::MissingDate);
    };
    let name = cell_str(range.get_value((row, COLUMNS.description)));
    if name.is_empty() {
        return RowOutcome::Skipped(SkipReason::MissingName);
    }
    let amount = parse_amount(range.get_value((row, COLUMNS.amount)));
    if amount <= 0.0 {
        return RowOutcome::Skipped(SkipReason::NonPositiveAmount);
    }
    let installment = cell_str(range.get_value((row, COLUMNS.installments)));

    RowOutcome::Imported(Transaction {
        date,
        name,
        amount,
        orig_amount: amount,
        source: Source::BankDebit,
        installment,
        category: String::new(),
        billing: String::new(),
    })
}
