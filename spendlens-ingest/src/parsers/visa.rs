//! Visa statement importer (files named "פירוט עסקאות ...").
//!
//! Each sheet carries a billing-period caption in A1 and the card identity
//! in A2, then a column header row found by searching for the date heading.
//! Rows below it are transactions, interleaved with total rows.

use calamine::{Data, Range};
use std::path::Path;

use anyhow::Result;
use spendlens_core::{Source, Transaction};

use crate::cell::{cell_str, is_blank, parse_amount, parse_date};
use crate::parsers::{
    contains_any, discover_files, find_header_row, import_workbook, row_bounds,
    HEADER_MARKER,
};
use crate::types::{Import, RowOutcome, SkipReason};

pub const FILE_PREFIX: &str = "פירוט עסקאות";

/// Total/subtotal rows embedded between transactions.
const SUMMARY_MARKERS: [&str; 2] = ["סה\"כ", "סכום"];

/// Sheet cells holding the billing caption and the card identity, absolute.
const BILLING_CELL: (u32, u32) = (0, 0);
const CARD_INFO_CELL: (u32, u32) = (1, 0);

/// Fixed column layout of the transaction table.
struct Columns {
    date: u32,
    name: u32,
    original: u32,
    charged: u32,
    installments: u32,
}

const COLUMNS: Columns = Columns {
    date: 0,
    name: 1,
    original: 2,
    charged: 3,
    installments: 4,
};

/// Card-number suffixes this account knows about.
const KNOWN_CARDS: [(&str, Source); 2] =
    [("4581", Source::Visa4581), ("3147", Source::Visa3147)];

/// Import every Visa statement found in `dir`.
pub fn import_dir(dir: &Path) -> Result<Import> {
    let files = discover_files(dir, |name| name.starts_with(FILE_PREFIX))?;
    let mut import = Import::default();
    for path in &files {
        import_workbook(path, &mut import, import_sheet)?;
    }
    Ok(import)
}

fn card_source(card_info: &str) -> Source {
    KNOWN_CARDS
        .iter()
        .find(|(suffix, _)| card_info.contains(suffix))
        .map(|(_, source)| *source)
        .unwrap_or(Source::VisaUnknown)
}

pub(crate) fn import_sheet(range: &Range<Data>, import: &mut Import) {
    let Some((_, bottom)) = row_bounds(range) else {
        return;
    };
    let source = card_source(&cell_str(range.get_value(CARD_INFO_CELL)));
    let billing = cell_str(range.get_value(BILLING_CELL));

    let Some(header) = find_header_row(range, HEADER_MARKER) else {
        import.stats.sheets_without_header += 1;
        return;
    };

    for row in header + 1..=bottom {
        import.push(parse_row(range, row, source, &billing));
    }
}

fn parse_row(range: &Range<Data>, row: u32, source: Source, billing: &str) -> RowOutcome {
    let first = range.get_value((row, COLUMNS.date));
    if is_blank(first) {
        return RowOutcome::Skipped(SkipReason::Blank);
    }
    if contains_any(&cell_str(first), &SUMMARY_MARKERS) {
        return RowOutcome::Skipped(SkipReason::SummaryRow);
    }

    let Some(date) = parse_date(first) else {
        return RowOutcome::Skipped(SkipReason::MissingDate);
    };
    let name = cell_str(range.get_value((row, COLUMNS.name)));
    if name.is_empty() {
        return RowOutcome::Skipped(SkipReason::MissingName);
    }
    let orig_amount = parse_amount(range.get_value((row, COLUMNS.original)));
    let amount = parse_amount(range.get_value((row, COLUMNS.charged)));
    if amount <= 0.0 {
        return RowOutcome::Skipped(SkipReason::NonPositiveAmount);
    }
    let installment = cell_str(range.get_value((row, COLUMNS.installments)));

    RowOutcome::Imported(Transaction {
        date,
        name,
        amount,
        orig_amount,
        source,
        installment,
        category: String::new(),
        billing: billing.to_string(),
    })
}
