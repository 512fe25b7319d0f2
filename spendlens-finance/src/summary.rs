//! Diagnostic dump: everything that was imported, month by month.
//!
//! A second view over the same pipeline as the report, meant for checking
//! what the importers actually produced rather than reading as an analysis.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::Result;
use spendlens_core::{money, MonthKey, Transaction};

use crate::report::truncate;

/// Render the full transaction dump with per-source and per-month counts.
pub fn render_summary(txns: &[Transaction]) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "Total raw transactions loaded: {}", txns.len())?;

    let mut source_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for txn in txns {
        *source_counts.entry(txn.source.label()).or_default() += 1;
    }
    let sources: Vec<String> = source_counts
        .iter()
        .map(|(label, count)| format!("{label}: {count}"))
        .collect();
    writeln!(out, "Sources: {}", sources.join(", "))?;

    let mut by_month: BTreeMap<MonthKey, Vec<&Transaction>> = BTreeMap::new();
    for txn in txns {
        by_month.entry(txn.month()).or_default().push(txn);
    }

    let months: Vec<String> = by_month.keys().map(|m| m.to_string()).collect();
    writeln!(out)?;
    writeln!(out, "Months found: {}", months.join(", "))?;
    for (month, month_txns) in &by_month {
        let total: f64 = month_txns.iter().map(|t| t.amount).sum();
        writeln!(
            out,
            "  {month}: {} transactions, total {} NIS",
            month_txns.len(),
            money(total)
        )?;
    }

    let wide = "=".repeat(100);
    let bar = "=".repeat(80);
    writeln!(out)?;
    writeln!(out, "{wide}")?;
    writeln!(out, "ALL TRANSACTIONS BY MONTH")?;
    writeln!(out, "{wide}")?;

    for (month, month_txns) in &by_month {
        let mut sorted = month_txns.clone();
        sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        let total: f64 = sorted.iter().map(|t| t.amount).sum();

        writeln!(out)?;
        writeln!(out, "{bar}")?;
        writeln!(
            out,
            "  MONTH: {month}  |  Transactions: {}  |  Total: {} NIS",
            sorted.len(),
            money(total)
        )?;
        writeln!(out, "{bar}")?;

        for txn in &sorted {
            let installment = if txn.installment.is_empty() {
                String::new()
            } else {
                format!(" [{}]", txn.installment)
            };
            let category = if txn.category.is_empty() {
                String::new()
            } else {
                format!(" ({})", txn.category)
            };
            writeln!(
                out,
                "  {}  {:>10} NIS  {:<50} [{}]{}{}",
                txn.date.format("%d/%m/%Y"),
                money(txn.amount),
                truncate(&txn.name, 50),
                txn.source,
                installment,
                category
            )?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use spendlens_core::Source;

    fn txn(day: u32, name: &str, amount: f64, source: Source) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
            name: name.to_string(),
            amount,
            orig_amount: amount,
            source,
            installment: String::new(),
            category: String::new(),
            billing: String::new(),
        }
    }

    #[test]
    fn test_counts_and_sources() {
        let txns = vec![
            txn(5, "Wolt Tel Aviv", 85.0, Source::Visa4581),
            txn(6, "שופרסל", 250.0, Source::Mastercard4045),
            txn(7, "העברה", 1200.0, Source::BankDebit),
        ];
        let out = render_summary(&txns).unwrap();
        assert!(out.contains("Total raw transactions loaded: 3"));
        assert!(out.contains("Bank-Debit: 1"));
        assert!(out.contains("Mastercard-4045: 1"));
        assert!(out.contains("Visa-4581: 1"));
        assert!(out.contains("Months found: 2025-10"));
        assert!(out.contains("2025-10: 3 transactions, total 1,535.00 NIS"));
    }

    #[test]
    fn test_dump_sorted_by_amount_desc() {
        let txns = vec![
            txn(5, "Small", 10.0, Source::Visa4581),
            txn(6, "Big", 900.0, Source::Visa4581),
        ];
        let out = render_summary(&txns).unwrap();
        let big = out.find("Big").unwrap();
        let small = out.find("Small").unwrap();
        assert!(big < small);
    }

    #[test]
    fn test_annotations_shown() {
        let mut with_installment = txn(5, "ריהוט הארץ", 400.0, Source::Visa4581);
        with_installment.installment = "תשלום 1 מתוך 3".to_string();
        let mut with_category = txn(6, "חנות", 90.0, Source::Mastercard4045);
        with_category.category = "בידור".to_string();

        let out = render_summary(&[with_installment, with_category]).unwrap();
        assert!(out.contains("[תשלום 1 מתוך 3]"));
        assert!(out.contains("(בידור)"));
    }
}
