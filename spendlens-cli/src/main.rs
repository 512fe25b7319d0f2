use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use spendlens_finance::{render_report, render_summary};
use spendlens_ingest::parsers::{bank_debit, mastercard, visa};
use spendlens_ingest::{Import, ImportStats};

#[derive(Parser, Debug)]
#[command(
    name = "spendlens",
    version,
    about = "Personal spending analysis over bank and card statement exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full monthly breakdown with savings estimates, written to a text file
    Report {
        /// Directory holding the statement workbooks
        #[arg(long, default_value = "Data")]
        data_dir: PathBuf,

        /// Where to write the rendered report
        #[arg(long, default_value = "spending_analysis.txt")]
        out: PathBuf,
    },

    /// Diagnostic dump of everything the importers produced
    Dump {
        /// Directory holding the statement workbooks
        #[arg(long, default_value = "Data")]
        data_dir: PathBuf,

        /// Print the transactions as JSON instead of the text dump
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Report { data_dir, out } => {
            let import = load_statements(&data_dir)?;
            let report = render_report(&import.transactions)?;
            fs::write(&out, &report)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("{report}");
            eprintln!("\nReport written to {}", out.display());
            print_stats(&import.stats);
        }

        Command::Dump { data_dir, json } => {
            let import = load_statements(&data_dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&import.transactions)?);
            } else {
                println!("{}", render_summary(&import.transactions)?);
            }
            print_stats(&import.stats);
        }
    }

    Ok(())
}

/// Run the three importers over one directory and concatenate their output.
fn load_statements(dir: &Path) -> Result<Import> {
    if !dir.is_dir() {
        bail!(
            "data directory not found: {} (pass --data-dir <path>)",
            dir.display()
        );
    }

    let mut all = visa::import_dir(dir)?;
    all.extend(mastercard::import_dir(dir)?);
    all.extend(bank_debit::import_dir(dir)?);
    Ok(all)
}

fn print_stats(stats: &ImportStats) {
    eprintln!(
        "\nImported {} transactions from {} files ({} sheets)",
        stats.imported, stats.files, stats.sheets
    );
    if stats.total_skipped() > 0 {
        eprintln!(
            "Skipped {} rows: {} blank, {} totals, {} without date, {} without name, {} non-positive",
            stats.total_skipped(),
            stats.blank_rows,
            stats.summary_rows,
            stats.missing_date,
            stats.missing_name,
            stats.non_positive_amount
        );
    }
    if stats.sheets_without_header > 0 {
        eprintln!(
            "Skipped {} sheets with no recognizable header row",
            stats.sheets_without_header
        );
    }
}
