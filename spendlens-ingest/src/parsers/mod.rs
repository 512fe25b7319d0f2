//! Per-statement-family importers.
//!
//! All three share the same shape: discover candidate files by filename,
//! open each workbook, walk every sheet, find where the data starts (header
//! search or fixed offset), then turn rows into transactions, keeping a row
//! only when it has a date, a name, and a positive charged amount.

pub mod bank_debit;
pub mod mastercard;
pub mod visa;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::cell::cell_str;
use crate::types::Import;

/// Header-row marker for the card statements ("date" column heading).
pub(crate) const HEADER_MARKER: &str = "תאריך";

/// Candidate input files in `dir` whose name satisfies `matches`, sorted by
/// name so re-runs are deterministic.
pub(crate) fn discover_files(
    dir: &Path,
    matches: impl Fn(&str) -> bool,
) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if entry.path().is_file() && matches(&name) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Open one workbook and run `sheet_fn` over every sheet. The workbook
/// handle lives only for this call, so it is released on every exit path.
pub(crate) fn import_workbook<F>(
    path: &Path,
    import: &mut Import,
    mut sheet_fn: F,
) -> Result<()>
where
    F: FnMut(&Range<Data>, &mut Import),
{
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening {}", path.display()))?;
    import.stats.files += 1;

    let names = workbook.sheet_names().to_vec();
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("reading sheet '{}' in {}", name, path.display()))?;
        import.stats.sheets += 1;
        sheet_fn(&range, import);
    }
    Ok(())
}

/// First and last populated row of a sheet, absolute. `None` for an empty sheet.
pub(crate) fn row_bounds(range: &Range<Data>) -> Option<(u32, u32)> {
    Some((range.start()?.0, range.end()?.0))
}

/// Scan column 0 from the top for the first row containing `marker`.
pub(crate) fn find_header_row(range: &Range<Data>, marker: &str) -> Option<u32> {
    let (top, bottom) = row_bounds(range)?;
    (top..=bottom).find(|&row| cell_str(range.get_value((row, 0))).contains(marker))
}

pub(crate) fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}


#[cfg(test)]
mod tests {
    use super::testutil::{s, sheet};
    use super::*;
    use calamine::Data;
    use std::fs::File;

    #[test]
    fn test_discover_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "פירוט עסקאות 11-25.xlsx",
            "פירוט עסקאות 10-25.xlsx",
            "כרטיס מאסטרקארד 4045.xlsx",
            "notes.txt",
        ] {
            File::create(dir.path().join(name)).unwrap();
        }

        let files =
            discover_files(dir.path(), |n| n.starts_with("פירוט עסקאות")).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["פירוט עסקאות 10-25.xlsx", "פירוט עסקאות 11-25.xlsx"]
        );
    }

    #[test]
    fn test_discover_files_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        assert!(discover_files(&missing, |_| true).is_err());
    }

    #[test]
    fn test_find_header_row() {
        let range = sheet(&[
            vec![s("כרטיס ויזה")],
            vec![Data::Empty],
            vec![s("תאריך"), s("שם בית העסק")],
            vec![s("05/10/2025"), s("Wolt")],
        ]);
        assert_eq!(find_header_row(&range, HEADER_MARKER), Some(2));
    }

    #[test]
    fn test_find_header_row_absent() {
        let range = sheet(&[vec![s("no markers here")], vec![s("still nothing")]]);
        assert_eq!(find_header_row(&range, HEADER_MARKER), None);
    }
}
