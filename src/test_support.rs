//! Fixture helpers shared by unit tests.

use anyhow::Result;
use rust_xlsxwriter::Workbook;
use std::path::Path;

pub enum Cell<'a> {
    Num(f64),
    Text(&'a str),
    Blank,
}

/// Write a single-sheet workbook with a header row.
pub fn write_sheet(path: &Path, headers: &[&str], rows: &[Vec<Cell<'_>>]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, h) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *h)?;
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Num(v) => {
                    sheet.write_number(r, col as u16, *v)?;
                }
                Cell::Text(s) => {
                    sheet.write_string(r, col as u16, *s)?;
                }
                Cell::Blank => {}
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

/// Numeric survey rows `[wt, N_adults, N_child, Prob_Mod_Sev, Prob_sev]` as cells.
pub fn survey_rows(rows: &[[f64; 5]]) -> Vec<Vec<Cell<'static>>> {
    rows.iter()
        .map(|r| r.iter().map(|v| Cell::Num(*v)).collect())
        .collect()
}

/// `root/<country>/<year>/<file>` with the given numeric rows.
pub fn write_survey(
    root: &Path,
    country: &str,
    year: &str,
    file: &str,
    rows: &[[f64; 5]],
) -> Result<()> {
    let dir = root.join(country).join(year);
    std::fs::create_dir_all(&dir)?;
    write_sheet(
        &dir.join(file),
        &crate::survey::REQUIRED_COLUMNS,
        &survey_rows(rows),
    )
}
