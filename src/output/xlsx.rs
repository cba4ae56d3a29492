use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, Float64Array, StringArray},
    record_batch::RecordBatch,
};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

use crate::batch::FileFailure;

pub const RESULTS_SHEET: &str = "results";
pub const FAILURES_SHEET: &str = "failures";

/// Write the aggregated table as sheet `results`, header row first, no index
/// column. Nulls are left as empty cells. A `failures` sheet is added only
/// when there is something to report.
pub fn write_results_xlsx(batch: &RecordBatch, failures: &[FileFailure], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(RESULTS_SHEET)?;
        write_batch(sheet, batch, &header)?;
    }

    if !failures.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(FAILURES_SHEET)?;
        for (col, name) in ["country", "year", "file", "error"].iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *name, &header)?;
        }
        for (i, f) in failures.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, f.country.as_str())?;
            sheet.write_string(row, 1, f.year.as_str())?;
            sheet.write_string(row, 2, f.file.display().to_string())?;
            sheet.write_string(row, 3, f.error.as_str())?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {}", path.display()))?;
    Ok(())
}

fn write_batch(sheet: &mut Worksheet, batch: &RecordBatch, header: &Format) -> Result<()> {
    for (col, (field, array)) in batch
        .schema()
        .fields()
        .iter()
        .zip(batch.columns())
        .enumerate()
    {
        let col = col as u16;
        sheet.write_string_with_format(0, col, field.name().as_str(), header)?;

        if let Some(values) = array.as_any().downcast_ref::<Float64Array>() {
            for i in 0..values.len() {
                if values.is_valid(i) {
                    sheet.write_number(i as u32 + 1, col, values.value(i))?;
                }
            }
        } else if let Some(values) = array.as_any().downcast_ref::<StringArray>() {
            for i in 0..values.len() {
                if values.is_valid(i) {
                    sheet.write_string(i as u32 + 1, col, values.value(i))?;
                }
            }
        } else {
            return Err(anyhow!(
                "column `{}` has unsupported type {}",
                field.name(),
                field.data_type()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::TaggedResult;
    use crate::output::table::results_to_batch;
    use crate::survey::{FileResult, Prevalence};
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use tempfile::tempdir;

    #[test]
    fn test_written_workbook_reads_back() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("aggregated_results.xlsx");
        let results = vec![TaggedResult {
            country: "A".into(),
            year: "2020".into(),
            file: "A/2020/s.xlsx".into(),
            result: FileResult {
                prevalence: Prevalence {
                    mod_sev_ad: Some(0.4),
                    sev_ad: Some(0.15),
                    mod_sev_tot: Some(0.4),
                    sev_tot: Some(0.15),
                    ..Default::default()
                },
                ..Default::default()
            },
        }];
        let failures = vec![FileFailure {
            country: "B".into(),
            year: "2019".into(),
            file: "B/2019/s.xlsx".into(),
            error: "column `Prob_sev` is missing".into(),
        }];

        write_results_xlsx(&results_to_batch(&results)?, &failures, &path)?;

        let mut wb: Xlsx<_> = open_workbook(&path)?;
        assert_eq!(wb.sheet_names(), vec![RESULTS_SHEET, FAILURES_SHEET]);

        let range = wb.worksheet_range(RESULTS_SHEET)?;
        let rows: Vec<&[Data]> = range.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], Data::String("F_mod_sev_ad".into()));
        assert_eq!(rows[0][7], Data::String("year".into()));
        assert_eq!(rows[1][0], Data::Float(0.4));
        assert_eq!(rows[1][2], Data::Empty);
        assert_eq!(rows[1][6], Data::String("A".into()));
        assert_eq!(rows[1][7], Data::String("2020".into()));

        let failures = wb.worksheet_range(FAILURES_SHEET)?;
        assert_eq!(failures.get((1, 0)), Some(&Data::String("B".into())));
        Ok(())
    }

    #[test]
    fn test_no_failures_sheet_when_clean() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("out.xlsx");
        write_results_xlsx(&results_to_batch(&[])?, &[], &path)?;

        let mut wb: Xlsx<_> = open_workbook(&path)?;
        assert_eq!(wb.sheet_names(), vec![RESULTS_SHEET]);
        let range = wb.worksheet_range(RESULTS_SHEET)?;
        assert_eq!(range.height(), 1);
        assert_eq!(range.width(), 8);
        Ok(())
    }
}
