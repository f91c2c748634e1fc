use crate::error::Result;
use crate::readers::{parse_row, RawMeasurementRow};
use crate::store::{InsertOutcome, MeasurementStore};
use crate::utils::progress::ProgressReporter;
use std::io::Write;
use tracing::{debug, info};

/// Outcome of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows_read: u64,
    pub inserted: u64,
    /// DATE values of rows skipped as duplicates, in input order.
    pub skipped: Vec<String>,
}

impl ImportSummary {
    pub fn skipped_count(&self) -> u64 {
        self.skipped.len() as u64
    }

    pub fn summary(&self) -> String {
        format!(
            "Import Summary:\n\
             - Rows read: {}\n\
             - Records inserted: {}\n\
             - Duplicates skipped: {}",
            self.rows_read,
            self.inserted,
            self.skipped_count()
        )
    }
}

/// Loads rows into a [`MeasurementStore`], one transaction per row.
///
/// Rows whose timestamp is already stored are skipped with a line on the
/// diagnostics writer. Any other failure stops the run; rows committed
/// before it stay in the store.
pub struct RecordImporter<'a> {
    progress: Option<&'a ProgressReporter>,
}

impl<'a> RecordImporter<'a> {
    pub fn new() -> Self {
        Self { progress: None }
    }

    pub fn with_progress(progress: &'a ProgressReporter) -> Self {
        Self {
            progress: Some(progress),
        }
    }

    pub fn import<I, W>(
        &self,
        rows: I,
        store: &mut MeasurementStore,
        diagnostics: &mut W,
    ) -> Result<ImportSummary>
    where
        I: IntoIterator<Item = Result<RawMeasurementRow>>,
        W: Write,
    {
        let mut summary = ImportSummary::default();

        for row in rows {
            let row = row?;
            summary.rows_read += 1;
            self.import_row(&row, store, diagnostics, &mut summary)?;

            if let Some(progress) = self.progress {
                progress.increment(1);
            }
        }

        info!(
            rows = summary.rows_read,
            inserted = summary.inserted,
            skipped = summary.skipped_count(),
            "import finished"
        );
        Ok(summary)
    }

    fn import_row<W: Write>(
        &self,
        row: &RawMeasurementRow,
        store: &mut MeasurementStore,
        diagnostics: &mut W,
        summary: &mut ImportSummary,
    ) -> Result<()> {
        let record = parse_row(row)?;

        match store.insert(&record)? {
            InsertOutcome::Inserted(id) => {
                debug!(line = row.line, id, date = %row.date, "record inserted");
                summary.inserted += 1;
            }
            InsertOutcome::Duplicate => {
                debug!(line = row.line, date = %row.date, "duplicate timestamp");
                self.report_skip(diagnostics, &row.date)?;
                summary.skipped.push(row.date.clone());
            }
        }

        Ok(())
    }

    fn report_skip<W: Write>(&self, diagnostics: &mut W, date: &str) -> Result<()> {
        let mut write = || {
            writeln!(
                diagnostics,
                "Could not add record with timestamp \"{}\".  Skipping.",
                date
            )
        };

        match self.progress {
            Some(progress) => progress.suspend(write)?,
            None => write()?,
        }
        Ok(())
    }
}

impl Default for RecordImporter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use crate::readers::MeasurementReader;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    const HEADER: &str =
        "DATE,TEMPERATURE,TEMPUNIT,PM2.5(ug/m3),PM10(ug/m3),CO2(ppm),HCHO(mg/m3),HUMIDITY(%)";

    fn run(input: &str, store: &mut MeasurementStore) -> (Result<ImportSummary>, String) {
        let rows = MeasurementReader::new()
            .from_reader(input.as_bytes())
            .unwrap();
        let mut diagnostics = Vec::new();
        let result = RecordImporter::new().import(rows, store, &mut diagnostics);
        (result, String::from_utf8(diagnostics).unwrap())
    }

    #[test]
    fn test_import_counts_rows() -> Result<()> {
        let input = format!(
            "{}\n2023-07-15 12:00:00,21,C,1,2,3,4,5\n2023-07-15 12:01:00,72,F,1,2,3,4,5\n",
            HEADER
        );
        let mut store = MeasurementStore::open_in_memory()?;
        let (result, diagnostics) = run(&input, &mut store);
        let summary = result?;

        assert_eq!(summary.rows_read, 2);
        assert_eq!(summary.inserted, 2);
        assert!(summary.skipped.is_empty());
        assert!(diagnostics.is_empty());

        let stored = store.fetch_all()?;
        assert_eq!(stored[1].temperature, BigDecimal::from_str("21").unwrap());
        Ok(())
    }

    #[test]
    fn test_duplicate_row_is_skipped_and_reported() -> Result<()> {
        let input = format!(
            "{}\n2023-07-15 12:00:00,21,C,1,2,3,4,5\n2023-07-15 12:00:00,22,C,9,9,9,9,9\n\
             2023-07-15 12:02:00,23,C,1,2,3,4,5\n",
            HEADER
        );
        let mut store = MeasurementStore::open_in_memory()?;
        let (result, diagnostics) = run(&input, &mut store);
        let summary = result?;

        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.skipped, vec!["2023-07-15 12:00:00".to_string()]);
        assert_eq!(
            diagnostics,
            "Could not add record with timestamp \"2023-07-15 12:00:00\".  Skipping.\n"
        );
        assert_eq!(store.count()?, 2);
        Ok(())
    }

    #[test]
    fn test_bad_decimal_stops_run() -> Result<()> {
        let input = format!(
            "{}\n2023-07-15 12:00:00,21,C,1,2,3,4,5\n2023-07-15 12:01:00,21,C,x,2,3,4,5\n\
             2023-07-15 12:02:00,21,C,1,2,3,4,5\n",
            HEADER
        );
        let mut store = MeasurementStore::open_in_memory()?;
        let (result, _) = run(&input, &mut store);

        assert!(matches!(
            result,
            Err(ImportError::InvalidDecimal { line: 3, .. })
        ));
        assert_eq!(store.count()?, 1);
        Ok(())
    }

    #[test]
    fn test_progress_tracks_rows() -> Result<()> {
        let input = format!("{}\n2023-07-15 12:00:00,21,C,1,2,3,4,5\n", HEADER);
        let rows = MeasurementReader::new().from_reader(input.as_bytes())?;
        let mut store = MeasurementStore::open_in_memory()?;
        let progress = ProgressReporter::new_spinner("importing", false);
        let mut diagnostics = Vec::new();

        RecordImporter::with_progress(&progress).import(rows, &mut store, &mut diagnostics)?;
        assert_eq!(progress.position(), 1);
        Ok(())
    }

    #[test]
    fn test_summary_text() {
        let summary = ImportSummary {
            rows_read: 3,
            inserted: 2,
            skipped: vec!["2023-07-15 12:00:00".to_string()],
        };
        let text = summary.summary();
        assert!(text.contains("Rows read: 3"));
        assert!(text.contains("Records inserted: 2"));
        assert!(text.contains("Duplicates skipped: 1"));
    }
}
