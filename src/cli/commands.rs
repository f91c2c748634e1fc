use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::preview::{open_in_viewer, ChartPreview};
use crate::processors::{ImportSummary, RecordImporter};
use crate::readers::{InputSource, MeasurementReader};
use crate::store::MeasurementStore;
use crate::utils::progress::ProgressReporter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Import { file } => {
            let (summary, stored) = import_file(&file, &cli.database, cli.verbose)?;
            println!("{}", summary.summary());
            println!(
                "Store {} now holds {} records",
                cli.database.display(),
                stored
            );
        }

        Commands::Graph { output, no_open } => {
            let path = write_chart(output.as_deref())?;

            if no_open {
                println!("Chart written to {}", path.display());
            } else if let Err(e) = open_in_viewer(&path) {
                warn!(error = %e, "could not launch a viewer");
                println!("Chart written to {}", path.display());
            }
        }
    }

    Ok(())
}

/// Import one input into the store at `database`, reporting skipped rows on
/// stderr. Returns the run summary and the number of records now stored.
pub fn import_file(file: &Path, database: &Path, verbose: bool) -> Result<(ImportSummary, u64)> {
    let source = InputSource::from_path(file);
    info!(input = %source.describe(), database = %database.display(), "starting import");

    let rows = MeasurementReader::new().open(&source)?;
    let mut store = MeasurementStore::open(database)?;

    // Debug logging shares stderr with the spinner.
    let progress = ProgressReporter::new_spinner("importing", verbose);
    let importer = RecordImporter::with_progress(&progress);
    let summary = importer.import(rows, &mut store, &mut std::io::stderr())?;

    progress.finish_with_message(&format!("imported {} records", summary.inserted));
    Ok((summary, store.count()?))
}

fn write_chart(output: Option<&Path>) -> Result<PathBuf> {
    let chart = ChartPreview::new();
    match output {
        Some(path) => {
            chart.write_to(path)?;
            Ok(path.to_path_buf())
        }
        None => chart.write_temp(),
    }
}
