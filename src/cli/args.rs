use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::DEFAULT_DATABASE_PATH;

#[derive(Parser, Debug)]
#[command(name = "airsense")]
#[command(about = "Import air quality sensor logs into a local SQLite store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        default_value = DEFAULT_DATABASE_PATH,
        help = "SQLite store file"
    )]
    pub database: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import sensor readings from a CSV file
    Import {
        #[arg(help = "Input CSV file, or '-' for standard input")]
        file: PathBuf,
    },

    /// Show a preview chart
    Graph {
        #[arg(short, long, help = "Write the chart HTML here instead of a temporary file")]
        output: Option<PathBuf>,

        #[arg(long, help = "Write the chart without launching a viewer")]
        no_open: bool,
    },
}
