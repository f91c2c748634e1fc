pub mod importer;

pub use importer::{ImportSummary, RecordImporter};
