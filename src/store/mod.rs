pub mod schema;
pub mod sqlite_store;

pub use schema::{ColumnDef, TableSchema, MEASUREMENT_SCHEMA};
pub use sqlite_store::{connect, InsertOutcome, MeasurementStore};
