use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid timestamp on line {line}: '{value}' (expected YYYY-MM-DD HH:MM:SS)")]
    InvalidTimestamp { line: u64, value: String },

    #[error("Invalid decimal in column {field} on line {line}: '{value}'")]
    InvalidDecimal {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("Corrupt stored value in column {column}: '{value}'")]
    CorruptStoredValue { column: String, value: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

