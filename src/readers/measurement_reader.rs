use crate::error::{ImportError, Result};
use crate::models::{MeasurementRecord, TemperatureUnit};
use crate::utils::constants::{
    COL_CO2, COL_HCHO, COL_HUMIDITY, COL_PM10, COL_PM2_5, COL_TEMPERATURE, DATE_FORMAT,
    DEFAULT_BUFFER_SIZE, STDIN_MARKER,
};
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use encoding_rs::{UTF_8, WINDOWS_1252};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Where the importer reads rows from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` selects standard input, anything else is a file path.
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == STDIN_MARKER {
            InputSource::Stdin
        } else {
            InputSource::File(path.to_path_buf())
        }
    }

    pub fn describe(&self) -> String {
        match self {
            InputSource::Stdin => "<stdin>".to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }
}

/// One CSV row with its columns still as text.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMeasurementRow {
    /// 1-based line of the row in the input.
    #[serde(skip)]
    pub line: u64,

    #[serde(rename = "DATE")]
    pub date: String,

    #[serde(rename = "TEMPERATURE")]
    pub temperature: String,

    #[serde(rename = "TEMPUNIT", default)]
    pub temp_unit: Option<String>,

    #[serde(rename = "PM2.5(ug/m3)")]
    pub pm2_5: String,

    #[serde(rename = "PM10(ug/m3)")]
    pub pm10: String,

    #[serde(rename = "CO2(ppm)")]
    pub co2: String,

    #[serde(rename = "HCHO(mg/m3)")]
    pub hcho: String,

    #[serde(rename = "HUMIDITY(%)")]
    pub humidity: String,
}

pub struct MeasurementReader;

impl MeasurementReader {
    pub fn new() -> Self {
        Self
    }

    /// Open a file or standard input for row iteration.
    pub fn open(&self, source: &InputSource) -> Result<MeasurementRows> {
        match source {
            InputSource::Stdin => self.from_reader(std::io::stdin().lock()),
            InputSource::File(path) => {
                let file = File::open(path)?;
                self.from_reader(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))
            }
        }
    }

    /// Read the whole input, decode it and position after the header row.
    pub fn from_reader<R: Read>(&self, mut reader: R) -> Result<MeasurementRows> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = decode_input(&bytes);

        // Rows longer than the header still import; extra cells are ignored.
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(Cursor::new(text.into_bytes()));
        let headers = csv_reader.headers()?.clone();
        debug!(columns = headers.len(), "read input header");

        Ok(MeasurementRows {
            reader: csv_reader,
            headers,
            record: StringRecord::new(),
        })
    }
}

impl Default for MeasurementReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the data rows of one input.
pub struct MeasurementRows {
    reader: csv::Reader<Cursor<Vec<u8>>>,
    headers: StringRecord,
    record: StringRecord,
}

impl Iterator for MeasurementRows {
    type Item = Result<RawMeasurementRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.record.position().map_or(0, |p| p.line());
                let row = self
                    .record
                    .deserialize::<RawMeasurementRow>(Some(&self.headers))
                    .map(|mut row| {
                        row.line = line;
                        row
                    })
                    .map_err(ImportError::from);
                Some(row)
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Decode raw input bytes. BOMs are honoured; bytes that are not valid
/// UTF-8 are read as Windows-1252.
pub fn decode_input(bytes: &[u8]) -> String {
    let (text, encoding, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        debug!(encoding = encoding.name(), "decoded input");
        return text.into_owned();
    }

    warn!("input is not valid UTF-8, decoding as windows-1252");
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Turn a raw row into a record, normalizing the temperature.
pub fn parse_row(row: &RawMeasurementRow) -> Result<MeasurementRecord> {
    let timestamp = parse_timestamp(row.line, &row.date)?;

    let unit = TemperatureUnit::parse(row.temp_unit.as_deref());
    let temperature = unit.normalize(parse_decimal(row.line, COL_TEMPERATURE, &row.temperature)?);

    Ok(MeasurementRecord::new(
        timestamp,
        parse_decimal(row.line, COL_PM2_5, &row.pm2_5)?,
        parse_decimal(row.line, COL_PM10, &row.pm10)?,
        parse_decimal(row.line, COL_CO2, &row.co2)?,
        parse_decimal(row.line, COL_HCHO, &row.hcho)?,
        temperature,
        parse_decimal(row.line, COL_HUMIDITY, &row.humidity)?,
    ))
}

/// Parse a DATE cell. Only the `YYYY-MM-DD HH:MM:SS` form is accepted, with
/// no whitespace around the value or inside the date and time parts.
pub fn parse_timestamp(line: u64, raw: &str) -> Result<NaiveDateTime> {
    let invalid = || ImportError::InvalidTimestamp {
        line,
        value: raw.to_string(),
    };

    // chrono skips whitespace before numeric fields.
    if raw.trim() != raw || raw.split_whitespace().count() != 2 {
        return Err(invalid());
    }
    NaiveDateTime::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}

/// Parse a measurement cell as an exact decimal. Surrounding whitespace is
/// ignored.
pub fn parse_decimal(line: u64, field: &'static str, raw: &str) -> Result<BigDecimal> {
    BigDecimal::from_str(raw.trim()).map_err(|_| ImportError::InvalidDecimal {
        line,
        field,
        value: raw.to_string(),
    })
}
