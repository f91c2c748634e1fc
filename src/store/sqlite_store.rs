use crate::error::{ImportError, Result};
use crate::models::MeasurementRecord;
use crate::store::schema::{TableSchema, MEASUREMENT_SCHEMA};
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Result of a single-row insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    /// Another record already holds this timestamp; nothing was written.
    Duplicate,
}

/// Open `path` and create the tables described by `schema` if missing.
pub fn connect(path: &Path, schema: &TableSchema) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch(&schema.create_sql())?;
    debug!(path = %path.display(), table = schema.table, "store ready");
    Ok(conn)
}

/// SQLite-backed store of measurement records, one row per timestamp.
pub struct MeasurementStore {
    conn: Connection,
    path: Option<PathBuf>,
    insert_sql: String,
    select_sql: String,
}

impl MeasurementStore {
    pub fn open(path: &Path) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(ImportError::Config("database path is empty".to_string()));
        }
        let conn = connect(path, &MEASUREMENT_SCHEMA)?;
        Ok(Self::with_connection(conn, Some(path.to_path_buf())))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(&MEASUREMENT_SCHEMA.create_sql())?;
        Ok(Self::with_connection(conn, None))
    }

    fn with_connection(conn: Connection, path: Option<PathBuf>) -> Self {
        Self {
            conn,
            path,
            insert_sql: MEASUREMENT_SCHEMA.insert_sql(),
            select_sql: MEASUREMENT_SCHEMA.select_sql(),
        }
    }

    /// File backing the store, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert one record in its own transaction.
    ///
    /// A timestamp collision rolls the transaction back and reports
    /// [`InsertOutcome::Duplicate`]. Every other failure is returned as an
    /// error, with the transaction rolled back on drop.
    pub fn insert(&mut self, record: &MeasurementRecord) -> Result<InsertOutcome> {
        let tx = self.conn.transaction()?;

        let inserted = {
            let mut stmt = tx.prepare_cached(&self.insert_sql)?;
            stmt.execute(params![
                record.timestamp,
                record.pm2_5.to_string(),
                record.pm10.to_string(),
                record.co2.to_string(),
                record.hcho.to_string(),
                record.temperature.to_string(),
                record.humidity.to_string(),
            ])
        };

        match inserted {
            Ok(_) => {
                let id = tx.last_insert_rowid();
                tx.commit()?;
                Ok(InsertOutcome::Inserted(id))
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                tx.rollback()?;
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", MEASUREMENT_SCHEMA.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Every stored record, oldest first.
    pub fn fetch_all(&self) -> Result<Vec<MeasurementRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY date", self.select_sql))?;
        let rows = stmt
            .query_map([], StoredRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(StoredRow::into_record).collect()
    }

    pub fn find_by_timestamp(&self, timestamp: NaiveDateTime) -> Result<Option<MeasurementRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("{} WHERE date = ?1", self.select_sql),
                params![timestamp],
                StoredRow::from_row,
            )
            .optional()?;

        row.map(StoredRow::into_record).transpose()
    }
}

/// A record as SQLite returns it, decimals still in text form.
struct StoredRow {
    id: i64,
    timestamp: NaiveDateTime,
    values: [(&'static str, String); 6],
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            values: [
                ("pm2_5", row.get(2)?),
                ("pm10", row.get(3)?),
                ("co2", row.get(4)?),
                ("hcho", row.get(5)?),
                ("temperature", row.get(6)?),
                ("humidity", row.get(7)?),
            ],
        })
    }

    fn into_record(self) -> Result<MeasurementRecord> {
        let [pm2_5, pm10, co2, hcho, temperature, humidity] = self.values.map(|(column, text)| {
            BigDecimal::from_str(&text).map_err(|_| ImportError::CorruptStoredValue {
                column: column.to_string(),
                value: text,
            })
        });

        Ok(MeasurementRecord::new(
            self.timestamp,
            pm2_5?,
            pm10?,
            co2?,
            hcho?,
            temperature?,
            humidity?,
        )
        .with_id(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn record(timestamp: &str, pm2_5: &str) -> MeasurementRecord {
        MeasurementRecord::new(
            NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").unwrap(),
            dec(pm2_5),
            dec("20"),
            dec("450"),
            dec("0.02"),
            dec("21"),
            dec("40"),
        )
    }

    #[test]
    fn test_insert_and_read_back() -> Result<()> {
        let mut store = MeasurementStore::open_in_memory()?;
        let outcome = store.insert(&record("2023-07-15 12:00:00", "12.340"))?;
        assert!(matches!(outcome, InsertOutcome::Inserted(_)));

        let stored = store.fetch_all()?;
        assert_eq!(stored.len(), 1);
        assert!(stored[0].id.is_some());
        assert_eq!(stored[0].pm2_5, dec("12.34"));
        assert_eq!(stored[0].pm2_5.to_string(), "12.340");
        Ok(())
    }

    #[test]
    fn test_duplicate_timestamp_is_rejected() -> Result<()> {
        let mut store = MeasurementStore::open_in_memory()?;
        store.insert(&record("2023-07-15 12:00:00", "1"))?;
        let outcome = store.insert(&record("2023-07-15 12:00:00", "2"))?;

        assert_eq!(outcome, InsertOutcome::Duplicate);
        assert_eq!(store.count()?, 1);

        // Store stays usable after the rollback.
        let outcome = store.insert(&record("2023-07-15 12:01:00", "3"))?;
        assert!(matches!(outcome, InsertOutcome::Inserted(_)));
        assert_eq!(store.count()?, 2);
        Ok(())
    }

    #[test]
    fn test_find_by_timestamp() -> Result<()> {
        let mut store = MeasurementStore::open_in_memory()?;
        let wanted = record("2023-07-15 12:00:00", "5.5");
        store.insert(&wanted)?;

        let found = store.find_by_timestamp(wanted.timestamp)?.unwrap();
        assert_eq!(found.timestamp, wanted.timestamp);
        assert_eq!(found.pm2_5, dec("5.5"));

        let other = NaiveDateTime::parse_from_str("2024-01-01 00:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert!(store.find_by_timestamp(other)?.is_none());
        Ok(())
    }

    #[test]
    fn test_schema_created_once_and_data_persists() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("data.sqlite3");

        {
            let mut store = MeasurementStore::open(&path)?;
            store.insert(&record("2023-07-15 12:00:00", "1"))?;
            assert_eq!(store.path(), Some(path.as_path()));
        }

        let store = MeasurementStore::open(&path)?;
        assert_eq!(store.count()?, 1);
        Ok(())
    }

    #[test]
    fn test_fetch_all_orders_by_timestamp() -> Result<()> {
        let mut store = MeasurementStore::open_in_memory()?;
        store.insert(&record("2023-07-15 12:05:00", "2"))?;
        store.insert(&record("2023-07-15 12:00:00", "1"))?;

        let stored = store.fetch_all()?;
        assert_eq!(stored[0].pm2_5, dec("1"));
        assert_eq!(stored[1].pm2_5, dec("2"));
        Ok(())
    }

    #[test]
    fn test_corrupt_decimal_is_reported() -> Result<()> {
        let store = MeasurementStore::open_in_memory()?;
        store.conn.execute(
            "INSERT INTO data (date, pm2_5, pm10, co2, hcho, temperature, humidity) \
             VALUES ('2023-07-15 12:00:00', 'oops', '1', '1', '1', '1', '1')",
            [],
        )?;

        match store.fetch_all() {
            Err(ImportError::CorruptStoredValue { column, value }) => {
                assert_eq!(column, "pm2_5");
                assert_eq!(value, "oops");
            }
            other => panic!("expected CorruptStoredValue, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_empty_path_is_rejected() {
        assert!(matches!(
            MeasurementStore::open(Path::new("")),
            Err(ImportError::Config(_))
        ));
    }
}
