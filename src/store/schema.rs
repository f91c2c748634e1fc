use crate::utils::constants::MEASUREMENT_TABLE;

/// Column declaration for a store table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub constraints: &'static str,
}

impl ColumnDef {
    const fn new(name: &'static str, sql_type: &'static str, constraints: &'static str) -> Self {
        Self {
            name,
            sql_type,
            constraints,
        }
    }

    fn declaration(&self) -> String {
        if self.constraints.is_empty() {
            format!("{} {}", self.name, self.sql_type)
        } else {
            format!("{} {} {}", self.name, self.sql_type, self.constraints)
        }
    }
}

/// Explicit definition of a table, handed to the store on connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub table: &'static str,
    pub key: ColumnDef,
    pub columns: &'static [ColumnDef],
}

impl TableSchema {
    pub fn create_sql(&self) -> String {
        let declarations: Vec<String> = std::iter::once(self.key.declaration())
            .chain(self.columns.iter().map(ColumnDef::declaration))
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.table,
            declarations.join(", ")
        )
    }

    /// INSERT for every non-key column, with positional parameters in
    /// declaration order.
    pub fn insert_sql(&self) -> String {
        let names: Vec<&str> = self.columns.iter().map(|c| c.name).collect();
        let params: Vec<String> = (1..=self.columns.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            names.join(", "),
            params.join(", ")
        )
    }

    /// SELECT of the key followed by every column.
    pub fn select_sql(&self) -> String {
        let names: Vec<&str> = std::iter::once(self.key.name)
            .chain(self.columns.iter().map(|c| c.name))
            .collect();
        format!("SELECT {} FROM {}", names.join(", "), self.table)
    }
}

// Decimals are kept as their canonical text. NUMERIC affinity would coerce
// them to REAL.
const MEASUREMENT_COLUMNS: [ColumnDef; 7] = [
    ColumnDef::new("date", "DATETIME", "NOT NULL UNIQUE"),
    ColumnDef::new("pm2_5", "TEXT", "NOT NULL"),
    ColumnDef::new("pm10", "TEXT", "NOT NULL"),
    ColumnDef::new("co2", "TEXT", "NOT NULL"),
    ColumnDef::new("hcho", "TEXT", "NOT NULL"),
    ColumnDef::new("temperature", "TEXT", "NOT NULL"),
    ColumnDef::new("humidity", "TEXT", "NOT NULL"),
];

pub const MEASUREMENT_SCHEMA: TableSchema = TableSchema {
    table: MEASUREMENT_TABLE,
    key: ColumnDef::new("id", "INTEGER", "PRIMARY KEY"),
    columns: &MEASUREMENT_COLUMNS,
};
