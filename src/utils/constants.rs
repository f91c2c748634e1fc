/// Store location
pub const DEFAULT_DATABASE_PATH: &str = "data.sqlite3";
pub const MEASUREMENT_TABLE: &str = "data";

/// Input column headers
pub const COL_TEMPERATURE: &str = "TEMPERATURE";
pub const COL_PM2_5: &str = "PM2.5(ug/m3)";
pub const COL_PM10: &str = "PM10(ug/m3)";
pub const COL_CO2: &str = "CO2(ppm)";
pub const COL_HCHO: &str = "HCHO(mg/m3)";
pub const COL_HUMIDITY: &str = "HUMIDITY(%)";

/// Timestamp pattern accepted in the DATE column
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Unit marker that triggers temperature normalization
pub const FAHRENHEIT_MARKER: &str = "F";

/// Argument meaning "read from standard input"
pub const STDIN_MARKER: &str = "-";

/// Placeholder series drawn by the graph command
pub const PREVIEW_SERIES: [f64; 5] = [3.0, 1.0, 4.0, 1.0, 5.0];
pub const PREVIEW_WIDTH: u32 = 640;
pub const PREVIEW_HEIGHT: u32 = 480;

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
