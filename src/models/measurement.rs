use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

use crate::utils::constants::FAHRENHEIT_MARKER;

/// One sensor reading, identified by its timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    /// Store-assigned row id; `None` until persisted.
    pub id: Option<i64>,
    pub timestamp: NaiveDateTime,
    pub pm2_5: BigDecimal,
    pub pm10: BigDecimal,
    pub co2: BigDecimal,
    pub hcho: BigDecimal,
    /// Normalized temperature, see [`TemperatureUnit::normalize`].
    pub temperature: BigDecimal,
    pub humidity: BigDecimal,
}

impl MeasurementRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        pm2_5: BigDecimal,
        pm10: BigDecimal,
        co2: BigDecimal,
        hcho: BigDecimal,
        temperature: BigDecimal,
        humidity: BigDecimal,
    ) -> Self {
        Self {
            id: None,
            timestamp,
            pm2_5,
            pm10,
            co2,
            hcho,
            temperature,
            humidity,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Fahrenheit,
    /// Anything other than the Fahrenheit marker, including an empty or
    /// missing TEMPUNIT column. Values are stored as recorded.
    AsRecorded,
}

impl TemperatureUnit {
    pub fn parse(unit: Option<&str>) -> Self {
        match unit {
            Some(FAHRENHEIT_MARKER) => TemperatureUnit::Fahrenheit,
            _ => TemperatureUnit::AsRecorded,
        }
    }

    /// Convert a recorded temperature into the stored scale.
    ///
    /// Fahrenheit readings use `(t - 30) / 2`, the approximation the sensor
    /// logs have always been loaded with. It is not the exact conversion.
    pub fn normalize(self, temperature: BigDecimal) -> BigDecimal {
        match self {
            TemperatureUnit::Fahrenheit => {
                (temperature - BigDecimal::from(30)) / BigDecimal::from(2)
            }
            TemperatureUnit::AsRecorded => temperature,
        }
    }
}
