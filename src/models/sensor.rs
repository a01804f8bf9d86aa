use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Soil and ambient reading from the field probe.
///
/// A reading without a timestamp is treated as "no data available" and stops
/// the decision before anything is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: Option<i64>,
    pub soil_moisture_pct: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

impl SensorReading {
    pub fn new(soil_moisture_pct: f64, temperature_c: f64, humidity_pct: f64) -> Self {
        Self {
            id: None,
            soil_moisture_pct,
            temperature_c,
            humidity_pct,
            timestamp: Some(Utc::now()),
        }
    }

    #[cfg(test)]
    pub fn with_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn has_data(&self) -> bool {
        self.timestamp.is_some()
    }
}

/// Water tank fill level, passed through to reports untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankLevel {
    pub id: Option<i64>,
    pub level_percent: f64,
    pub timestamp: DateTime<Utc>,
}

impl TankLevel {
    pub fn new(level_percent: f64) -> Self {
        Self {
            id: None,
            level_percent,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_reading_is_timestamped() {
        let reading = SensorReading::new(22.5, 24.0, 61.0);
        assert!(reading.has_data());
        assert_eq!(reading.soil_moisture_pct, 22.5);
    }

    #[test]
    fn reading_without_timestamp_has_no_data() {
        let reading = SensorReading::new(22.5, 24.0, 61.0).with_timestamp(None);
        assert!(!reading.has_data());
    }
}
