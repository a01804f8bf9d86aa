use super::crop::DEFAULT_CROP;
use crate::error::{Result, WaterwiseError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AREA_M2: f64 = 10.0;
pub const DEFAULT_SOIL_DEPTH_M: f64 = 0.2;

/// The active field: what is planted, when, and how large the root zone is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub id: Option<i64>,
    /// Crop table key. Unknown keys are kept as entered and resolved at decision time.
    pub crop: String,
    pub sow_date: NaiveDate,
    pub area_m2: f64,
    pub soil_depth_m: f64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FieldConfig {
    pub fn new(crop: impl Into<String>, sow_date: NaiveDate, area_m2: f64, soil_depth_m: f64) -> Self {
        Self {
            id: None,
            crop: crop.into(),
            sow_date,
            area_m2,
            soil_depth_m,
            updated_at: None,
        }
    }

    /// Default field sown on `today`
    pub fn default_on(today: NaiveDate) -> Self {
        Self::new(DEFAULT_CROP, today, DEFAULT_AREA_M2, DEFAULT_SOIL_DEPTH_M)
    }

    /// Reject geometry the water balance cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.crop.trim().is_empty() {
            return Err(WaterwiseError::InvalidData("Crop must not be empty".into()));
        }
        if !self.area_m2.is_finite() || self.area_m2 <= 0.0 {
            return Err(WaterwiseError::InvalidData(format!(
                "Field area must be a positive number of m², got {}",
                self.area_m2
            )));
        }
        if !self.soil_depth_m.is_finite() || self.soil_depth_m <= 0.0 {
            return Err(WaterwiseError::InvalidData(format!(
                "Soil depth must be a positive number of metres, got {}",
                self.soil_depth_m
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sow() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn default_field_matches_documented_values() {
        let field = FieldConfig::default_on(sow());
        assert_eq!(field.crop, "banana");
        assert_eq!(field.sow_date, sow());
        assert_eq!(field.area_m2, 10.0);
        assert_eq!(field.soil_depth_m, 0.2);
        assert!(field.id.is_none());
        assert!(field.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_geometry() {
        assert!(FieldConfig::new("maize", sow(), 0.0, 0.2).validate().is_err());
        assert!(FieldConfig::new("maize", sow(), -5.0, 0.2).validate().is_err());
        assert!(FieldConfig::new("maize", sow(), 10.0, 0.0).validate().is_err());
        assert!(FieldConfig::new("maize", sow(), f64::NAN, 0.2).validate().is_err());
        assert!(FieldConfig::new("maize", sow(), 10.0, f64::INFINITY).validate().is_err());
        assert!(FieldConfig::new(" ", sow(), 10.0, 0.2).validate().is_err());
    }

    #[test]
    fn validate_accepts_unknown_crop_key() {
        // Unknown crops fall back at decision time, not here
        assert!(FieldConfig::new("unknown_xyz", sow(), 25.0, 0.3).validate().is_ok());
    }
}
