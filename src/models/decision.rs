use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Soil moisture (%) at or above which the field needs no water
pub const MOISTURE_THRESHOLD: f64 = 30.0;
/// Soil moisture (%) below which the field is critically dry
pub const CRITICAL_MOISTURE: f64 = 10.0;
/// Daily rain (mm) that counts as a real rain event
pub const RAIN_SIGNIFICANT: f64 = 0.3;
/// Relative humidity (%) below which air is considered dry
pub const LOW_HUMIDITY: f64 = 30.0;
/// Relative humidity (%) above which air is considered humid
pub const HIGH_HUMIDITY: f64 = 80.0;

/// Categorical outcome of the decision policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WateringDecision {
    SufficientMoisture,
    RainToday,
    RainTomorrow,
    MinimalWatering,
    LowHumidity,
    /// No rule fired and the water balance shows no deficit
    DemandCovered,
    /// No rule fired and the water balance shows a deficit
    WateringNeeded { liters: u32 },
    /// A "no watering" outcome overridden by a positive water balance
    DeficitWarning { liters: u32 },
}

impl WateringDecision {
    pub fn text(&self) -> String {
        match self {
            WateringDecision::SufficientMoisture => {
                "No watering needed; sufficient moisture.".to_string()
            }
            WateringDecision::RainToday => "No watering needed; rain expected today.".to_string(),
            WateringDecision::RainTomorrow => {
                "No watering needed; rain expected tomorrow, not critical.".to_string()
            }
            WateringDecision::MinimalWatering => {
                "Minimal watering recommended; critical moisture but rain tomorrow.".to_string()
            }
            WateringDecision::LowHumidity => {
                "Watering needed; low humidity, no rain expected.".to_string()
            }
            WateringDecision::DemandCovered => {
                "No watering needed; crop water demand covered.".to_string()
            }
            WateringDecision::WateringNeeded { liters } => {
                format!("Watering needed; {} liters to cover crop demand.", liters)
            }
            WateringDecision::DeficitWarning { liters } => {
                format!("Warning: water deficit detected, {} liters needed.", liters)
            }
        }
    }

    /// Whether this outcome tells the grower not to water
    pub fn skips_watering(&self) -> bool {
        matches!(
            self,
            WateringDecision::SufficientMoisture
                | WateringDecision::RainToday
                | WateringDecision::RainTomorrow
                | WateringDecision::DemandCovered
        )
    }

    /// The computed volume always wins over a "no watering" short-circuit.
    pub fn reconcile(self, water_amount_liters: u32) -> Self {
        if self.skips_watering() && water_amount_liters > 0 {
            WateringDecision::DeficitWarning {
                liters: water_amount_liters,
            }
        } else {
            self
        }
    }
}

impl std::fmt::Display for WateringDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldCondition {
    Good,
    Fair,
    Poor,
}

impl FieldCondition {
    pub fn classify(soil_moisture_pct: f64) -> Self {
        if soil_moisture_pct < CRITICAL_MOISTURE {
            FieldCondition::Poor
        } else if soil_moisture_pct < MOISTURE_THRESHOLD {
            FieldCondition::Fair
        } else {
            FieldCondition::Good
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCondition::Good => "Good",
            FieldCondition::Fair => "Fair - moisture below threshold",
            FieldCondition::Poor => "Poor - critically low moisture",
        }
    }
}

impl std::fmt::Display for FieldCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the append-only decision log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: Option<i64>,
    pub decision_text: String,
    pub water_amount_liters: u32,
    pub timestamp: DateTime<Utc>,
}

impl DecisionRecord {
    #[cfg(test)]
    pub fn new(decision_text: impl Into<String>, water_amount_liters: u32) -> Self {
        Self {
            id: None,
            decision_text: decision_text.into(),
            water_amount_liters,
            timestamp: Utc::now(),
        }
    }
}

/// Full result of one decision call
#[derive(Debug, Clone, Serialize)]
pub struct DecisionReport {
    pub crop: String,
    pub crop_display: String,
    pub sow_date: NaiveDate,
    pub days_elapsed: u32,
    pub stage: String,
    pub kc: f64,
    pub et0_mm_per_day: f64,
    pub weather_source: String,
    pub soil_moisture: f64,
    pub humidity: f64,
    pub predicted_rain_today_mm: f64,
    pub predicted_rain_tomorrow_mm: f64,
    pub decision: WateringDecision,
    pub watering_decision: String,
    pub water_amount_liters: u32,
    pub tank_level_percent: Option<f64>,
    pub field_condition: FieldCondition,
    pub temperature_warning: Option<String>,
    pub decided_at: DateTime<Utc>,
}

impl DecisionReport {
    pub fn to_record(&self) -> DecisionRecord {
        DecisionRecord {
            id: None,
            decision_text: self.watering_decision.clone(),
            water_amount_liters: self.water_amount_liters,
            timestamp: self.decided_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_field_condition() {
        assert_eq!(FieldCondition::classify(5.0), FieldCondition::Poor);
        assert_eq!(FieldCondition::classify(9.99), FieldCondition::Poor);
        assert_eq!(FieldCondition::classify(10.0), FieldCondition::Fair);
        assert_eq!(FieldCondition::classify(29.9), FieldCondition::Fair);
        assert_eq!(FieldCondition::classify(30.0), FieldCondition::Good);
        assert_eq!(FieldCondition::classify(95.0), FieldCondition::Good);
    }

    #[test]
    fn field_condition_labels() {
        assert_eq!(FieldCondition::Good.as_str(), "Good");
        assert!(FieldCondition::Fair.as_str().starts_with("Fair"));
        assert!(FieldCondition::Poor.as_str().contains("critically low"));
    }

    #[test]
    fn reconcile_overrides_no_watering_with_deficit() {
        for decision in [
            WateringDecision::SufficientMoisture,
            WateringDecision::RainToday,
            WateringDecision::RainTomorrow,
            WateringDecision::DemandCovered,
        ] {
            let reconciled = decision.reconcile(12);
            assert_eq!(reconciled, WateringDecision::DeficitWarning { liters: 12 });
            assert!(reconciled.text().contains("12 liters"));
        }
    }

    #[test]
    fn reconcile_keeps_text_without_deficit() {
        assert_eq!(
            WateringDecision::SufficientMoisture.reconcile(0),
            WateringDecision::SufficientMoisture
        );
    }

    #[test]
    fn reconcile_leaves_watering_outcomes_alone() {
        assert_eq!(
            WateringDecision::MinimalWatering.reconcile(40),
            WateringDecision::MinimalWatering
        );
        assert_eq!(
            WateringDecision::LowHumidity.reconcile(40),
            WateringDecision::LowHumidity
        );
    }

    #[test]
    fn decision_texts() {
        assert_eq!(
            WateringDecision::SufficientMoisture.text(),
            "No watering needed; sufficient moisture."
        );
        assert_eq!(
            WateringDecision::WateringNeeded { liters: 7 }.text(),
            "Watering needed; 7 liters to cover crop demand."
        );
        assert!(WateringDecision::MinimalWatering
            .text()
            .starts_with("Minimal watering recommended"));
    }
}
