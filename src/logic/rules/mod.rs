pub mod critical_rain_tomorrow;
pub mod engine;
pub mod low_humidity;
pub mod rain_today;
pub mod rain_tomorrow;
pub mod sufficient_moisture;

pub use engine::DecisionPolicy;

use crate::models::WateringDecision;

/// Inputs every decision rule looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionContext {
    pub soil_moisture_pct: f64,
    pub humidity_pct: f64,
    pub rain_today_mm: f64,
    pub rain_tomorrow_mm: f64,
}

/// Trait for watering decision rules
pub trait DecisionRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Return a decision if this rule applies
    fn evaluate(&self, ctx: &DecisionContext) -> Option<WateringDecision>;
}
