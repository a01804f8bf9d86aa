use super::{DecisionContext, DecisionRule};
use crate::models::{WateringDecision, CRITICAL_MOISTURE, RAIN_SIGNIFICANT};

/// Rain tomorrow but the soil is too dry to wait: water a little now
pub struct CriticalRainTomorrowRule;

impl DecisionRule for CriticalRainTomorrowRule {
    fn id(&self) -> &'static str {
        "critical_rain_tomorrow"
    }

    fn name(&self) -> &'static str {
        "Critical Moisture, Rain Tomorrow"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<WateringDecision> {
        (ctx.soil_moisture_pct < CRITICAL_MOISTURE && ctx.rain_tomorrow_mm > RAIN_SIGNIFICANT)
            .then_some(WateringDecision::MinimalWatering)
    }
}
