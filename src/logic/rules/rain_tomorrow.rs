use super::{DecisionContext, DecisionRule};
use crate::models::{WateringDecision, CRITICAL_MOISTURE, RAIN_SIGNIFICANT};

/// Rain tomorrow and the soil can wait for it
pub struct RainTomorrowRule;

impl DecisionRule for RainTomorrowRule {
    fn id(&self) -> &'static str {
        "rain_tomorrow"
    }

    fn name(&self) -> &'static str {
        "Rain Tomorrow"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<WateringDecision> {
        (ctx.rain_tomorrow_mm > RAIN_SIGNIFICANT && ctx.soil_moisture_pct >= CRITICAL_MOISTURE)
            .then_some(WateringDecision::RainTomorrow)
    }
}
