use super::{DecisionContext, DecisionRule};
use crate::models::{WateringDecision, LOW_HUMIDITY};

/// Dry air and no rain in sight
pub struct LowHumidityRule;

impl DecisionRule for LowHumidityRule {
    fn id(&self) -> &'static str {
        "low_humidity"
    }

    fn name(&self) -> &'static str {
        "Low Humidity"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<WateringDecision> {
        (ctx.humidity_pct < LOW_HUMIDITY).then_some(WateringDecision::LowHumidity)
    }
}
