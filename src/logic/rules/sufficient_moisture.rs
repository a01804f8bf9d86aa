use super::{DecisionContext, DecisionRule};
use crate::models::{WateringDecision, MOISTURE_THRESHOLD};

/// Soil already holds enough water
pub struct SufficientMoistureRule;

impl DecisionRule for SufficientMoistureRule {
    fn id(&self) -> &'static str {
        "sufficient_moisture"
    }

    fn name(&self) -> &'static str {
        "Sufficient Moisture"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<WateringDecision> {
        (ctx.soil_moisture_pct >= MOISTURE_THRESHOLD).then_some(WateringDecision::SufficientMoisture)
    }
}
