use super::{DecisionContext, DecisionRule};
use crate::models::{WateringDecision, RAIN_SIGNIFICANT};

/// Rain forecast for today covers the field
pub struct RainTodayRule;

impl DecisionRule for RainTodayRule {
    fn id(&self) -> &'static str {
        "rain_today"
    }

    fn name(&self) -> &'static str {
        "Rain Today"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<WateringDecision> {
        (ctx.rain_today_mm > RAIN_SIGNIFICANT).then_some(WateringDecision::RainToday)
    }
}
