use super::{
    critical_rain_tomorrow::CriticalRainTomorrowRule, low_humidity::LowHumidityRule,
    rain_today::RainTodayRule, rain_tomorrow::RainTomorrowRule,
    sufficient_moisture::SufficientMoistureRule, DecisionContext, DecisionRule,
};
use crate::models::WateringDecision;

/// Ordered watering rules; the first rule that fires decides.
pub struct DecisionPolicy {
    rules: Vec<Box<dyn DecisionRule>>,
}

impl DecisionPolicy {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn DecisionRule>> = vec![
            Box::new(SufficientMoistureRule),
            Box::new(RainTodayRule),
            Box::new(RainTomorrowRule),
            Box::new(CriticalRainTomorrowRule),
            Box::new(LowHumidityRule),
        ];

        Self { rules }
    }

    /// First matching rule and its decision, before reconciliation
    pub fn evaluate(&self, ctx: &DecisionContext) -> Option<(&'static str, WateringDecision)> {
        self.rules
            .iter()
            .find_map(|rule| rule.evaluate(ctx).map(|decision| (rule.id(), decision)))
    }

    /// Final decision for a computed water volume.
    ///
    /// When no rule fires the water balance decides. A "no watering" outcome is
    /// replaced by a deficit warning whenever `water_amount_liters > 0`.
    pub fn decide(&self, ctx: &DecisionContext, water_amount_liters: u32) -> WateringDecision {
        let decision = match self.evaluate(ctx) {
            Some((rule_id, decision)) => {
                tracing::debug!(rule = rule_id, "Decision rule matched");
                decision
            }
            None if water_amount_liters > 0 => WateringDecision::WateringNeeded {
                liters: water_amount_liters,
            },
            None => WateringDecision::DemandCovered,
        };

        let reconciled = decision.reconcile(water_amount_liters);
        if reconciled != decision {
            tracing::info!(
                liters = water_amount_liters,
                "Water balance overrides no-watering decision"
            );
        }
        reconciled
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self::new()
    }
}
