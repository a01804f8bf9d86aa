use super::advisories::temperature_spike_from;
use super::crop_model::resolve_stage;
use super::rules::{DecisionContext, DecisionPolicy};
use super::water_balance::compute_water_liters;
use super::weather::WeatherGateway;
use crate::config::{FieldDefaults, LocationConfig};
use crate::datasources::WeatherProvider;
use crate::db::Database;
use crate::error::{Result, WaterwiseError};
use crate::models::{
    DecisionReport, FieldCondition, FieldConfig, SensorReading, WeatherOutlook,
};
use chrono::{NaiveDate, Utc};

/// Produces one irrigation decision per call from stored readings, the field
/// configuration and the weather outlook, and logs it.
pub struct IrrigationAdvisor<P> {
    db: Database,
    weather: WeatherGateway<P>,
    policy: DecisionPolicy,
    field_defaults: FieldDefaults,
}

impl<P: WeatherProvider> IrrigationAdvisor<P> {
    pub fn new(db: Database, weather: WeatherGateway<P>, field_defaults: FieldDefaults) -> Self {
        Self {
            db,
            weather,
            policy: DecisionPolicy::new(),
            field_defaults,
        }
    }

    /// Saved field configuration, or the configured defaults sown on `today`
    pub fn current_field(&self, today: NaiveDate) -> Result<FieldConfig> {
        match self.db.get_field_config()? {
            Some(field) => Ok(field),
            None => {
                tracing::debug!("No field configured, using defaults");
                Ok(self.field_defaults.to_field_config(today))
            }
        }
    }

    /// Decide for the latest sensor reading and append the result to the log.
    ///
    /// Fails with [`WaterwiseError::NoSensorData`] before touching the weather
    /// service or the log when there is no timestamped reading.
    pub async fn decide(&self, location: LocationConfig, today: NaiveDate) -> Result<DecisionReport> {
        let reading = self
            .db
            .latest_sensor_reading()?
            .filter(SensorReading::has_data)
            .ok_or(WaterwiseError::NoSensorData)?;

        let field = self.current_field(today)?;
        let outlook = self.weather.outlook(location).await;
        let tank_level = self.db.latest_tank_level()?.map(|t| t.level_percent);

        let report = self.evaluate(&reading, &field, &outlook, tank_level, today)?;

        let record_id = self.db.append_decision(&report.to_record())?;
        tracing::info!(
            record_id,
            liters = report.water_amount_liters,
            decision = %report.watering_decision,
            "Stored watering decision"
        );

        Ok(report)
    }

    /// Pure composition of crop stage, water balance and decision rules.
    pub fn evaluate(
        &self,
        reading: &SensorReading,
        field: &FieldConfig,
        outlook: &WeatherOutlook,
        tank_level_percent: Option<f64>,
        today: NaiveDate,
    ) -> Result<DecisionReport> {
        if !reading.has_data() {
            return Err(WaterwiseError::NoSensorData);
        }

        let stage = resolve_stage(&field.crop, field.sow_date, today);
        let rain_today = outlook.forecast.rain_today();
        let rain_tomorrow = outlook.forecast.rain_tomorrow();

        let water_amount_liters = compute_water_liters(
            reading.soil_moisture_pct,
            field.area_m2,
            field.soil_depth_m,
            rain_tomorrow,
            outlook.et0_mm,
            stage.kc,
            reading.humidity_pct,
        );

        let ctx = DecisionContext {
            soil_moisture_pct: reading.soil_moisture_pct,
            humidity_pct: reading.humidity_pct,
            rain_today_mm: rain_today,
            rain_tomorrow_mm: rain_tomorrow,
        };
        let decision = self.policy.decide(&ctx, water_amount_liters);

        Ok(DecisionReport {
            crop: field.crop.clone(),
            crop_display: stage.crop_display.to_string(),
            sow_date: field.sow_date,
            days_elapsed: stage.days_elapsed,
            stage: stage.stage.to_string(),
            kc: stage.kc,
            et0_mm_per_day: outlook.et0_mm,
            weather_source: outlook.source.to_string(),
            soil_moisture: reading.soil_moisture_pct,
            humidity: reading.humidity_pct,
            predicted_rain_today_mm: rain_today,
            predicted_rain_tomorrow_mm: rain_tomorrow,
            decision,
            watering_decision: decision.text(),
            water_amount_liters,
            tank_level_percent,
            field_condition: FieldCondition::classify(reading.soil_moisture_pct),
            temperature_warning: temperature_spike_from(&outlook.forecast),
            decided_at: Utc::now(),
        })
    }

    #[cfg(test)]
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::weather::testing::{FailingWeather, FixedWeather};
    use crate::models::{ForecastData, TankLevel, WateringDecision, WeatherSource};
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn advisor_with(et0: f64, forecast: ForecastData) -> IrrigationAdvisor<FixedWeather> {
        let db = Database::open_in_memory().unwrap();
        let weather = WeatherGateway::new(
            Some(FixedWeather { et0, forecast }),
            Duration::from_secs(5),
            3.0,
        );
        IrrigationAdvisor::new(db, weather, FieldDefaults::default())
    }

    fn dry_forecast() -> ForecastData {
        ForecastData {
            precipitation_mm: vec![0.0, 0.0],
            max_temp_c: vec![24.0, 25.0],
            ..Default::default()
        }
    }

    fn outlook(et0: f64, today_rain: f64, tomorrow_rain: f64) -> WeatherOutlook {
        WeatherOutlook {
            et0_mm: et0,
            forecast: ForecastData {
                precipitation_mm: vec![today_rain, tomorrow_rain],
                ..Default::default()
            },
            source: WeatherSource::OpenMeteo,
        }
    }

    /// Banana past day 330 is in late season with kc = 1.0
    fn late_banana() -> FieldConfig {
        FieldConfig::new("banana", today() - ChronoDuration::days(340), 10.0, 0.2)
    }

    #[tokio::test]
    async fn scenario_a_sufficient_moisture_is_logged() {
        let advisor = advisor_with(3.0, dry_forecast());
        let db = advisor.database();
        db.insert_sensor_reading(&SensorReading::new(35.0, 26.0, 50.0))
            .unwrap();

        let report = advisor.decide(LocationConfig::default(), today()).await.unwrap();
        assert_eq!(report.decision, WateringDecision::SufficientMoisture);
        assert_eq!(report.watering_decision, "No watering needed; sufficient moisture.");
        assert_eq!(report.water_amount_liters, 0);
        assert_eq!(report.field_condition, FieldCondition::Good);
        assert_eq!(report.crop, "banana");
        assert_eq!(report.stage, "Initial");

        let records = db.recent_decisions(5).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].decision_text, report.watering_decision);
        assert_eq!(records[0].water_amount_liters, 0);
    }

    #[test]
    fn scenario_b_low_humidity() {
        let advisor = advisor_with(4.0, ForecastData::empty());
        let reading = SensorReading::new(20.0, 30.0, 20.0);
        let report = advisor
            .evaluate(&reading, &late_banana(), &outlook(4.0, 0.0, 0.0), None, today())
            .unwrap();

        assert_eq!(report.kc, 1.0);
        assert_eq!(report.stage, "Late-season");
        assert_eq!(report.water_amount_liters, 0);
        assert_eq!(report.decision, WateringDecision::LowHumidity);
        assert_eq!(report.field_condition, FieldCondition::Fair);
    }

    #[test]
    fn scenario_c_critical_moisture_rain_tomorrow() {
        let advisor = advisor_with(3.0, ForecastData::empty());
        let reading = SensorReading::new(5.0, 30.0, 50.0);
        let report = advisor
            .evaluate(&reading, &late_banana(), &outlook(3.0, 0.0, 0.5), None, today())
            .unwrap();

        assert_eq!(report.decision, WateringDecision::MinimalWatering);
        assert_eq!(report.field_condition, FieldCondition::Poor);
        assert_eq!(report.predicted_rain_tomorrow_mm, 0.5);
    }

    #[tokio::test]
    async fn scenario_d_no_sensor_data_writes_nothing() {
        let advisor = advisor_with(3.0, dry_forecast());
        let err = advisor
            .decide(LocationConfig::default(), today())
            .await
            .unwrap_err();
        assert!(matches!(err, WaterwiseError::NoSensorData));

        advisor
            .database()
            .insert_sensor_reading(&SensorReading::new(20.0, 25.0, 50.0).with_timestamp(None))
            .unwrap();
        let err = advisor
            .decide(LocationConfig::default(), today())
            .await
            .unwrap_err();
        assert!(matches!(err, WaterwiseError::NoSensorData));
        assert_eq!(advisor.database().count_decisions().unwrap(), 0);
    }

    #[test]
    fn scenario_e_unknown_crop_uses_default_table() {
        let advisor = advisor_with(3.0, ForecastData::empty());
        let reading = SensorReading::new(20.0, 30.0, 50.0);
        let mut field = late_banana();
        field.crop = "unknown_xyz".to_string();

        let report = advisor
            .evaluate(&reading, &field, &outlook(3.0, 0.0, 0.0), None, today())
            .unwrap();
        assert_eq!(report.crop, "unknown_xyz");
        assert_eq!(report.crop_display, "Banana");
        assert_eq!(report.stage, "Late-season");
        assert_eq!(report.kc, 1.0);
    }

    #[test]
    fn deficit_overrides_sufficient_moisture() {
        let advisor = advisor_with(10.0, ForecastData::empty());
        let reading = SensorReading::new(35.0, 30.0, 50.0);
        // etc = 10; stored = 70mm / 10m² = 7; deficit 3mm over 10m²
        let report = advisor
            .evaluate(&reading, &late_banana(), &outlook(10.0, 0.0, 0.0), None, today())
            .unwrap();
        assert_eq!(report.water_amount_liters, 30);
        assert_eq!(report.decision, WateringDecision::DeficitWarning { liters: 30 });
        assert!(report.watering_decision.contains("30 liters"));
    }

    #[test]
    fn evaluate_rejects_reading_without_timestamp() {
        let advisor = advisor_with(3.0, ForecastData::empty());
        let reading = SensorReading::new(20.0, 30.0, 50.0).with_timestamp(None);
        let result = advisor.evaluate(&reading, &late_banana(), &outlook(3.0, 0.0, 0.0), None, today());
        assert!(matches!(result, Err(WaterwiseError::NoSensorData)));
    }

    #[tokio::test]
    async fn weather_failure_still_decides_with_fallback() {
        let db = Database::open_in_memory().unwrap();
        db.insert_sensor_reading(&SensorReading::new(8.0, 31.0, 45.0))
            .unwrap();
        let weather = WeatherGateway::new(Some(FailingWeather), Duration::from_secs(5), 3.0);
        let advisor = IrrigationAdvisor::new(db, weather, FieldDefaults::default());

        let report = advisor.decide(LocationConfig::default(), today()).await.unwrap();
        assert_eq!(report.et0_mm_per_day, 3.0);
        assert_eq!(report.weather_source, "Fallback defaults");
        assert_eq!(report.predicted_rain_tomorrow_mm, 0.0);
        assert!(report.temperature_warning.is_none());
        assert_eq!(advisor.database().count_decisions().unwrap(), 1);
    }

    #[tokio::test]
    async fn saved_field_and_tank_level_are_used() {
        let forecast = ForecastData {
            precipitation_mm: vec![0.0, 0.0],
            max_temp_c: vec![22.0, 28.0],
            ..Default::default()
        };
        let advisor = advisor_with(5.0, forecast);
        let db = advisor.database();
        db.save_field_config(&FieldConfig::new(
            "maize",
            today() - ChronoDuration::days(70),
            50.0,
            0.3,
        ))
        .unwrap();
        db.insert_tank_level(&TankLevel::new(55.5)).unwrap();
        db.insert_sensor_reading(&SensorReading::new(12.0, 29.0, 60.0))
            .unwrap();

        let report = advisor.decide(LocationConfig::default(), today()).await.unwrap();
        assert_eq!(report.crop, "maize");
        assert_eq!(report.days_elapsed, 70);
        assert_eq!(report.stage, "Mid-season");
        assert_eq!(report.kc, 1.2);
        assert_eq!(report.tank_level_percent, Some(55.5));
        assert_eq!(
            report.temperature_warning.as_deref(),
            Some("High temperature spike expected tomorrow.")
        );
        // etc = 6; stored = 36mm / 50m² = 0.72; deficit 5.28mm over 50m² = 264 L
        assert_eq!(report.water_amount_liters, 264);
        assert_eq!(report.decision, WateringDecision::WateringNeeded { liters: 264 });
    }

    #[test]
    fn current_field_falls_back_to_defaults() {
        let advisor = advisor_with(3.0, ForecastData::empty());
        let field = advisor.current_field(today()).unwrap();
        assert_eq!(field, FieldConfig::default_on(today()));
    }
}
