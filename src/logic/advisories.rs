use crate::models::ForecastData;

/// Rise in daily max temperature (°C) that counts as a spike
pub const TEMPERATURE_SPIKE_C: f64 = 4.0;

pub const TEMPERATURE_SPIKE_ADVISORY: &str = "High temperature spike expected tomorrow.";

/// Advisory when tomorrow's max is more than 4 °C above today's
pub fn temperature_spike(today_max_c: Option<f64>, tomorrow_max_c: Option<f64>) -> Option<String> {
    let (today, tomorrow) = (today_max_c?, tomorrow_max_c?);
    (tomorrow > today + TEMPERATURE_SPIKE_C).then(|| TEMPERATURE_SPIKE_ADVISORY.to_string())
}

pub fn temperature_spike_from(forecast: &ForecastData) -> Option<String> {
    temperature_spike(forecast.max_temp_on(0), forecast.max_temp_on(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spike_above_four_degrees() {
        assert!(temperature_spike(Some(25.0), Some(29.5)).is_some());
        assert!(temperature_spike(Some(25.0), Some(29.0)).is_none());
        assert!(temperature_spike(Some(25.0), Some(20.0)).is_none());
    }

    #[test]
    fn unknown_temperatures_give_no_advisory() {
        assert!(temperature_spike(None, Some(40.0)).is_none());
        assert!(temperature_spike(Some(20.0), None).is_none());
        assert!(temperature_spike_from(&ForecastData::empty()).is_none());
    }

    #[test]
    fn reads_first_two_forecast_days() {
        let forecast = ForecastData {
            max_temp_c: vec![22.0, 27.5, 18.0],
            ..Default::default()
        };
        assert_eq!(
            temperature_spike_from(&forecast).as_deref(),
            Some(TEMPERATURE_SPIKE_ADVISORY)
        );
    }
}
