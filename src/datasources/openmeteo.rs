use super::WeatherProvider;
use crate::config::WeatherConfig;
use crate::error::{Result, WaterwiseError};
use crate::models::ForecastData;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

const FORECAST_DAYS: u32 = 3;
const ET0_VARIABLE: &str = "et0_fao_evapotranspiration";
const FORECAST_VARIABLES: &str = "precipitation_sum,temperature_2m_max";

pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

// Open-Meteo API response structures
#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    daily: Option<OmDaily>,
}

#[derive(Debug, Default, Deserialize)]
struct OmDaily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    et0_fao_evapotranspiration: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn daily_url(&self, latitude: f64, longitude: f64, variables: &str) -> String {
        format!(
            "{}?latitude={}&longitude={}&daily={}&timezone=auto&forecast_days={}",
            self.base_url, latitude, longitude, variables, FORECAST_DAYS
        )
    }

    async fn fetch_daily(&self, latitude: f64, longitude: f64, variables: &str) -> Result<OmDaily> {
        let url = self.daily_url(latitude, longitude, variables);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WaterwiseError::DataSourceUnavailable(format!("Open-Meteo: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WaterwiseError::DataSourceUnavailable(format!(
                "Open-Meteo returned {}: {}",
                status, body
            )));
        }

        let om_response: OmForecastResponse = response.json().await.map_err(|e| {
            WaterwiseError::DataSourceUnavailable(format!(
                "Failed to parse Open-Meteo response: {}",
                e
            ))
        })?;

        om_response.daily.ok_or_else(|| {
            WaterwiseError::DataSourceUnavailable("Open-Meteo response has no daily block".into())
        })
    }

    /// Test connection to the Open-Meteo API
    pub async fn test_connection(&self, latitude: f64, longitude: f64) -> Result<bool> {
        let url = self.daily_url(latitude, longitude, ET0_VARIABLE);

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                WaterwiseError::DataSourceUnavailable(format!("Open-Meteo: {}", e))
            })?;

        Ok(response.status().is_success())
    }
}

impl WeatherProvider for OpenMeteoClient {
    /// Today's FAO-56 reference evapotranspiration (mm/day)
    async fn fetch_et0(&self, latitude: f64, longitude: f64) -> Result<f64> {
        let daily = self.fetch_daily(latitude, longitude, ET0_VARIABLE).await?;
        today_et0(&daily)
    }

    async fn fetch_daily_forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastData> {
        let daily = self
            .fetch_daily(latitude, longitude, FORECAST_VARIABLES)
            .await?;
        Ok(convert_daily(daily))
    }
}

fn today_et0(daily: &OmDaily) -> Result<f64> {
    daily
        .et0_fao_evapotranspiration
        .first()
        .copied()
        .flatten()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| {
            WaterwiseError::DataSourceUnavailable("Open-Meteo returned no ET0 for today".into())
        })
}

/// Null precipitation reads as 0.0. Null temperatures stay as NaN placeholders
/// so day offsets line up; trailing ones are dropped.
fn convert_daily(daily: OmDaily) -> ForecastData {
    let dates = daily
        .time
        .iter()
        .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .collect();

    let precipitation_mm = daily
        .precipitation_sum
        .into_iter()
        .map(|p| p.unwrap_or(0.0))
        .collect();

    let mut max_temp_c: Vec<f64> = daily
        .temperature_2m_max
        .into_iter()
        .map(|t| t.unwrap_or(f64::NAN))
        .collect();
    while max_temp_c.last().is_some_and(|t| t.is_nan()) {
        max_temp_c.pop();
    }

    ForecastData {
        dates,
        precipitation_mm,
        max_temp_c,
    }
}
