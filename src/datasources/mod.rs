pub mod openmeteo;

pub use openmeteo::OpenMeteoClient;

use crate::error::Result;
use crate::models::ForecastData;
use std::future::Future;

/// Source of reference evapotranspiration and daily forecasts
pub trait WeatherProvider {
    fn fetch_et0(&self, latitude: f64, longitude: f64) -> impl Future<Output = Result<f64>>;

    fn fetch_daily_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<ForecastData>>;
}
