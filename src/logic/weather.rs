use crate::config::{LocationConfig, WeatherConfig};
use crate::datasources::{OpenMeteoClient, WeatherProvider};
use crate::error::Result;
use crate::models::{ForecastData, WeatherOutlook, WeatherSource};
use std::future::Future;
use std::time::Duration;

/// Weather access that never fails: every fetch is bounded by a timeout and
/// degrades to the fallback ET0 or an empty forecast.
pub struct WeatherGateway<P> {
    provider: Option<P>,
    timeout: Duration,
    fallback_et0_mm: f64,
}

impl WeatherGateway<OpenMeteoClient> {
    pub fn from_config(config: &WeatherConfig) -> Self {
        let provider = if config.enabled {
            match OpenMeteoClient::new(config) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!("Failed to build Open-Meteo client: {}", e);
                    None
                }
            }
        } else {
            tracing::info!("Weather fetching disabled - using fallback ET0 and no forecast");
            None
        };

        Self::new(
            provider,
            Duration::from_secs(config.timeout_secs),
            config.fallback_et0_mm,
        )
    }
}

impl<P: WeatherProvider> WeatherGateway<P> {
    pub fn new(provider: Option<P>, timeout: Duration, fallback_et0_mm: f64) -> Self {
        Self {
            provider,
            timeout,
            fallback_et0_mm,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    async fn guarded<T>(&self, what: &str, fetch: impl Future<Output = Result<T>>) -> Option<T> {
        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                tracing::warn!("Failed to fetch {}: {}", what, e);
                None
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Timed out fetching {}",
                    what
                );
                None
            }
        }
    }

    /// Live ET0, or `None` when unavailable
    async fn live_et0(&self, latitude: f64, longitude: f64) -> Option<f64> {
        let provider = self.provider.as_ref()?;
        self.guarded("ET0", provider.fetch_et0(latitude, longitude))
            .await
    }

    pub async fn fetch_et0(&self, latitude: f64, longitude: f64) -> f64 {
        self.live_et0(latitude, longitude)
            .await
            .unwrap_or(self.fallback_et0_mm)
    }

    pub async fn fetch_daily_forecast(&self, latitude: f64, longitude: f64) -> ForecastData {
        let Some(provider) = self.provider.as_ref() else {
            return ForecastData::empty();
        };
        self.guarded(
            "daily forecast",
            provider.fetch_daily_forecast(latitude, longitude),
        )
        .await
        .unwrap_or_default()
    }

    pub async fn outlook(&self, location: LocationConfig) -> WeatherOutlook {
        let (et0, forecast) = tokio::join!(
            self.live_et0(location.latitude, location.longitude),
            self.fetch_daily_forecast(location.latitude, location.longitude)
        );

        match et0 {
            Some(et0_mm) => WeatherOutlook {
                et0_mm,
                forecast,
                source: WeatherSource::OpenMeteo,
            },
            None => WeatherOutlook {
                forecast,
                ..WeatherOutlook::fallback_with(self.fallback_et0_mm)
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::WaterwiseError;

    /// Provider returning fixed values
    pub struct FixedWeather {
        pub et0: f64,
        pub forecast: ForecastData,
    }

    impl WeatherProvider for FixedWeather {
        async fn fetch_et0(&self, _latitude: f64, _longitude: f64) -> Result<f64> {
            Ok(self.et0)
        }

        async fn fetch_daily_forecast(&self, _latitude: f64, _longitude: f64) -> Result<ForecastData> {
            Ok(self.forecast.clone())
        }
    }

    /// Provider whose every call fails
    pub struct FailingWeather;

    impl WeatherProvider for FailingWeather {
        async fn fetch_et0(&self, _latitude: f64, _longitude: f64) -> Result<f64> {
            Err(WaterwiseError::DataSourceUnavailable("offline".into()))
        }

        async fn fetch_daily_forecast(&self, _latitude: f64, _longitude: f64) -> Result<ForecastData> {
            Err(WaterwiseError::DataSourceUnavailable("offline".into()))
        }
    }

    /// Provider that never answers in time
    pub struct SlowWeather;

    impl WeatherProvider for SlowWeather {
        async fn fetch_et0(&self, _latitude: f64, _longitude: f64) -> Result<f64> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(9.9)
        }

        async fn fetch_daily_forecast(&self, _latitude: f64, _longitude: f64) -> Result<ForecastData> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(ForecastData {
                precipitation_mm: vec![50.0],
                ..Default::default()
            })
        }
    }
}
