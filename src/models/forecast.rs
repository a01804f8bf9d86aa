use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reference evapotranspiration used when no live value is available (mm/day)
pub const FALLBACK_ET0_MM: f64 = 3.0;

/// Daily forecast indexed by day offset (0 = today, 1 = tomorrow, ...).
///
/// Any series may be shorter than the others or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastData {
    pub dates: Vec<NaiveDate>,
    pub precipitation_mm: Vec<f64>,
    pub max_temp_c: Vec<f64>,
}

impl ForecastData {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.precipitation_mm.is_empty() && self.max_temp_c.is_empty()
    }

    /// Precipitation for a day offset; missing or non-finite values read as 0.0
    pub fn precipitation_on(&self, day: usize) -> f64 {
        self.precipitation_mm
            .get(day)
            .copied()
            .filter(|p| p.is_finite())
            .unwrap_or(0.0)
    }

    pub fn rain_today(&self) -> f64 {
        self.precipitation_on(0)
    }

    pub fn rain_tomorrow(&self) -> f64 {
        self.precipitation_on(1)
    }

    /// Max temperature for a day offset, `None` when unknown
    pub fn max_temp_on(&self, day: usize) -> Option<f64> {
        self.max_temp_c.get(day).copied().filter(|t| t.is_finite())
    }

    pub fn days(&self) -> usize {
        self.precipitation_mm.len().max(self.max_temp_c.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherSource {
    OpenMeteo,
    Fallback,
}

impl WeatherSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherSource::OpenMeteo => "Open-Meteo",
            WeatherSource::Fallback => "Fallback defaults",
        }
    }
}

impl std::fmt::Display for WeatherSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the decision needs from the weather side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherOutlook {
    pub et0_mm: f64,
    pub forecast: ForecastData,
    /// Where the ET0 value came from
    pub source: WeatherSource,
}

impl WeatherOutlook {
    #[cfg(test)]
    pub fn fallback() -> Self {
        Self::fallback_with(FALLBACK_ET0_MM)
    }

    pub fn fallback_with(et0_mm: f64) -> Self {
        Self {
            et0_mm,
            forecast: ForecastData::empty(),
            source: WeatherSource::Fallback,
        }
    }
}
