use crate::error::{Result, WaterwiseError};
use crate::models::{
    FieldConfig, DEFAULT_AREA_M2, DEFAULT_CROP, DEFAULT_SOIL_DEPTH_M, FALLBACK_ET0_MM,
};
use chrono::NaiveDate;
use dialoguer::{Confirm, Input};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Used until a field is saved with `waterwise field set`
    #[serde(default)]
    pub field: FieldDefaults,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: 27.2,
            longitude: 88.03,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_fallback_et0")]
    pub fallback_et0_mm: f64,
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    OPEN_METEO_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_fallback_et0() -> f64 {
    FALLBACK_ET0_MM
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            fallback_et0_mm: default_fallback_et0(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldDefaults {
    #[serde(default = "default_crop")]
    pub crop: String,
    #[serde(default = "default_area")]
    pub area_m2: f64,
    #[serde(default = "default_soil_depth")]
    pub soil_depth_m: f64,
}

fn default_crop() -> String {
    DEFAULT_CROP.to_string()
}

fn default_area() -> f64 {
    DEFAULT_AREA_M2
}

fn default_soil_depth() -> f64 {
    DEFAULT_SOIL_DEPTH_M
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            crop: default_crop(),
            area_m2: default_area(),
            soil_depth_m: default_soil_depth(),
        }
    }
}

impl FieldDefaults {
    /// Default field, sown on `today`
    pub fn to_field_config(&self, today: NaiveDate) -> FieldConfig {
        FieldConfig::new(self.crop.clone(), today, self.area_m2, self.soil_depth_m)
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(WaterwiseError::Config(format!(
                "Config file not found at {:?}. Run `waterwise init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| WaterwiseError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Load the config file if one exists, otherwise fall back to built-in defaults.
    pub fn load_or_default(config_override: Option<PathBuf>) -> Result<Self> {
        if Self::exists(config_override.as_ref()) {
            Self::load(config_override)
        } else {
            tracing::warn!("No config file found, using built-in defaults");
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content);

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| WaterwiseError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return Err(WaterwiseError::Config(format!(
                "latitude {} is out of range",
                self.location.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return Err(WaterwiseError::Config(format!(
                "longitude {} is out of range",
                self.location.longitude
            )));
        }
        if self.weather.timeout_secs == 0 {
            return Err(WaterwiseError::Config(
                "weather.timeout_secs must be at least 1".into(),
            ));
        }
        if !self.weather.fallback_et0_mm.is_finite() || self.weather.fallback_et0_mm < 0.0 {
            return Err(WaterwiseError::Config(
                "weather.fallback_et0_mm must be a non-negative number".into(),
            ));
        }
        self.field
            .to_field_config(chrono::Local::now().date_naive())
            .validate()
            .map_err(|e| WaterwiseError::Config(format!("field defaults: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("waterwise").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/waterwise/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WaterwiseError::Config("Cannot determine config directory".into()))?
            .join("waterwise");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive(config_override: Option<PathBuf>) -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up Waterwise!");
        println!();

        // --- Location ---
        println!("Field location");
        let latitude: f64 = Input::new()
            .with_prompt("  Latitude")
            .default(LocationConfig::default().latitude)
            .interact_text()
            .map_err(|e| WaterwiseError::Config(format!("Input error: {}", e)))?;

        let longitude: f64 = Input::new()
            .with_prompt("  Longitude")
            .default(LocationConfig::default().longitude)
            .interact_text()
            .map_err(|e| WaterwiseError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- Field defaults ---
        println!("Default field (used until `waterwise field set` is run)");
        let crop: String = Input::new()
            .with_prompt("  Crop (banana, rice, maize, ...)")
            .default(DEFAULT_CROP.into())
            .interact_text()
            .map_err(|e| WaterwiseError::Config(format!("Input error: {}", e)))?;

        let area_m2: f64 = Input::new()
            .with_prompt("  Area (m²)")
            .default(DEFAULT_AREA_M2)
            .interact_text()
            .map_err(|e| WaterwiseError::Config(format!("Input error: {}", e)))?;

        let soil_depth_m: f64 = Input::new()
            .with_prompt("  Root-zone soil depth (m)")
            .default(DEFAULT_SOIL_DEPTH_M)
            .interact_text()
            .map_err(|e| WaterwiseError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- Weather ---
        println!("Weather (Open-Meteo, no API key needed)");
        let enabled = Confirm::new()
            .with_prompt("  Fetch live ET0 and forecast?")
            .default(true)
            .interact()
            .map_err(|e| WaterwiseError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            location: LocationConfig {
                latitude,
                longitude,
            },
            weather: WeatherConfig {
                enabled,
                ..WeatherConfig::default()
            },
            field: FieldDefaults {
                crop,
                area_m2,
                soil_depth_m,
            },
        };
        config.validate()?;

        let config_path = match config_override {
            Some(p) => p,
            None => Self::default_config_path()?,
        };
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| WaterwiseError::Config(format!("Failed to serialize config: {}", e)))?;

        // Write with a header comment
        let content = format!(
            "# Waterwise Configuration\n# Generated by `waterwise init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return result;
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("WATERWISE_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| WaterwiseError::Config("Cannot determine data directory".into()))?
            .join("waterwise");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("waterwise.db"))
    }
}
