use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "waterwise",
    version,
    about = "Field irrigation advisor driven by crop growth stages, soil sensors and weather forecasts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config and test the weather service
    Check,
    /// Decide whether to water today and log the decision
    Decide {
        /// Latitude override
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude override
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or change the field configuration
    Field {
        #[command(subcommand)]
        action: FieldAction,
    },
    /// Record or show soil sensor readings
    Sensor {
        #[command(subcommand)]
        action: SensorAction,
    },
    /// Record water tank levels
    Tank {
        #[command(subcommand)]
        action: TankAction,
    },
    /// Show logged decisions, newest first
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
    /// List the crop coefficient tables
    Crops,
    /// List the watering rules in evaluation order
    Rules,
}

#[derive(Subcommand)]
pub enum FieldAction {
    /// Print the active field (saved or defaults)
    Show,
    /// Save the active field
    Set {
        /// Crop key, e.g. banana, rice, maize
        #[arg(long)]
        crop: String,
        /// Sowing date (YYYY-MM-DD)
        #[arg(long)]
        sow_date: NaiveDate,
        /// Field area in square meters
        #[arg(long, default_value_t = crate::models::DEFAULT_AREA_M2)]
        area: f64,
        /// Root zone depth in meters
        #[arg(long, default_value_t = crate::models::DEFAULT_SOIL_DEPTH_M)]
        soil_depth: f64,
    },
}

#[derive(Subcommand)]
pub enum SensorAction {
    /// Store a reading timestamped now
    Record {
        /// Soil moisture (%)
        #[arg(long)]
        soil: f64,
        /// Air temperature (°C)
        #[arg(long, allow_hyphen_values = true)]
        temp: f64,
        /// Relative humidity (%)
        #[arg(long)]
        humidity: f64,
    },
    /// Print the most recent reading
    Latest,
}

#[derive(Subcommand)]
pub enum TankAction {
    /// Store a tank level timestamped now
    Record {
        /// Fill level (%)
        #[arg(long)]
        level: f64,
    },
}
