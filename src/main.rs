mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use cli::{Cli, Commands, FieldAction, SensorAction, TankAction};
use config::Config;
use datasources::OpenMeteoClient;
use db::Database;
use error::WaterwiseError;
use logic::crop_model::resolve_stage;
use logic::rules::DecisionPolicy;
use logic::{IrrigationAdvisor, WeatherGateway};
use models::{crop_profiles, CropProfile, DecisionReport, FieldConfig, SensorReading, TankLevel};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Init = cli.command {
        let (_, path) = Config::setup_interactive(cli.config.clone())?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    if let Commands::Check = cli.command {
        return run_check(&cli).await;
    }

    let config = Config::load_or_default(cli.config.clone()).context("Configuration error")?;
    let db = Database::open(cli.data_dir.as_ref()).context("Failed to open database")?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Decide { lat, lon, json } => {
            let mut location = config.location;
            if let Some(lat) = lat {
                location.latitude = lat;
            }
            if let Some(lon) = lon {
                location.longitude = lon;
            }

            let weather = WeatherGateway::<OpenMeteoClient>::from_config(&config.weather);
            let advisor = IrrigationAdvisor::new(db, weather, config.field.clone());

            match advisor.decide(location, today).await {
                Ok(report) if json => println!("{}", serde_json::to_string_pretty(&report)?),
                Ok(report) => print_report(&report),
                Err(WaterwiseError::NoSensorData) => {
                    eprintln!("{}", WaterwiseError::NoSensorData);
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Field { action } => match action {
            FieldAction::Show => {
                let field = match db.get_field_config()? {
                    Some(field) => field,
                    None => {
                        println!("(no field saved, showing configured defaults)");
                        config.field.to_field_config(today)
                    }
                };
                print_field(&field, today);
            }
            FieldAction::Set {
                crop,
                sow_date,
                area,
                soil_depth,
            } => {
                if CropProfile::find(&crop).is_none() {
                    eprintln!(
                        "Unknown crop '{}', decisions will use the {} table",
                        crop,
                        CropProfile::default_profile().display
                    );
                }
                let field = FieldConfig::new(crop, sow_date, area, soil_depth);
                db.save_field_config(&field)?;
                println!("Field saved");
                print_field(&field, today);
            }
        },
        Commands::Sensor { action } => match action {
            SensorAction::Record {
                soil,
                temp,
                humidity,
            } => {
                let id = db.insert_sensor_reading(&SensorReading::new(soil, temp, humidity))?;
                println!("Recorded sensor reading #{}", id);
            }
            SensorAction::Latest => match db.latest_sensor_reading()? {
                Some(reading) => print_reading(&reading),
                None => println!("{}", WaterwiseError::NoSensorData),
            },
        },
        Commands::Tank { action } => match action {
            TankAction::Record { level } => {
                if !(0.0..=100.0).contains(&level) {
                    anyhow::bail!("Tank level must be between 0 and 100, got {}", level);
                }
                let id = db.insert_tank_level(&TankLevel::new(level))?;
                println!("Recorded tank level #{}", id);
            }
        },
        Commands::History { limit } => {
            let records = db.recent_decisions(limit)?;
            if records.is_empty() {
                println!("No decisions logged yet");
            } else {
                println!(
                    "Showing {} of {} logged decisions",
                    records.len(),
                    db.count_decisions()?
                );
            }
            for record in records {
                println!(
                    "{}  {:>6} L  {}",
                    record.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    record.water_amount_liters,
                    record.decision_text
                );
            }
        }
        Commands::Crops => {
            for profile in crop_profiles() {
                println!("{} ({}), {} days", profile.display, profile.key, profile.total_duration_days());
                for stage in &profile.stages {
                    println!("  {:<12} {:>4} days  Kc {:.2}", stage.name, stage.duration_days, stage.kc);
                }
            }
        }
        Commands::Rules => {
            for (position, (id, name)) in DecisionPolicy::new().list_rules().into_iter().enumerate() {
                println!("{}. {} ({})", position + 1, name, id);
            }
            println!("Otherwise the water balance decides.");
        }
        Commands::Init | Commands::Check => unreachable!("handled before loading config"),
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run_check(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.clone()).context("Configuration error")?;
    println!("Config: OK");
    println!(
        "  Location: {:.4}, {:.4}",
        config.location.latitude, config.location.longitude
    );

    let db = Database::open(cli.data_dir.as_ref()).context("Failed to open database")?;
    println!("Database: OK ({})", db.path().display());

    let gateway = WeatherGateway::<OpenMeteoClient>::from_config(&config.weather);
    if !gateway.is_enabled() {
        println!(
            "Weather: disabled (ET0 fixed at {} mm/day)",
            config.weather.fallback_et0_mm
        );
        return Ok(());
    }

    let (latitude, longitude) = (config.location.latitude, config.location.longitude);
    let client = OpenMeteoClient::new(&config.weather)?;
    match client.test_connection(latitude, longitude).await {
        Ok(true) => println!("Open-Meteo: OK"),
        Ok(false) => println!("Open-Meteo: unexpected response"),
        Err(e) => println!("Open-Meteo: OFFLINE ({})", e),
    }

    println!(
        "  ET0 today: {:.2} mm/day",
        gateway.fetch_et0(latitude, longitude).await
    );
    let forecast = gateway.fetch_daily_forecast(latitude, longitude).await;
    if forecast.is_empty() {
        println!("  Forecast: unavailable");
    } else {
        println!(
            "  Forecast: {} days, {:.1} mm rain today, {:.1} mm tomorrow",
            forecast.days(),
            forecast.rain_today(),
            forecast.rain_tomorrow()
        );
    }

    Ok(())
}

fn print_report(report: &DecisionReport) {
    println!("{}", report.watering_decision);
    println!();
    println!(
        "  Crop:            {} ({}), day {}, {} stage, Kc {:.2}",
        report.crop_display, report.crop, report.days_elapsed, report.stage, report.kc
    );
    println!(
        "  ET0:             {:.2} mm/day ({})",
        report.et0_mm_per_day, report.weather_source
    );
    println!("  Soil moisture:   {:.1}%", report.soil_moisture);
    println!("  Humidity:        {:.1}%", report.humidity);
    println!(
        "  Rain forecast:   {:.1} mm today, {:.1} mm tomorrow",
        report.predicted_rain_today_mm, report.predicted_rain_tomorrow_mm
    );
    println!("  Water amount:    {} L", report.water_amount_liters);
    match report.tank_level_percent {
        Some(level) => println!("  Tank level:      {:.0}%", level),
        None => println!("  Tank level:      unknown"),
    }
    println!("  Field condition: {}", report.field_condition.as_str());
    if let Some(warning) = &report.temperature_warning {
        println!();
        println!("  {}", warning);
    }
}

fn print_field(field: &FieldConfig, today: NaiveDate) {
    let stage = resolve_stage(&field.crop, field.sow_date, today);
    println!("  Crop:       {} ({})", field.crop, stage.crop_display);
    println!("  Sown:       {} (day {})", field.sow_date, stage.days_elapsed);
    println!("  Stage:      {} (Kc {:.2})", stage.stage, stage.kc);
    println!("  Area:       {} m²", field.area_m2);
    println!("  Soil depth: {} m", field.soil_depth_m);
}

fn print_reading(reading: &SensorReading) {
    println!("  Soil moisture: {:.1}%", reading.soil_moisture_pct);
    println!("  Temperature:   {:.1} °C", reading.temperature_c);
    println!("  Humidity:      {:.1}%", reading.humidity_pct);
    match reading.timestamp {
        Some(ts) => println!(
            "  Recorded:      {}",
            ts.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ),
        None => println!("  Recorded:      (no timestamp, ignored by decide)"),
    }
}
