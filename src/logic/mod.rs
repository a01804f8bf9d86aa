pub mod advisor;
pub mod advisories;
pub mod crop_model;
pub mod rules;
pub mod water_balance;
pub mod weather;

pub use advisor::IrrigationAdvisor;
pub use weather::WeatherGateway;
