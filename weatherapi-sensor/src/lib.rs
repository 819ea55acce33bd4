//! Core library for the WeatherAPI.com sensor component.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The sensor capability interface a host runtime drives
//! - The WeatherAPI.com current-conditions sensor
//!
//! Readings are passed through from the upstream untouched; a non-200 upstream
//! status is reported as an `{"error": ...}` reading.

pub mod config;
pub mod error;
pub mod model;
pub mod sensor;

pub use config::{ComponentConfig, SensorConfig};
pub use error::SensorError;
pub use model::{Command, Extra, Geometry, Reading};
pub use sensor::{Model, Sensor, weatherapi::WeatherApiSensor};
