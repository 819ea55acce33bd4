use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::{
    config::{ComponentConfig, SensorConfig},
    error::SensorError,
    model::{Command, Extra, Geometry, Reading, error_reading},
};

use super::{Model, Sensor};

pub const CURRENT_WEATHER_URL: &str = "http://api.weatherapi.com/v1/current.json";

/// Upper bound on a single upstream call, body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sensor reporting WeatherAPI.com current conditions for one location.
#[derive(Debug, Clone)]
pub struct WeatherApiSensor {
    name: String,
    config: SensorConfig,
    endpoint: String,
    timeout: Duration,
    http: Client,
}

impl WeatherApiSensor {
    pub fn new(
        name: impl Into<String>,
        api_key: impl Into<String>,
        zipcode: impl Into<String>,
    ) -> Self {
        Self::with_config(name, SensorConfig::new(api_key, zipcode))
    }

    pub fn with_config(name: impl Into<String>, config: SensorConfig) -> Self {
        Self {
            name: name.into(),
            config,
            endpoint: CURRENT_WEATHER_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    /// Construct from a host component config.
    ///
    /// Fails only when the config names a model other than this one.
    pub fn from_component_config(component: &ComponentConfig) -> anyhow::Result<Self> {
        if let Some(model) = component.model.as_deref() {
            Model::try_from(model)?;
        }

        Ok(Self::with_config(component.name.clone(), component.sensor_config()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the sensor at a different current-weather endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Fetch current conditions, reporting a non-200 upstream status as
    /// [`SensorError::UpstreamStatus`].
    pub async fn fetch_current(&self) -> Result<Reading, SensorError> {
        tracing::debug!(
            sensor = %self.name,
            zipcode = %self.config.zipcode,
            "requesting current weather"
        );

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("key", self.config.api_key.as_str()), ("q", self.config.zipcode.as_str())])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status != StatusCode::OK {
            let body = truncate_body(&body);
            tracing::warn!(
                sensor = %self.name,
                status = status.as_u16(),
                body = %body,
                "weatherapi.com returned a non-200 status"
            );
            return Err(SensorError::UpstreamStatus { status: status.as_u16(), body });
        }

        Ok(serde_json::from_str::<Reading>(&body)?)
    }
}

#[async_trait]
impl Sensor for WeatherApiSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> Model {
        Model::WEATHER_API_CURRENT
    }

    async fn get_reading(&self, _extra: Option<&Extra>) -> Result<Reading, SensorError> {
        match self.fetch_current().await {
            Err(err @ SensorError::UpstreamStatus { .. }) => Ok(error_reading(err.to_string())),
            other => other,
        }
    }

    async fn do_command(&self, _command: &Command) -> Result<Command, SensorError> {
        Err(SensorError::NotSupported("do_command"))
    }

    async fn get_geometries(&self, _extra: Option<&Extra>) -> Result<Vec<Geometry>, SensorError> {
        Err(SensorError::NotSupported("get_geometries"))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
