use crate::{
    SensorError,
    model::{Command, Extra, Geometry, Reading},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod weatherapi;

/// A `namespace:family:name` model triple identifying a component implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Model {
    pub namespace: &'static str,
    pub family: &'static str,
    pub name: &'static str,
}

impl Model {
    pub const WEATHER_API_CURRENT: Model =
        Model { namespace: "viam-labs", family: "weather-api", name: "current" };

    pub const fn all() -> &'static [Model] {
        &[Model::WEATHER_API_CURRENT]
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.family, self.name)
    }
}

impl TryFrom<&str> for Model {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Model::all().iter().copied().find(|m| m.to_string() == value).ok_or_else(|| {
            let supported: Vec<String> = Model::all().iter().map(Model::to_string).collect();
            anyhow::anyhow!("Unknown model '{value}'. Supported models: {}.", supported.join(", "))
        })
    }
}

/// The sensor capability a host runtime drives.
#[async_trait]
pub trait Sensor: Send + Sync + Debug {
    /// Resource name given at construction.
    fn name(&self) -> &str;

    fn model(&self) -> Model;

    async fn get_reading(&self, extra: Option<&Extra>) -> Result<Reading, SensorError>;

    async fn do_command(&self, command: &Command) -> Result<Command, SensorError>;

    async fn get_geometries(&self, extra: Option<&Extra>) -> Result<Vec<Geometry>, SensorError>;
}
