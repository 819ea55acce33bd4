use std::{io::Write, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weatherapi_sensor::{
    Command as SensorCommand, ComponentConfig, Model, Sensor, SensorConfig, WeatherApiSensor,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherapi-sensor", version, about = "Drive the WeatherAPI.com sensor locally")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and zip code in the config file.
    Configure,

    /// Take one reading and print it as JSON.
    Reading {
        #[command(flatten)]
        source: SensorArgs,

        /// Seconds to wait for weatherapi.com before giving up.
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,
    },

    /// Send a JSON object to the sensor's do_command.
    DoCommand {
        #[command(flatten)]
        source: SensorArgs,

        /// Command payload, e.g. '{"refresh": true}'.
        command: String,
    },

    /// Ask the sensor for its geometries.
    Geometries {
        #[command(flatten)]
        source: SensorArgs,
    },

    /// Print the model triple this sensor registers under.
    Model,
}

/// Where the sensor's configuration comes from. Flags override the stored
/// config file; `--component` replaces it entirely.
#[derive(Debug, clap::Args)]
pub struct SensorArgs {
    #[arg(long, conflicts_with = "component")]
    pub api_key: Option<String>,

    #[arg(long, conflicts_with = "component")]
    pub zipcode: Option<String>,

    /// JSON component config: {"name", "model", "attributes": {"api_key", "zipcode"}}.
    #[arg(long)]
    pub component: Option<PathBuf>,

    /// Current-weather URL to query instead of weatherapi.com.
    #[arg(long, hide = true)]
    pub endpoint: Option<String>,
}

impl SensorArgs {
    fn build(self) -> anyhow::Result<WeatherApiSensor> {
        let endpoint = self.endpoint;
        let sensor = match self.component {
            Some(path) => {
                let component = ComponentConfig::load_from(&path)?;
                WeatherApiSensor::from_component_config(&component)?
            }
            None => Self::from_flags(self.api_key, self.zipcode)?,
        };

        Ok(match endpoint {
            Some(endpoint) => sensor.with_endpoint(endpoint),
            None => sensor,
        })
    }

    fn from_flags(
        api_key: Option<String>,
        zipcode: Option<String>,
    ) -> anyhow::Result<WeatherApiSensor> {
        let config = match (api_key, zipcode) {
            (Some(api_key), Some(zipcode)) => SensorConfig::new(api_key, zipcode),
            (api_key, zipcode) => SensorConfig::load()?.with_overrides(api_key, zipcode),
        };
        if !config.is_complete() {
            tracing::warn!(
                "API key or zip code is empty; run `weatherapi-sensor configure` or pass --api-key/--zipcode"
            );
        }

        Ok(WeatherApiSensor::with_config("weather", config))
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_with(&mut std::io::stdout()).await
    }

    /// Execute the command, writing results to `out`.
    pub async fn run_with<W: Write>(self, out: &mut W) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Reading { source, timeout } => {
                let sensor = source.build()?.with_timeout(Duration::from_secs(timeout));
                let reading = sensor.get_reading(None).await?;
                writeln!(out, "{}", serde_json::to_string_pretty(&reading)?)?;
            }
            Command::DoCommand { source, command } => {
                let command: SensorCommand = serde_json::from_str(&command)
                    .context("do-command expects a JSON object")?;
                let result = source.build()?.do_command(&command).await?;
                writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
            }
            Command::Geometries { source } => {
                let geometries = source.build()?.get_geometries(None).await?;
                writeln!(out, "{}", serde_json::to_string_pretty(&geometries)?)?;
            }
            Command::Model => writeln!(out, "{}", Model::WEATHER_API_CURRENT)?,
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let existing = SensorConfig::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let mut zipcode = Text::new("Zip code or location:");
    if !existing.zipcode.is_empty() {
        zipcode = zipcode.with_default(&existing.zipcode);
    }
    let zipcode = zipcode.prompt().context("Failed to read zip code")?;

    let path = SensorConfig::new(api_key, zipcode).save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::{Value, json};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    const CURRENT_PATH: &str = "/v1/current.json";

    async fn run_args(args: &[&str]) -> anyhow::Result<Value> {
        let cli = Cli::try_parse_from(args)?;
        let mut out = Vec::new();
        cli.run_with(&mut out).await?;
        Ok(serde_json::from_slice(&out)?)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn reading_accepts_overrides_and_timeout() {
        let cli = Cli::try_parse_from([
            "weatherapi-sensor",
            "reading",
            "--api-key",
            "ABC123",
            "--zipcode",
            "94105 US",
            "--timeout",
            "5",
        ])
        .expect("should parse");

        match cli.command {
            Command::Reading { source, timeout } => {
                assert_eq!(source.api_key.as_deref(), Some("ABC123"));
                assert_eq!(source.zipcode.as_deref(), Some("94105 US"));
                assert!(source.component.is_none());
                assert_eq!(timeout, 5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn component_conflicts_with_overrides() {
        let res = Cli::try_parse_from([
            "weatherapi-sensor",
            "reading",
            "--component",
            "sensor.json",
            "--zipcode",
            "94105",
        ]);
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn do_command_reports_not_supported() {
        let cli = Cli::try_parse_from([
            "weatherapi-sensor",
            "do-command",
            "--api-key",
            "K",
            "--zipcode",
            "Z",
            r#"{"refresh": true}"#,
        ])
        .expect("should parse");

        let err = cli.run().await.unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let res = Cli::try_parse_from(["weatherapi-sensor", "reading", "--timeout", "0"]);
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn reading_prints_upstream_body() {
        let server = MockServer::start().await;
        let body = json!({
            "location": { "name": "San Francisco" },
            "current": { "temp_c": 18.0 }
        });
        Mock::given(method("GET"))
            .and(path(CURRENT_PATH))
            .and(query_param("key", "ABC123"))
            .and(query_param("q", "94105"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = format!("{}{CURRENT_PATH}", server.uri());
        let printed = run_args(&[
            "weatherapi-sensor",
            "reading",
            "--api-key",
            "ABC123",
            "--zipcode",
            "94105",
            "--endpoint",
            endpoint.as_str(),
        ])
        .await
        .expect("reading should succeed");

        assert_eq!(printed, body);
    }

    #[tokio::test]
    async fn reading_prints_error_reading_on_401() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let endpoint = format!("{}{CURRENT_PATH}", server.uri());
        let printed = run_args(&[
            "weatherapi-sensor",
            "reading",
            "--api-key",
            "bad",
            "--zipcode",
            "94105",
            "--endpoint",
            endpoint.as_str(),
        ])
        .await
        .expect("error readings are printed, not raised");

        assert_eq!(printed, json!({ "error": "weatherapi.com didn't return 200, instead got 401" }));
    }

    #[tokio::test]
    async fn reading_from_component_file_uses_its_attributes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("key", "COMPONENT_KEY"))
            .and(query_param("q", "10001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "current": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let component = dir.path().join("sensor.json");
        std::fs::write(
            &component,
            json!({
                "name": "backyard",
                "model": "viam-labs:weather-api:current",
                "attributes": { "api_key": "COMPONENT_KEY", "zipcode": "10001" }
            })
            .to_string(),
        )
        .expect("write component file");

        let endpoint = format!("{}{CURRENT_PATH}", server.uri());
        let component = component.to_string_lossy().into_owned();
        let printed = run_args(&[
            "weatherapi-sensor",
            "reading",
            "--component",
            component.as_str(),
            "--endpoint",
            endpoint.as_str(),
        ])
        .await
        .expect("reading should succeed");

        assert_eq!(printed, json!({ "current": {} }));
    }

    #[tokio::test]
    async fn component_file_with_foreign_model_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let component = dir.path().join("sensor.json");
        std::fs::write(
            &component,
            r#"{"name":"backyard","model":"acme:weather:forecast","attributes":{}}"#,
        )
        .expect("write component file");

        let component = component.to_string_lossy().into_owned();
        let err = run_args(&["weatherapi-sensor", "reading", "--component", component.as_str()])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Unknown model"));
    }
}
