use std::path::Path;

use config::{Config, ConfigError, Environment, File, Source};
use infrastructure::MonitoringConfig;
use planner::PlannerConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

impl Settings {
    /// Reads the given file, or `config.toml` if present, overridden by `BWPLANNER__*` variables.
    pub fn new(file: Option<&Path>) -> Result<Self, ConfigError> {
        match file {
            Some(path) => Self::load(File::from(path).required(true)),
            None => Self::load(File::with_name("config.toml").required(false)),
        }
    }

    fn load(file: impl Source + Send + Sync + 'static) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(file).add_source(
            Environment::with_prefix("BWPLANNER")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("monitoring.logs.filters"),
        );

        let s = builder.build()?;
        s.try_deserialize()
    }
}
