use std::path::Path;

use config::{Config as CConfig, ConfigBuilder, Environment, builder::DefaultState};
use serde::{Deserialize, Serialize};

use crate::{
    conf::{BenchmarkConfig, DatabaseConfig},
    core::BulkError::{self, ConfigParsingError},
};

const ENV_PREFIX: &str = "BULKOPS";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, BulkError> {
        let builder = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml));
        Self::build(builder)
    }

    /// Loads an optional TOML file, then applies `BULKOPS_SECTION__KEY`
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Config, BulkError> {
        Self::load_with_env(path, Self::environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Config, BulkError> {
        let mut builder = CConfig::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }
        Self::build(builder.add_source(env))
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("benchmark.strategies")
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Config, BulkError> {
        let config = builder
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BulkError> {
        self.database.validate()?;
        self.benchmark.validate()
    }
}
