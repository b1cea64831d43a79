use resolver::ResolverConfig;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

const DEFAULT_STATSD_PORT: u16 = 8125;

fn default_statsd_port() -> u16 {
    DEFAULT_STATSD_PORT
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    #[serde(default = "default_statsd_port")]
    pub statsd_port: u16,
}

#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct LoggingConfig {
    pub sentry_dsn: Option<String>,
}

#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct Config {
    pub metrics: Option<MetricsConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    /// Loads the config file when one is given, otherwise uses the public
    /// provider endpoints. Credentials from the environment apply either way.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let mut config = Config::from_file(path)?;
                config.resolver = config.resolver.with_env_credentials();
                Ok(config)
            }
            None => Ok(Config {
                resolver: ResolverConfig::public_endpoints(|name| std::env::var(name).ok()),
                ..Default::default()
            }),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}
