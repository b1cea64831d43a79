use crate::providers::{aviationstack, opensky};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const ACCESS_KEY_ENV: &str = "AVIATIONSTACK_ACCESS_KEY";
pub const USERNAME_ENV: &str = "OPENSKY_USERNAME";
pub const PASSWORD_ENV: &str = "OPENSKY_PASSWORD";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Timeout for provider {0} cannot be 0")]
    ZeroTimeout(&'static str),

    #[error("Resolution budget cannot be 0")]
    ZeroBudget,

    #[error("Schedule provider requires an access key (set AVIATIONSTACK_ACCESS_KEY)")]
    MissingAccessKey,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Schedule provider (AviationStack) settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ScheduleProviderConfig {
    /// API root. Defaults to the public AviationStack endpoint.
    pub base_url: Option<Url>,
    pub access_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ScheduleProviderConfig {
    fn default() -> Self {
        ScheduleProviderConfig {
            base_url: None,
            access_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ScheduleProviderConfig {
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(aviationstack::DEFAULT_BASE_URL),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Live-position provider (OpenSky) settings. Credentials are optional;
/// anonymous access is rate limited but works.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LiveProviderConfig {
    pub base_url: Option<Url>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LiveProviderConfig {
    fn default() -> Self {
        LiveProviderConfig {
            base_url: None,
            username: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LiveProviderConfig {
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(opensky::DEFAULT_BASE_URL),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Username and password, only when both are set.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        }
    }
}

/// Resolver configuration. A provider section that is absent means that
/// provider is not used.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ResolverConfig {
    /// Overall time allowed for one resolution, across all provider calls.
    pub resolution_budget_secs: Option<u64>,
    pub schedule_provider: Option<ScheduleProviderConfig>,
    pub live_provider: Option<LiveProviderConfig>,
}

impl ResolverConfig {
    /// Configuration used when no file is given: the live provider at its
    /// public endpoint, and the schedule provider only if an access key is
    /// available from `lookup`.
    pub fn public_endpoints<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let schedule_provider =
            non_empty(lookup(ACCESS_KEY_ENV)).map(|key| ScheduleProviderConfig {
                access_key: Some(key),
                ..Default::default()
            });

        let mut config = ResolverConfig {
            resolution_budget_secs: None,
            schedule_provider,
            live_provider: Some(LiveProviderConfig::default()),
        };
        config.apply_credentials(lookup);
        config
    }

    /// Overrides credentials of configured providers with values from
    /// `lookup`. Unset or empty values leave the configured ones in place.
    pub fn apply_credentials<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(schedule) = &mut self.schedule_provider
            && let Some(key) = non_empty(lookup(ACCESS_KEY_ENV))
        {
            schedule.access_key = Some(key);
        }

        if let Some(live) = &mut self.live_provider {
            if let Some(username) = non_empty(lookup(USERNAME_ENV)) {
                live.username = Some(username);
            }
            if let Some(password) = non_empty(lookup(PASSWORD_ENV)) {
                live.password = Some(password);
            }
        }
    }

    pub fn with_env_credentials(mut self) -> Self {
        self.apply_credentials(|name| std::env::var(name).ok());
        self
    }

    pub fn resolution_budget(&self) -> Option<Duration> {
        self.resolution_budget_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resolution_budget_secs == Some(0) {
            return Err(ValidationError::ZeroBudget);
        }

        if let Some(schedule) = &self.schedule_provider {
            if schedule.timeout_secs == 0 {
                return Err(ValidationError::ZeroTimeout(aviationstack::NAME));
            }
            if schedule.access_key.as_deref().is_none_or(str::is_empty) {
                return Err(ValidationError::MissingAccessKey);
            }
        }

        if let Some(live) = &self.live_provider
            && live.timeout_secs == 0
        {
            return Err(ValidationError::ZeroTimeout(opensky::NAME));
        }

        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
