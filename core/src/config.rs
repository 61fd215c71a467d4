//! Endpoint configuration for the PaymentsWs API.
//!
//! `ClientConfig` caches the composed base URL. Every setter that touches
//! host, version or scheme rebuilds it before returning, so `api_url()` never
//! reflects an older value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::options::RequestOptions;

pub const PRODUCTION_HOST: &str = "sapi.paymentsws.com";
pub const STAGING_HOST: &str = "sapi-stg.paymentsws.com";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_IS_HTTPS: bool = true;
pub const DEFAULT_MODE: Mode = Mode::Sandbox;

pub const ENV_API_KEY: &str = "PAYMENTSWS_API_KEY";
pub const ENV_MODE: &str = "PAYMENTSWS_MODE";
pub const ENV_API_HOST: &str = "PAYMENTSWS_API_HOST";
pub const ENV_API_VERSION: &str = "PAYMENTSWS_API_VERSION";
pub const ENV_API_HTTPS: &str = "PAYMENTSWS_API_HTTPS";

/// Which PaymentsWs environment to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Live,
    #[default]
    Sandbox,
}

impl Mode {
    /// Default host for this mode.
    pub fn host(&self) -> &'static str {
        match self {
            Mode::Live => PRODUCTION_HOST,
            Mode::Sandbox => STAGING_HOST,
        }
    }
}

impl FromStr for Mode {
    type Err = std::convert::Infallible;

    /// Only `live` (any case) selects production; everything else is sandbox.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("live") {
            Ok(Mode::Live)
        } else {
            Ok(Mode::Sandbox)
        }
    }
}

#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    host: String,
    api_version: String,
    is_https: bool,
    extra_options: RequestOptions,
    api_url: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, mode: Mode) -> Self {
        Self::with_options(api_key, mode, RequestOptions::new())
    }

    pub fn with_options(api_key: impl Into<String>, mode: Mode, extra_options: RequestOptions) -> Self {
        let host = mode.host().to_string();
        let api_version = DEFAULT_API_VERSION.to_string();
        let api_url = compose_api_url(DEFAULT_IS_HTTPS, &host, &api_version);
        Self {
            api_key: api_key.into(),
            host,
            api_version,
            is_https: DEFAULT_IS_HTTPS,
            extra_options,
            api_url,
        }
    }

    /// Load configuration from `PAYMENTSWS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`ClientConfig::from_env`] but reads through `lookup`.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing(ENV_API_KEY))?;
        let mode = lookup(ENV_MODE)
            .map(|raw| raw.parse::<Mode>().unwrap_or(DEFAULT_MODE))
            .unwrap_or(DEFAULT_MODE);

        let mut config = Self::new(api_key, mode);
        if let Some(host) = lookup(ENV_API_HOST) {
            config.set_host(host);
        }
        if let Some(version) = lookup(ENV_API_VERSION) {
            config.set_api_version(version);
        }
        if let Some(raw) = lookup(ENV_API_HTTPS) {
            config.set_https(parse_bool(ENV_API_HTTPS, &raw)?);
        }
        Ok(config)
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
        self.refresh_api_url();
    }

    pub fn set_https(&mut self, is_https: bool) {
        self.is_https = is_https;
        self.refresh_api_url();
    }

    pub fn set_api_version(&mut self, version: impl Into<String>) {
        self.api_version = version.into();
        self.refresh_api_url();
    }

    pub fn set_extra_options(&mut self, extra_options: RequestOptions) {
        self.extra_options = extra_options;
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn is_https(&self) -> bool {
        self.is_https
    }

    pub fn extra_options(&self) -> &RequestOptions {
        &self.extra_options
    }

    /// Base URL, always ending in `/`.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn refresh_api_url(&mut self) {
        self.api_url = compose_api_url(self.is_https, &self.host, &self.api_version);
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("host", &self.host)
            .field("api_version", &self.api_version)
            .field("is_https", &self.is_https)
            .field("extra_options", &self.extra_options)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// `scheme://host/version/`. The host is not validated.
pub fn compose_api_url(is_https: bool, host: &str, api_version: &str) -> String {
    let scheme = if is_https { "https://" } else { "http://" };
    format!("{scheme}{host}/{api_version}/")
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}
