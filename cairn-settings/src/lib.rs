#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! # Cairn Settings
//!
//! Configuration is specified in several ways, with later methods overriding
//! earlier ones.
//!
//! 1. A base configuration checked into the repository, in `config/base.yaml`.
//!    This provides the default values for most settings.
//! 2. Per-environment configuration files in the `config` directory. The
//!    environment is selected using the environment variable `CAIRN_ENV`. The
//!    settings for that environment are then loaded from `config/${env}.yaml`,
//!    if it exists. The default environment is "development". A "production"
//!    environment is also provided.
//! 3. A local configuration file not checked into the repository, at
//!    `config/local.yaml`. This file is in `.gitignore` and is safe to use for
//!    local configuration and secrets if desired.
//! 4. Environment variables that begin with `CAIRN_` and have `__` as a
//!    separator. For example, `Settings::portal::endpoint` can be controlled
//!    from the environment variable `CAIRN_PORTAL__ENDPOINT`.
//!
//! Tests should use `Settings::load_for_tests` which only reads from
//! `config/base.yaml`, `config/test.yaml`, and `config/local_test.yaml` (if it
//! exists). It does not read from environment variables.
//!
//! Configuration files are canonically YAML files. However, any format
//! supported by the [config] crate can be used, including JSON and TOML. To
//! choose another format, simply use a different extension for your file, like
//! `config/local.toml`.

mod logging;

pub use logging::{FilterDirectives, LogFormat, LoggingSettings};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use std::time::Duration;

/// Top level settings object for Cairn.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[doc(inline)]
pub struct Settings {
    /// The environment Cairn is running in. Should only be set with the
    /// `CAIRN_ENV` environment variable.
    pub env: String,

    /// Enable additional features to debug the client. This should not be set
    /// to true in production environments.
    pub debug: bool,

    /// Settings for the data portal being talked to.
    pub portal: PortalSettings,

    /// Settings for the outgoing HTTP client.
    pub http: HttpSettings,

    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Settings for the data portal being talked to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PortalSettings {
    /// Base URL prefix for all relative API requests. May be empty, in which
    /// case requests are root-relative.
    pub endpoint: String,

    /// Absolute base URL used to qualify root-relative storage locations.
    pub site_root: String,
}

/// Settings for the outgoing HTTP client.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Maximum time to wait for a connection to be established, in seconds.
    #[serde_as(as = "DurationSeconds")]
    pub connect_timeout_sec: Duration,

    /// Maximum total time for a request, from connection to the end of the
    /// response body, in seconds.
    #[serde_as(as = "DurationSeconds")]
    pub request_timeout_sec: Duration,
}

impl Settings {
    /// Load settings from configuration files and environment variables.
    ///
    /// # Errors
    /// If any of the configured values are invalid, or if any of the required
    /// configuration files are missing.
    pub fn load() -> Result<Self, ConfigError> {
        let mut s = Config::new();

        // Start off with the base config.
        s.merge(File::with_name("./config/base"))?;

        // Merge in an environment specific config.
        let cairn_env = std::env::var("CAIRN_ENV").unwrap_or_else(|_| "development".to_string());
        s.set("env", cairn_env.as_str())?;
        s.merge(File::with_name(&format!("config/{}", s.get::<String>("env")?)).required(false))?;

        // Add a local configuration file that is `.gitignore`ed.
        s.merge(File::with_name("config/local").required(false))?;

        // Add environment variables that start with "CAIRN_" and have "__" to
        // separate levels. For example, `CAIRN_PORTAL__ENDPOINT` maps to
        // `Settings::portal::endpoint`.
        s.merge(Environment::default().prefix("CAIRN").separator("__"))?;

        s.try_into()
    }

    /// Load settings from configuration files for tests, and apply `changer`
    /// to the result.
    pub fn load_for_tests<F: FnOnce(&mut Self)>(changer: F) -> Self {
        let mut s = Config::new();

        // Start off with the base config.
        s.merge(File::with_name("../config/base"))
            .expect("Could not load base settings");

        // Merge in test specific config.
        s.set("env", "test").expect("Could not set env for tests");
        s.merge(File::with_name("../config/test"))
            .expect("Could not load test settings");

        // Add a local configuration file that is `.gitignore`ed.
        s.merge(File::with_name("../config/local_test").required(false))
            .expect("Could not load local settings for tests");

        let mut settings = s.try_into().expect("Could not convert settings");
        changer(&mut settings);
        settings
    }
}
