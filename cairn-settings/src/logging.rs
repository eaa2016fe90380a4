//! Logging configuration.

use anyhow::{bail, Context};
use serde::{de, Deserialize, Serialize};
use std::{ops::AddAssign, str::FromStr};
use tracing_subscriber::{filter::Directive, EnvFilter};

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// The minimum levels that events are reported at.
    ///
    /// Each entry is a `tracing_subscriber` filter directive, one of `ERROR`,
    /// `WARN`, `INFO`, `DEBUG`, or `TRACE` (in increasing verbosity), with an
    /// optional component that specifies the source of the events, such as
    /// `cairn_client=DEBUG`.
    pub levels: FilterDirectives,

    /// The format to output logs in.
    pub format: LogFormat,
}

/// The format to output logs in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// [`tracing-subscriber`]'s human targeted, pretty format. Includes more
    /// information, multiple lines per log event.
    Pretty,

    /// [`tracing-subscriber`]'s default format. One line per log event.
    Compact,

    /// JSON format. One object per log event.
    Json,
}

/// A validated collection of logging filter directives.
///
/// This struct can be deserialized from either a comma separated string of
/// directives (`"INFO,cairn_client=WARN"`), or from a sequence of comma
/// separated strings (`["INFO", "cairn_client=WARN"]`). This is important
/// because the config files use sequences, but environment variables are
/// always strings.
///
/// Every entry in this struct is guaranteed to be parsable as a valid
/// [`Directive`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterDirectives(Vec<String>);

impl<'de> Deserialize<'de> for FilterDirectives {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        /// The two raw shapes a directive setting can arrive in.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            /// A single comma separated string.
            One(String),
            /// A sequence of comma separated strings.
            Many(Vec<String>),
        }

        let parts = match Raw::deserialize(deserializer)? {
            Raw::One(s) => vec![s],
            Raw::Many(v) => v,
        };

        let mut rv = FilterDirectives(Vec::new());
        for part in parts {
            let parsed: FilterDirectives = part.parse().map_err(|err: anyhow::Error| {
                de::Error::invalid_value(de::Unexpected::Str(&part), &err.to_string().as_str())
            })?;
            rv += parsed;
        }
        Ok(rv)
    }
}

impl FromStr for FilterDirectives {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<String> = s.split(',').map(|part| part.to_string()).collect();

        // Test that each part can be parsed as a logging filter directive.
        if let Some(err) = parts.iter().find_map(|p| p.parse::<Directive>().err()) {
            return Err(err).context("valid syntax");
        }

        // Directives with hyphens in them are foot-guns: crate names always
        // appear with underscores in filter targets.
        if parts.iter().any(|p| p.contains('-')) {
            bail!("log targets must not include hyphens");
        }

        Ok(Self(parts))
    }
}

impl AddAssign for FilterDirectives {
    fn add_assign(&mut self, rhs: Self) {
        self.0.extend(rhs.0);
    }
}

impl From<&FilterDirectives> for EnvFilter {
    fn from(val: &FilterDirectives) -> Self {
        let mut rv = EnvFilter::default();
        for directive in &val.0 {
            rv = rv.add_directive(directive.parse().unwrap());
        }
        rv
    }
}
