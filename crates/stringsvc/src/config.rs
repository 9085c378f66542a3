// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

use crate::Error;

/// Process configuration.
///
/// Every field has a default, so an empty document `{}` is a valid configuration. Unknown
/// fields are rejected to surface typos early.
///
/// ```
/// use stringsvc::Config;
///
/// let config = Config::from_json(r#"{ "listen": "127.0.0.1:9000" }"#)?;
///
/// assert_eq!(config.listen.port(), 9000);
/// assert_eq!(config.metrics.namespace, "my_group");
/// # Ok::<(), stringsvc::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct Config {
    /// Address the HTTP server listens on.
    pub listen: SocketAddr,
    /// Naming of the exported metrics.
    pub metrics: MetricsConfig,
    /// Log output settings.
    pub log: LogConfig,
}

/// Prefixes applied to every exported metric name: `<namespace>_<subsystem>_<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct MetricsConfig {
    /// First name segment.
    pub namespace: String,
    /// Second name segment.
    pub subsystem: String,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directives. `RUST_LOG` takes precedence when set.
    pub filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            metrics: MetricsConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: "my_group".to_owned(),
            subsystem: "string_service".to_owned(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { filter: "info".to_owned() }
    }
}

impl Config {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseConfig`] when the document is malformed or has unknown fields.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(Error::ParseConfig)
    }

    /// Reads and parses the JSON configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadConfig`] when the file cannot be read and [`Error::ParseConfig`]
    /// when its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&text)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.listen.to_string(), "0.0.0.0:8080");
        assert_eq!(config.metrics.namespace, "my_group");
        assert_eq!(config.metrics.subsystem, "string_service");
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = Config::from_json(r#"{ "metrics": { "namespace": "acme" } }"#).unwrap();

        assert_eq!(config.metrics.namespace, "acme");
        assert_eq!(config.metrics.subsystem, "string_service");
        assert_eq!(config.listen, Config::default().listen);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let error = Config::from_json(r#"{ "listn": "127.0.0.1:1" }"#).unwrap_err();

        assert!(matches!(error, Error::ParseConfig(_)));
    }

    #[test]
    fn invalid_listen_is_rejected() {
        assert!(matches!(Config::from_json(r#"{ "listen": "nowhere" }"#), Err(Error::ParseConfig(_))));
    }
}
