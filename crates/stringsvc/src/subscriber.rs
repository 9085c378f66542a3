// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use tracing_subscriber::EnvFilter;

use crate::{Error, LogConfig};

/// Installs the global `tracing` subscriber: formatted key=value lines on standard error.
///
/// Directives from `RUST_LOG` take precedence over [`LogConfig::filter`].
///
/// # Errors
///
/// Returns an error when the directives cannot be parsed or a global subscriber is
/// already installed.
pub fn install_subscriber(config: &LogConfig) -> Result<(), Error> {
    let filter = env_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), &config.filter)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(Error::Subscriber)
}

fn env_filter(from_env: Option<&str>, configured: &str) -> Result<EnvFilter, Error> {
    let directives = from_env.filter(|value| !value.trim().is_empty()).unwrap_or(configured);

    EnvFilter::try_new(directives).map_err(|source| Error::LogFilter {
        filter: directives.to_owned(),
        source,
    })
}
