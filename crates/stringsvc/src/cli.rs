// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::{Config, Error};

/// Environment variable naming the configuration file when no path is passed on the command line.
pub const CONFIG_ENV: &str = "STRINGSVC_CONFIG";

/// Environment variable supplying `--listen` when the flag is absent.
pub const LISTEN_ENV: &str = "STRINGSVC_LISTEN";

/// Command line of the `stringsvc` binary.
///
/// An explicit argument always wins over its environment variable. The listen address,
/// from either source, replaces whatever the configuration file specified.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "stringsvc", version, about = "Serves the string service over HTTP until interrupted", long_about = None)]
pub struct Args {
    /// JSON configuration file; defaults are used when none is given
    #[arg(value_name = "CONFIG", env = "STRINGSVC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long, value_name = "ADDR", env = "STRINGSVC_LISTEN")]
    pub listen: Option<SocketAddr>,
}

impl Args {
    /// Loads the named configuration file, or the defaults, and applies `--listen`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadConfig`] or [`Error::ParseConfig`] when the file cannot be loaded.
    pub fn into_config(self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(listen) = self.listen {
            config.listen = listen;
        }

        Ok(config)
    }
}
