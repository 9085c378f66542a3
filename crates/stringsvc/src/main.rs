// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Serves the string service over HTTP until interrupted.
//!
//! Usage: `stringsvc [CONFIG] [--listen ADDR]`. See [`stringsvc::Args`] for the matching
//! environment variables and [`stringsvc::Config`] for the file format.

use std::error::Error as _;
use std::process::ExitCode;

use clap::Parser;
use stringsvc::{Args, install_subscriber, run};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("stringsvc: {}", describe(&error));
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = install_subscriber(&config.log) {
        eprintln!("stringsvc: {}", describe(&error));
        return ExitCode::FAILURE;
    }

    match run(config, shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %describe(&error), "server.failed");
            ExitCode::FAILURE
        }
    }
}

fn describe(error: &stringsvc::Error) -> String {
    match error.source() {
        Some(source) => format!("{error}: {source}"),
        None => error.to_string(),
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %error, "signal.unavailable");
        std::future::pending::<()>().await;
    }
}
