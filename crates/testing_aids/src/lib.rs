// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! An unpublished crate containing testing utilities for use within this repo.

mod log;
mod metrics;

pub use log::*;
pub use metrics::*;
