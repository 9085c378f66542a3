// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::{Deserialize, Deserializer, Serialize};
use waypoint::{Context, Endpoint, EndpointError};

use crate::StringService;

/// Body of `POST /uppercase`.
///
/// A missing or `null` `s` reads as the empty string and unknown fields are ignored, so
/// `{}` is a valid request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UppercaseRequest {
    /// Text to convert.
    #[serde(default, alias = "S", deserialize_with = "null_as_empty")]
    pub s: String,
}

/// Response of `POST /uppercase`.
///
/// A business failure is carried in `err` and leaves `v` empty; `err` is omitted from the
/// JSON body on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UppercaseResponse {
    /// The converted text.
    pub v: String,
    /// Display text of the business error, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

/// Body of `POST /count`. Decodes as leniently as [`UppercaseRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRequest {
    /// Text to measure.
    #[serde(default, alias = "S", deserialize_with = "null_as_empty")]
    pub s: String,
}

/// Response of `POST /count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    /// Length of the text in bytes.
    #[serde(rename = "V")]
    pub v: usize,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Endpoint for [`StringService::uppercase`]. Created by [`make_uppercase_endpoint`].
#[derive(Debug, Clone)]
pub struct UppercaseEndpoint<S> {
    service: S,
}

/// Endpoint for [`StringService::count`]. Created by [`make_count_endpoint`].
#[derive(Debug, Clone)]
pub struct CountEndpoint<S> {
    service: S,
}

/// Adapts the `uppercase` operation of `service` to an [`Endpoint`].
///
/// Business errors never fail the endpoint; they are embedded into the response.
#[must_use]
pub fn make_uppercase_endpoint<S: StringService>(service: S) -> UppercaseEndpoint<S> {
    UppercaseEndpoint { service }
}

/// Adapts the `count` operation of `service` to an [`Endpoint`].
#[must_use]
pub fn make_count_endpoint<S: StringService>(service: S) -> CountEndpoint<S> {
    CountEndpoint { service }
}

impl<S: StringService> Endpoint<UppercaseRequest> for UppercaseEndpoint<S> {
    type Response = UppercaseResponse;

    async fn call(&self, ctx: Context, request: UppercaseRequest) -> Result<UppercaseResponse, EndpointError> {
        let response = match self.service.uppercase(&ctx, &request.s) {
            Ok(v) => UppercaseResponse { v, err: None },
            Err(error) => UppercaseResponse {
                v: String::new(),
                err: Some(error.to_string()),
            },
        };

        Ok(response)
    }
}

impl<S: StringService> Endpoint<CountRequest> for CountEndpoint<S> {
    type Response = CountResponse;

    async fn call(&self, ctx: Context, request: CountRequest) -> Result<CountResponse, EndpointError> {
        Ok(CountResponse {
            v: self.service.count(&ctx, &request.s),
        })
    }
}
