// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use axum::body::Body;
use bytes::Bytes;
use http::header::{ALLOW, CONTENT_TYPE, HeaderValue};
use http::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{HttpRequest, HttpResponse};
use crate::{Context, TransportError};

const APPLICATION_JSON: &str = "application/json";

/// Deserializes the first JSON value of the request body into `T`.
///
/// Anything after the first complete value is left unread, so a trailing newline or a
/// second document does not fail the request.
///
/// # Errors
///
/// Returns [`TransportError::EmptyBody`] when the body holds no JSON value and
/// [`TransportError::Decode`] when the first value is not valid JSON for `T`.
pub fn decode_json_request<T: DeserializeOwned>(_ctx: &Context, request: &HttpRequest) -> Result<T, TransportError> {
    serde_json::Deserializer::from_slice(request.body())
        .into_iter::<T>()
        .next()
        .ok_or(TransportError::EmptyBody)?
        .map_err(TransportError::Decode)
}

/// Serializes `response` as a `200 OK` JSON body.
///
/// # Errors
///
/// Returns [`TransportError::Encode`] when `T` fails to serialize.
pub fn encode_json_response<T: Serialize>(_ctx: &Context, response: T) -> Result<HttpResponse, TransportError> {
    let body = serde_json::to_vec(&response).map_err(TransportError::Encode)?;

    Ok(build_response(StatusCode::OK, HeaderValue::from_static(APPLICATION_JSON), body.into()))
}

/// Renders a transport error as `{"error": "..."}` with the error's status.
#[must_use]
pub fn error_response(error: &TransportError) -> HttpResponse {
    let body = serde_json::json!({ "error": error.to_string() });
    let mut response = build_response(error.status(), HeaderValue::from_static(APPLICATION_JSON), body.to_string().into());

    if let TransportError::MethodNotAllowed { allow, .. } = error {
        if let Ok(value) = HeaderValue::from_str(allow.as_str()) {
            response.headers_mut().insert(ALLOW, value);
        }
    }

    response
}

/// Builds a `200 OK` response with an arbitrary textual body and content type.
#[must_use]
pub fn text_response(content_type: &'static str, body: impl Into<Bytes>) -> HttpResponse {
    build_response(StatusCode::OK, HeaderValue::from_static(content_type), body.into())
}

fn build_response(status: StatusCode, content_type: HeaderValue, body: Bytes) -> HttpResponse {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(CONTENT_TYPE, content_type);

    response
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use http::Method;
    use http_body_util::BodyExt;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq, Serialize)]
    struct Ping {
        n: u32,
    }

    async fn body_string(response: HttpResponse) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn decode_accepts_matching_json() {
        let request = HttpRequest::new(Bytes::from_static(br#"{"n":7}"#));

        let ping: Ping = decode_json_request(&Context::new(), &request).unwrap();

        assert_eq!(ping, Ping { n: 7 });
    }

    #[test]
    fn decode_reads_only_the_first_value() {
        let request = HttpRequest::new(Bytes::from_static(b"{\"n\":7}\n{\"n\":8} trailing"));

        let ping: Ping = decode_json_request(&Context::new(), &request).unwrap();

        assert_eq!(ping, Ping { n: 7 });
    }

    #[test]
    fn decode_rejects_empty_body() {
        let request = HttpRequest::new(Bytes::from_static(b"  \n"));

        let error = decode_json_request::<Ping>(&Context::new(), &request).unwrap_err();

        assert!(matches!(error, TransportError::EmptyBody));
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn decode_rejects_malformed_json() {
        let request = HttpRequest::new(Bytes::from_static(b"{\"n\":"));

        let error = decode_json_request::<Ping>(&Context::new(), &request).unwrap_err();

        assert!(matches!(error, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn encode_sets_json_content_type() {
        let response = encode_json_response(&Context::new(), Ping { n: 1 }).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body_string(response).await, r#"{"n":1}"#);
    }

    #[tokio::test]
    async fn error_response_carries_status_and_message() {
        let response = error_response(&TransportError::NotFound { path: "/nope".into() });

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, r#"{"error":"no route for /nope"}"#);
    }

    #[test]
    fn method_not_allowed_sets_allow_header() {
        let response = error_response(&TransportError::MethodNotAllowed {
            method: Method::GET,
            allow: Method::POST,
        });

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "POST");
    }

    #[tokio::test]
    async fn text_response_uses_given_content_type() {
        let response = text_response("text/plain", "hello");

        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(body_string(response).await, "hello");
    }
}
