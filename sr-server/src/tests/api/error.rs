//! Unit tests for error-to-response mapping.

use crate::api::error::ApiError;

use sr_auth::AuthError;
use sr_core::CoreError;

use std::panic::Location;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use error_location::ErrorLocation;
use googletest::prelude::*;

fn here() -> ErrorLocation {
    ErrorLocation::from(Location::caller())
}

#[test]
fn given_invalid_key_when_converted_then_unauthorized() {
    let api_error: ApiError = AuthError::InvalidKey { location: here() }.into();

    let response = api_error.into_response();
    assert_that!(response.status(), eq(StatusCode::UNAUTHORIZED));
}

#[test]
fn given_missing_key_when_converted_then_unauthorized() {
    let api_error: ApiError = AuthError::MissingKey { location: here() }.into();

    let response = api_error.into_response();
    assert_that!(response.status(), eq(StatusCode::UNAUTHORIZED));
}

#[test]
fn given_unconfigured_key_when_converted_then_internal_error() {
    let api_error: ApiError = AuthError::NotConfigured { location: here() }.into();

    let response = api_error.into_response();
    assert_that!(response.status(), eq(StatusCode::INTERNAL_SERVER_ERROR));
}

#[test]
fn given_validation_error_when_converted_then_bad_request_with_field() {
    let api_error: ApiError =
        CoreError::validation("temperature must be a finite number", Some("temperature")).into();

    match &api_error {
        ApiError::Validation { field, .. } => {
            assert_that!(field.as_deref(), some(eq("temperature")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let response = api_error.into_response();
    assert_that!(response.status(), eq(StatusCode::BAD_REQUEST));
}
