//! HTTP request handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub mod combinations;
pub mod health;

/// Bare 404 shared by lookup misses, bad input and unknown routes
pub async fn not_found() -> Response {
    not_found_response()
}

pub fn not_found_response() -> Response {
    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}
