//! Generic responses produced by the HTTP layer itself.
//!
//! Bodies are deliberately uninformative: failure details go to the log,
//! never to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}

pub fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error").into_response()
}
