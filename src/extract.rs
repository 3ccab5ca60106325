//! Extractors that reject malformed requests with the application's JSON error body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::Error;

/// Like [axum::Json], but a body that cannot be parsed is answered with
/// `400 {"error": ...}` instead of axum's plain text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Like [axum::extract::Path], but a parameter that cannot be parsed is
/// answered with `400 {"error": ...}`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);
