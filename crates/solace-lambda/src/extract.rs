use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejections (bad syntax, wrong shape, missing
/// content type) surface as a 400 [`ApiError::BadRequest`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
