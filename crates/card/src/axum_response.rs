//! Returning a [`Response`] straight from an axum handler

use crate::response::Response;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response as HttpResponse};

impl IntoResponse for Response {
    fn into_response(self) -> HttpResponse {
        match self.output() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode card response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
