//! Error responses.
//!
//! Every failure surfaces as `{"detail": "<message>"}`. Store, settings and
//! task failures are not told apart to the caller: all map to 500. A
//! malformed request keeps the status axum picked for the rejection, and a
//! rejected API key gets 401.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::observability::metrics;
use crate::settings::SettingsError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("invalid value: {0}")]
    InvalidValue(#[from] serde_yaml::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error("{}", .0.body_text())]
    Query(#[from] QueryRejection),

    #[error("missing or invalid API key")]
    Unauthorized,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Store(_) => "store",
            ApiError::Settings(_) => "settings",
            ApiError::InvalidValue(_) => "value",
            ApiError::Task(_) => "task",
            ApiError::Body(_) | ApiError::Query(_) => "request",
            ApiError::Unauthorized => "unauthorized",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Query(rejection) => rejection.status(),
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Configuration request failed");
        } else {
            tracing::warn!(error = %self, "Configuration request rejected");
        }
        metrics::record_error(self.kind());

        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}
