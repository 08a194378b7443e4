use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use serde::Serialize;
pub use server::{router, run_with_listener};

mod server;
mod transactions;
mod user;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::UserNotFound(_)
        | EngineError::PeriodNotFound(_)
        | EngineError::TransactionNotFound(_)
        | EngineError::NoChangeMade(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::StoreTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::Database(_) | EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Internal(msg) => {
            tracing::error!("internal error: {msg}");
            "internal server error".to_string()
        }
        EngineError::StoreTimeout(msg) => {
            tracing::warn!("store timeout: {msg}");
            "storage did not answer in time, nothing was changed".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}
