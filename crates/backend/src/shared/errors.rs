use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::usecases::common::UseCaseError;
use thiserror::Error;

/// Ошибка валидации входных данных, возвращается сервисами внутри anyhow::Error
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Запись не найдена
#[derive(Debug, Error)]
#[error("{0} not found")]
pub struct NotFoundError(pub String);

pub fn validation(message: impl Into<String>) -> anyhow::Error {
    ValidationError(message.into()).into()
}

pub fn not_found(what: impl Into<String>) -> anyhow::Error {
    NotFoundError(what.into()).into()
}

/// Ошибка HTTP-обработчика с телом `UseCaseError`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: UseCaseError,
}

impl ApiError {
    pub fn new(status: StatusCode, body: UseCaseError) -> Self {
        Self { status, body }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, UseCaseError::forbidden(message))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            UseCaseError::new("UNAUTHORIZED", message),
        )
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(e) = err.downcast_ref::<ValidationError>() {
            return Self::new(StatusCode::BAD_REQUEST, UseCaseError::validation(&e.0));
        }
        if let Some(e) = err.downcast_ref::<NotFoundError>() {
            return Self::new(StatusCode::NOT_FOUND, UseCaseError::not_found(e.to_string()));
        }
        tracing::error!("Request failed: {:#}", err);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            UseCaseError::internal("Internal server error"),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
