//! Top-level application error type. Wraps [`DomainError`] (rule rejections)
//! alongside the engine's own operational failures, and renders either as an
//! RFC 7807 problem body for anything that reaches an HTTP handler.

use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::errors::{DomainError, ErrorCode};

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("match {0} not found")]
    MatchNotFound(u64),

    #[error("seat {0} is out of range")]
    InvalidSeat(u8),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("configuration error: {detail}")]
    Config { detail: String },

    #[error("internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    pub fn config(detail: impl Into<String>) -> Self {
        AppError::Config { detail: detail.into() }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        AppError::Internal { detail: detail.into() }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::MatchNotFound(_) => ErrorCode::MatchNotFound,
            AppError::InvalidSeat(_) => ErrorCode::InvalidSeat,
            AppError::Domain(d) => d.code(),
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Internal { .. } => ErrorCode::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MatchNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidSeat(_) => StatusCode::BAD_REQUEST,
            AppError::Domain(d) if d.is_local() => StatusCode::CONFLICT,
            AppError::Domain(_) => StatusCode::GONE,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_problem_details(&self) -> ProblemDetails {
        let status = self.status();
        let code = self.code().as_str();
        ProblemDetails {
            type_: format!("https://guandan.internal/errors/{}", code.to_lowercase()),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail: self.to_string(),
            code: code.to_string(),
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars.map(|c| c.to_ascii_lowercase())).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_problem_details())
    }
}
