// src/models/mod.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub mod session;
pub use session::*;

pub mod team;
pub use team::*;

pub mod vote;
pub use vote::*;

pub mod results;
pub use results::*;

// Admin login models
#[derive(Serialize, Deserialize, Debug)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
}

// JWT claims structure for admin authentication
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String, // Admin username
    pub role: String,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued at
}

// Custom error types
#[derive(Debug, Display, PartialEq)]
pub enum ServiceError {
    #[display(fmt = "Validation error: {}", _0)]
    Validation(String),
    #[display(fmt = "Phase closed: {}", _0)]
    PhaseClosed(String),
    #[display(fmt = "Cannot vote for your own team")]
    SelfVote,
    #[display(fmt = "You have already voted in this session")]
    DuplicateVote,
    #[display(fmt = "Not found: {}", _0)]
    NotFound(String),
    #[display(fmt = "Unauthorized")]
    Unauthorized,
    #[display(fmt = "Store unavailable, please retry")]
    StoreUnavailable,
    #[display(fmt = "Internal Server Error")]
    InternalServerError,
}

impl ServiceError {
    // Stable machine-readable kind for clients
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "ValidationError",
            ServiceError::PhaseClosed(_) => "PhaseClosed",
            ServiceError::SelfVote => "SelfVote",
            ServiceError::DuplicateVote => "DuplicateVote",
            ServiceError::NotFound(_) => "NotFound",
            ServiceError::Unauthorized => "Unauthorized",
            ServiceError::StoreUnavailable => "StoreUnavailable",
            ServiceError::InternalServerError => "InternalError",
        }
    }

    // Message suitable for showing to the end user
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Validation(msg)
            | ServiceError::PhaseClosed(msg)
            | ServiceError::NotFound(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::StoreUnavailable)
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::SelfVote => StatusCode::BAD_REQUEST,
            ServiceError::PhaseClosed(_) => StatusCode::FORBIDDEN,
            ServiceError::DuplicateVote => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.user_message(),
            "retryable": self.is_retryable(),
        }))
    }
}
