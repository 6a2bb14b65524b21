use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use rust_decimal::Decimal;

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Validation errors for business rules (rejected before any mutation)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Wallet card does not exist
    #[error("Wallet card not found: {0}")]
    CardNotFound(String),

    /// Wallet card exists but is not active
    #[error("Wallet card is inactive: {0}")]
    CardInactive(String),

    /// Deduction would drive the card balance negative
    #[error("Insufficient balance on card {card_id}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        card_id: String,
        balance: Decimal,
        requested: Decimal,
    },

    /// Repository failure before any wallet mutation took place
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Repository failure after a successful wallet deduction.
    /// The card has already been charged; the deduction record is the
    /// recovery handle. Retrying must not deduct again.
    #[error("Document was not saved but wallet card was already charged (deduction {deduction_id}): {message}")]
    CardChargedNotSaved {
        deduction_id: String,
        message: String,
    },

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine-readable error kind for API consumers
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::CardNotFound(_) => "card_not_found",
            AppError::CardInactive(_) => "card_inactive",
            AppError::InsufficientBalance { .. } => "insufficient_balance",
            AppError::Persistence(_) => "persistence",
            AppError::CardChargedNotSaved { .. } => "card_charged_not_saved",
            AppError::Database(_) => "database",
            AppError::Configuration(_) => "configuration",
            AppError::Internal(_) => "internal",
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::CardNotFound(_) => StatusCode::NOT_FOUND,
            AppError::CardInactive(_) => StatusCode::CONFLICT,
            AppError::InsufficientBalance { .. } => StatusCode::CONFLICT,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::CardChargedNotSaved { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        AppError::Persistence(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
