//! Error types for the Stagedoor service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main error type for Stagedoor operations.
///
/// The `Display` form of each variant is the machine-readable error code
/// returned to clients in the JSON body.
#[derive(Error, Debug)]
pub enum StagedoorError {
    /// A checkout line item asked for more units than are in stock.
    #[error("OUT_OF_STOCK")]
    OutOfStock {
        name: String,
        size: String,
        available: u32,
    },

    /// Datastore failures (lookup, write, constraint violations)
    #[error("DB_ERROR")]
    Datastore(String),

    /// The requested record does not exist
    #[error("NOT_FOUND")]
    NotFound,

    /// Malformed or missing path identifier
    #[error("INVALID_ID")]
    InvalidId,

    /// Request body could not be decoded
    #[error("INVALID_JSON")]
    InvalidJson,

    /// Authorization header is not a well-formed bearer token
    #[error("INVALID_TOKEN_FORMAT")]
    InvalidTokenFormat,

    /// Bearer token matches neither the admin secret nor a live session
    #[error("INVALID_TOKEN")]
    InvalidToken,

    /// Sign-in credentials were rejected
    #[error("INVALID_CREDENTIALS")]
    InvalidCredentials,

    /// Payment provider call failed
    #[error("PAYMENT_ERROR")]
    Payment(String),

    /// Webhook payload failed signature verification
    #[error("INVALID_SIGNATURE")]
    InvalidSignature,

    /// Email delivery failed
    #[error("EMAIL_ERROR")]
    Email(String),

    /// The multipart upload is missing its image file part, or the part
    /// could not be read
    #[error("IMAGE_FILE_ERROR")]
    ImageFile,

    /// Uploaded image exceeds the size cap
    #[error("IMAGE_MUST_BE_LESS_THAN_3_MEGABYTES")]
    ImageTooLarge,

    /// A required form value is missing or empty
    #[error("INVALID_FORM_VALUE")]
    InvalidFormValue,

    /// Uploaded file is not a JPEG
    #[error("FILE_TYPE_NOT_ALLOWED")]
    FileTypeNotAllowed,

    /// No stored image under the requested key
    #[error("IMAGE_NOT_FOUND")]
    ImageNotFound,

    /// Image storage backend failure
    #[error("IMAGE_STORE_ERROR")]
    ImageStore(String),

    /// The client's source address could not be determined, so no
    /// rate-limit key can be derived. Surfaced as a server error rather
    /// than a silent allow.
    #[error("CLIENT_ADDR_ERROR")]
    ClientAddr,

    /// Configuration-related errors
    #[error("CONFIG_ERROR: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Stagedoor operations.
pub type Result<T> = std::result::Result<T, StagedoorError>;

impl StagedoorError {
    fn status_code(&self) -> StatusCode {
        match self {
            StagedoorError::OutOfStock { .. }
            | StagedoorError::InvalidId
            | StagedoorError::InvalidJson
            | StagedoorError::InvalidCredentials
            | StagedoorError::InvalidSignature
            | StagedoorError::InvalidTokenFormat
            | StagedoorError::ImageFile
            | StagedoorError::ImageTooLarge
            | StagedoorError::InvalidFormValue
            | StagedoorError::FileTypeNotAllowed => StatusCode::BAD_REQUEST,
            StagedoorError::InvalidToken => StatusCode::FORBIDDEN,
            StagedoorError::NotFound | StagedoorError::ImageNotFound => StatusCode::NOT_FOUND,
            StagedoorError::Datastore(_)
            | StagedoorError::ImageStore(_)
            | StagedoorError::Payment(_)
            | StagedoorError::Email(_)
            | StagedoorError::ClientAddr
            | StagedoorError::Config(_)
            | StagedoorError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable storefront message, where one exists beyond the code.
    fn message(&self) -> Option<String> {
        match self {
            StagedoorError::OutOfStock {
                name,
                size,
                available,
            } => Some(match available {
                0 => format!("{size} {name} is out of stock. Please update cart"),
                n => format!("Only {n} {size} {name}(s) in stock. Please update cart"),
            }),
            _ => None,
        }
    }
}

impl IntoResponse for StagedoorError {
    fn into_response(self) -> Response {
        let body = match self.message() {
            Some(message) => json!({ "error": self.to_string(), "message": message }),
            None => json!({ "error": self.to_string() }),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(StagedoorError::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(StagedoorError::InvalidToken.to_string(), "INVALID_TOKEN");
        assert_eq!(
            StagedoorError::InvalidTokenFormat.to_string(),
            "INVALID_TOKEN_FORMAT"
        );
        assert_eq!(
            StagedoorError::ImageTooLarge.to_string(),
            "IMAGE_MUST_BE_LESS_THAN_3_MEGABYTES"
        );
        assert_eq!(
            StagedoorError::FileTypeNotAllowed.to_string(),
            "FILE_TYPE_NOT_ALLOWED"
        );
    }

    #[test]
    fn test_out_of_stock_message() {
        let err = StagedoorError::OutOfStock {
            name: "Logo Tee".to_string(),
            size: "M".to_string(),
            available: 0,
        };
        assert_eq!(
            err.message().unwrap(),
            "M Logo Tee is out of stock. Please update cart"
        );

        let err = StagedoorError::OutOfStock {
            name: "Logo Tee".to_string(),
            size: "L".to_string(),
            available: 2,
        };
        assert_eq!(
            err.message().unwrap(),
            "Only 2 L Logo Tee(s) in stock. Please update cart"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            StagedoorError::InvalidToken.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            StagedoorError::ClientAddr.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(StagedoorError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }
}
