//! Error types for the Unify client
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Unify client error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 / 인증
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    // ========================================================================
    // HTTP / API
    // ========================================================================
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Ambiguous: {0}")]
    Ambiguous(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    // ========================================================================
    // Resource 관련
    // ========================================================================
    #[error("Unexpected type: expected {expected}, got {actual}")]
    UnexpectedType { expected: String, actual: String },

    #[error("Missing field '{field}' in {resource}")]
    MissingField { resource: String, field: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Map a non-success HTTP status and its body to an error
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => Error::Auth(body),
            404 => Error::NotFound(body),
            _ => Error::Api {
                status,
                message: body,
            },
        }
    }

    /// The resource did not exist on the server
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// 사용자에게 보여줄 수 있는 에러인지 확인
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::Auth(_)
                | Error::NotFound(_)
                | Error::Ambiguous(_)
                | Error::InvalidInput(_)
                | Error::UnexpectedType { .. }
        )
    }

    /// UnexpectedType 에러 생성 헬퍼
    pub fn unexpected_type(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::UnexpectedType {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// MissingField 에러 생성 헬퍼
    pub fn missing_field(resource: impl Into<String>, field: impl Into<String>) -> Self {
        Error::MissingField {
            resource: resource.into(),
            field: field.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            Error::from_status(status.as_u16(), err.to_string())
        } else {
            Error::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(Error::from_status(404, "gone").is_not_found());
        assert!(matches!(Error::from_status(401, "nope"), Error::Auth(_)));
        assert!(matches!(Error::from_status(403, "nope"), Error::Auth(_)));
        match Error::from_status(500, "boom") {
            Error::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_user_facing() {
        assert!(Error::unexpected_type("DEDUP", "CATEGORIZATION").is_user_facing());
        assert!(!Error::Http("connection reset".into()).is_user_facing());
    }

    #[test]
    fn test_display() {
        let err = Error::missing_field("dataset", "name");
        assert_eq!(err.to_string(), "Missing field 'name' in dataset");
    }
}
