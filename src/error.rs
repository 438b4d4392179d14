use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Display)]
pub enum AttendanceError {
    /// Work date did not parse as `YYYY-MM-DD`.
    #[display(fmt = "invalid work date '{}', expected YYYY-MM-DD", _0)]
    InvalidWorkDate(String),

    #[display(fmt = "{} not found", _0)]
    NotFound(String),

    #[display(fmt = "storage error: {}", _0)]
    Storage(StoreError),
}

impl std::error::Error for AttendanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttendanceError::Storage(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for AttendanceError {
    fn from(e: sqlx::Error) -> Self {
        AttendanceError::Storage(Box::new(e))
    }
}

impl From<strum::ParseError> for AttendanceError {
    fn from(e: strum::ParseError) -> Self {
        AttendanceError::Storage(Box::new(e))
    }
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::InvalidWorkDate(_) => StatusCode::BAD_REQUEST,
            AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
            AttendanceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AttendanceError::Storage(e) => {
                tracing::error!(error = %e, "Attendance storage failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

pub type Result<T, E = AttendanceError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_http_status() {
        assert_eq!(
            AttendanceError::InvalidWorkDate("2026-13-01".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AttendanceError::NotFound("attendance day".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AttendanceError::Storage("connection refused".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_date_message_names_the_input() {
        let e = AttendanceError::InvalidWorkDate("yesterday".into());
        assert_eq!(
            e.to_string(),
            "invalid work date 'yesterday', expected YYYY-MM-DD"
        );
    }
}
