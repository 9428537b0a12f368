pub mod due;
pub mod review;

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};

use crate::db::DbError;
use crate::srs::SessionError;

pub use due::due_summary;
pub use review::{
  answer, exit_session, flip, get_session, grade, next, reconfigure, retry, start_session,
  REVIEW_COOKIE_NAME,
};

/// Errors surfaced by the JSON API
#[derive(Debug)]
pub enum ApiError {
  /// No live session for the request's cookie
  NoSession,
  Session(SessionError),
  Database(DbError),
}

impl std::fmt::Display for ApiError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ApiError::NoSession => write!(f, "No active review session"),
      ApiError::Session(e) => write!(f, "{}", e),
      ApiError::Database(e) => write!(f, "{}", e),
    }
  }
}

impl std::error::Error for ApiError {}

impl From<SessionError> for ApiError {
  fn from(e: SessionError) -> Self {
    ApiError::Session(e)
  }
}

impl From<DbError> for ApiError {
  fn from(e: DbError) -> Self {
    ApiError::Database(e)
  }
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::NoSession => StatusCode::NOT_FOUND,
      ApiError::Session(SessionError::EmptyDeck) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Session(SessionError::CardMismatch { .. }) => StatusCode::BAD_REQUEST,
      ApiError::Session(_) => StatusCode::CONFLICT,
      ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("Request failed: {}", self);
    } else {
      tracing::debug!("Request rejected ({}): {}", status, self);
    }
    (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::DbLockError;
  use crate::srs::Phase;

  #[test]
  fn test_error_status_codes() {
    assert_eq!(ApiError::NoSession.status(), StatusCode::NOT_FOUND);
    assert_eq!(
      ApiError::from(SessionError::EmptyDeck).status(),
      StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
      ApiError::from(SessionError::CardMismatch { expected: 1, got: 2 }).status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::from(SessionError::InvalidPhase {
        expected: Phase::Presenting,
        actual: Phase::Summarizing,
      })
      .status(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::from(DbError::from(DbLockError)).status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }
}
