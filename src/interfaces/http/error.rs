//! Domain error to HTTP response mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use tracing::{error, warn};

use super::common::ApiResponse;
use crate::domain::DomainError;

/// Error returned by every page handler.
#[derive(Debug)]
pub struct HttpError(pub DomainError);

impl From<DomainError> for HttpError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

fn message(status: StatusCode, msg: String) -> Response {
    (status, Json(ApiResponse::<()>::error(msg))).into_response()
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self.0 {
            // Out-of-order wizard navigation goes back to the missing step
            DomainError::PrerequisiteMissing { step } => {
                Redirect::to(step.path()).into_response()
            }
            DomainError::NotFound { entity, .. } => {
                message(StatusCode::NOT_FOUND, format!("{} not found", entity))
            }
            DomainError::Validation(msg) => message(StatusCode::UNPROCESSABLE_ENTITY, msg),
            DomainError::Conflict(msg) => message(StatusCode::CONFLICT, msg),
            DomainError::Unauthorized(msg) => {
                warn!("Rejected credentials");
                message(StatusCode::UNAUTHORIZED, msg)
            }
            err @ (DomainError::Storage(_) | DomainError::Internal(_)) => {
                error!(error = %err, "Request failed");
                message(StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        }
    }
}

pub type HttpResult<T> = Result<T, HttpError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    use crate::domain::BookingStep;

    fn status_of(err: DomainError) -> StatusCode {
        HttpError(err).into_response().status()
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            status_of(DomainError::not_found("Car", "id", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::Validation("bad".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(DomainError::Conflict("dup".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::Unauthorized("no".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(DomainError::Storage("disk".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_prerequisite_redirects_to_step() {
        let resp = HttpError(DomainError::PrerequisiteMissing {
            step: BookingStep::Car,
        })
        .into_response();

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[LOCATION], "/cars");
    }
}
