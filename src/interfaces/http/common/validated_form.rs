//! Validated form extractor for Axum
//!
//! `ValidatedForm<T>` works like `axum::Form<T>`, but additionally runs
//! `validator::Validate::validate()` on the deserialized value.
//! On validation failure it returns a 422 response listing the failing
//! fields, which the page re-renders next to the form.

use axum::extract::rejection::FormRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;
use crate::domain::DomainError;
use crate::interfaces::http::error::HttpError;

/// An extractor that deserializes a urlencoded body and validates it.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct LoginForm {
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn handler(ValidatedForm(form): ValidatedForm<LoginForm>) {
///     // `form` is guaranteed to pass validation
/// }
/// ```
pub struct ValidatedForm<T>(pub T);

pub enum ValidatedFormRejection {
    /// Body missing, wrong content type or not deserializable
    FormError(FormRejection),
    ValidationError(validator::ValidationErrors),
}

/// Flatten field errors into `field: message` pairs.
pub fn describe_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut field_errors: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    field_errors.sort();

    if field_errors.is_empty() {
        "Validation failed".to_string()
    } else {
        field_errors.join("; ")
    }
}

impl IntoResponse for ValidatedFormRejection {
    fn into_response(self) -> Response {
        match self {
            Self::FormError(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid form: {}", rejection.body_text()));
                (rejection.status(), Json(body)).into_response()
            }
            Self::ValidationError(errors) => {
                let body = ApiResponse::<()>::error(describe_validation_errors(&errors));
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

/// For handlers that take `Result<ValidatedForm<T>, _>` so they can check
/// other preconditions before the form. Any rejection becomes a 422.
impl From<ValidatedFormRejection> for HttpError {
    fn from(rejection: ValidatedFormRejection) -> Self {
        let message = match rejection {
            ValidatedFormRejection::FormError(rejection) => {
                format!("Invalid form: {}", rejection.body_text())
            }
            ValidatedFormRejection::ValidationError(errors) => describe_validation_errors(&errors),
        };
        HttpError(DomainError::Validation(message))
    }
}

impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedFormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(ValidatedFormRejection::FormError)?;

        value
            .validate()
            .map_err(ValidatedFormRejection::ValidationError)?;

        Ok(ValidatedForm(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct TestForm {
        #[validate(length(min = 1, max = 10))]
        name: String,
        #[validate(range(min = 1, max = 100))]
        age: u32,
    }

    async fn handler(ValidatedForm(_form): ValidatedForm<TestForm>) -> &'static str {
        "ok"
    }

    async fn send(body: &'static str) -> StatusCode {
        let app = Router::new().route("/test", post(handler));
        let req = Request::builder()
            .method("POST")
            .uri("/test")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        app.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn valid_form_returns_ok() {
        assert_eq!(send("name=Alice&age=30").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn undeserializable_form_is_rejected() {
        assert!(send("name=Alice&age=old").await.is_client_error());
    }

    #[tokio::test]
    async fn validation_failure_returns_422() {
        assert_eq!(send("name=&age=0").await, StatusCode::UNPROCESSABLE_ENTITY);
    }

    async fn deferred(
        form: Result<ValidatedForm<TestForm>, ValidatedFormRejection>,
    ) -> Result<&'static str, HttpError> {
        let ValidatedForm(_form) = form?;
        Ok("ok")
    }

    #[tokio::test]
    async fn deferred_rejection_is_a_422() {
        let app = Router::new().route("/test", post(deferred));
        for body in ["name=Alice&age=old", "name=&age=0"] {
            let req = Request::builder()
                .method("POST")
                .uri("/test")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap();
            let status = app.clone().oneshot(req).await.unwrap().status();
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        }
    }
}
