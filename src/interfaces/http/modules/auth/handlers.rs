//! Authentication page handlers

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use tracing::info;

use super::dto::{AuthPage, LoginForm, SignupForm};
use crate::application::AuthService;
use crate::domain::{BookingStep, SessionData, SessionUser};
use crate::interfaces::http::common::{ApiResponse, ValidatedForm};
use crate::interfaces::http::error::HttpResult;
use crate::interfaces::http::session::{with_cookie, MaybeSession, SessionState, LOGIN_PATH};

#[derive(Clone)]
pub struct AuthState {
    pub service: Arc<AuthService>,
}

/// Replace whatever session the browser had with a fresh one for `user`.
async fn start_session(
    sessions: &SessionState,
    previous: &MaybeSession,
    user: SessionUser,
) -> HttpResult<Response> {
    if let Some(old) = &previous.id {
        sessions.store.clear(old).await?;
    }
    let (_, cookie) = sessions.open(SessionData::new(user)).await?;
    Ok(with_cookie(
        Redirect::to(BookingStep::Location.path()),
        cookie,
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Authentication",
    responses(
        (status = 303, description = "To the booking wizard when logged in, to the login page otherwise")
    )
)]
pub async fn index(session: MaybeSession) -> Redirect {
    if session.is_logged_in() {
        Redirect::to(BookingStep::Location.path())
    } else {
        Redirect::to(LOGIN_PATH)
    }
}

#[utoipa::path(
    get,
    path = "/login",
    tag = "Authentication",
    responses(
        (status = 200, description = "Login form", body = ApiResponse<AuthPage>),
        (status = 303, description = "Already logged in")
    )
)]
pub async fn login_page(session: MaybeSession) -> Response {
    if session.is_logged_in() {
        return Redirect::to(BookingStep::Location.path()).into_response();
    }
    Json(ApiResponse::success(AuthPage::login())).into_response()
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in, session cookie set"),
        (status = 401, description = "Invalid email or password", body = ApiResponse<String>),
        (status = 422, description = "Validation error", body = ApiResponse<String>)
    )
)]
pub async fn login(
    State(auth): State<AuthState>,
    State(sessions): State<SessionState>,
    session: MaybeSession,
    ValidatedForm(form): ValidatedForm<LoginForm>,
) -> HttpResult<Response> {
    let user = auth.service.login(&form.email, &form.password).await?;
    start_session(&sessions, &session, user).await
}

#[utoipa::path(
    get,
    path = "/signup",
    tag = "Authentication",
    responses(
        (status = 200, description = "Signup form", body = ApiResponse<AuthPage>),
        (status = 303, description = "Already logged in")
    )
)]
pub async fn signup_page(session: MaybeSession) -> Response {
    if session.is_logged_in() {
        return Redirect::to(BookingStep::Location.path()).into_response();
    }
    Json(ApiResponse::success(AuthPage::signup())).into_response()
}

#[utoipa::path(
    post,
    path = "/signup",
    tag = "Authentication",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Account created and logged in"),
        (status = 409, description = "Email already in use", body = ApiResponse<String>),
        (status = 422, description = "Validation error", body = ApiResponse<String>)
    )
)]
pub async fn signup(
    State(auth): State<AuthState>,
    State(sessions): State<SessionState>,
    session: MaybeSession,
    ValidatedForm(form): ValidatedForm<SignupForm>,
) -> HttpResult<Response> {
    let user = auth
        .service
        .signup(&form.name, &form.email, &form.password)
        .await?;
    start_session(&sessions, &session, user).await
}

#[utoipa::path(
    get,
    path = "/logout",
    tag = "Authentication",
    responses(
        (status = 303, description = "Session destroyed, back to the login page")
    )
)]
pub async fn logout(
    State(sessions): State<SessionState>,
    session: MaybeSession,
) -> HttpResult<Response> {
    if let Some(data) = &session.data {
        info!(user_id = data.user.id, "User logged out");
    }
    let cookie = sessions.close(session.id.as_ref()).await?;
    Ok(with_cookie(Redirect::to(LOGIN_PATH), cookie))
}
