//! Cookie-backed session extractors
//!
//! The cookie only carries an opaque [`SessionId`]. Identity and the
//! booking draft live in the injected [`SessionStore`].

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use super::error::HttpError;
use crate::domain::{BookingDraft, DomainResult, SessionData, SessionId, SessionStore};

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    /// Add the `Secure` attribute
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: "car_rental_sid".to_string(),
            secure: false,
        }
    }
}

/// State shared by the session extractors
#[derive(Clone)]
pub struct SessionState {
    pub store: Arc<dyn SessionStore>,
    pub cookie: CookieSettings,
}

impl SessionState {
    /// Store `data` under a brand new id and return the `Set-Cookie` value.
    pub async fn open(&self, data: SessionData) -> DomainResult<(SessionId, HeaderValue)> {
        let id = SessionId::generate();
        self.store.set(&id, data).await?;
        let cookie = session_cookie(&self.cookie, &id);
        Ok((id, cookie))
    }

    /// Drop the stored session, if any. Returns the expiring `Set-Cookie` value.
    pub async fn close(&self, id: Option<&SessionId>) -> DomainResult<HeaderValue> {
        if let Some(id) = id {
            self.store.clear(id).await?;
        }
        Ok(expired_cookie(&self.cookie))
    }
}

/// `Set-Cookie` value for a live session, scoped to the browser session.
pub fn session_cookie(settings: &CookieSettings, id: &SessionId) -> HeaderValue {
    let mut value = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", settings.name, id);
    if settings.secure {
        value.push_str("; Secure");
    }
    header_value(value)
}

pub fn expired_cookie(settings: &CookieSettings) -> HeaderValue {
    let mut value = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", settings.name);
    if settings.secure {
        value.push_str("; Secure");
    }
    header_value(value)
}

// Cookie names come from config and ids are hex, both visible ASCII.
fn header_value(value: String) -> HeaderValue {
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Read the session id from the `Cookie` header(s).
pub fn session_id_from_parts(parts: &Parts, cookie_name: &str) -> Option<SessionId> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| SessionId::from(value.to_string()))
}

/// Attach a `Set-Cookie` header to any response.
pub fn with_cookie(response: impl IntoResponse, cookie: HeaderValue) -> Response {
    let mut response = response.into_response();
    response.headers_mut().append(SET_COOKIE, cookie);
    response
}

/// Session of a logged-in user.
///
/// Handlers that take this extractor are only reachable with a live
/// session; anyone else is sent to the login page.
pub struct CurrentSession {
    pub id: SessionId,
    pub data: SessionData,
    store: Arc<dyn SessionStore>,
}

impl CurrentSession {
    pub fn user_id(&self) -> i32 {
        self.data.user.id
    }

    pub fn draft(&self) -> Option<BookingDraft> {
        self.data.draft.clone()
    }

    /// Replace the draft and write the session back.
    ///
    /// A session that ended meanwhile (logout, expiry) stays ended; the
    /// next request is sent to the login page.
    pub async fn save_draft(&mut self, draft: Option<BookingDraft>) -> DomainResult<()> {
        self.data.draft = draft;
        if !self.store.update(&self.id, self.data.clone()).await? {
            debug!(session = %self.id, "Draft not saved, session already ended");
        }
        Ok(())
    }
}

pub enum SessionRejection {
    /// No cookie, or a cookie the store does not know
    NotLoggedIn,
    Store(HttpError),
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotLoggedIn => Redirect::to(LOGIN_PATH).into_response(),
            Self::Store(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    SessionState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionState::from_ref(state);
        let id = session_id_from_parts(parts, &sessions.cookie.name)
            .ok_or(SessionRejection::NotLoggedIn)?;

        let data = sessions
            .store
            .get(&id)
            .await
            .map_err(|e| SessionRejection::Store(e.into()))?
            .ok_or(SessionRejection::NotLoggedIn)?;

        Ok(Self {
            id,
            data,
            store: sessions.store,
        })
    }
}

/// Session that may be absent, for the public pages.
pub struct MaybeSession {
    /// Id from the cookie, even when the store no longer knows it
    pub id: Option<SessionId>,
    pub data: Option<SessionData>,
}

impl MaybeSession {
    pub fn is_logged_in(&self) -> bool {
        self.data.is_some()
    }
}

impl<S> FromRequestParts<S> for MaybeSession
where
    SessionState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionState::from_ref(state);
        let Some(id) = session_id_from_parts(parts, &sessions.cookie.name) else {
            return Ok(Self {
                id: None,
                data: None,
            });
        };

        let data = sessions.store.get(&id).await?;
        Ok(Self { id: Some(id), data })
    }
}
