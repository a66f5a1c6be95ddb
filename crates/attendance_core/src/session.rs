//! Session gate in front of ledger-bearing pages.
//!
//! # Responsibility
//! - Decide access from a bearer token read through a `TokenSource`.
//! - Carry the signed-in user as an explicit `SessionContext` value.
//! - Resolve dashboard routes to render/redirect decisions.
//!
//! # Invariants
//! - A missing or blank token is never authorized.
//! - `SessionContext` can only be obtained from `SessionGate::authorize`.
//! - Token text is never written to logs.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Login entry point unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/auth/login";
/// Landing page for authenticated visitors.
pub const HOME_PATH: &str = "/";

/// Client-side source of the bearer token (cookie jar or equivalent).
pub trait TokenSource {
    fn access_token(&self) -> Option<String>;
}

/// Token source over a fixed value.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenSource {
    token: Option<String>,
}

impl StaticTokenSource {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn signed_in(token: impl Into<String>) -> Self {
        Self::new(Some(token.into()))
    }

    pub fn signed_out() -> Self {
        Self::new(None)
    }
}

impl TokenSource for StaticTokenSource {
    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Opaque bearer token issued by the external login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    fn parse(raw: Option<String>) -> Option<Self> {
        let raw = raw?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// `Authorization` header value for REST calls.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl Debug for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BearerToken(<redacted>)")
    }
}

/// Role embedded in the user profile returned at login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub name: String,
}

/// Signed-in user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    /// Section a staff user is attached to, if any.
    #[serde(default)]
    pub section_id: Option<String>,
}

/// Explicit per-session context handed to handlers.
///
/// Holding one proves the gate resolved to authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    token: BearerToken,
    user: Option<UserProfile>,
}

impl SessionContext {
    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Attaches the profile once it is known; returns the updated context.
    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = Some(user);
        self
    }
}

/// Session gate failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No usable token; the caller should navigate to `redirect_to`.
    Unauthenticated { redirect_to: &'static str },
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated { redirect_to } => {
                write!(f, "not authenticated; redirect to {redirect_to}")
            }
        }
    }
}

impl Error for SessionError {}

/// Bearer-token access check.
pub struct SessionGate;

impl SessionGate {
    /// Authorizes the current visitor.
    ///
    /// # Errors
    /// - `SessionError::Unauthenticated` when the token is missing or blank.
    pub fn authorize(source: &impl TokenSource) -> Result<SessionContext, SessionError> {
        match BearerToken::parse(source.access_token()) {
            Some(token) => {
                debug!("event=session_gate module=session status=ok");
                Ok(SessionContext { token, user: None })
            }
            None => {
                warn!(
                    "event=session_gate module=session status=denied redirect={}",
                    LOGIN_PATH
                );
                Err(SessionError::Unauthenticated {
                    redirect_to: LOGIN_PATH,
                })
            }
        }
    }

    /// Whether the source currently holds a usable token.
    pub fn is_authenticated(source: &impl TokenSource) -> bool {
        BearerToken::parse(source.access_token()).is_some()
    }
}

/// Dashboard routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Overview,
    Students,
    Attendance,
    ViewAttendance,
    Reports,
    Users,
    Settings,
    Login,
    Logout,
    Unknown,
}

impl Route {
    /// Maps a path to its route; unrecognized paths map to `Unknown`.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match normalized {
            "" | "/" => Self::Overview,
            "/students" => Self::Students,
            "/attendance" => Self::Attendance,
            "/view-attendance" => Self::ViewAttendance,
            "/reports" => Self::Reports,
            "/users" => Self::Users,
            "/settings" => Self::Settings,
            "/auth/login" => Self::Login,
            "/logout" => Self::Logout,
            _ => Self::Unknown,
        }
    }

    /// Routes that require an authorized session.
    pub fn is_protected(self) -> bool {
        matches!(
            self,
            Self::Overview
                | Self::Students
                | Self::Attendance
                | Self::ViewAttendance
                | Self::Reports
                | Self::Users
                | Self::Settings
        )
    }
}

/// Outcome of resolving a route against the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render,
    Redirect(&'static str),
}

/// Decides whether `route` renders or redirects for the current visitor.
pub fn resolve_route(route: Route, source: &impl TokenSource) -> RouteDecision {
    let authenticated = SessionGate::is_authenticated(source);
    match route {
        Route::Logout => RouteDecision::Redirect(LOGIN_PATH),
        Route::Login if authenticated => RouteDecision::Redirect(HOME_PATH),
        Route::Login => RouteDecision::Render,
        Route::Unknown if authenticated => RouteDecision::Redirect(HOME_PATH),
        Route::Unknown => RouteDecision::Redirect(LOGIN_PATH),
        _ if authenticated => RouteDecision::Render,
        _ => RouteDecision::Redirect(LOGIN_PATH),
    }
}

#[cfg(test)]
mod tests {
    use super::{BearerToken, Route};

    #[test]
    fn blank_tokens_are_treated_as_absent() {
        assert!(BearerToken::parse(None).is_none());
        assert!(BearerToken::parse(Some("   ".to_string())).is_none());
        let token = BearerToken::parse(Some(" abc ".to_string())).unwrap();
        assert_eq!(token.authorization_header(), "Bearer abc");
        assert!(!format!("{token:?}").contains("abc"));
    }

    #[test]
    fn paths_map_to_routes() {
        assert_eq!(Route::from_path("/"), Route::Overview);
        assert_eq!(Route::from_path("/view-attendance/"), Route::ViewAttendance);
        assert_eq!(Route::from_path("/auth/login"), Route::Login);
        assert_eq!(Route::from_path("/nope"), Route::Unknown);
        assert!(Route::Attendance.is_protected());
        assert!(!Route::Login.is_protected());
    }
}
