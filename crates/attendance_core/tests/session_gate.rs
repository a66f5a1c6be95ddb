use attendance_core::session::{HOME_PATH, LOGIN_PATH};
use attendance_core::{
    resolve_route, LoginResponse, Route, RouteDecision, SessionError, SessionGate,
    StaticTokenSource, TokenSource, UserProfile,
};

struct CookieJar {
    access_token: Option<&'static str>,
}

impl TokenSource for CookieJar {
    fn access_token(&self) -> Option<String> {
        self.access_token.map(str::to_string)
    }
}

#[test]
fn gate_refuses_missing_or_blank_tokens() {
    for source in [StaticTokenSource::signed_out(), StaticTokenSource::signed_in("  ")] {
        let err = SessionGate::authorize(&source).unwrap_err();
        assert_eq!(
            err,
            SessionError::Unauthenticated {
                redirect_to: LOGIN_PATH
            }
        );
    }
}

#[test]
fn gate_accepts_cookie_token_and_carries_user_explicitly() {
    let jar = CookieJar {
        access_token: Some("abc.def"),
    };
    let session = SessionGate::authorize(&jar).unwrap();
    assert_eq!(session.token().as_str(), "abc.def");
    assert!(session.user().is_none());

    let response: LoginResponse = serde_json::from_str(
        r#"{
            "access_token": "abc.def",
            "token_type": "bearer",
            "user": {"id": "1", "username": "admin", "name": "Admin User", "role": {"name": "admin"}}
        }"#,
    )
    .unwrap();
    let user: UserProfile = response.user.unwrap();
    let session = session.with_user(user);

    let user = session.user().unwrap();
    assert_eq!(user.name, "Admin User");
    assert_eq!(user.role.name, "admin");
    assert_eq!(user.section_id, None);
}

#[test]
fn protected_routes_redirect_to_login_without_token() {
    let signed_out = StaticTokenSource::signed_out();
    for path in [
        "/",
        "/students",
        "/attendance",
        "/view-attendance",
        "/reports",
        "/users",
        "/settings",
    ] {
        assert_eq!(
            resolve_route(Route::from_path(path), &signed_out),
            RouteDecision::Redirect(LOGIN_PATH),
            "path {path}"
        );
    }
    assert_eq!(
        resolve_route(Route::Login, &signed_out),
        RouteDecision::Render
    );
    assert_eq!(
        resolve_route(Route::Unknown, &signed_out),
        RouteDecision::Redirect(LOGIN_PATH)
    );
}

#[test]
fn signed_in_visitors_render_pages_and_skip_login() {
    let signed_in = StaticTokenSource::signed_in("token");
    assert_eq!(
        resolve_route(Route::Attendance, &signed_in),
        RouteDecision::Render
    );
    assert_eq!(
        resolve_route(Route::Login, &signed_in),
        RouteDecision::Redirect(HOME_PATH)
    );
    assert_eq!(
        resolve_route(Route::from_path("/missing"), &signed_in),
        RouteDecision::Redirect(HOME_PATH)
    );
    assert_eq!(
        resolve_route(Route::Logout, &signed_in),
        RouteDecision::Redirect(LOGIN_PATH)
    );
}
