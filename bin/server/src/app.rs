//! Application router.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use recruit_portal_platform_access::Role;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState, authenticate, authorize};
use crate::portal;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let applicant = Router::new()
        .route("/applicant/dashboard", get(portal::dashboard))
        .route("/applicant/profile", get(portal::dashboard));

    let recruiter = Router::new().route("/recruiter/dashboard", get(portal::dashboard));

    let pending = Router::new()
        .route("/recruiter/pending", get(portal::dashboard))
        .route("/recruiter/onboarding", get(portal::onboarding))
        .route(
            "/recruiter/onboarding/cancel",
            post(portal::cancel_onboarding),
        );

    let admin = Router::new()
        .route("/admin/dashboard", get(portal::dashboard))
        .route("/admin/pending-recruiters", get(portal::pending_recruiters))
        .route("/admin/users", get(portal::all_users))
        .route(
            "/admin/approve-recruiter/{id}",
            post(portal::approve_recruiter),
        )
        .route("/admin/reject-recruiter/{id}", post(portal::reject_recruiter));

    Router::new()
        .route("/", get(portal::home))
        .route("/health", get(portal::health))
        .route("/auth/login", get(auth::login))
        .route("/auth/login/{role}", get(auth::login_as))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", get(auth::logout))
        .merge(gated(applicant, Role::Applicant, &state))
        .merge(gated(recruiter, Role::Recruiter, &state))
        .merge(gated(pending, Role::Pending, &state))
        .merge(gated(admin, Role::Admin, &state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Puts a route group behind the role gate for `required`.
fn gated(routes: Router<AppState>, required: Role, state: &AppState) -> Router<AppState> {
    routes
        .route_layer(from_fn_with_state(required, authorize))
        .route_layer(from_fn_with_state(state.clone(), authenticate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthService;
    use crate::config::RedirectConfig;
    use crate::testing::{FakeProvider, body_json, identity, set_cookie, test_session_config};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::LOCATION},
        response::Response,
    };
    use axum_extra::extract::cookie::Key;
    use recruit_portal_platform_access::{
        MemorySessionStore, MemoryUserStore, User, UserDirectory, UserStore,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        users: Arc<MemoryUserStore>,
        sessions: Arc<MemorySessionStore>,
    }

    fn test_app() -> TestApp {
        let users = Arc::new(MemoryUserStore::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let provider = FakeProvider::new()
            .with_user("ada-code", identity("ada@example.com"))
            .with_user(
                "rec-code",
                identity("rec@example.com").with_picture("https://img/rec.png"),
            )
            .with_user("root-code", identity("root@example.com"));
        let auth = AuthService::new(
            Arc::new(provider),
            UserDirectory::new(users.clone()),
            sessions.clone(),
            RedirectConfig::default(),
        );
        let state = AppState::new(auth, Key::generate(), test_session_config());
        TestApp {
            router: router(state),
            users,
            sessions,
        }
    }

    impl TestApp {
        async fn send(&self, method: &str, uri: &str, cookie: Option<&str>) -> Response {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(cookie) = cookie {
                builder = builder.header("cookie", cookie);
            }
            self.router
                .clone()
                .oneshot(builder.body(Body::empty()).expect("request"))
                .await
                .expect("response")
        }

        async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
            self.send("GET", uri, cookie).await
        }

        /// Starts a login; returns the cookie and the issued state token.
        async fn start_login(&self, path: &str) -> (String, String) {
            let response = self.get(path, None).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            let state = location(&response)
                .split("state=")
                .nth(1)
                .expect("state in redirect")
                .to_string();
            (set_cookie(&response).expect("login cookie"), state)
        }

        /// Full login; returns the authenticated cookie and the landing URL.
        async fn sign_in(&self, path: &str, code: &str) -> (String, String) {
            let (cookie, state) = self.start_login(path).await;
            let response = self
                .get(
                    &format!("/auth/callback?code={code}&state={state}"),
                    Some(&cookie),
                )
                .await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            (
                set_cookie(&response).expect("session cookie"),
                location(&response),
            )
        }

        async fn seed(&self, email: &str, role: Role) -> User {
            let user = User::from_identity(&identity(email), role);
            assert!(self.users.insert_if_absent(&user).await.expect("seed"));
            user
        }
    }

    fn location(response: &Response) -> String {
        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("location header")
            .to_string()
    }

    #[tokio::test]
    async fn health_and_anonymous_home() {
        let app = test_app();
        assert_eq!(app.get("/health", None).await.status(), StatusCode::OK);

        let home = app.get("/", None).await;
        assert_eq!(home.status(), StatusCode::OK);
        assert!(body_json(home).await.is_null());
    }

    #[tokio::test]
    async fn login_redirects_to_provider_with_state() {
        let app = test_app();
        let response = app.get("/auth/login", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(location(&response).starts_with("https://provider.test/auth?state="));
        assert!(set_cookie(&response).is_some());
    }

    #[tokio::test]
    async fn applicant_signup_lands_on_applicant_dashboard() {
        let app = test_app();
        let (cookie, landing) = app.sign_in("/auth/login", "ada-code").await;
        assert_eq!(landing, "/applicant/dashboard");

        let dashboard = app.get("/applicant/dashboard", Some(&cookie)).await;
        assert_eq!(dashboard.status(), StatusCode::OK);
        let body = body_json(dashboard).await;
        assert_eq!(body["role"], "applicant");
        assert_eq!(body["email"], "ada@example.com");

        let home = body_json(app.get("/", Some(&cookie)).await).await;
        assert_eq!(home["name"], "ada");
    }

    #[tokio::test]
    async fn recruiter_signup_is_pending() {
        let app = test_app();
        let (cookie, landing) = app.sign_in("/auth/login/recruiter", "rec-code").await;
        assert_eq!(landing, "/recruiter/onboarding");

        let onboarding = app.get("/recruiter/onboarding", Some(&cookie)).await;
        assert_eq!(onboarding.status(), StatusCode::OK);
        assert_eq!(body_json(onboarding).await["logo_hint"], "https://img/rec.png");

        assert_eq!(
            app.get("/recruiter/pending", Some(&cookie)).await.status(),
            StatusCode::OK
        );
        let dashboard = app.get("/recruiter/dashboard", Some(&cookie)).await;
        assert_eq!(dashboard.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(dashboard).await["error"], "Recruiters only");
    }

    #[tokio::test]
    async fn unknown_role_hint_defaults_to_applicant() {
        let app = test_app();
        let (_, landing) = app.sign_in("/auth/login/superuser", "ada-code").await;
        assert_eq!(landing, "/applicant/dashboard");
    }

    #[tokio::test]
    async fn existing_admin_keeps_role_from_applicant_login() {
        let app = test_app();
        app.seed("root@example.com", Role::Admin).await;

        let (cookie, landing) = app.sign_in("/auth/login", "root-code").await;
        assert_eq!(landing, "/admin/dashboard");
        assert_eq!(
            app.get("/admin/dashboard", Some(&cookie)).await.status(),
            StatusCode::OK
        );
        assert_eq!(
            app.get("/applicant/dashboard", Some(&cookie))
                .await
                .status(),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn admin_self_signup_goes_home_without_session() {
        let app = test_app();
        let (cookie, state) = app.start_login("/auth/login/admin").await;
        let response = app
            .get(
                &format!("/auth/callback?code=root-code&state={state}"),
                Some(&cookie),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(app.users.len().await, 0);
        assert_eq!(app.sessions.len().await, 0);

        let after = set_cookie(&response).expect("cookie rewritten");
        assert_eq!(
            app.get("/admin/dashboard", Some(&after)).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn forged_state_is_unauthorized() {
        let app = test_app();
        let (cookie, _) = app.start_login("/auth/login").await;
        let response = app
            .get("/auth/callback?code=ada-code&state=forged", Some(&cookie))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(app.users.len().await, 0);
    }

    #[tokio::test]
    async fn callback_without_login_is_unauthorized() {
        let app = test_app();
        let response = app
            .get("/auth/callback?code=ada-code&state=anything", None)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn state_cannot_be_replayed() {
        let app = test_app();
        let (cookie, state) = app.start_login("/auth/login").await;
        let uri = format!("/auth/callback?code=ada-code&state={state}");

        let first = app.get(&uri, Some(&cookie)).await;
        assert_eq!(first.status(), StatusCode::SEE_OTHER);
        let after = set_cookie(&first).expect("session cookie");

        let replay = app.get(&uri, Some(&after)).await;
        assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn failed_exchange_is_bad_gateway() {
        let app = test_app();
        let (cookie, state) = app.start_login("/auth/login").await;
        let response = app
            .get(
                &format!("/auth/callback?code=unknown&state={state}"),
                Some(&cookie),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"], "Authentication failed");
        assert_eq!(app.users.len().await, 0);
    }

    #[tokio::test]
    async fn logout_without_login_redirects_and_clears() {
        let app = test_app();
        let response = app.get("/auth/logout", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(set_cookie(&response), None);
    }

    #[tokio::test]
    async fn logout_revokes_durable_session() {
        let app = test_app();
        let (cookie, _) = app.sign_in("/auth/login", "ada-code").await;
        assert_eq!(app.sessions.len().await, 1);

        let response = app.get("/auth/logout", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(set_cookie(&response).as_deref(), Some("recruit_session="));
        assert_eq!(app.sessions.len().await, 0);

        assert_eq!(
            app.get("/applicant/dashboard", None).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn admin_approves_pending_recruiter() {
        let app = test_app();
        app.seed("root@example.com", Role::Admin).await;
        let (rec_cookie, _) = app.sign_in("/auth/login/recruiter", "rec-code").await;
        let (admin_cookie, _) = app.sign_in("/auth/login", "root-code").await;

        assert_eq!(
            app.get("/admin/pending-recruiters", Some(&rec_cookie))
                .await
                .status(),
            StatusCode::FORBIDDEN
        );

        let pending = body_json(
            app.get("/admin/pending-recruiters", Some(&admin_cookie))
                .await,
        )
        .await;
        let list = pending.as_array().expect("array");
        assert_eq!(list.len(), 1);
        let id = list[0]["id"].as_str().expect("id").to_string();

        let approve = format!("/admin/approve-recruiter/{id}");
        assert_eq!(
            app.send("POST", &approve, Some(&admin_cookie)).await.status(),
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            app.send("POST", &approve, Some(&admin_cookie)).await.status(),
            StatusCode::CONFLICT
        );

        let (cookie, landing) = app.sign_in("/auth/login/recruiter", "rec-code").await;
        assert_eq!(landing, "/recruiter/dashboard");
        assert_eq!(
            app.get("/recruiter/dashboard", Some(&cookie)).await.status(),
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn admin_rejects_pending_recruiter() {
        let app = test_app();
        app.seed("root@example.com", Role::Admin).await;
        let pending = app.seed("rec@example.com", Role::Pending).await;
        let applicant = app.seed("ada@example.com", Role::Applicant).await;
        let (admin_cookie, _) = app.sign_in("/auth/login", "root-code").await;

        let reject = |id: String| format!("/admin/reject-recruiter/{id}");
        assert_eq!(
            app.send("POST", &reject(applicant.id().to_string()), Some(&admin_cookie))
                .await
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            app.send("POST", &reject(pending.id().to_string()), Some(&admin_cookie))
                .await
                .status(),
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            app.send("POST", &reject(pending.id().to_string()), Some(&admin_cookie))
                .await
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            app.send("POST", &reject("garbage".to_string()), Some(&admin_cookie))
                .await
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(app.users.len().await, 2);
    }

    #[tokio::test]
    async fn pending_recruiter_cancels_own_signup() {
        let app = test_app();
        let (cookie, _) = app.sign_in("/auth/login/recruiter", "rec-code").await;
        assert_eq!(app.users.len().await, 1);

        let response = app
            .send("POST", "/recruiter/onboarding/cancel", Some(&cookie))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(set_cookie(&response).as_deref(), Some("recruit_session="));
        assert_eq!(app.users.len().await, 0);
        assert_eq!(app.sessions.len().await, 0);

        let again = app
            .send("POST", "/recruiter/onboarding/cancel", Some(&cookie))
            .await;
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn only_pending_recruiters_may_cancel_signup() {
        let app = test_app();
        assert_eq!(
            app.send("POST", "/recruiter/onboarding/cancel", None)
                .await
                .status(),
            StatusCode::UNAUTHORIZED
        );

        let (cookie, _) = app.sign_in("/auth/login", "ada-code").await;
        let response = app
            .send("POST", "/recruiter/onboarding/cancel", Some(&cookie))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error"], "Pending recruiters only");
        assert_eq!(app.users.len().await, 1);
    }

    #[tokio::test]
    async fn admin_lists_all_users() {
        let app = test_app();
        app.seed("root@example.com", Role::Admin).await;
        app.seed("rec@example.com", Role::Pending).await;
        let (applicant_cookie, _) = app.sign_in("/auth/login", "ada-code").await;
        let (admin_cookie, _) = app.sign_in("/auth/login", "root-code").await;

        assert_eq!(
            app.get("/admin/users", Some(&applicant_cookie))
                .await
                .status(),
            StatusCode::FORBIDDEN
        );

        let response = app.get("/admin/users", Some(&admin_cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let mut emails: Vec<&str> = body
            .as_array()
            .expect("array")
            .iter()
            .map(|u| u["email"].as_str().expect("email"))
            .collect();
        emails.sort_unstable();
        assert_eq!(
            emails,
            vec!["ada@example.com", "rec@example.com", "root@example.com"]
        );
    }
}
