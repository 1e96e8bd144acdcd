//! Authentication service
//!
//! Owns the token store and the transport used for the `auth/*` endpoints.
//! Provides login, registration, logout and token refresh. Refreshes are
//! single-flight: concurrent callers that saw the same expired token share
//! one `auth/refresh` call.

use futures::lock::Mutex;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::http::{HttpResponse, HttpTransport, RequestDescriptor};
use super::session::{Role, Session, UserRecord};
use super::token_store::TokenStore;

/// Login request body
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Refresh / logout request body
#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Token-bearing response from login, register and refresh
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(alias = "token")]
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<UserRecord>,
}

/// New account details sent to `auth/register`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegistrationData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    /// Extra profile fields, passed through unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RegistrationData {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Outcome of a successful registration
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    /// Backend issued tokens right away; the session is stored
    SignedIn(Session),
    /// Account created but not signed in (e.g. pending approval)
    Confirmation(String),
}

/// Authentication service
pub struct AuthService<T, S> {
    transport: T,
    store: S,
    refresh_gate: Mutex<()>,
}

impl<T, S> AuthService<T, S>
where
    T: HttpTransport,
    S: TokenStore,
{
    pub fn new(transport: T, store: S) -> Self {
        Self {
            transport,
            store,
            refresh_gate: Mutex::new(()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.load().is_some()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.store.load()
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.store.load().map(|s| s.user)
    }

    pub fn role(&self) -> Option<Role> {
        self.store.load().map(|s| s.role())
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.load().map(|s| s.access_token)
    }

    /// Sign in with username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        tracing::info!("Login attempt for user: {}", username);

        let request = RequestDescriptor::post("auth/login")
            .anonymous()
            .json(&LoginRequest { username, password })?;

        let response = self
            .transport
            .send(&request, None)
            .await
            .inspect_err(|e| tracing::warn!("Login request failed: {}", e))?;

        if matches!(response.status, 400 | 401 | 403) {
            tracing::info!("Login rejected for user: {}", username);
            return Err(ApiError::InvalidCredentials);
        }

        let response = response
            .error_for_status()
            .inspect_err(|e| tracing::warn!("Login failed: {}", e))?;

        let session = self.session_from_response(&response, None)?;
        self.store.save(&session);

        tracing::info!(
            "User signed in: {} ({})",
            session.user.username,
            session.role()
        );
        Ok(session)
    }

    /// Create an account
    pub async fn register(&self, data: &RegistrationData) -> Result<Registration, ApiError> {
        tracing::info!("Registration attempt for user: {}", data.username);

        let request = RequestDescriptor::post("auth/register")
            .anonymous()
            .json(data)?;

        let response = self
            .transport
            .send(&request, None)
            .await
            .inspect_err(|e| tracing::warn!("Registration request failed: {}", e))?;

        if response.status == 409 {
            let message = match ApiError::from_response(response.status, &response.body) {
                ApiError::Conflict { message } => message,
                other => other.to_string(),
            };
            tracing::info!("Registration conflict for {}: {}", data.username, message);
            return Err(ApiError::DuplicateUser(message));
        }

        let response = response
            .error_for_status()
            .inspect_err(|e| tracing::warn!("Registration failed: {}", e))?;

        let value: serde_json::Value = response.json()?;
        let has_tokens = value.get("access_token").is_some() || value.get("token").is_some();

        if !has_tokens {
            let message = value
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Registration successful")
                .to_string();
            tracing::info!("User registered, awaiting sign in: {}", data.username);
            return Ok(Registration::Confirmation(message));
        }

        let session = self.session_from_response(&response, None)?;
        self.store.save(&session);
        tracing::info!("User registered and signed in: {}", session.user.username);

        Ok(Registration::SignedIn(session))
    }

    /// Exchange the stored refresh credential for a new access token
    pub async fn refresh(&self) -> Result<Session, ApiError> {
        let current = self.access_token();
        self.refresh_after(current.as_deref()).await
    }

    /// Refresh on behalf of a request that was rejected while carrying
    /// `stale_token`.
    ///
    /// Refreshes are serialized. If the stored token already differs from
    /// `stale_token`, another caller refreshed in the meantime and its session
    /// is returned without a network call. If that caller's refresh failed the
    /// store is empty and this returns [`ApiError::SessionExpired`].
    pub async fn refresh_after(&self, stale_token: Option<&str>) -> Result<Session, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        let Some(current) = self.store.load() else {
            tracing::debug!("No session to refresh");
            return Err(ApiError::SessionExpired);
        };

        if stale_token != Some(current.access_token.as_str()) {
            tracing::debug!("Session already refreshed by a concurrent request");
            return Ok(current);
        }

        self.exchange(current).await
    }

    async fn exchange(&self, current: Session) -> Result<Session, ApiError> {
        tracing::debug!("Refreshing access token for {}", current.user.username);

        let (request, bearer) = match current.refresh_token.as_deref() {
            Some(refresh_token) => (
                RequestDescriptor::post("auth/refresh")
                    .anonymous()
                    .json(&RefreshRequest { refresh_token })?,
                None,
            ),
            None => (
                RequestDescriptor::post("auth/refresh").json(&serde_json::json!({}))?,
                Some(current.access_token.as_str()),
            ),
        };

        // Any failed refresh ends the session before the error reaches the caller
        let response = match self.transport.send(&request, bearer).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Token refresh request failed, signing out: {}", e);
                self.logout();
                return Err(ApiError::SessionExpired);
            }
        };

        if !response.is_success() {
            tracing::warn!(
                "Token refresh failed ({}), signing out {}",
                response.status,
                current.user.username
            );
            self.logout();
            return Err(ApiError::SessionExpired);
        }

        match self.session_from_response(&response, Some(current)) {
            Ok(session) => {
                self.store.save(&session);
                tracing::info!("Access token refreshed for {}", session.user.username);
                Ok(session)
            }
            Err(e) => {
                tracing::warn!("Unreadable refresh response, signing out: {}", e);
                self.logout();
                Err(ApiError::SessionExpired)
            }
        }
    }

    /// Clear the stored session. Idempotent.
    pub fn logout(&self) {
        if self.store.load().is_some() {
            tracing::info!("Signing out");
        }
        self.store.clear();
    }

    /// Tell the backend to revoke the refresh token, then [`logout`](Self::logout).
    /// Backend errors are logged and ignored.
    pub async fn sign_out(&self) {
        if let Some(session) = self.store.load() {
            let body = session
                .refresh_token
                .as_deref()
                .map(|refresh_token| RefreshRequest { refresh_token });

            let request = match body {
                Some(body) => RequestDescriptor::post("auth/logout").json(&body),
                None => RequestDescriptor::post("auth/logout").json(&serde_json::json!({})),
            };

            match request {
                Ok(request) => {
                    if let Err(e) = self
                        .transport
                        .send(&request, Some(&session.access_token))
                        .await
                    {
                        tracing::debug!("Logout notification failed: {}", e);
                    }
                }
                Err(e) => tracing::debug!("Could not build logout request: {}", e),
            }
        }

        self.logout();
    }

    fn session_from_response(
        &self,
        response: &HttpResponse,
        previous: Option<Session>,
    ) -> Result<Session, ApiError> {
        let tokens: TokenResponse = response.json()?;

        let (previous_user, previous_refresh) = match previous {
            Some(session) => (Some(session.user), session.refresh_token),
            None => (None, None),
        };

        let user = tokens
            .user
            .or(previous_user)
            .ok_or_else(|| ApiError::Decode("Auth response is missing the user".to_string()))?;

        Ok(Session::new(
            tokens.access_token,
            tokens.refresh_token.or(previous_refresh),
            user,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tests::{MockTransport, student_session, user_json};
    use crate::core::token_store::MemoryTokenStore;

    fn service(transport: MockTransport) -> AuthService<MockTransport, MemoryTokenStore> {
        AuthService::new(transport, MemoryTokenStore::new())
    }

    #[tokio::test]
    async fn test_login_stores_session() {
        let transport = MockTransport::new().respond(
            "auth/login",
            200,
            &format!(
                r#"{{"access_token": "a1", "refresh_token": "r1", "user": {}}}"#,
                user_json("student")
            ),
        );
        let auth = service(transport);

        let session = auth.login("sam", "secret").await.unwrap();

        assert_eq!(session.access_token, "a1");
        assert_eq!(auth.role(), Some(Role::Student));
        assert!(auth.is_logged_in());

        let calls = auth.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].bearer, None);
        assert_eq!(
            calls[0].json_body()["username"],
            serde_json::json!("sam")
        );
    }

    #[tokio::test]
    async fn test_login_accepts_token_alias() {
        let transport = MockTransport::new().respond(
            "auth/login",
            200,
            &format!(r#"{{"token": "a1", "user": {}}}"#, user_json("admin")),
        );
        let auth = service(transport);

        let session = auth.login("root", "secret").await.unwrap();
        assert_eq!(session.access_token, "a1");
        assert!(session.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_login_rejected_is_invalid_credentials() {
        let transport =
            MockTransport::new().respond("auth/login", 401, r#"{"error": "bad password"}"#);
        let auth = service(transport);

        let err = auth.login("sam", "wrong").await.unwrap_err();
        assert_eq!(err, ApiError::InvalidCredentials);
        assert!(!auth.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_server_error_is_not_credentials() {
        let transport = MockTransport::new().respond("auth/login", 502, "");
        let auth = service(transport);

        let err = auth.login("sam", "secret").await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_login_network_error() {
        let transport = MockTransport::new().fail("auth/login", "connection refused");
        let auth = service(transport);

        let err = auth.login("sam", "secret").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn test_register_with_tokens_signs_in() {
        let transport = MockTransport::new().respond(
            "auth/register",
            201,
            &format!(r#"{{"access_token": "a1", "user": {}}}"#, user_json("student")),
        );
        let auth = service(transport);

        let data = RegistrationData::new("sam", "sam@uni.edu", "longpassword", Role::Student)
            .with_field("student_id", "S-1001");
        let outcome = auth.register(&data).await.unwrap();

        assert!(matches!(outcome, Registration::SignedIn(_)));
        assert!(auth.is_logged_in());

        let body = auth.transport().calls()[0].json_body();
        assert_eq!(body["student_id"], serde_json::json!("S-1001"));
        assert_eq!(body["role"], serde_json::json!("student"));
    }

    #[tokio::test]
    async fn test_register_without_tokens_returns_confirmation() {
        let transport = MockTransport::new().respond(
            "auth/register",
            201,
            r#"{"message": "Account pending approval"}"#,
        );
        let auth = service(transport);

        let data = RegistrationData::new("prof", "prof@uni.edu", "longpassword", Role::Faculty);
        let outcome = auth.register(&data).await.unwrap();

        assert_eq!(
            outcome,
            Registration::Confirmation("Account pending approval".to_string())
        );
        assert!(!auth.is_logged_in());
    }

    #[tokio::test]
    async fn test_register_validation_errors_pass_through() {
        let transport = MockTransport::new().respond(
            "auth/register",
            400,
            r#"{"message": "Invalid data", "errors": {"email": ["Enter a valid email"]}}"#,
        );
        let auth = service(transport);

        let data = RegistrationData::new("sam", "nope", "longpassword", Role::Student);
        let err = auth.register(&data).await.unwrap_err();

        let fields = err.field_errors().unwrap();
        assert_eq!(fields["email"], vec!["Enter a valid email".to_string()]);
    }

    #[tokio::test]
    async fn test_register_conflict_is_duplicate_user() {
        let transport = MockTransport::new().respond(
            "auth/register",
            409,
            r#"{"error": "Username already taken"}"#,
        );
        let auth = service(transport);

        let data = RegistrationData::new("sam", "sam@uni.edu", "longpassword", Role::Student);
        let err = auth.register(&data).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::DuplicateUser("Username already taken".to_string())
        );
    }

    #[tokio::test]
    async fn test_refresh_replaces_session_and_keeps_user() {
        let transport =
            MockTransport::new().respond("auth/refresh", 200, r#"{"access_token": "a2"}"#);
        let auth = AuthService::new(
            transport,
            MemoryTokenStore::with_session(student_session("a1")),
        );

        let session = auth.refresh().await.unwrap();

        assert_eq!(session.access_token, "a2");
        assert_eq!(session.refresh_token.as_deref(), Some("refresh-a1"));
        assert_eq!(session.user.username, "sam");
        assert_eq!(auth.access_token().as_deref(), Some("a2"));

        let calls = auth.transport().calls();
        assert_eq!(
            calls[0].json_body()["refresh_token"],
            serde_json::json!("refresh-a1")
        );
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_uses_bearer() {
        let transport =
            MockTransport::new().respond("auth/refresh", 200, r#"{"access_token": "a2"}"#);
        let mut session = student_session("a1");
        session.refresh_token = None;
        let auth = AuthService::new(transport, MemoryTokenStore::with_session(session));

        auth.refresh().await.unwrap();

        let calls = auth.transport().calls();
        assert_eq!(calls[0].bearer.as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn test_refresh_rejected_logs_out() {
        let transport = MockTransport::new().respond("auth/refresh", 401, "");
        let auth = AuthService::new(
            transport,
            MemoryTokenStore::with_session(student_session("a1")),
        );

        let err = auth.refresh().await.unwrap_err();

        assert_eq!(err, ApiError::SessionExpired);
        assert!(!auth.is_logged_in());
    }

    #[tokio::test]
    async fn test_refresh_server_error_logs_out() {
        let transport = MockTransport::new().respond("auth/refresh", 503, "");
        let auth = AuthService::new(
            transport,
            MemoryTokenStore::with_session(student_session("a1")),
        );

        let err = auth.refresh().await.unwrap_err();

        assert_eq!(err, ApiError::SessionExpired);
        assert!(auth.store().load().is_none());
    }

    #[tokio::test]
    async fn test_refresh_network_failure_logs_out() {
        let transport = MockTransport::new().fail("auth/refresh", "connection reset");
        let auth = AuthService::new(
            transport,
            MemoryTokenStore::with_session(student_session("a1")),
        );

        let err = auth.refresh().await.unwrap_err();

        assert_eq!(err, ApiError::SessionExpired);
        assert!(!auth.is_logged_in());
    }

    #[tokio::test]
    async fn test_refresh_without_session_skips_network() {
        let auth = service(MockTransport::new());

        let err = auth.refresh().await.unwrap_err();

        assert_eq!(err, ApiError::SessionExpired);
        assert!(auth.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_after_stale_token_reuses_current_session() {
        let auth = AuthService::new(
            MockTransport::new(),
            MemoryTokenStore::with_session(student_session("fresh")),
        );

        let session = auth.refresh_after(Some("stale")).await.unwrap();

        assert_eq!(session.access_token, "fresh");
        assert!(auth.transport().calls().is_empty());
    }

    #[test]
    fn test_logout_twice_then_not_logged_in() {
        let auth = AuthService::new(
            MockTransport::new(),
            MemoryTokenStore::with_session(student_session("a1")),
        );

        auth.logout();
        auth.logout();

        assert!(!auth.is_logged_in());
        assert!(auth.current_user().is_none());
        assert!(auth.role().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_ignores_backend_failure() {
        let transport = MockTransport::new().fail("auth/logout", "offline");
        let auth = AuthService::new(
            transport,
            MemoryTokenStore::with_session(student_session("a1")),
        );

        auth.sign_out().await;

        assert!(!auth.is_logged_in());
        let calls = auth.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].json_body()["refresh_token"],
            serde_json::json!("refresh-a1")
        );
    }
}
