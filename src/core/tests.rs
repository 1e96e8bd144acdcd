//! Shared test fixtures and end-to-end scenarios for the API layer
//!
//! [`MockTransport`] answers requests from per-path handlers and records every
//! call, so tests can count network round trips and inspect headers.

use std::sync::Mutex;

use super::error::ApiError;
use super::http::{HttpResponse, HttpTransport, Method, RequestBody, RequestDescriptor};
use super::session::{Role, Session, UserRecord};

type Handler = Box<dyn Fn(&RecordedCall) -> Result<HttpResponse, ApiError> + Send + Sync>;

/// One request as seen by the transport
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl RecordedCall {
    pub fn json_body(&self) -> serde_json::Value {
        match &self.body {
            RequestBody::Json(value) => value.clone(),
            _ => serde_json::Value::Null,
        }
    }
}

#[derive(Default)]
pub struct MockTransport {
    routes: Vec<(String, Handler)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `path` with a fixed response
    pub fn respond(self, path: &str, status: u16, body: &str) -> Self {
        let body = body.to_string();
        self.respond_with(path, move |_| Ok(HttpResponse::new(status, body.clone())))
    }

    /// Answer `path` with a transport failure
    pub fn fail(self, path: &str, message: &str) -> Self {
        let message = message.to_string();
        self.respond_with(path, move |_| Err(ApiError::Network(message.clone())))
    }

    /// Answer `path` from a handler that sees the recorded call
    pub fn respond_with<F>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(&RecordedCall) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    {
        self.routes.push((path.to_string(), Box::new(handler)));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.path == path)
            .count()
    }
}

impl HttpTransport for MockTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        // Let concurrent callers interleave the way real network calls would
        tokio::task::yield_now().await;

        let call = RecordedCall {
            method: request.method,
            path: request.path.clone(),
            bearer: bearer.map(str::to_string),
            body: request.body.clone(),
        };
        self.calls.lock().unwrap().push(call.clone());

        match self.routes.iter().find(|(path, _)| *path == request.path) {
            Some((_, handler)) => handler(&call),
            None => Ok(HttpResponse::new(404, r#"{"error": "no such route"}"#)),
        }
    }
}

pub fn user_json(role: &str) -> String {
    format!(
        r#"{{"id": 7, "username": "sam", "email": "sam@uni.edu", "role": "{}"}}"#,
        role
    )
}

pub fn user(role: Role) -> UserRecord {
    UserRecord {
        id: "7".to_string(),
        username: "sam".to_string(),
        email: "sam@uni.edu".to_string(),
        role,
    }
}

pub fn session_for(role: Role, token: &str) -> Session {
    Session::new(token, Some(format!("refresh-{}", token)), user(role))
}

pub fn student_session(token: &str) -> Session {
    session_for(Role::Student, token)
}

/// Resource handler that only accepts `valid_token`
pub fn accepts_only(
    valid_token: &'static str,
    body: &'static str,
) -> impl Fn(&RecordedCall) -> Result<HttpResponse, ApiError> + Send + Sync + 'static {
    move |call| {
        if call.bearer.as_deref() == Some(valid_token) {
            Ok(HttpResponse::new(200, body))
        } else {
            Ok(HttpResponse::new(401, r#"{"error": "token expired"}"#))
        }
    }
}

mod scenarios {
    use super::*;
    use crate::core::client::ApiClient;
    use crate::core::guard::{GuardState, PageAccess, Redirect, RouteGuard};
    use crate::core::token_store::{MemoryTokenStore, TokenStore};
    use serde_json::Value;

    fn expired_client(transport: MockTransport) -> ApiClient<MockTransport, MemoryTokenStore> {
        ApiClient::new(
            transport,
            MemoryTokenStore::with_session(student_session("old")),
        )
    }

    #[tokio::test]
    async fn test_401_refresh_then_retry_returns_retried_data() {
        let transport = MockTransport::new()
            .respond_with("student/grades", accepts_only("new", r#"[{"course": "CS101", "grade": "A"}]"#))
            .respond("auth/refresh", 200, r#"{"access_token": "new", "refresh_token": "r2"}"#);
        let client = expired_client(transport);

        let grades: Vec<Value> = client.get("student/grades").await.unwrap();

        assert_eq!(grades[0]["grade"], serde_json::json!("A"));

        let transport = client.auth().transport();
        assert_eq!(transport.calls_to("student/grades"), 2);
        assert_eq!(transport.calls_to("auth/refresh"), 1);

        let calls = transport.calls();
        assert_eq!(calls[0].bearer.as_deref(), Some("old"));
        assert_eq!(calls[2].bearer.as_deref(), Some("new"));
        assert_eq!(client.auth().access_token().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_401_with_failing_refresh_is_session_expired_and_clears_store() {
        let transport = MockTransport::new()
            .respond("student/grades", 401, "")
            .respond("auth/refresh", 401, r#"{"error": "refresh token revoked"}"#);
        let client = expired_client(transport);

        let err = client.get::<Value>("student/grades").await.unwrap_err();

        assert_eq!(err, ApiError::SessionExpired);
        assert!(client.auth().store().load().is_none());
        assert_eq!(client.auth().transport().calls_to("student/grades"), 1);
    }

    #[tokio::test]
    async fn test_401_with_refresh_server_error_clears_store() {
        let transport = MockTransport::new()
            .respond("student/grades", 401, "")
            .respond("auth/refresh", 503, "");
        let client = expired_client(transport);

        let err = client.get::<Value>("student/grades").await.unwrap_err();

        assert_eq!(err, ApiError::SessionExpired);
        assert!(client.auth().store().load().is_none());
        assert_eq!(client.auth().transport().calls_to("student/grades"), 1);
    }

    #[tokio::test]
    async fn test_retry_that_fails_again_is_surfaced_without_looping() {
        let transport = MockTransport::new()
            .respond("student/grades", 401, "")
            .respond("auth/refresh", 200, r#"{"access_token": "new"}"#);
        let client = expired_client(transport);

        let err = client.get::<Value>("student/grades").await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized { .. }));
        let transport = client.auth().transport();
        assert_eq!(transport.calls_to("student/grades"), 2);
        assert_eq!(transport.calls_to("auth/refresh"), 1);
    }

    #[tokio::test]
    async fn test_retry_resends_original_body() {
        let transport = MockTransport::new()
            .respond_with("faculty/courses/3/attendance", accepts_only("new", "{}"))
            .respond("auth/refresh", 200, r#"{"access_token": "new"}"#);
        let client = ApiClient::new(
            transport,
            MemoryTokenStore::with_session(session_for(Role::Faculty, "old")),
        );

        let payload = serde_json::json!({"date": "2025-03-01", "present": [1, 2, 3]});
        let _: Value = client
            .post("faculty/courses/3/attendance", &payload)
            .await
            .unwrap();

        let calls = client.auth().transport().calls();
        let resends: Vec<_> = calls
            .iter()
            .filter(|c| c.path == "faculty/courses/3/attendance")
            .collect();
        assert_eq!(resends.len(), 2);
        assert_eq!(resends[0].json_body(), payload);
        assert_eq!(resends[1].json_body(), payload);
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let transport = MockTransport::new()
            .respond_with("student/courses", accepts_only("new", "[]"))
            .respond_with("student/grades", accepts_only("new", "[]"))
            .respond_with("student/attendance", accepts_only("new", "[]"))
            .respond("auth/refresh", 200, r#"{"access_token": "new"}"#);
        let client = expired_client(transport);

        let (courses, grades, attendance) = futures::join!(
            client.get::<Vec<Value>>("student/courses"),
            client.get::<Vec<Value>>("student/grades"),
            client.get::<Vec<Value>>("student/attendance"),
        );

        assert!(courses.is_ok());
        assert!(grades.is_ok());
        assert!(attendance.is_ok());
        assert_eq!(client.auth().transport().calls_to("auth/refresh"), 1);
    }

    #[tokio::test]
    async fn test_concurrent_401s_with_failed_refresh_all_expire() {
        let transport = MockTransport::new()
            .respond("student/courses", 401, "")
            .respond("student/grades", 401, "")
            .respond("auth/refresh", 400, r#"{"error": "invalid refresh token"}"#);
        let client = expired_client(transport);

        let (courses, grades) = futures::join!(
            client.get::<Value>("student/courses"),
            client.get::<Value>("student/grades"),
        );

        assert_eq!(courses.unwrap_err(), ApiError::SessionExpired);
        assert_eq!(grades.unwrap_err(), ApiError::SessionExpired);
        assert_eq!(client.auth().transport().calls_to("auth/refresh"), 1);
        assert!(!client.auth().is_logged_in());
    }

    #[tokio::test]
    async fn test_expired_session_sends_guard_to_login() {
        let transport = MockTransport::new()
            .respond("faculty/courses", 401, "")
            .respond("auth/refresh", 401, "");
        let client = ApiClient::new(
            transport,
            MemoryTokenStore::with_session(session_for(Role::Faculty, "old")),
        );

        let _ = client.get::<Value>("faculty/courses").await;

        let state = RouteGuard::check(
            PageAccess::role(Role::Faculty),
            "/faculty/courses",
            client.auth().current_session().as_ref(),
        );
        assert_eq!(
            state,
            GuardState::Redirecting(Redirect::Login {
                return_to: "/faculty/courses".to_string()
            })
        );
    }
}
