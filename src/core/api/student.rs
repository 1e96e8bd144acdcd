//! Student area endpoints (`/api/student/*`)

use serde::Serialize;

use super::{Record, segment, unwrap_list};
use crate::core::client::ApiClient;
use crate::core::error::ApiError;
use crate::core::http::HttpTransport;
use crate::core::token_store::TokenStore;

/// Everything the student dashboard shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudentDashboard {
    pub courses: Vec<Record>,
    pub grades: Vec<Record>,
    pub attendance: Vec<Record>,
}

pub struct StudentApi<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T, S> StudentApi<'a, T, S>
where
    T: HttpTransport,
    S: TokenStore,
{
    pub fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }

    pub async fn courses(&self) -> Result<Vec<Record>, ApiError> {
        unwrap_list(self.client.get("student/courses").await?, "courses")
    }

    pub async fn grades(&self) -> Result<Vec<Record>, ApiError> {
        unwrap_list(self.client.get("student/grades").await?, "grades")
    }

    pub async fn attendance(&self) -> Result<Vec<Record>, ApiError> {
        unwrap_list(self.client.get("student/attendance").await?, "attendance")
    }

    pub async fn enroll(&self, course_id: &str) -> Result<Record, ApiError> {
        self.client
            .post(
                &format!("student/courses/{}/enroll", segment(course_id)),
                &serde_json::json!({}),
            )
            .await
    }

    /// The three dashboard reads, issued concurrently
    pub async fn dashboard(&self) -> Result<StudentDashboard, ApiError> {
        let (courses, grades, attendance) =
            futures::try_join!(self.courses(), self.grades(), self.attendance())?;

        Ok(StudentDashboard {
            courses,
            grades,
            attendance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tests::{MockTransport, student_session};
    use crate::core::token_store::MemoryTokenStore;

    fn client(transport: MockTransport) -> ApiClient<MockTransport, MemoryTokenStore> {
        ApiClient::new(transport, MemoryTokenStore::with_session(student_session("t")))
    }

    #[tokio::test]
    async fn test_dashboard_collects_all_three_lists() {
        let client = client(
            MockTransport::new()
                .respond("student/courses", 200, r#"{"courses": [{"code": "CS101"}]}"#)
                .respond("student/grades", 200, r#"[{"code": "CS101", "grade": "B+"}]"#)
                .respond("student/attendance", 200, r#"[]"#),
        );

        let dashboard = StudentApi::new(&client).dashboard().await.unwrap();

        assert_eq!(dashboard.courses.len(), 1);
        assert_eq!(dashboard.grades[0]["grade"], serde_json::json!("B+"));
        assert!(dashboard.attendance.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_fails_when_any_read_fails() {
        let client = client(
            MockTransport::new()
                .respond("student/courses", 200, "[]")
                .respond("student/grades", 500, "")
                .respond("student/attendance", 200, "[]"),
        );

        let err = StudentApi::new(&client).dashboard().await.unwrap_err();
        assert!(matches!(err, ApiError::Server { .. }));
    }

    #[tokio::test]
    async fn test_enroll_posts_to_course() {
        let client = client(
            MockTransport::new().respond("student/courses/CS101/enroll", 201, r#"{"ok": true}"#),
        );

        let result = StudentApi::new(&client).enroll("CS101").await.unwrap();

        assert_eq!(result["ok"], serde_json::json!(true));
        assert_eq!(client.auth().transport().calls_to("student/courses/CS101/enroll"), 1);
    }

    #[tokio::test]
    async fn test_enroll_encodes_course_id() {
        let client = client(MockTransport::new().respond(
            "student/courses/CS%20101%2F..%2Fgrades/enroll",
            201,
            "{}",
        ));

        StudentApi::new(&client).enroll("CS 101/../grades").await.unwrap();

        assert_eq!(
            client.auth().transport().calls()[0].path,
            "student/courses/CS%20101%2F..%2Fgrades/enroll"
        );
    }
}
