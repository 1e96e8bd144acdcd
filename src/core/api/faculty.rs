//! Faculty area endpoints (`/api/faculty/*`)

use super::{Record, segment, unwrap_list};
use crate::core::client::ApiClient;
use crate::core::error::ApiError;
use crate::core::http::HttpTransport;
use crate::core::token_store::TokenStore;

pub struct FacultyApi<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T, S> FacultyApi<'a, T, S>
where
    T: HttpTransport,
    S: TokenStore,
{
    pub fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }

    /// Courses taught by the signed-in faculty member
    pub async fn courses(&self) -> Result<Vec<Record>, ApiError> {
        unwrap_list(self.client.get("faculty/courses").await?, "courses")
    }

    pub async fn course_students(&self, course_id: &str) -> Result<Vec<Record>, ApiError> {
        unwrap_list(
            self.client
                .get(&format!(
                    "faculty/courses/{}/students",
                    segment(course_id)
                ))
                .await?,
            "students",
        )
    }

    pub async fn submit_grades(&self, course_id: &str, grades: &Record) -> Result<Record, ApiError> {
        let path = format!("faculty/courses/{}/grades", segment(course_id));
        self.client.post(&path, grades).await
    }

    pub async fn record_attendance(
        &self,
        course_id: &str,
        attendance: &Record,
    ) -> Result<Record, ApiError> {
        let path = format!("faculty/courses/{}/attendance", segment(course_id));
        self.client.post(&path, attendance).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::Role;
    use crate::core::tests::{MockTransport, session_for};
    use crate::core::token_store::MemoryTokenStore;
    use serde_json::json;

    fn client(transport: MockTransport) -> ApiClient<MockTransport, MemoryTokenStore> {
        ApiClient::new(
            transport,
            MemoryTokenStore::with_session(session_for(Role::Faculty, "t")),
        )
    }

    #[tokio::test]
    async fn test_course_students() {
        let client = client(MockTransport::new().respond(
            "faculty/courses/MATH200/students",
            200,
            r#"{"students": [{"id": 1}, {"id": 2}]}"#,
        ));

        let students = FacultyApi::new(&client)
            .course_students("MATH200")
            .await
            .unwrap();

        assert_eq!(students.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_grades_passes_payload_through() {
        let client = client(MockTransport::new().respond(
            "faculty/courses/MATH200/grades",
            200,
            r#"{"saved": 2}"#,
        ));
        let grades = json!([{"student_id": 1, "grade": "A"}, {"student_id": 2, "grade": "C"}]);

        let result = FacultyApi::new(&client)
            .submit_grades("MATH200", &grades)
            .await
            .unwrap();

        assert_eq!(result["saved"], json!(2));
        let calls = client.auth().transport().calls();
        assert_eq!(calls[0].json_body(), grades);
    }

    #[tokio::test]
    async fn test_validation_error_from_grade_submission() {
        let client = client(MockTransport::new().respond(
            "faculty/courses/MATH200/grades",
            422,
            r#"{"message": "Invalid grade", "errors": {"grade": ["Must be A-F"]}}"#,
        ));

        let err = FacultyApi::new(&client)
            .submit_grades("MATH200", &json!([{"grade": "Z"}]))
            .await
            .unwrap_err();

        assert_eq!(err.field_errors().unwrap()["grade"], vec!["Must be A-F"]);
    }

    #[tokio::test]
    async fn test_course_id_is_encoded_in_every_course_path() {
        let client = client(
            MockTransport::new()
                .respond("faculty/courses/A%23B/students", 200, "[]")
                .respond("faculty/courses/A%23B/grades", 200, "{}")
                .respond("faculty/courses/A%23B/attendance", 200, "{}"),
        );
        let api = FacultyApi::new(&client);

        api.course_students("A#B").await.unwrap();
        api.submit_grades("A#B", &json!({"grades": []})).await.unwrap();
        api.record_attendance("A#B", &json!({"present": []})).await.unwrap();

        let transport = client.auth().transport();
        assert_eq!(transport.calls_to("faculty/courses/A%23B/students"), 1);
        assert_eq!(transport.calls_to("faculty/courses/A%23B/grades"), 1);
        assert_eq!(transport.calls_to("faculty/courses/A%23B/attendance"), 1);
    }
}
