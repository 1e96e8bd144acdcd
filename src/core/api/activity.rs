use serde::Serialize;

use crate::core::activity::ActivityEvent;
use crate::core::client::ApiClient;
use crate::core::error::ApiError;
use crate::core::http::HttpTransport;
use crate::core::token_store::TokenStore;

#[derive(Serialize)]
struct ActivityBatch<'e> {
    events: &'e [ActivityEvent],
}

pub struct ActivityApi<'a, T, S> {
    client: &'a ApiClient<T, S>,
}

impl<'a, T, S> ActivityApi<'a, T, S>
where
    T: HttpTransport,
    S: TokenStore,
{
    pub fn new(client: &'a ApiClient<T, S>) -> Self {
        Self { client }
    }

    /// Send a batch of activity events. Empty batches are not sent.
    pub async fn report(&self, events: &[ActivityEvent]) -> Result<(), ApiError> {
        if events.is_empty() {
            return Ok(());
        }
        let _: Option<serde_json::Value> = self
            .client
            .post("activity", &ActivityBatch { events })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::activity::ActivityTracker;
    use crate::core::tests::{MockTransport, student_session};
    use crate::core::token_store::MemoryTokenStore;

    fn client(transport: MockTransport) -> ApiClient<MockTransport, MemoryTokenStore> {
        ApiClient::new(transport, MemoryTokenStore::with_session(student_session("t")))
    }

    #[tokio::test]
    async fn test_report_posts_batch() {
        let client = client(MockTransport::new().respond("activity", 202, ""));
        let mut tracker = ActivityTracker::new(chrono::Utc::now());
        tracker.page_view("/student/grades", chrono::Utc::now());

        ActivityApi::new(&client)
            .report(&tracker.drain())
            .await
            .unwrap();

        let body = client.auth().transport().calls()[0].json_body();
        assert_eq!(body["events"][0]["kind"], serde_json::json!("page_view"));
        assert_eq!(body["events"][0]["page"], serde_json::json!("/student/grades"));
    }

    #[tokio::test]
    async fn test_empty_batch_is_not_sent() {
        let client = client(MockTransport::new());
        ActivityApi::new(&client).report(&[]).await.unwrap();
        assert!(client.auth().transport().calls().is_empty());
    }
}
