use std::time::Duration;

use crate::event::RepoEvent;

/// One fetch of the event list went wrong.
///
/// The dashboard handles every variant the same way (log it, show the
/// banner, keep polling), so the variants mostly shape the message text.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Where the event list comes from. The poller only sees this seam, so
/// tests can script responses without a server.
#[async_trait::async_trait]
pub trait EventSource: Send + Sync + 'static {
    async fn fetch_events(&self) -> Result<Vec<RepoEvent>, FetchError>;
}

/// HTTP source backed by the receiver's `/api/events` endpoint.
pub struct EventsClient {
    client: reqwest::Client,
    endpoint: String,
}

impl EventsClient {
    /// Build a client polling `{base_url}/api/events`.
    ///
    /// The timeout bounds each request so a hung server cannot stall the
    /// poll loop forever.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/events", base_url.trim_end_matches('/')),
        })
    }

    /// Full URL this client polls.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl EventSource for EventsClient {
    async fn fetch_events(&self) -> Result<Vec<RepoEvent>, FetchError> {
        let resp = self.client.get(&self.endpoint).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    fn client_for(server: &MockServer) -> EventsClient {
        EventsClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoint_joins_base_url_cleanly() {
        let client = EventsClient::new("http://localhost:5000", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/api/events");
        let client = EventsClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/api/events");
    }

    #[tokio::test]
    async fn fetches_events_in_server_order() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/events");
            then.status(200).json_body(json!([
                {
                    "_id": "65f2a1",
                    "request_id": "r2",
                    "author": "bob",
                    "action": "PUSH",
                    "to_branch": "main",
                    "timestamp": "2021-04-02T12:00:00Z"
                },
                {
                    "request_id": "r1",
                    "author": "alice",
                    "action": "MERGE",
                    "from_branch": "dev",
                    "to_branch": "master",
                    "timestamp": "2021-04-01T09:30:00Z"
                }
            ]));
        });

        let events = client_for(&server).fetch_events().await.unwrap();
        mock.assert();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].author, "bob");
        assert_eq!(events[1].author, "alice");
    }

    #[tokio::test]
    async fn empty_list_is_not_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/events");
            then.status(200).json_body(json!([]));
        });

        let events = client_for(&server).fetch_events().await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn server_error_surfaces_the_status_code() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/events");
            then.status(500).json_body(json!({"error": "boom"}));
        });

        let err = client_for(&server).fetch_events().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/events");
            then.status(200).body("<html>oops</html>");
        });

        let err = client_for(&server).fetch_events().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn object_body_is_a_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/events");
            then.status(200).json_body(json!({"error": "not a list"}));
        });

        let err = client_for(&server).fetch_events().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // Port 1 is reserved and never listening.
        let client = EventsClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        let err = client.fetch_events().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
