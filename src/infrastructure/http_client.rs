use async_trait::async_trait;

use crate::domain::PipelineError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, PipelineError>;
}

/// Real HTTP client using reqwest
///
/// Built with an explicit request timeout; an expired deadline is reported
/// as a timed-out provider failure, distinguishable from other transport
/// errors.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                PipelineError::configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, PipelineError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                PipelineError::provider_timeout("http", format!("request timed out: {e}"))
            } else {
                PipelineError::provider("http", format!("request failed: {e}"))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(PipelineError::provider(
                "http",
                format!("HTTP {status}: {error_body}"),
            ));
        }

        response.json().await.map_err(|e| {
            PipelineError::provider("http", format!("failed to parse response: {e}"))
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_post_json_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(std::time::Duration::from_secs(5)).unwrap();
        let response = client
            .post_json(
                &format!("{}/echo", server.uri()),
                vec![("Content-Type", "application/json")],
                &json!({"hello": "world"}),
            )
            .await
            .unwrap();

        assert_eq!(response, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_http_error_status_is_a_provider_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fail"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(std::time::Duration::from_secs(5)).unwrap();
        let error = client
            .post_json(&format!("{}/fail", server.uri()), vec![], &json!({}))
            .await
            .unwrap_err();

        match error {
            PipelineError::Provider {
                message, timed_out, ..
            } => {
                assert!(message.contains("500"));
                assert!(!timed_out);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_flagged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(std::time::Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(std::time::Duration::from_millis(20)).unwrap();
        let error = client
            .post_json(&format!("{}/slow", server.uri()), vec![], &json!({}))
            .await
            .unwrap_err();

        assert!(error.is_timeout());
    }
}
