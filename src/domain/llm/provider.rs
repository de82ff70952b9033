use std::fmt::Debug;

use async_trait::async_trait;

use super::{LlmRequest, LlmResponse};
use crate::domain::error::PipelineError;

/// Trait for language-model services
///
/// Implementations map transport failures to [`PipelineError::Provider`] and
/// flag expired deadlines with `timed_out`, so callers can tell a slow
/// collaborator from a broken one.
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Run one completion call
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, PipelineError>;

    /// Provider name used in error reports and logs
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Scripted reply for one mock completion call
    #[derive(Debug, Clone)]
    enum MockReply {
        Text(String),
        Error(String),
        Timeout,
    }

    /// Mock LLM provider replaying a scripted sequence of replies
    ///
    /// Replies are consumed front to back; once the script is exhausted the
    /// configured default text is returned, or an error if none was set.
    /// Every request is recorded for assertions.
    #[derive(Debug, Default)]
    pub struct MockLlmProvider {
        script: Mutex<VecDeque<MockReply>>,
        default_text: Option<String>,
        requests: Mutex<Vec<LlmRequest>>,
    }

    impl MockLlmProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// Provider that answers every call with the same text
        pub fn always(text: impl Into<String>) -> Self {
            Self {
                default_text: Some(text.into()),
                ..Self::default()
            }
        }

        pub fn push_text(self, text: impl Into<String>) -> Self {
            self.script
                .lock()
                .unwrap()
                .push_back(MockReply::Text(text.into()));
            self
        }

        pub fn push_error(self, message: impl Into<String>) -> Self {
            self.script
                .lock()
                .unwrap()
                .push_back(MockReply::Error(message.into()));
            self
        }

        pub fn push_timeout(self) -> Self {
            self.script.lock().unwrap().push_back(MockReply::Timeout);
            self
        }

        pub fn with_default_text(mut self, text: impl Into<String>) -> Self {
            self.default_text = Some(text.into());
            self
        }

        /// Requests received so far, in call order
        pub fn requests(&self) -> Vec<LlmRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, PipelineError> {
            self.requests.lock().unwrap().push(request);

            let reply = self.script.lock().unwrap().pop_front();
            match reply {
                Some(MockReply::Text(text)) => Ok(LlmResponse::new(text, "mock-model")),
                Some(MockReply::Error(message)) => Err(PipelineError::provider("mock", message)),
                Some(MockReply::Timeout) => {
                    Err(PipelineError::provider_timeout("mock", "deadline expired"))
                }
                None => match &self.default_text {
                    Some(text) => Ok(LlmResponse::new(text.clone(), "mock-model")),
                    None => Err(PipelineError::provider("mock", "script exhausted")),
                },
            }
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_replays_script_then_default() {
            let provider = MockLlmProvider::new()
                .push_text("first")
                .push_text("second")
                .with_default_text("fallback");

            let first = provider.complete(LlmRequest::new("a")).await.unwrap();
            let second = provider.complete(LlmRequest::new("b")).await.unwrap();
            let third = provider.complete(LlmRequest::new("c")).await.unwrap();

            assert_eq!(first.content, "first");
            assert_eq!(second.content, "second");
            assert_eq!(third.content, "fallback");
            assert_eq!(provider.call_count(), 3);
        }

        #[tokio::test]
        async fn test_mock_timeout_reply() {
            let provider = MockLlmProvider::new().push_timeout();

            let error = provider.complete(LlmRequest::new("a")).await.unwrap_err();
            assert!(error.is_timeout());
        }

        #[tokio::test]
        async fn test_mock_records_requests() {
            let provider = MockLlmProvider::always("ok");

            provider
                .complete(LlmRequest::builder().system("sys").user("payload").build())
                .await
                .unwrap();

            let requests = provider.requests();
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0].system.as_deref(), Some("sys"));
            assert_eq!(requests[0].user, "payload");
        }
    }
}
