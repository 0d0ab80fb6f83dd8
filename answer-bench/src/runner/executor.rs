//! Retrying executor for model invocations
//!
//! Wraps one provider call in a timeout and a bounded retry loop with
//! exponential backoff. Iterations of a benchmark run are driven
//! sequentially by the caller; retries and timeouts live here, never in
//! the scoring engine.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::providers::{CompletionRequest, CompletionResponse, LLMProvider, ProviderError};

/// Configuration for the executor
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Number of retries on failure
    pub retry_count: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Maximum retry delay in milliseconds
    pub max_retry_delay_ms: u64,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            retry_count: 3,
            retry_delay_ms: 1000,
            max_retry_delay_ms: 60_000,
            timeout_ms: 120_000,
        }
    }
}

/// Executor for benchmark model invocations
pub struct Executor {
    provider: Arc<dyn LLMProvider + Send + Sync>,
    config: ExecutorConfig,
}

impl Executor {
    pub fn new(provider: Arc<dyn LLMProvider + Send + Sync>, config: ExecutorConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send one completion request, retrying transient failures.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut last_error = None;
        let mut delay = self.config.retry_delay_ms;
        // A rate-limit wait already happened; don't stack backoff on top
        let mut waited = false;

        for attempt in 0..=self.config.retry_count {
            if attempt > 0 {
                tracing::info!(
                    "Retry {}/{} on {}",
                    attempt,
                    self.config.retry_count,
                    self.provider.name()
                );
                if !waited {
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(self.config.max_retry_delay_ms);
                }
            }
            waited = false;

            match self.try_complete(request).await {
                Ok(response) => return Ok(response),
                Err(ProviderError::RateLimited { retry_after_ms }) => {
                    tracing::warn!(
                        "Rate limited on {}, waiting {}ms",
                        self.provider.name(),
                        retry_after_ms
                    );
                    sleep(Duration::from_millis(retry_after_ms)).await;
                    waited = true;
                    last_error = Some(ProviderError::RateLimited { retry_after_ms });
                }
                // Auth/config errors never recover on retry
                Err(e @ ProviderError::Config(_)) => return Err(e),
                Err(e) => {
                    tracing::error!("Request failed on {}: {}", self.provider.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(ProviderError::Timeout {
            timeout_ms: self.config.timeout_ms,
        }))
    }

    /// Single attempt, bounded by the configured timeout.
    async fn try_complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let timeout = Duration::from_millis(self.config.timeout_ms);

        match tokio::time::timeout(timeout, self.provider.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Message, ModelInfo, ProviderResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Provider that fails a fixed number of times before succeeding
    struct FlakyProvider {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl LLMProvider for FlakyProvider {
        fn name(&self) -> &str {
            "flaky"
        }

        fn default_model(&self) -> &str {
            "test-model"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> ProviderResult<CompletionResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(ProviderError::Api {
                    status: 500,
                    message: "transient".to_string(),
                });
            }
            Ok(CompletionResponse {
                content: "Q1: Yes".to_string(),
                model: "test-model".to_string(),
                input_tokens: 1,
                output_tokens: 1,
                finish_reason: "stop".to_string(),
                latency_ms: 1,
            })
        }

        async fn list_models(&self) -> ProviderResult<Vec<ModelInfo>> {
            Ok(Vec::new())
        }

        async fn health_check(&self) -> ProviderResult<bool> {
            Ok(true)
        }
    }

    fn fast_config() -> ExecutorConfig {
        ExecutorConfig {
            retry_count: 3,
            retry_delay_ms: 1,
            max_retry_delay_ms: 4,
            timeout_ms: 1000,
        }
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let provider = Arc::new(FlakyProvider {
            failures: 2,
            calls: AtomicU32::new(0),
        });
        let executor = Executor::new(provider.clone(), fast_config());

        let request = CompletionRequest::new(vec![Message::user("hi")], 16);
        let response = executor.complete(&request).await.unwrap();

        assert_eq!(response.content, "Q1: Yes");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_return_last_error() {
        let provider = Arc::new(FlakyProvider {
            failures: u32::MAX,
            calls: AtomicU32::new(0),
        });
        let executor = Executor::new(provider, fast_config());

        let request = CompletionRequest::new(vec![Message::user("hi")], 16);
        let err = executor.complete(&request).await.unwrap_err();

        assert!(matches!(err, ProviderError::Api { status: 500, .. }));
    }

    /// Provider that is rate limited on the first call, then succeeds
    struct RateLimitedOnce {
        calls: AtomicU32,
    }

    #[async_trait]
    impl LLMProvider for RateLimitedOnce {
        fn name(&self) -> &str {
            "limited"
        }

        fn default_model(&self) -> &str {
            "test-model"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> ProviderResult<CompletionResponse> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(ProviderError::RateLimited { retry_after_ms: 5 });
            }
            Ok(CompletionResponse {
                content: "Q1: Yes".to_string(),
                model: "test-model".to_string(),
                input_tokens: 1,
                output_tokens: 1,
                finish_reason: "stop".to_string(),
                latency_ms: 1,
            })
        }

        async fn list_models(&self) -> ProviderResult<Vec<ModelInfo>> {
            Ok(Vec::new())
        }

        async fn health_check(&self) -> ProviderResult<bool> {
            Ok(true)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_wait_replaces_backoff() {
        let provider = Arc::new(RateLimitedOnce {
            calls: AtomicU32::new(0),
        });
        let executor = Executor::new(
            provider,
            ExecutorConfig {
                retry_count: 3,
                retry_delay_ms: 60_000,
                max_retry_delay_ms: 120_000,
                timeout_ms: 1000,
            },
        );

        let start = tokio::time::Instant::now();
        let request = CompletionRequest::new(vec![Message::user("hi")], 16);
        let response = executor.complete(&request).await.unwrap();

        assert_eq!(response.content, "Q1: Yes");
        // Only the 5ms rate-limit wait should elapse before the retry;
        // the 60s backoff delay must not stack on top of it
        assert!(start.elapsed() < Duration::from_millis(60_000));
    }

    /// Provider that always rejects with a config error
    struct MisconfiguredProvider {
        calls: AtomicU32,
    }

    #[async_trait]
    impl LLMProvider for MisconfiguredProvider {
        fn name(&self) -> &str {
            "misconfigured"
        }

        fn default_model(&self) -> &str {
            "test-model"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> ProviderResult<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Config("bad key".to_string()))
        }

        async fn list_models(&self) -> ProviderResult<Vec<ModelInfo>> {
            Ok(Vec::new())
        }

        async fn health_check(&self) -> ProviderResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_config_errors_are_not_retried() {
        let provider = Arc::new(MisconfiguredProvider {
            calls: AtomicU32::new(0),
        });
        let executor = Executor::new(provider.clone(), fast_config());

        let request = CompletionRequest::new(vec![Message::user("hi")], 16);
        let err = executor.complete(&request).await.unwrap_err();

        assert!(matches!(err, ProviderError::Config(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
