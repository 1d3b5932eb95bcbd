//! Model dispatch with per-attempt timeouts and bounded retry
//!
//! The dispatcher owns the provider registry and a bounded log of request
//! records. Each dispatch resolves an adapter, then drives it through up
//! to `max_retries + 1` attempts. Only transient failures (timeout, rate
//! limit, provider unavailable) are retried, with exponential backoff;
//! anything else fails the request on the spot.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::time::sleep;
use uuid::Uuid;

use crate::config::DispatchConfig;
use crate::error::{Error, Result};
use crate::types::{NeutralPrompt, ProviderResponse};

use super::registry::ProviderRegistry;

/// Records kept before the oldest is evicted
const MAX_TRACKED_REQUESTS: usize = 1024;

/// Lifecycle of one dispatched request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Pending,
    InFlight,
    Succeeded,
    Failed,
}

/// Bookkeeping for one dispatched request
#[derive(Debug, Clone, Serialize)]
pub struct RequestRecord {
    pub id: Uuid,
    pub provider: String,
    pub model: String,
    pub state: RequestState,
    /// Attempts started so far
    pub attempts: u32,
    /// Final error message, when the request failed
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Successful dispatch result
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub request_id: Uuid,
    pub response: ProviderResponse,
    /// Attempts it took, including the successful one
    pub attempts: u32,
}

#[derive(Default)]
struct DispatchLog {
    order: VecDeque<Uuid>,
    records: HashMap<Uuid, RequestRecord>,
}

/// Drives provider calls through the retry policy
pub struct ModelDispatcher {
    registry: ProviderRegistry,
    config: DispatchConfig,
    log: RwLock<DispatchLog>,
}

impl ModelDispatcher {
    pub fn new(registry: ProviderRegistry, config: DispatchConfig) -> Self {
        Self {
            registry,
            config,
            log: RwLock::new(DispatchLog::default()),
        }
    }

    /// Send a prompt through the named provider. `model` falls back to the
    /// adapter's default when unset.
    pub async fn dispatch(
        &self,
        provider: &str,
        model: Option<&str>,
        prompt: &NeutralPrompt,
    ) -> Result<DispatchOutcome> {
        let adapter = self.registry.get(provider)?;
        let model = model.unwrap_or_else(|| adapter.default_model()).to_string();

        let id = self.begin(provider, &model);
        self.update(id, |record| record.state = RequestState::InFlight);

        let allowance = Duration::from_secs(self.config.attempt_timeout_secs);
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            self.update(id, |record| record.attempts = attempt + 1);

            let result = match tokio::time::timeout(allowance, adapter.send(prompt, &model)).await
            {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout {
                    provider: provider.to_string(),
                    seconds: self.config.attempt_timeout_secs,
                }),
            };

            match result {
                Ok(response) => {
                    self.update(id, |record| record.state = RequestState::Succeeded);
                    tracing::info!(
                        %id,
                        provider,
                        model = %model,
                        attempts = attempt + 1,
                        "dispatch succeeded"
                    );
                    return Ok(DispatchOutcome {
                        request_id: id,
                        response,
                        attempts: attempt + 1,
                    });
                }
                Err(e) => {
                    if !e.is_transient() {
                        self.finish_failed(id, &e);
                        return Err(e);
                    }
                    if attempt < self.config.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            %id,
                            provider,
                            attempt = attempt + 1,
                            delay_secs = delay.as_secs(),
                            error = %e,
                            "attempt failed, retrying"
                        );
                        last_error = Some(e);
                        sleep(delay).await;
                    } else {
                        last_error = Some(e);
                    }
                }
            }
        }

        let attempts = self.config.max_retries + 1;
        let cause = Box::new(
            last_error.unwrap_or_else(|| Error::internal("dispatch ended without an error")),
        );
        let error = Error::Dispatch { attempts, cause };
        self.finish_failed(id, &error);
        Err(error)
    }

    /// Look up the record for a dispatched request
    pub fn record(&self, id: Uuid) -> Option<RequestRecord> {
        self.log.read().records.get(&id).cloned()
    }

    /// Wire names of the registered providers
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    fn begin(&self, provider: &str, model: &str) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let record = RequestRecord {
            id,
            provider: provider.to_string(),
            model: model.to_string(),
            state: RequestState::Pending,
            attempts: 0,
            error: None,
            created_at: now,
            updated_at: now,
        };

        let mut log = self.log.write();
        if log.order.len() >= MAX_TRACKED_REQUESTS {
            if let Some(oldest) = log.order.pop_front() {
                log.records.remove(&oldest);
            }
        }
        log.order.push_back(id);
        log.records.insert(id, record);
        id
    }

    fn update(&self, id: Uuid, apply: impl FnOnce(&mut RequestRecord)) {
        let mut log = self.log.write();
        if let Some(record) = log.records.get_mut(&id) {
            apply(record);
            record.updated_at = Utc::now();
        }
    }

    fn finish_failed(&self, id: Uuid, error: &Error) {
        let message = error.to_string();
        self.update(id, |record| {
            record.state = RequestState::Failed;
            record.error = Some(message);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderAdapter;
    use crate::types::TokenUsage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    enum Mode {
        Succeed,
        RateLimited,
        AuthError,
        SucceedOnCall(u32),
        Hang,
    }

    #[derive(Debug)]
    struct FakeAdapter {
        mode: Mode,
        calls: AtomicU32,
    }

    impl FakeAdapter {
        fn new(mode: Mode) -> Arc<Self> {
            Arc::new(Self {
                mode,
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderAdapter for FakeAdapter {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn default_model(&self) -> &str {
            "fake-model"
        }

        async fn send(&self, _prompt: &NeutralPrompt, model: &str) -> Result<ProviderResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            match self.mode {
                Mode::Succeed => Ok(response(model)),
                Mode::RateLimited => Err(Error::rate_limit("fake", "slow down")),
                Mode::AuthError => Err(Error::auth("fake", "bad key")),
                Mode::SucceedOnCall(n) if call >= n => Ok(response(model)),
                Mode::SucceedOnCall(_) => Err(Error::unavailable("fake", "overloaded")),
                Mode::Hang => std::future::pending().await,
            }
        }
    }

    fn response(model: &str) -> ProviderResponse {
        ProviderResponse {
            text: "answer".to_string(),
            model: model.to_string(),
            provider: "fake".to_string(),
            usage: Some(TokenUsage::new(Some(10), Some(2))),
        }
    }

    fn prompt() -> NeutralPrompt {
        NeutralPrompt {
            system: "system".to_string(),
            context: String::new(),
            question: "q".to_string(),
            user_text: "q".to_string(),
        }
    }

    fn dispatcher_with(adapter: Arc<FakeAdapter>, config: DispatchConfig) -> ModelDispatcher {
        let mut registry = ProviderRegistry::new();
        registry.register(adapter);
        ModelDispatcher::new(registry, config)
    }

    #[tokio::test]
    async fn test_dispatch_falls_back_to_the_default_model() {
        let adapter = FakeAdapter::new(Mode::Succeed);
        let dispatcher = dispatcher_with(adapter.clone(), DispatchConfig::default());

        let outcome = dispatcher.dispatch("fake", None, &prompt()).await.unwrap();

        assert_eq!(outcome.response.model, "fake-model");
        assert_eq!(outcome.attempts, 1);
        assert_eq!(adapter.calls(), 1);

        let record = dispatcher.record(outcome.request_id).unwrap();
        assert_eq!(record.state, RequestState::Succeeded);
        assert_eq!(record.attempts, 1);
        assert_eq!(record.provider, "fake");
    }

    #[tokio::test]
    async fn test_explicit_model_overrides_the_default() {
        let adapter = FakeAdapter::new(Mode::Succeed);
        let dispatcher = dispatcher_with(adapter, DispatchConfig::default());

        let outcome = dispatcher
            .dispatch("fake", Some("fake-large"), &prompt())
            .await
            .unwrap();
        assert_eq!(outcome.response.model, "fake-large");
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried_until_success() {
        let adapter = FakeAdapter::new(Mode::SucceedOnCall(3));
        let dispatcher = dispatcher_with(adapter.clone(), DispatchConfig::default());

        let outcome = dispatcher.dispatch("fake", None, &prompt()).await.unwrap();

        assert_eq!(outcome.attempts, 3);
        assert_eq!(adapter.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_wrap_the_last_error() {
        let adapter = FakeAdapter::new(Mode::RateLimited);
        let config = DispatchConfig {
            max_retries: 2,
            ..DispatchConfig::default()
        };
        let dispatcher = dispatcher_with(adapter.clone(), config);

        let err = dispatcher.dispatch("fake", None, &prompt()).await.unwrap_err();

        assert_eq!(adapter.calls(), 3);
        match err {
            Error::Dispatch { attempts, cause } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*cause, Error::RateLimit { .. }));
            }
            other => panic!("expected Dispatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_terminal_errors_fail_without_retrying() {
        let adapter = FakeAdapter::new(Mode::AuthError);
        let dispatcher = dispatcher_with(adapter.clone(), DispatchConfig::default());

        let err = dispatcher.dispatch("fake", None, &prompt()).await.unwrap_err();

        assert!(matches!(err, Error::Auth { .. }));
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_provider_is_rejected_before_any_call() {
        let adapter = FakeAdapter::new(Mode::Succeed);
        let dispatcher = dispatcher_with(adapter.clone(), DispatchConfig::default());

        let err = dispatcher.dispatch("fakeml", None, &prompt()).await.unwrap_err();

        assert!(matches!(err, Error::UnknownProvider { .. }));
        assert_eq!(adapter.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_attempts_time_out_and_count_as_transient() {
        let adapter = FakeAdapter::new(Mode::Hang);
        let config = DispatchConfig {
            max_retries: 1,
            attempt_timeout_secs: 5,
        };
        let dispatcher = dispatcher_with(adapter.clone(), config);

        let err = dispatcher.dispatch("fake", None, &prompt()).await.unwrap_err();

        assert_eq!(adapter.calls(), 2);
        match err {
            Error::Dispatch { attempts, cause } => {
                assert_eq!(attempts, 2);
                assert!(matches!(*cause, Error::Timeout { seconds: 5, .. }));
            }
            other => panic!("expected Dispatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_dispatch_leaves_a_failed_record() {
        let adapter = FakeAdapter::new(Mode::AuthError);
        let dispatcher = dispatcher_with(adapter, DispatchConfig::default());

        let before = Utc::now();
        let _ = dispatcher.dispatch("fake", None, &prompt()).await;

        // Only one record exists, fetch it through the log
        let log = dispatcher.log.read();
        let record = log.records.values().next().unwrap();
        assert_eq!(record.state, RequestState::Failed);
        assert!(record.error.as_deref().unwrap().contains("bad key"));
        assert!(record.updated_at >= before);
    }
}
