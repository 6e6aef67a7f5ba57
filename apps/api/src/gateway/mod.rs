//! Generation Gateway: the only path from Compass to the generation backend.
//!
//! Per cache key a request moves through:
//!
//! ```text
//! Uninitialized ──miss──▶ Pending ──ok──▶ Ready (cached until TTL)
//!                            │
//!                            └─transient─▶ Failed ──backoff──▶ Pending   (retry budget left)
//!                                          Failed (terminal)             (budget spent / non-transient)
//! ```
//!
//! Concurrent callers for a key that is Pending attach to the same shared
//! future instead of calling the backend again. The flight itself runs on its
//! own task, so a caller that goes away never cancels it for the others.

pub mod handlers;
pub mod request;
pub mod retry;
pub mod store;
pub mod templates;

#[cfg(test)]
pub mod testing;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::llm_client::{BackendReply, GenerationBackend, LlmError, TokenUsage};

pub use request::{PromptRequest, RenderedPrompt};
pub use retry::RetryPolicy;
pub use store::{GenerationStore, InMemoryGenerationStore, RedisGenerationStore};

/// A generated text plus the metadata needed to trace and account for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedGeneration {
    pub cache_key: String,
    pub template_id: String,
    pub text: String,
    pub usage: TokenUsage,
    pub model: String,
    /// Correlation id of the attempt that produced the text.
    pub correlation_id: Uuid,
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// True when served from the cache rather than a fresh backend call.
    #[serde(default)]
    pub cached: bool,
}

impl CachedGeneration {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub cache_ttl: Duration,
    pub retry: RetryPolicy,
    /// Per-attempt timeout used when callers do not pass their own.
    pub default_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            retry: RetryPolicy::default(),
            default_timeout: Duration::from_secs(30),
        }
    }
}

type Flight = Shared<BoxFuture<'static, Result<CachedGeneration, CoreError>>>;

struct GatewayInner {
    backend: Arc<dyn GenerationBackend>,
    store: Arc<dyn GenerationStore>,
    config: GatewayConfig,
    /// Pending flights by cache key, tagged with the id of the flight that
    /// owns the slot. Held only for map access, never across an await.
    in_flight: Mutex<HashMap<String, (u64, Flight)>>,
    next_flight: AtomicU64,
}

/// Cloneable handle; all clones share one cache and one in-flight table.
#[derive(Clone)]
pub struct GenerationGateway {
    inner: Arc<GatewayInner>,
}

impl GenerationGateway {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        store: Arc<dyn GenerationStore>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                backend,
                store,
                config,
                in_flight: Mutex::new(HashMap::new()),
                next_flight: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    pub fn store_name(&self) -> &'static str {
        self.inner.store.name()
    }

    /// Returns the generation for `request`, from cache when fresh.
    ///
    /// `timeout` bounds each backend attempt, not the whole call.
    pub async fn generate(
        &self,
        request: &PromptRequest,
        timeout: Duration,
    ) -> Result<CachedGeneration, CoreError> {
        let rendered = request.render()?;

        if let Some(hit) = self.inner.lookup(&rendered.cache_key).await {
            debug!(key = %rendered.cache_key, "generation cache hit");
            return Ok(hit);
        }

        self.join_or_start(rendered, timeout).await
    }

    /// Attaches to the pending flight for this key, or starts one.
    fn join_or_start(&self, rendered: RenderedPrompt, timeout: Duration) -> Flight {
        let mut in_flight = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some((_, flight)) = in_flight.get(&rendered.cache_key) {
            debug!(key = %rendered.cache_key, "joining in-flight generation");
            return flight.clone();
        }

        let id = self.inner.next_flight.fetch_add(1, Ordering::Relaxed);
        let key = rendered.cache_key.clone();
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move { inner.fly(id, rendered, timeout).await });

        // A task that panics never reaches its own cleanup, so the first
        // waiter to observe the join error clears the slot instead.
        let owner: Weak<GatewayInner> = Arc::downgrade(&self.inner);
        let slot = key.clone();
        let flight: Flight = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    if let Some(inner) = owner.upgrade() {
                        inner.release(&slot, id);
                    }
                    let correlation_id = Uuid::new_v4();
                    warn!(%correlation_id, key = %slot, "generation task aborted: {e}");
                    Err(CoreError::TerminalBackendFailure {
                        message: format!("generation task aborted: {e}"),
                        correlation_id,
                    })
                }
            }
        }
        .boxed()
        .shared();

        in_flight.insert(key, (id, flight.clone()));
        flight
    }
}

impl GatewayInner {
    /// Fresh cache entry for `key`, marked as cached. Store failures count as a miss.
    async fn lookup(&self, key: &str) -> Option<CachedGeneration> {
        match self.store.get(key).await {
            Ok(Some(entry)) if !entry.is_expired(Utc::now()) => Some(CachedGeneration {
                cached: true,
                ..entry
            }),
            Ok(_) => None,
            Err(e) => {
                warn!("{e}; calling backend directly");
                None
            }
        }
    }

    /// Runs one flight to completion, publishes it to the store, then clears
    /// the in-flight marker so later callers see the cached entry.
    async fn fly(
        self: Arc<Self>,
        id: u64,
        rendered: RenderedPrompt,
        timeout: Duration,
    ) -> Result<CachedGeneration, CoreError> {
        // Another flight may have published between our lookup and taking the slot.
        let result = match self.lookup(&rendered.cache_key).await {
            Some(hit) => Ok(hit),
            None => self.call_and_store(&rendered, timeout).await,
        };

        self.release(&rendered.cache_key, id);
        result
    }

    /// Clears the in-flight slot for `key` if flight `id` still owns it.
    fn release(&self, key: &str, id: u64) {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if matches!(in_flight.get(key), Some((owner, _)) if *owner == id) {
            in_flight.remove(key);
        }
    }

    async fn call_and_store(
        &self,
        rendered: &RenderedPrompt,
        timeout: Duration,
    ) -> Result<CachedGeneration, CoreError> {
        let (reply, correlation_id, attempts) = self.call_with_retry(rendered, timeout).await?;

        let ttl = self.config.cache_ttl;
        let created_at = Utc::now();
        let expires_at = created_at
            + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365));

        let entry = CachedGeneration {
            cache_key: rendered.cache_key.clone(),
            template_id: rendered.template_id.clone(),
            text: reply.text,
            usage: reply.usage,
            model: self.backend.model().to_string(),
            correlation_id,
            attempts,
            created_at,
            expires_at,
            cached: false,
        };

        if let Err(e) = self.store.put(&entry, ttl).await {
            warn!(%correlation_id, "{e}; result not cached");
        }

        info!(
            %correlation_id,
            template = %entry.template_id,
            attempts,
            "generation complete: input_tokens={}, output_tokens={}, total={}",
            entry.usage.input_tokens,
            entry.usage.output_tokens,
            entry.usage.total()
        );

        Ok(entry)
    }

    /// Calls the backend until success, a non-transient failure, or the retry
    /// budget is spent. Each attempt gets a fresh correlation id.
    async fn call_with_retry(
        &self,
        rendered: &RenderedPrompt,
        timeout: Duration,
    ) -> Result<(BackendReply, Uuid, u32), CoreError> {
        let policy = self.config.retry;
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let correlation_id = Uuid::new_v4();
            let span = info_span!(
                "generation_attempt",
                %correlation_id,
                attempt,
                template = %rendered.template_id
            );

            let outcome = tokio::time::timeout(
                timeout,
                self.backend
                    .complete(&rendered.prompt, rendered.system, correlation_id),
            )
            .instrument(span)
            .await;

            let error = match outcome {
                Ok(Ok(reply)) => return Ok((reply, correlation_id, attempt)),
                Ok(Err(e)) => e,
                Err(_) => LlmError::Timeout {
                    after_ms: timeout.as_millis() as u64,
                },
            };

            match classify(error, correlation_id) {
                CoreError::TransientBackendFailure { message, .. } if attempt < max_attempts => {
                    let delay = policy.backoff(attempt);
                    warn!(
                        %correlation_id,
                        "Generation attempt {}/{} failed ({}), retrying after {}ms",
                        attempt,
                        max_attempts,
                        message,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                CoreError::TransientBackendFailure { message, .. } => {
                    warn!(%correlation_id, "Generation retry budget exhausted: {message}");
                    return Err(CoreError::TerminalBackendFailure {
                        message: format!("gave up after {attempt} attempts: {message}"),
                        correlation_id,
                    });
                }
                terminal => {
                    warn!(%correlation_id, "Generation failed without retry: {terminal}");
                    return Err(terminal);
                }
            }
        }
    }
}

/// Maps a backend error onto the core taxonomy.
fn classify(error: LlmError, correlation_id: Uuid) -> CoreError {
    let message = error.to_string();
    if error.is_transient() {
        CoreError::TransientBackendFailure {
            message,
            correlation_id,
        }
    } else {
        CoreError::TerminalBackendFailure {
            message,
            correlation_id,
        }
    }
}
