//! Test doubles for the generation gateway.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::gateway::{CachedGeneration, GenerationStore};
use crate::llm_client::{BackendReply, GenerationBackend, LlmError, TokenUsage};

/// Backend that replays scripted failures in order, then answers with a fixed text.
pub struct ScriptedBackend {
    reply: String,
    failures: Mutex<VecDeque<LlmError>>,
    delay: Duration,
    panics: AtomicUsize,
    calls: AtomicUsize,
    correlation_ids: Mutex<Vec<Uuid>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            failures: Mutex::new(VecDeque::new()),
            delay: Duration::ZERO,
            panics: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            correlation_ids: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queues a failure for the next unscripted attempt.
    pub fn then_fail(self, error: LlmError) -> Self {
        self.failures.lock().unwrap().push_back(error);
        self
    }

    /// The next attempt panics instead of answering.
    pub fn then_panic(self) -> Self {
        self.panics.fetch_add(1, Ordering::SeqCst);
        self
    }

    /// Every attempt sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn correlation_ids(&self) -> Vec<Uuid> {
        self.correlation_ids.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn complete(
        &self,
        prompt: &str,
        _system: &str,
        correlation_id: Uuid,
    ) -> Result<BackendReply, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let panicking = self
            .panics
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if panicking {
            panic!("scripted backend panic");
        }
        self.correlation_ids.lock().unwrap().push(correlation_id);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failure = self.failures.lock().unwrap().pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(BackendReply {
                text: self.reply.clone(),
                usage: TokenUsage {
                    input_tokens: prompt.len() as u32 / 4,
                    output_tokens: self.reply.len() as u32 / 4,
                },
            }),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Store whose every operation fails, as if Redis were down.
pub struct FailingStore;

#[async_trait]
impl GenerationStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<CachedGeneration>, CoreError> {
        Err(CoreError::CacheUnavailable("connection refused".to_string()))
    }

    async fn put(&self, _entry: &CachedGeneration, _ttl: Duration) -> Result<(), CoreError> {
        Err(CoreError::CacheUnavailable("connection refused".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
