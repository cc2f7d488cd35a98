//! Deterministic in-process client for tests and offline runs.

use super::{GenerationClient, RawGenerationOutput};
use crate::errors::TransportError;
use crate::model::ScoreScale;
use crate::prompt::GenerationPrompt;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Scripted = Result<String, TransportError>;

/// Replays queued replies in order, then the repeating reply if one is set.
#[derive(Debug)]
pub struct ScriptedClient {
    model: String,
    queue: Mutex<VecDeque<Scripted>>,
    repeat: Option<String>,
    delay: Option<Duration>,
    timeout: Option<Duration>,
    calls: AtomicUsize,
    // Latest call only; the CLI fake provider replays this over whole batches.
    last: Mutex<Option<(GenerationPrompt, ScoreScale)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            model: "scripted".to_string(),
            queue: Mutex::new(VecDeque::new()),
            repeat: None,
            delay: None,
            timeout: None,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn repeating(text: impl Into<String>) -> Self {
        Self {
            repeat: Some(text.into()),
            ..Self::new()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn then_reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    pub fn then_fail(self, err: TransportError) -> Self {
        self.push(Err(err));
        self
    }

    /// Simulated service latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Per-call deadline; a delay beyond it surfaces as a timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn push(&self, item: Scripted) {
        lock(&self.queue).push_back(item);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<(GenerationPrompt, ScoreScale)> {
        lock(&self.last).clone()
    }

    fn next_reply(&self) -> Scripted {
        if let Some(item) = lock(&self.queue).pop_front() {
            return item;
        }
        match &self.repeat {
            Some(text) => Ok(text.clone()),
            None => Err(TransportError::unknown("scripted client has no reply left")),
        }
    }
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match m.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(
        &self,
        prompt: &GenerationPrompt,
        scale: ScoreScale,
    ) -> Result<RawGenerationOutput, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last) = Some((prompt.clone(), scale));
        let reply = self.next_reply();

        let wait = async {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
        };
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, wait).await.map_err(|_| {
                TransportError::timeout(format!("no reply within {}ms", limit.as_millis()))
                    .with_provider("fake")
            })?,
            None => wait.await,
        }

        let text = reply.map_err(|e| {
            if e.provider.is_some() {
                e
            } else {
                e.with_provider("fake")
            }
        })?;
        Ok(RawGenerationOutput {
            text,
            provider: "fake".to_string(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TransportErrorKind;

    fn prompt() -> GenerationPrompt {
        GenerationPrompt {
            system: "system".into(),
            user: "user".into(),
        }
    }

    #[tokio::test]
    async fn replays_queue_then_repeats() {
        let client = ScriptedClient::repeating("{}")
            .then_reply("first")
            .then_fail(TransportError::rate_limited("slow down"));

        let out = client.generate(&prompt(), ScoreScale::Ten).await.unwrap();
        assert_eq!(out.text, "first");
        let err = client.generate(&prompt(), ScoreScale::Ten).await.unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::RateLimited);
        assert_eq!(err.provider.as_deref(), Some("fake"));
        let out = client.generate(&prompt(), ScoreScale::Percent).await.unwrap();
        assert_eq!(out.text, "{}");

        assert_eq!(client.call_count(), 3);
        assert_eq!(client.last_call().unwrap().1, ScoreScale::Percent);
    }

    #[tokio::test]
    async fn remembers_only_the_latest_call() {
        let client = ScriptedClient::repeating("{}");
        for n in 0..50 {
            let p = GenerationPrompt {
                system: "system".into(),
                user: format!("answer {n}"),
            };
            client.generate(&p, ScoreScale::Ten).await.unwrap();
        }
        assert_eq!(client.call_count(), 50);
        let (last, _) = client.last_call().unwrap();
        assert_eq!(last.user, "answer 49");
    }

    #[tokio::test]
    async fn exhausted_script_is_an_unknown_failure() {
        let client = ScriptedClient::new();
        let err = client.generate(&prompt(), ScoreScale::Ten).await.unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::Unknown);
    }

    #[tokio::test]
    async fn delay_past_deadline_times_out() {
        let client = ScriptedClient::repeating("{}")
            .with_delay(Duration::from_millis(500))
            .with_timeout(Duration::from_millis(10));
        let err = client.generate(&prompt(), ScoreScale::Ten).await.unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::Timeout);
    }
}
