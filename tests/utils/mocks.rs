use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use drawduel::judge::{Judge, JudgeEntry, JudgeError};

/// Judge that names the first drawer and counts how often it was called
pub struct CountingJudge {
    calls: AtomicUsize,
    delay: Duration,
}

impl CountingJudge {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Judge for CountingJudge {
    async fn judge(&self, entries: &[JudgeEntry]) -> Result<String, JudgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut text = String::from("Descriptions:\n");
        for entry in entries {
            text.push_str(&format!("- {}: a fine {}\n", entry.drawer_name, entry.topic));
        }
        if let Some(first) = entries.first() {
            text.push_str(&format!("Winner: {}\n", first.drawer_name));
        }
        text.push_str("Reason: confidence\n");
        Ok(text)
    }
}

/// Judge whose provider is always unreachable
pub struct FailingJudge;

#[async_trait]
impl Judge for FailingJudge {
    async fn judge(&self, _entries: &[JudgeEntry]) -> Result<String, JudgeError> {
        Err(JudgeError::Status(502))
    }
}

/// Judge whose task blows up mid-call
pub struct PanickingJudge;

#[async_trait]
impl Judge for PanickingJudge {
    async fn judge(&self, _entries: &[JudgeEntry]) -> Result<String, JudgeError> {
        panic!("judge crashed");
    }
}
