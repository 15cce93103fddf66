// Shared test doubles for the recognition coordinator tests.

use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use wavescribe::{RecognitionEvent, SpeechRecognizer};

/// Replays a fixed event sequence from its own task, the way a real
/// service delivers events concurrently with the waiting caller. Counts
/// `stop` calls so tests can assert resource release happened exactly
/// once.
pub struct ScriptedRecognizer {
    script: Vec<RecognitionEvent>,
    fail_start: bool,
    running: bool,
    stop_calls: Arc<AtomicUsize>,
}

impl ScriptedRecognizer {
    pub fn new(script: Vec<RecognitionEvent>) -> Self {
        Self {
            script,
            fail_start: false,
            running: false,
            stop_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A recognizer whose `start` fails before any event is delivered.
    pub fn failing_start() -> Self {
        Self {
            script: Vec::new(),
            fail_start: true,
            running: false,
            stop_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn stop_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.stop_calls)
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognitionEvent>> {
        if self.fail_start {
            anyhow::bail!("simulated setup failure");
        }

        let (tx, rx) = mpsc::channel(16);
        let script = self.script.clone();

        tokio::spawn(async move {
            for event in script {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            // tx drops here, closing the channel
        });

        self.running = true;
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
