use anyhow::Result;
use tokio::sync::mpsc;

use super::event::RecognitionEvent;

/// Continuous-recognition event source.
///
/// Implementations own the connection to the speech service:
/// - Cloud: websocket session streaming a local WAV file
/// - Tests: scripted event sequences
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send {
    /// Begin continuous recognition.
    ///
    /// Returns a channel receiver on which the service's events arrive,
    /// delivered by a runtime-managed task concurrent with the caller.
    /// The channel closes when recognition stops.
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognitionEvent>>;

    /// Stop continuous recognition and release the underlying resources.
    /// Must be safe to call even if `start` failed.
    async fn stop(&mut self) -> Result<()>;

    /// Whether a session is currently active.
    fn is_running(&self) -> bool;

    /// Recognizer name for logging.
    fn name(&self) -> &str;
}
