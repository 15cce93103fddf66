/// Why the service canceled a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Transport or authentication failure, or the remote side closed the
    /// stream abnormally.
    Error,
    /// The remote side ended the stream cleanly (ran out of audio).
    EndOfStream,
}

/// One event from the speech service's continuous-recognition stream.
///
/// Events are ephemeral: each one either updates progress, produces a
/// transcript line, or ends the session. Nothing is persisted beyond
/// that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Provisional transcription, may still change. Observability only.
    Recognizing(String),

    /// Settled transcription for an utterance segment. The only event
    /// that produces a transcript line.
    Recognized(String),

    /// The service processed a segment but produced no confident
    /// transcription. Normal outcome, not an error.
    NoMatch,

    /// The service canceled the session. `code` and `detail` are present
    /// when the reason is `Error`.
    Canceled {
        reason: CancelReason,
        code: Option<u16>,
        detail: Option<String>,
    },

    /// Normal end-of-audio completion.
    SessionStopped,
}

impl RecognitionEvent {
    /// Whether this event ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RecognitionEvent::Canceled { .. } | RecognitionEvent::SessionStopped
        )
    }
}

/// Non-final updates forwarded to the caller's progress callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Interim(String),
    NoMatch,
}
