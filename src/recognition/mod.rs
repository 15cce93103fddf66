mod cloud;
mod event;
mod recognizer;
mod session;
mod signal;

pub use cloud::CloudRecognizer;
pub use event::{CancelReason, Progress, RecognitionEvent};
pub use recognizer::SpeechRecognizer;
pub use session::{RecognitionSession, SessionOptions, SessionState, SessionSummary};
pub use signal::CompletionSignal;
