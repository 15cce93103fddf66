pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod recognition;
pub mod sink;
pub mod transcode;

pub use audio::AudioFile;
pub use config::Config;
pub use error::{SessionError, TranscodeError};
pub use pipeline::Pipeline;
pub use recognition::{
    CancelReason, CloudRecognizer, CompletionSignal, Progress, RecognitionEvent,
    RecognitionSession, SessionOptions, SessionState, SessionSummary, SpeechRecognizer,
};
pub use sink::{FileSink, MemorySink, TranscriptSink};
pub use transcode::Transcoder;
