use std::path::PathBuf;
use thiserror::Error;

/// External transcoder failures. Always fatal to the pipeline: no session
/// is started after any of these.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to launch transcoder {bin}: {source}")]
    Launch {
        bin: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transcoder exited with code {exit_code}")]
    Failed { exit_code: i32 },
}

impl TranscodeError {
    /// Exit code reported by the external process, if it ran at all.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            TranscodeError::Launch { .. } => None,
            TranscodeError::Failed { exit_code } => Some(*exit_code),
        }
    }
}

/// Terminal session failures surfaced by the coordinator.
///
/// A no-match result is not an error and never appears here.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The service canceled the session with reason "error" (bad
    /// credential, transport drop, remote close).
    #[error("recognition canceled by service (code {code:?}): {detail}")]
    AuthOrTransport { code: Option<u16>, detail: String },

    /// Setup or teardown failure not covered above. Resources are still
    /// released before this is returned.
    #[error("session failure: {0}")]
    Unexpected(#[from] anyhow::Error),
}
