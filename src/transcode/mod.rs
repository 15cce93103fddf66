use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

use crate::audio::{TARGET_CHANNELS, TARGET_SAMPLE_RATE};
use crate::error::TranscodeError;

/// Invokes the external transcoding tool (ffmpeg) to normalize an audio
/// file to the format the speech service requires: mono, 16 kHz, WAV.
///
/// The invocation is synchronous: `convert` blocks the calling thread
/// until the external process exits. There is no retry; any failure is
/// fatal to the pipeline.
pub struct Transcoder {
    bin: PathBuf,
}

impl Transcoder {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn convert(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        info!(
            "Transcoding {} -> {} ({} Hz, {} ch)",
            input.display(),
            output.display(),
            TARGET_SAMPLE_RATE,
            TARGET_CHANNELS
        );

        let status = Command::new(&self.bin)
            .arg("-i")
            .arg(input)
            .arg("-ac")
            .arg(TARGET_CHANNELS.to_string())
            .arg("-ar")
            .arg(TARGET_SAMPLE_RATE.to_string())
            .arg("-y")
            .arg(output)
            .status()
            .map_err(|source| TranscodeError::Launch {
                bin: self.bin.clone(),
                source,
            })?;

        if !status.success() {
            // Signal-terminated processes have no code on Unix
            return Err(TranscodeError::Failed {
                exit_code: status.code().unwrap_or(-1),
            });
        }

        info!("Transcoding finished: {}", output.display());
        Ok(())
    }
}
