use anyhow::{Context, Result};
use hound::WavReader;
use std::path::Path;
use tracing::info;

/// The sample rate the speech service expects.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// The channel count the speech service expects (mono).
pub const TARGET_CHANNELS: u16 = 1;

pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path).context("Failed to open WAV file")?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }

    /// Whether the file is already in the format the recognizer streams
    /// (16 kHz mono). The transcoder is responsible for producing this;
    /// anything else means the conversion step was skipped or broken.
    pub fn is_recognition_ready(&self) -> bool {
        self.sample_rate == TARGET_SAMPLE_RATE && self.channels == TARGET_CHANNELS
    }

    /// Interleaved samples as little-endian PCM bytes, ready for streaming.
    pub fn pcm_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}
