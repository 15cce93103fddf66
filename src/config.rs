use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub transcoder: TranscoderConfig,
    pub speech: SpeechConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Deserialize)]
pub struct TranscoderConfig {
    /// Path to the ffmpeg executable (or just "ffmpeg" if it is on PATH)
    pub bin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// Subscription key for the speech service
    pub key: String,
    /// Service region, e.g. "westeurope"
    pub region: String,
    /// Recognition language, e.g. "de-DE"
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    /// Source audio file in any container ffmpeg understands
    pub input_audio: String,
    /// Where the normalized 16 kHz mono WAV is written
    pub converted_audio: String,
    /// Transcript output file (appended to)
    pub transcript: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            // WAVESCRIBE__SPEECH__KEY etc. — credentials come from the environment
            .add_source(config::Environment::with_prefix("WAVESCRIBE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
