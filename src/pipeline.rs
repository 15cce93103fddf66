use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::audio::AudioFile;
use crate::recognition::{
    Progress, RecognitionSession, SessionOptions, SessionSummary, SpeechRecognizer,
};
use crate::sink::TranscriptSink;
use crate::transcode::Transcoder;

/// Sequences the two stages: transcode, then one recognition session.
///
/// The transcoder runs first and its failure aborts everything — the
/// recognizer is never even constructed. On success the produced WAV is
/// validated and handed to a fresh session.
pub struct Pipeline {
    transcoder: Transcoder,
    session_options: SessionOptions,
}

impl Pipeline {
    pub fn new(transcoder: Transcoder) -> Self {
        Self {
            transcoder,
            session_options: SessionOptions::default(),
        }
    }

    pub fn with_session_options(mut self, options: SessionOptions) -> Self {
        self.session_options = options;
        self
    }

    pub async fn run<F, S, P>(
        &self,
        input: &Path,
        converted: &Path,
        make_recognizer: F,
        sink: S,
        progress: P,
    ) -> Result<SessionSummary>
    where
        F: FnOnce(&Path) -> Result<Box<dyn SpeechRecognizer>>,
        S: TranscriptSink + 'static,
        P: FnMut(Progress) + Send + 'static,
    {
        self.transcoder.convert(input, converted)?;

        let audio = AudioFile::open(converted).context("Transcoder output is unreadable")?;
        anyhow::ensure!(
            audio.is_recognition_ready(),
            "transcoder produced {} Hz {} ch audio, expected 16 kHz mono",
            audio.sample_rate,
            audio.channels
        );
        info!(
            "Converted audio ready: {:.1}s at {} Hz",
            audio.duration_seconds, audio.sample_rate
        );

        let mut recognizer = make_recognizer(converted)?;
        let mut session = RecognitionSession::new(self.session_options.clone());

        let summary = session
            .run(recognizer.as_mut(), sink, progress)
            .await
            .context("Recognition session failed")?;

        Ok(summary)
    }
}
