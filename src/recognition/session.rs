use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::event::{CancelReason, Progress, RecognitionEvent};
use super::recognizer::SpeechRecognizer;
use super::signal::CompletionSignal;
use crate::error::SessionError;
use crate::sink::TranscriptSink;

/// Session lifecycle. `Ended` is terminal; a session never restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Starting,
    Running,
    Stopping,
    Ended,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Session identifier used in logs
    pub session_id: String,

    /// Upper bound on the wait for session completion. `None` waits until
    /// a terminal event arrives or the event stream closes.
    pub wait_timeout: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            wait_timeout: None,
        }
    }
}

/// What a completed session did.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub interim_count: usize,
    pub finalized_count: usize,
    pub no_match_count: usize,
}

/// Coordinates one continuous-recognition session.
///
/// Two execution contexts are live while the session runs: the caller,
/// suspended on the completion latch, and a single dispatch task that
/// consumes recognition events one at a time. Consuming events at one
/// point is what serializes the handlers — transcript lines reach the
/// sink in event-arrival order, and finalized text is written before the
/// next event is looked at.
pub struct RecognitionSession {
    options: SessionOptions,
    state: SessionState,
}

/// First terminal event observed by the dispatch task.
enum Terminal {
    Stopped,
    CanceledClean,
    CanceledError { code: Option<u16>, detail: String },
}

#[derive(Default)]
struct DispatchOutcome {
    interim: usize,
    finalized: usize,
    no_match: usize,
    terminal: Option<Terminal>,
    sink_error: Option<std::io::Error>,
}

impl RecognitionSession {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session to completion.
    ///
    /// Blocks (asynchronously) until the session reaches `Ended`. The
    /// recognizer is stopped on every exit path: normal stop, service
    /// cancel, start failure, sink failure, and wait timeout.
    pub async fn run<S, P>(
        &mut self,
        recognizer: &mut dyn SpeechRecognizer,
        mut sink: S,
        mut progress: P,
    ) -> Result<SessionSummary, SessionError>
    where
        S: TranscriptSink + 'static,
        P: FnMut(Progress) + Send + 'static,
    {
        if self.state != SessionState::Idle {
            return Err(SessionError::Unexpected(anyhow!(
                "session {} already ran; construct a new session to run again",
                self.options.session_id
            )));
        }

        let session_id = self.options.session_id.clone();
        let started_at = Utc::now();

        info!(
            "Starting recognition session {} on {}",
            session_id,
            recognizer.name()
        );
        self.state = SessionState::Starting;

        let mut events = match recognizer.start().await {
            Ok(rx) => rx,
            Err(e) => {
                // Release resources even though "begin" never completed
                self.state = SessionState::Stopping;
                Self::release(recognizer).await;
                self.state = SessionState::Ended;
                return Err(SessionError::Unexpected(
                    e.context("failed to begin continuous recognition"),
                ));
            }
        };

        self.state = SessionState::Running;

        let signal = CompletionSignal::new();
        let dispatch_signal = signal.clone();
        let dispatch_session = session_id.clone();

        let dispatch = tokio::spawn(async move {
            let mut outcome = DispatchOutcome::default();

            while let Some(event) = events.recv().await {
                match event {
                    RecognitionEvent::Recognizing(text) => {
                        debug!("[{}] RECOGNIZING: {}", dispatch_session, text);
                        outcome.interim += 1;
                        progress(Progress::Interim(text));
                    }

                    RecognitionEvent::Recognized(text) => {
                        info!("[{}] RECOGNIZED: {}", dispatch_session, text);
                        // Written before the next event is consumed, so
                        // reported text is never silently dropped
                        if let Err(e) = sink.append(&text) {
                            error!("[{}] Failed to append transcript: {}", dispatch_session, e);
                            outcome.sink_error = Some(e);
                            dispatch_signal.fire();
                            break;
                        }
                        outcome.finalized += 1;
                    }

                    RecognitionEvent::NoMatch => {
                        info!("[{}] NOMATCH: speech could not be recognized", dispatch_session);
                        outcome.no_match += 1;
                        progress(Progress::NoMatch);
                    }

                    RecognitionEvent::Canceled {
                        reason,
                        code,
                        detail,
                    } => {
                        let detail = detail.unwrap_or_default();
                        warn!(
                            "[{}] CANCELED: reason={:?} code={:?} detail={}",
                            dispatch_session, reason, code, detail
                        );
                        if outcome.terminal.is_none() {
                            outcome.terminal = Some(match reason {
                                CancelReason::Error => Terminal::CanceledError { code, detail },
                                CancelReason::EndOfStream => Terminal::CanceledClean,
                            });
                        }
                        // Racing terminal events: only the first firing
                        // matters, the rest are no-ops
                        dispatch_signal.fire();
                    }

                    RecognitionEvent::SessionStopped => {
                        info!("[{}] Session stopped event", dispatch_session);
                        if outcome.terminal.is_none() {
                            outcome.terminal = Some(Terminal::Stopped);
                        }
                        dispatch_signal.fire();
                    }
                }
            }

            // Stream closed. Release the waiting caller even if no
            // terminal event ever arrived.
            dispatch_signal.fire();
            outcome
        });

        // The caller's single suspension point
        let timed_out = match self.options.wait_timeout {
            Some(limit) => tokio::time::timeout(limit, signal.wait()).await.is_err(),
            None => {
                signal.wait().await;
                false
            }
        };

        self.state = SessionState::Stopping;
        Self::release(recognizer).await;

        // Stopping the recognizer closes the event channel, so the
        // dispatch task is guaranteed to finish.
        let outcome = dispatch
            .await
            .context("recognition dispatch task panicked")
            .map_err(|e| {
                self.state = SessionState::Ended;
                SessionError::Unexpected(e)
            })?;

        self.state = SessionState::Ended;

        let summary = SessionSummary {
            session_id: session_id.clone(),
            started_at,
            duration_secs: Utc::now()
                .signed_duration_since(started_at)
                .num_milliseconds() as f64
                / 1000.0,
            interim_count: outcome.interim,
            finalized_count: outcome.finalized,
            no_match_count: outcome.no_match,
        };

        if timed_out {
            return Err(SessionError::Unexpected(anyhow!(
                "timed out waiting for session {} to complete",
                session_id
            )));
        }

        if let Some(e) = outcome.sink_error {
            return Err(SessionError::Unexpected(
                anyhow::Error::new(e).context("transcript sink failed"),
            ));
        }

        match outcome.terminal {
            Some(Terminal::Stopped) | Some(Terminal::CanceledClean) => {
                info!(
                    "Session {} ended: {} finalized, {} interim, {} no-match in {:.1}s",
                    session_id,
                    summary.finalized_count,
                    summary.interim_count,
                    summary.no_match_count,
                    summary.duration_secs
                );
                Ok(summary)
            }
            Some(Terminal::CanceledError { code, detail }) => {
                Err(SessionError::AuthOrTransport { code, detail })
            }
            None => Err(SessionError::Unexpected(anyhow!(
                "event stream for session {} closed without a terminal event",
                session_id
            ))),
        }
    }

    /// Unconditional resource release. A stop failure is logged, never
    /// allowed to mask the session outcome.
    async fn release(recognizer: &mut dyn SpeechRecognizer) {
        if let Err(e) = recognizer.stop().await {
            warn!("Failed to stop recognizer cleanly: {}", e);
        }
    }
}
