use anyhow::{Context, Result};
use base64::Engine;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};

use super::event::{CancelReason, RecognitionEvent};
use super::recognizer::SpeechRecognizer;
use crate::audio::AudioFile;
use crate::config::SpeechConfig;

/// 200 ms of mono 16-bit PCM at 16 kHz
const AUDIO_CHUNK_BYTES: usize = 6400;

/// Event channel depth; the dispatch loop drains faster than the service
/// emits, this only smooths bursts
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Speech-service recognizer: streams a local WAV file over a websocket
/// and maps the service's JSON messages to [`RecognitionEvent`]s.
///
/// Free-form dictation mode, no fixed grammar. The session ends when the
/// service reports the turn finished (all audio consumed) or cancels.
pub struct CloudRecognizer {
    speech: SpeechConfig,
    audio_path: PathBuf,
    connection_id: String,
    running: bool,
    writer_task: Option<JoinHandle<()>>,
    reader_task: Option<JoinHandle<()>>,
}

/// Session open message: language and dictation mode, sent before any
/// audio.
#[derive(Serialize)]
struct SessionOpenMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    language: &'a str,
    mode: &'static str,
    format: &'static str,
}

/// One audio frame, base64 PCM. An empty frame with `final = true`
/// tells the service no more audio is coming.
#[derive(Serialize)]
struct AudioFrameMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    connection_id: &'a str,
    sequence: u32,
    pcm: String,
    sample_rate: u32,
    channels: u16,
    timestamp: String,
    #[serde(rename = "final")]
    final_frame: bool,
}

/// Service-to-client message. Unknown kinds and malformed frames are
/// logged and skipped.
#[derive(Debug, Deserialize)]
struct ServiceMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_code: Option<u16>,
    #[serde(default)]
    error_message: Option<String>,
}

impl CloudRecognizer {
    pub fn new(speech: SpeechConfig, audio_path: impl AsRef<Path>) -> Self {
        Self {
            speech,
            audio_path: audio_path.as_ref().to_path_buf(),
            connection_id: uuid::Uuid::new_v4().to_string(),
            running: false,
            writer_task: None,
            reader_task: None,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "wss://{}.stt.speech.microsoft.com/speech/recognition/dictation/cognitiveservices/v1?language={}&format=simple",
            self.speech.region, self.speech.language
        )
    }

    fn map_message(msg: ServiceMessage) -> Option<RecognitionEvent> {
        match msg.kind.as_str() {
            "speech.hypothesis" => Some(RecognitionEvent::Recognizing(
                msg.text.unwrap_or_default(),
            )),
            "speech.phrase" => match msg.status.as_deref() {
                Some("Success") => {
                    Some(RecognitionEvent::Recognized(msg.text.unwrap_or_default()))
                }
                Some("NoMatch") => Some(RecognitionEvent::NoMatch),
                other => {
                    warn!("Unrecognized phrase status: {:?}", other);
                    None
                }
            },
            "turn.end" => Some(RecognitionEvent::SessionStopped),
            "error" => Some(RecognitionEvent::Canceled {
                reason: CancelReason::Error,
                code: msg.error_code,
                detail: msg.error_message,
            }),
            other => {
                warn!("Ignoring unknown service message type: {}", other);
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for CloudRecognizer {
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognitionEvent>> {
        let audio = AudioFile::open(&self.audio_path)?;
        if !audio.is_recognition_ready() {
            anyhow::bail!(
                "audio must be 16 kHz mono, got {} Hz {} channels — transcode it first",
                audio.sample_rate,
                audio.channels
            );
        }

        let url = self.endpoint();
        info!("Connecting to speech service: {}", url);

        let mut request = url
            .into_client_request()
            .context("Invalid speech service endpoint")?;
        let headers = request.headers_mut();
        headers.insert(
            "Ocp-Apim-Subscription-Key",
            self.speech
                .key
                .parse()
                .context("Subscription key is not a valid header value")?,
        );
        headers.insert(
            "X-ConnectionId",
            self.connection_id
                .parse()
                .context("Connection ID is not a valid header value")?,
        );

        let (socket, _response) = connect_async(request)
            .await
            .context("Failed to connect to speech service")?;

        info!("Connected to speech service");

        let (mut write, mut read) = socket.split();
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        // Writer: session open, then audio frames, then the final empty
        // frame. Transport failures surface as a Canceled event.
        let writer_events = event_tx.clone();
        let connection_id = self.connection_id.clone();
        let language = self.speech.language.clone();
        let sample_rate = audio.sample_rate;
        let channels = audio.channels;
        let pcm = audio.pcm_bytes();

        self.writer_task = Some(tokio::spawn(async move {
            let open = SessionOpenMessage {
                kind: "session.open",
                language: &language,
                mode: "dictation",
                format: "simple",
            };

            let send_result = async {
                write
                    .send(Message::Text(serde_json::to_string(&open)?))
                    .await?;

                for (sequence, chunk) in pcm.chunks(AUDIO_CHUNK_BYTES).enumerate() {
                    let frame = AudioFrameMessage {
                        kind: "audio",
                        connection_id: &connection_id,
                        sequence: sequence as u32,
                        pcm: base64::engine::general_purpose::STANDARD.encode(chunk),
                        sample_rate,
                        channels,
                        timestamp: chrono::Utc::now().to_rfc3339(),
                        final_frame: false,
                    };
                    write
                        .send(Message::Text(serde_json::to_string(&frame)?))
                        .await?;
                }

                let last = AudioFrameMessage {
                    kind: "audio",
                    connection_id: &connection_id,
                    sequence: 0,
                    pcm: String::new(),
                    sample_rate,
                    channels,
                    timestamp: chrono::Utc::now().to_rfc3339(),
                    final_frame: true,
                };
                write
                    .send(Message::Text(serde_json::to_string(&last)?))
                    .await?;

                Ok::<(), anyhow::Error>(())
            }
            .await;

            if let Err(e) = send_result {
                warn!("Audio stream interrupted: {}", e);
                let _ = writer_events
                    .send(RecognitionEvent::Canceled {
                        reason: CancelReason::Error,
                        code: None,
                        detail: Some(format!("audio stream interrupted: {}", e)),
                    })
                    .await;
            }
        }));

        // Reader: service messages -> events, until a terminal message,
        // a close frame, or a transport error.
        self.reader_task = Some(tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Text(payload)) => {
                        match serde_json::from_str::<ServiceMessage>(&payload) {
                            Ok(msg) => {
                                if let Some(event) = Self::map_message(msg) {
                                    let terminal = event.is_terminal();
                                    if event_tx.send(event).await.is_err() {
                                        break;
                                    }
                                    if terminal {
                                        break;
                                    }
                                }
                            }
                            Err(e) => {
                                // Absorbed locally: a single malformed
                                // frame never ends the session
                                warn!("Failed to parse service message: {}", e);
                            }
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        info!("Service closed the stream: {:?}", frame);
                        let _ = event_tx
                            .send(RecognitionEvent::Canceled {
                                reason: CancelReason::EndOfStream,
                                code: None,
                                detail: None,
                            })
                            .await;
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        let _ = event_tx
                            .send(RecognitionEvent::Canceled {
                                reason: CancelReason::Error,
                                code: None,
                                detail: Some(format!("transport error: {}", e)),
                            })
                            .await;
                        break;
                    }
                }
            }
        }));

        self.running = true;
        Ok(event_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.running && self.writer_task.is_none() && self.reader_task.is_none() {
            return Ok(());
        }

        info!("Stopping continuous recognition");

        // Dropping the socket halves closes the connection; the event
        // channel closes when both task-held senders are gone.
        if let Some(task) = self.writer_task.take() {
            task.abort();
            let _ = task.await;
        }
        if let Some(task) = self.reader_task.take() {
            task.abort();
            let _ = task.await;
        }

        self.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn name(&self) -> &str {
        "cloud-speech"
    }
}
