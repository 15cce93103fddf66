use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::Path;
use tracing::info;
use wavescribe::{
    CloudRecognizer, Config, FileSink, Pipeline, Progress, SpeechRecognizer, Transcoder,
};

/// Convert an audio file and transcribe it with a cloud speech service.
#[derive(Parser)]
#[command(name = "wavescribe", version)]
struct Cli {
    /// Config file basename (without extension)
    #[arg(short, long, default_value = "config/wavescribe")]
    config: String,

    /// Override the input audio file from the config
    #[arg(long)]
    input: Option<String>,

    /// Override the transcript output file from the config
    #[arg(long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    let input = cli.input.unwrap_or(cfg.paths.input_audio);
    let transcript = cli.output.unwrap_or(cfg.paths.transcript);

    info!("wavescribe starting");
    info!("Input audio: {}", input);
    info!("Transcript: {}", transcript);
    info!(
        "Speech service: region={} language={}",
        cfg.speech.region, cfg.speech.language
    );

    let sink = FileSink::open(&transcript)
        .with_context(|| format!("Failed to open transcript file {}", transcript))?;

    let pipeline = Pipeline::new(Transcoder::new(&cfg.transcoder.bin));
    let speech = cfg.speech.clone();

    let summary = pipeline
        .run(
            Path::new(&input),
            Path::new(&cfg.paths.converted_audio),
            move |wav| {
                Ok(Box::new(CloudRecognizer::new(speech, wav)) as Box<dyn SpeechRecognizer>)
            },
            sink,
            |progress| match progress {
                Progress::Interim(text) => {
                    print!("\rRECOGNIZING: {}", text);
                    std::io::stdout().flush().ok();
                }
                Progress::NoMatch => {
                    println!("\nNOMATCH: speech could not be recognized");
                }
            },
        )
        .await?;

    info!(
        "Done: {} utterances written in {:.1}s",
        summary.finalized_count, summary.duration_secs
    );

    Ok(())
}
