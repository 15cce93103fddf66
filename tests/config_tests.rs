// Integration tests for configuration loading.

use anyhow::Result;
use std::fs;
use wavescribe::Config;

#[test]
fn test_config_load_from_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("wavescribe.toml");
    fs::write(
        &path,
        r#"
[transcoder]
bin = "ffmpeg"

[speech]
key = "secret"
region = "westeurope"
language = "de-DE"

[paths]
input_audio = "input/recording.m4a"
converted_audio = "output/recording.wav"
transcript = "output/transcript.txt"
"#,
    )?;

    let basename = dir.path().join("wavescribe");
    let cfg = Config::load(basename.to_str().unwrap())?;

    assert_eq!(cfg.transcoder.bin, "ffmpeg");
    assert_eq!(cfg.speech.region, "westeurope");
    assert_eq!(cfg.speech.language, "de-DE");
    assert_eq!(cfg.paths.transcript, "output/transcript.txt");

    Ok(())
}

#[test]
fn test_config_missing_file_fails() {
    let result = Config::load("/nonexistent/wavescribe");
    assert!(result.is_err());
}
