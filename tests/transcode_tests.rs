// Integration tests for the transcoder invoker.
//
// Exit-status handling is exercised with stub executables (`true`,
// `false`) rather than a real ffmpeg, so these are Unix-only.

#![cfg(unix)]

use std::path::Path;
use wavescribe::{TranscodeError, Transcoder};

#[test]
fn test_convert_succeeds_on_zero_exit() {
    let transcoder = Transcoder::new("true");
    let result = transcoder.convert(Path::new("in.m4a"), Path::new("out.wav"));
    assert!(result.is_ok());
}

#[test]
fn test_convert_fails_on_nonzero_exit() {
    let transcoder = Transcoder::new("false");
    let err = transcoder
        .convert(Path::new("in.m4a"), Path::new("out.wav"))
        .expect_err("non-zero exit must fail the conversion");

    match &err {
        TranscodeError::Failed { exit_code } => assert_eq!(*exit_code, 1),
        other => panic!("expected Failed, got {:?}", other),
    }
    assert_eq!(err.exit_code(), Some(1));
}

#[test]
fn test_convert_fails_when_executable_is_missing() {
    let transcoder = Transcoder::new("/nonexistent/path/to/ffmpeg");
    let err = transcoder
        .convert(Path::new("in.m4a"), Path::new("out.wav"))
        .expect_err("missing executable must fail the conversion");

    match &err {
        TranscodeError::Launch { bin, .. } => {
            assert_eq!(bin, Path::new("/nonexistent/path/to/ffmpeg"));
        }
        other => panic!("expected Launch, got {:?}", other),
    }
    assert_eq!(err.exit_code(), None);
}

#[test]
fn test_exit_code_accessor() {
    let failed = TranscodeError::Failed { exit_code: 1 };
    assert_eq!(failed.exit_code(), Some(1));
}
