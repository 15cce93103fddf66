// Integration tests for the transcript sink.

use std::fs;
use wavescribe::{FileSink, MemorySink, TranscriptSink};

#[test]
fn test_file_sink_creates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transcript.txt");

    let mut sink = FileSink::open(&path).unwrap();
    sink.append("hello world").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "hello world\n");
}

#[test]
fn test_file_sink_preserves_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transcript.txt");
    fs::write(&path, "earlier run\n").unwrap();

    let mut sink = FileSink::open(&path).unwrap();
    sink.append("later run").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "earlier run\nlater run\n");
}

#[test]
fn test_file_sink_each_append_is_newline_terminated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transcript.txt");

    let mut sink = FileSink::open(&path).unwrap();
    sink.append("first utterance").unwrap();
    sink.append("second utterance").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec!["first utterance", "second utterance"]);
    assert!(content.ends_with('\n'));
}

#[test]
fn test_file_sink_append_is_durable_per_call() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transcript.txt");

    let mut sink = FileSink::open(&path).unwrap();
    sink.append("observable immediately").unwrap();

    // Readable before the sink is dropped
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "observable immediately\n");
    drop(sink);
}

#[test]
fn test_memory_sink_records_in_order() {
    let mut sink = MemorySink::new();
    sink.append("a").unwrap();
    sink.append("b").unwrap();

    assert_eq!(sink.lines(), &["a".to_string(), "b".to_string()]);
    assert_eq!(sink.into_lines(), vec!["a".to_string(), "b".to_string()]);
}
