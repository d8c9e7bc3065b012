//! Log output honours the configured format

use std::fs;
use tempfile::tempdir;
use tracing::info;

use messenger_analysis::logging::{init_logging, LogFormat};

#[test]
fn test_json_format_writes_json_lines() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("analysis.log");

    let guard = init_logging(Some("info"), Some(&log_path), LogFormat::Json).unwrap();
    info!(contacts = 3, "Processed contacts");
    drop(guard);

    let written: String = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.file_name().unwrap().to_string_lossy().starts_with("analysis.log"))
        .map(|path| fs::read_to_string(path).unwrap())
        .collect();

    let lines: Vec<&str> = written.lines().collect();
    assert!(!lines.is_empty());
    for line in &lines {
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(event.get("fields").is_some());
    }
    assert!(written.contains("Processed contacts"));
}
