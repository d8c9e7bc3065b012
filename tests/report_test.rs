//! Tests for the send/receive report built from a message table on disk

use std::fs;
use tempfile::tempdir;

use messenger_analysis::cache::GateOutcome;
use messenger_analysis::error::AnalysisError;
use messenger_analysis::file_writer::write_message_table;
use messenger_analysis::models::CanonicalMessageRow;
use messenger_analysis::report::{read_message_table, run_send_receive};

fn row(name: &str, received: u8, ts: i64, content: &str) -> CanonicalMessageRow {
    CanonicalMessageRow {
        conversation_id: format!("{}_1", name.to_lowercase()),
        name: name.to_string(),
        received,
        timestamp_ms: ts,
        content: content.to_string(),
        kind: "Generic".to_string(),
        msg: 1,
    }
}

#[test]
fn test_message_table_reads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("allMessageData.csv");
    let rows = vec![row("Alice", 1, 10, "hi, \"there\""), row("Alice", 0, 20, "")];
    write_message_table(&rows, &path).unwrap();

    assert_eq!(read_message_table(&path).unwrap(), rows);
}

#[test]
fn test_report_written_and_reused() {
    let dir = tempdir().unwrap();
    let table = dir.path().join("allMessageData.csv");
    let report = dir.path().join("out").join("sendreceivecontacts.csv");
    write_message_table(
        &[
            row("Alice", 1, 1, &"a".repeat(300)),
            row("Alice", 0, 2, &"b".repeat(100)),
            row("Bob", 1, 3, "short"),
        ],
        &table,
    )
    .unwrap();

    assert_eq!(run_send_receive(&table, &report, 250, false).unwrap(), GateOutcome::Recomputed);
    let written = fs::read_to_string(&report).unwrap();
    assert_eq!(written, ",name,received,totalLen,partLen,pct\n0,Alice,1,400,300,0.75\n");

    assert_eq!(run_send_receive(&table, &report, 250, false).unwrap(), GateOutcome::Reused);
    assert_eq!(run_send_receive(&table, &report, 250, true).unwrap(), GateOutcome::Recomputed);
}

#[test]
fn test_report_requires_message_table() {
    let dir = tempdir().unwrap();
    let err = run_send_receive(
        &dir.path().join("allMessageData.csv"),
        &dir.path().join("report.csv"),
        250,
        false,
    )
    .unwrap_err();
    assert!(matches!(err, AnalysisError::MissingArtifact { .. }));
}
