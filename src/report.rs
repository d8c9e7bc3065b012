//! Send/receive statistics over the canonical message table.
//!
//! For every contact that sent the owner at least one text message, the
//! share of exchanged characters that came from the contact.

use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::cache::{GateOutcome, StalenessGate};
use crate::error::{AnalysisError, Result};
use crate::file_writer::write_send_receive_report;
use crate::models::{CanonicalMessageRow, Direction, SendReceiveRow};

/// File name of the send/receive report
pub const SEND_RECEIVE_FILE: &str = "sendreceivecontacts.csv";

/// Default minimum of exchanged characters for a contact to be reported
pub const DEFAULT_MIN_TOTAL_CHARS: u64 = 250;

/// Read the message table back from disk
pub fn read_message_table(path: &Path) -> Result<Vec<CanonicalMessageRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize::<CanonicalMessageRow>()
        .map(|record| record.map_err(AnalysisError::from))
        .collect()
}

#[derive(Debug, Default)]
struct Tally {
    total: u64,
    received: u64,
    has_received: bool,
}

/// Compute per-contact send/receive shares.
///
/// Contacts are keyed by display name and ordered by their first received
/// message before sorting by share, descending. Contacts with no received
/// message, or with `min_total_chars` characters or fewer in total, are left
/// out.
#[must_use]
pub fn send_receive_stats(messages: &[CanonicalMessageRow], min_total_chars: u64) -> Vec<SendReceiveRow> {
    let received_flag = Direction::Received.flag();
    let mut tallies: HashMap<&str, Tally> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for message in messages {
        let len = message.content.chars().count() as u64;
        let tally = tallies.entry(message.name.as_str()).or_default();
        tally.total += len;
        if message.received == received_flag {
            tally.received += len;
            if !tally.has_received {
                tally.has_received = true;
                order.push(message.name.as_str());
            }
        }
    }

    let mut rows: Vec<SendReceiveRow> = order
        .into_iter()
        .filter_map(|name| {
            let tally = tallies.get(name)?;
            if tally.total <= min_total_chars {
                return None;
            }
            Some(SendReceiveRow {
                name: name.to_string(),
                received: received_flag,
                total_len: tally.total,
                part_len: tally.received,
                pct: tally.received as f64 / tally.total as f64,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.pct.total_cmp(&a.pct));
    rows
}

/// Build the send/receive report from `message_table` into `report_path`
///
/// Reuses an existing report unless `force` is set.
pub fn run_send_receive(
    message_table: &Path,
    report_path: &Path,
    min_total_chars: u64,
    force: bool,
) -> Result<GateOutcome> {
    if !message_table.is_file() {
        return Err(AnalysisError::MissingArtifact {
            reason: format!("Can't find the message table at {}", message_table.display()),
        });
    }

    let gate = StalenessGate::new(vec![report_path.to_path_buf()], force);
    let outcome = gate.run(|| {
        info!("Calculating send/receive data");
        let messages = read_message_table(message_table)?;
        let rows = send_receive_stats(&messages, min_total_chars);
        write_send_receive_report(&rows, report_path)?;
        info!(contacts = rows.len(), "Send/receive data calculated");
        Ok(())
    })?;

    Ok(outcome)
}
