//! CSV writing for the canonical tables and the send/receive report.
//!
//! Every table carries a leading, unnamed row-index column. Files are written
//! to a `.tmp` sibling and renamed into place.

use csv::Writer;
use std::fs::{self, create_dir_all, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cache::ArtifactPaths;
use crate::error::Result;
use crate::models::{CanonicalContact, CanonicalMessageRow, CanonicalTables, SendReceiveRow};

/// Header of the contact table
pub const CONTACT_HEADER: [&str; 4] = ["", "contactID", "name", "messages"];
/// Header of the message table
pub const MESSAGE_HEADER: [&str; 8] = ["", "contactID", "name", "received", "timestamp_ms", "content", "type", "msg"];
/// Header of the send/receive report
pub const SEND_RECEIVE_HEADER: [&str; 6] = ["", "name", "received", "totalLen", "partLen", "pct"];

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write rows through a temporary file, then rename over `path`
fn write_table<I>(path: &Path, header: &[&str], records: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let tmp = tmp_path(path);
    {
        let file = File::create(&tmp)?;
        let mut writer = Writer::from_writer(BufWriter::new(file));
        writer.write_record(header)?;
        for record in records {
            writer.write_record(&record)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), "Wrote table");
    Ok(())
}

fn contact_record(index: usize, contact: &CanonicalContact) -> Vec<String> {
    vec![
        index.to_string(),
        contact.conversation_id.clone(),
        contact.name.clone(),
        contact.messages.to_string(),
    ]
}

fn message_record(index: usize, row: &CanonicalMessageRow) -> Vec<String> {
    vec![
        index.to_string(),
        row.conversation_id.clone(),
        row.name.clone(),
        row.received.to_string(),
        row.timestamp_ms.to_string(),
        row.content.clone(),
        row.kind.clone(),
        row.msg.to_string(),
    ]
}

/// Write the contact table
pub fn write_contact_table(contacts: &[CanonicalContact], path: &Path) -> Result<()> {
    write_table(
        path,
        &CONTACT_HEADER,
        contacts.iter().enumerate().map(|(i, c)| contact_record(i, c)),
    )
}

/// Write the message table
pub fn write_message_table(messages: &[CanonicalMessageRow], path: &Path) -> Result<()> {
    write_table(
        path,
        &MESSAGE_HEADER,
        messages.iter().enumerate().map(|(i, m)| message_record(i, m)),
    )
}

/// Remove a file if it exists
fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Replace both canonical tables.
///
/// Old tables are removed first and the contact table is written last, so
/// an interrupted write never leaves both files present.
pub fn write_canonical_tables(tables: &CanonicalTables, paths: &ArtifactPaths) -> Result<()> {
    remove_if_present(&paths.contacts)?;
    remove_if_present(&paths.messages)?;
    create_dir_all(&paths.dir)?;

    write_message_table(&tables.messages, &paths.messages)?;
    write_contact_table(&tables.contacts, &paths.contacts)?;
    Ok(())
}

/// Write the send/receive report
pub fn write_send_receive_report(rows: &[SendReceiveRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    write_table(
        path,
        &SEND_RECEIVE_HEADER,
        rows.iter().enumerate().map(|(i, r)| {
            vec![
                i.to_string(),
                r.name.clone(),
                r.received.to_string(),
                r.total_len.to_string(),
                r.part_len.to_string(),
                r.pct.to_string(),
            ]
        }),
    )
}
