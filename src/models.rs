//! Data models for raw export fragments and the canonical tables
//!
//! Raw types mirror the JSON layout of a Messenger export fragment and only
//! live for the duration of a run. Canonical types are the rows written to
//! `contactData.csv` and `allMessageData.csv`.

use serde::{Deserialize, Serialize};

/// Display name used when a conversation has no resolvable other party
pub const UNKNOWN_CONTACT: &str = "Unknown";

/// One participant entry from a fragment's `participants` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawParticipant {
    /// Display name as exported (possibly mis-encoded)
    pub name: String,
}

/// One exchanged item from a fragment's `messages` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Sender display name as exported
    pub sender_name: String,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// Text body; absent for photos, stickers, shares and the like
    #[serde(default)]
    pub content: Option<String>,
    /// Export type tag, e.g. `Generic` or `Share`
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// A single fragment file of one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConversation {
    /// Ordered participant list
    #[serde(default)]
    pub participants: Vec<RawParticipant>,
    /// Ordered message list
    #[serde(default)]
    pub messages: Vec<RawMessage>,
}

impl RawConversation {
    /// Group chats have more than two participants and are excluded entirely
    #[must_use]
    pub fn is_group_chat(&self) -> bool {
        self.participants.len() > 2
    }
}

/// A fragment file located by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRef {
    /// Path to the fragment file
    pub path: std::path::PathBuf,
    /// Conversation identifier taken from the containing directory
    pub conversation_id: String,
}

/// One row of the contact table, written under the `contactID` column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalContact {
    /// Conversation identifier
    pub conversation_id: String,
    /// Resolved, repaired display name
    pub name: String,
    /// Raw message count summed over every fragment of the conversation
    pub messages: u64,
}

/// Who sent a message, relative to the archive owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Sent by the owner
    Sent,
    /// Sent by anyone else
    Received,
}

impl Direction {
    /// Flag value stored in the `received` column
    #[must_use]
    pub const fn flag(self) -> u8 {
        match self {
            Self::Sent => 0,
            Self::Received => 1,
        }
    }
}

/// One row of the message table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMessageRow {
    /// Conversation identifier
    #[serde(rename = "contactID")]
    pub conversation_id: String,
    /// Resolved contact display name
    pub name: String,
    /// 0 when sent by the owner, 1 otherwise
    pub received: u8,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// Repaired text body
    pub content: String,
    /// Export type tag
    #[serde(rename = "type")]
    pub kind: String,
    /// Always 1; summed downstream to count messages
    pub msg: u8,
}

/// Result of processing one fragment file
///
/// Produced independently per file and folded together by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPartial {
    /// Contact row for this fragment, carrying only this fragment's count
    pub contact: CanonicalContact,
    /// Eligible message rows, in fragment order
    pub rows: Vec<CanonicalMessageRow>,
}

/// Why a fragment produced no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// More than two participants
    GroupChat,
    /// Only the owner and/or placeholder accounts took part
    UnknownContact,
}

/// Outcome of processing one fragment file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentOutcome {
    /// The fragment contributes to the canonical tables
    Included(ConversationPartial),
    /// The fragment was intentionally left out
    Skipped(SkipReason),
}

/// The two canonical tables produced by a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalTables {
    /// One row per conversation, by total messages descending
    pub contacts: Vec<CanonicalContact>,
    /// All eligible messages, by timestamp ascending
    pub messages: Vec<CanonicalMessageRow>,
}

/// One row of the send/receive report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReceiveRow {
    /// Contact display name
    pub name: String,
    /// Always 1: the row describes what the contact sent to the owner
    pub received: u8,
    /// Characters exchanged in both directions
    #[serde(rename = "totalLen")]
    pub total_len: u64,
    /// Characters received from the contact
    #[serde(rename = "partLen")]
    pub part_len: u64,
    /// `part_len / total_len`
    pub pct: f64,
}
