use metrics::counter;
use tracing::info;

use crate::models::{FragmentOutcome, SkipReason};

const FRAGMENTS_SCANNED: &str = "messenger_analysis_fragments_scanned_total";
const GROUP_CHATS_SKIPPED: &str = "messenger_analysis_group_chats_skipped_total";
const UNKNOWN_CONTACTS_SKIPPED: &str = "messenger_analysis_unknown_contacts_skipped_total";
const MESSAGES_SEEN: &str = "messenger_analysis_messages_seen_total";
const MESSAGES_EMITTED: &str = "messenger_analysis_messages_emitted_total";
const MESSAGES_DROPPED: &str = "messenger_analysis_messages_without_content_total";

/// Counters for one processing run
///
/// Every increment is also forwarded to the global `metrics` recorder, if
/// one is installed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineMetrics {
    pub fragments_scanned: u64,
    pub group_chats_skipped: u64,
    pub unknown_contacts_skipped: u64,
    pub messages_seen: u64,
    pub messages_emitted: u64,
    pub messages_without_content: u64,
}

impl PipelineMetrics {
    /// Record the outcome of one fragment
    pub fn record_fragment(&mut self, outcome: &FragmentOutcome) {
        self.fragments_scanned += 1;
        counter!(FRAGMENTS_SCANNED).increment(1);

        match outcome {
            FragmentOutcome::Skipped(SkipReason::GroupChat) => {
                self.group_chats_skipped += 1;
                counter!(GROUP_CHATS_SKIPPED).increment(1);
            }
            FragmentOutcome::Skipped(SkipReason::UnknownContact) => {
                self.unknown_contacts_skipped += 1;
                counter!(UNKNOWN_CONTACTS_SKIPPED).increment(1);
            }
            FragmentOutcome::Included(partial) => {
                let seen = partial.contact.messages;
                let emitted = partial.rows.len() as u64;
                self.messages_seen += seen;
                self.messages_emitted += emitted;
                self.messages_without_content += seen.saturating_sub(emitted);
                counter!(MESSAGES_SEEN).increment(seen);
                counter!(MESSAGES_EMITTED).increment(emitted);
                counter!(MESSAGES_DROPPED).increment(seen.saturating_sub(emitted));
            }
        }
    }

    /// Log a one-line summary of the run
    pub fn log_summary(&self) {
        info!(
            fragments = self.fragments_scanned,
            group_chats = self.group_chats_skipped,
            unknown_contacts = self.unknown_contacts_skipped,
            messages_seen = self.messages_seen,
            messages_emitted = self.messages_emitted,
            without_content = self.messages_without_content,
            "Processing summary"
        );
    }
}
