//! Message normalization: one fragment file in, one partial result out.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{AnalysisError, Result};
use crate::identity::IdentityResolver;
use crate::models::{
    CanonicalContact, CanonicalMessageRow, ConversationPartial, FragmentOutcome, FragmentRef, RawConversation,
    RawMessage, SkipReason,
};
use crate::text::repair_text;

/// Turn one raw message into a canonical row.
///
/// Messages without a text body produce nothing.
#[must_use]
pub fn normalize_message(
    message: &RawMessage,
    conversation_id: &str,
    contact_name: &str,
    resolver: &IdentityResolver,
) -> Option<CanonicalMessageRow> {
    let content = message.content.as_deref()?;

    Some(CanonicalMessageRow {
        conversation_id: conversation_id.to_string(),
        name: contact_name.to_string(),
        received: resolver.direction(&message.sender_name).flag(),
        timestamp_ms: message.timestamp_ms,
        content: repair_text(content),
        kind: message.kind.clone(),
        msg: 1,
    })
}

/// Normalize an already parsed fragment
#[must_use]
pub fn normalize_conversation(
    conversation: &RawConversation,
    conversation_id: &str,
    resolver: &IdentityResolver,
) -> FragmentOutcome {
    if conversation.is_group_chat() {
        return FragmentOutcome::Skipped(SkipReason::GroupChat);
    }

    let identity = resolver.resolve(&conversation.participants);
    if identity.is_unknown() {
        return FragmentOutcome::Skipped(SkipReason::UnknownContact);
    }

    let rows = conversation
        .messages
        .iter()
        .filter_map(|m| normalize_message(m, conversation_id, &identity.name, resolver))
        .collect();

    FragmentOutcome::Included(ConversationPartial {
        contact: CanonicalContact {
            conversation_id: conversation_id.to_string(),
            name: identity.name,
            // Raw fragment size, photos and stickers included
            messages: conversation.messages.len() as u64,
        },
        rows,
    })
}

/// Parse a fragment file
pub fn load_fragment(path: &Path) -> Result<RawConversation> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|source| AnalysisError::MalformedFragment {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and normalize one fragment located by the scanner
pub fn process_fragment(fragment: &FragmentRef, resolver: &IdentityResolver) -> Result<FragmentOutcome> {
    let conversation = load_fragment(&fragment.path)?;
    Ok(normalize_conversation(&conversation, &fragment.conversation_id, resolver))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawParticipant;

    const OWNER: &str = "Me Myself";

    fn text(sender: &str, ts: i64, content: &str) -> RawMessage {
        RawMessage {
            sender_name: sender.to_string(),
            timestamp_ms: ts,
            content: Some(content.to_string()),
            kind: "Generic".to_string(),
        }
    }

    fn photo(sender: &str, ts: i64) -> RawMessage {
        RawMessage {
            sender_name: sender.to_string(),
            timestamp_ms: ts,
            content: None,
            kind: "Generic".to_string(),
        }
    }

    fn conversation(names: &[&str], messages: Vec<RawMessage>) -> RawConversation {
        RawConversation {
            participants: names.iter().map(|n| RawParticipant { name: (*n).to_string() }).collect(),
            messages,
        }
    }

    #[test]
    fn test_normalize_message_direction() {
        let resolver = IdentityResolver::new(OWNER);
        let sent = normalize_message(&text(OWNER, 1, "hi"), "alice_1", "Alice", &resolver).unwrap();
        let received = normalize_message(&text("Alice", 2, "yo"), "alice_1", "Alice", &resolver).unwrap();
        assert_eq!(sent.received, 0);
        assert_eq!(received.received, 1);
        assert_eq!(sent.msg, 1);
    }

    #[test]
    fn test_third_party_sender_counts_as_received() {
        let resolver = IdentityResolver::new(OWNER);
        let row = normalize_message(&text("Somebody Else", 1, "hey"), "alice_1", "Alice", &resolver).unwrap();
        assert_eq!(row.received, 1);
        assert_eq!(row.name, "Alice");
    }

    #[test]
    fn test_missing_content_dropped_but_empty_kept() {
        let resolver = IdentityResolver::new(OWNER);
        assert!(normalize_message(&photo(OWNER, 1), "a_1", "A", &resolver).is_none());
        let empty = normalize_message(&text(OWNER, 1, ""), "a_1", "A", &resolver).unwrap();
        assert_eq!(empty.content, "");
    }

    #[test]
    fn test_content_is_repaired() {
        let resolver = IdentityResolver::new(OWNER);
        let row = normalize_message(&text("Alice", 1, "caf\u{00c3}\u{00a9}"), "a_1", "Alice", &resolver).unwrap();
        assert_eq!(row.content, "café");
    }

    #[test]
    fn test_contact_count_includes_dropped_messages() {
        let resolver = IdentityResolver::new(OWNER);
        let conv = conversation(
            &["Alice", OWNER],
            vec![text(OWNER, 1, "a"), text(OWNER, 2, "b"), text("Alice", 3, "c"), photo("Alice", 4)],
        );
        let FragmentOutcome::Included(partial) = normalize_conversation(&conv, "alice_123", &resolver) else {
            panic!("expected included fragment");
        };
        assert_eq!(partial.contact.messages, 4);
        assert_eq!(partial.rows.len(), 3);
        assert_eq!(partial.contact.name, "Alice");
    }

    #[test]
    fn test_group_chat_skipped() {
        let resolver = IdentityResolver::new(OWNER);
        let conv = conversation(&["Alice", "Bob", OWNER], vec![text("Alice", 1, "hi")]);
        assert_eq!(
            normalize_conversation(&conv, "grp_1", &resolver),
            FragmentOutcome::Skipped(SkipReason::GroupChat)
        );
    }

    #[test]
    fn test_unknown_contact_skipped() {
        let resolver = IdentityResolver::new(OWNER);
        let conv = conversation(&["Facebook User", OWNER], vec![text(OWNER, 1, "hi")]);
        assert_eq!(
            normalize_conversation(&conv, "x_1", &resolver),
            FragmentOutcome::Skipped(SkipReason::UnknownContact)
        );
    }
}
