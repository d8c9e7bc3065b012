//! Identity resolution for conversations.
//!
//! Owner and placeholder matching is exact string equality on the raw,
//! unrepaired export name. Only the resolved contact name is repaired.

use crate::models::{Direction, RawParticipant, UNKNOWN_CONTACT};
use crate::text::repair_text;

/// Name Messenger substitutes for deleted or deactivated accounts
pub const DEFAULT_PLACEHOLDER_NAME: &str = "Facebook User";

/// True when `raw_name` is the placeholder used for unavailable accounts
#[must_use]
pub fn is_placeholder_name(raw_name: &str, placeholder: &str) -> bool {
    raw_name == placeholder
}

/// True when `raw_name` is exactly the configured owner name
#[must_use]
pub fn is_owner_name(raw_name: &str, owner_name: &str) -> bool {
    raw_name == owner_name
}

/// The other party of a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Repaired display name, or `Unknown`
    pub name: String,
    /// More than two participants
    pub is_group_chat: bool,
}

impl ResolvedIdentity {
    /// No participant other than the owner or a placeholder was found
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_CONTACT
    }
}

/// Resolves participants and senders against the archive owner
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    owner_name: String,
    placeholder_name: String,
}

impl IdentityResolver {
    /// Create a resolver using the default placeholder name
    pub fn new(owner_name: impl Into<String>) -> Self {
        Self::with_placeholder(owner_name, DEFAULT_PLACEHOLDER_NAME)
    }

    /// Create a resolver with a custom placeholder name
    pub fn with_placeholder(owner_name: impl Into<String>, placeholder_name: impl Into<String>) -> Self {
        Self {
            owner_name: owner_name.into(),
            placeholder_name: placeholder_name.into(),
        }
    }

    /// Resolve the other party of a conversation.
    ///
    /// Placeholders and the owner are never candidates. When several
    /// candidates remain the last one in participant order wins.
    #[must_use]
    pub fn resolve(&self, participants: &[RawParticipant]) -> ResolvedIdentity {
        let name = participants
            .iter()
            .rev()
            .map(|p| p.name.as_str())
            .find(|raw| {
                !is_placeholder_name(raw, &self.placeholder_name) && !is_owner_name(raw, &self.owner_name)
            })
            .map_or_else(|| UNKNOWN_CONTACT.to_string(), repair_text);

        ResolvedIdentity {
            name,
            is_group_chat: participants.len() > 2,
        }
    }

    /// Direction of a message, by exact match of the raw sender name.
    ///
    /// Anything other than the owner, including encoding variants of the
    /// owner name, counts as received.
    #[must_use]
    pub fn direction(&self, raw_sender: &str) -> Direction {
        if is_owner_name(raw_sender, &self.owner_name) {
            Direction::Sent
        } else {
            Direction::Received
        }
    }
}
