//! Folding per-fragment partial results into the canonical tables.

use std::collections::HashMap;

use crate::models::{CanonicalContact, CanonicalMessageRow, CanonicalTables, ConversationPartial};

/// Accumulates partial results for one run.
///
/// Contacts sharing a conversation identifier collapse into the first row
/// seen for it, with message counts summed. Rows are sorted only in
/// [`Aggregator::finish`].
#[derive(Debug, Default)]
pub struct Aggregator {
    contacts: Vec<CanonicalContact>,
    positions: HashMap<String, usize>,
    messages: Vec<CanonicalMessageRow>,
}

impl Aggregator {
    /// Empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one partial result in, returning the updated accumulator
    #[must_use]
    pub fn fold(mut self, partial: ConversationPartial) -> Self {
        let ConversationPartial { contact, rows } = partial;

        match self.positions.get(&contact.conversation_id) {
            Some(&pos) => self.contacts[pos].messages += contact.messages,
            None => {
                self.positions.insert(contact.conversation_id.clone(), self.contacts.len());
                self.contacts.push(contact);
            }
        }
        self.messages.extend(rows);
        self
    }

    /// Sort and hand over the tables.
    ///
    /// Contacts by total messages descending, messages by timestamp
    /// ascending. Both sorts are stable, so ties keep discovery order.
    #[must_use]
    pub fn finish(self) -> CanonicalTables {
        let Self {
            mut contacts,
            mut messages,
            ..
        } = self;

        contacts.sort_by(|a, b| b.messages.cmp(&a.messages));
        messages.sort_by_key(|m| m.timestamp_ms);

        CanonicalTables { contacts, messages }
    }
}

/// Fold a whole sequence of partial results
pub fn aggregate<I>(partials: I) -> CanonicalTables
where
    I: IntoIterator<Item = ConversationPartial>,
{
    partials.into_iter().fold(Aggregator::new(), Aggregator::fold).finish()
}
