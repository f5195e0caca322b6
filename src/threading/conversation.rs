//! Conversation chains produced by the threading pass

use crate::threading::message::{Message, MessageId};

/// A reply chain, root first.
///
/// Never empty. Every message after the first replies to the message right
/// before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Build a conversation from a root-to-leaf chain.
    ///
    /// Returns `None` for an empty chain or when some message does not reply
    /// to its predecessor.
    pub fn from_messages(messages: Vec<Message>) -> Option<Self> {
        if messages.is_empty() {
            return None;
        }

        let linked = messages
            .windows(2)
            .all(|pair| pair[1].reply_to_id.as_ref() == Some(&pair[0].id));

        linked.then_some(Conversation { messages })
    }

    /// Chains assembled by the builder are linked by construction
    pub(crate) fn from_chain(messages: Vec<Message>) -> Self {
        debug_assert!(!messages.is_empty());
        Conversation { messages }
    }

    /// Id of the most recent message in the chain
    pub fn conversation_id(&self) -> &MessageId {
        &self.messages[self.messages.len() - 1].id
    }

    /// Root of the chain as far as this batch is concerned
    pub fn root(&self) -> &Message {
        &self.messages[0]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Ordered conversations covering a batch exactly once
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationSet {
    conversations: Vec<Conversation>,
}

impl ConversationSet {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        ConversationSet { conversations }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Conversation> {
        self.conversations.iter()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Total number of messages across all conversations
    pub fn message_count(&self) -> usize {
        self.conversations.iter().map(Conversation::len).sum()
    }
}

impl<'a> IntoIterator for &'a ConversationSet {
    type Item = &'a Conversation;
    type IntoIter = std::slice::Iter<'a, Conversation>;

    fn into_iter(self) -> Self::IntoIter {
        self.conversations.iter()
    }
}

impl IntoIterator for ConversationSet {
    type Item = Conversation;
    type IntoIter = std::vec::IntoIter<Conversation>;

    fn into_iter(self) -> Self::IntoIter {
        self.conversations.into_iter()
    }
}
