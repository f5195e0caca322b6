//! Message records and the fetched message batch
//!
//! A `MessageBatch` is one fetch snapshot of a channel. It behaves like a map
//! keyed by message id but remembers the order messages arrived in, so a
//! snapshot file reads back the way it was written.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque message identifier.
///
/// Platform ids are often numeric snowflakes, but nothing here relies on
/// their ordering. Snapshot files may carry them as JSON strings or integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        MessageId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        MessageId::new(id)
    }
}

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        MessageId(id.to_string())
    }
}

/// Snowflake-style id written either as a JSON string or a bare integer
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    pub(crate) fn into_string(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawId::deserialize(deserializer).map(|raw| MessageId(raw.into_string()))
    }
}

fn deserialize_author_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_string)
}

/// Summary of one reaction on a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Emoji label as rendered by the platform (unicode or `<:name:id>`)
    pub emoji: String,

    /// Number of users who reacted
    pub count: u32,
}

impl Reaction {
    pub fn new(emoji: impl Into<String>, count: u32) -> Self {
        Reaction {
            emoji: emoji.into(),
            count,
        }
    }

    /// `"<emoji>:<count>"`, the form used by every export format
    pub fn label(&self) -> String {
        format!("{}:{}", self.emoji, self.count)
    }
}

/// A chat message as delivered by the history fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique id within the batch
    pub id: MessageId,

    /// Author's platform id
    #[serde(deserialize_with = "deserialize_author_id")]
    pub author_id: String,

    /// Author's display name at fetch time
    pub author_name: String,

    /// When the message was posted
    pub created_at: DateTime<Utc>,

    /// Text payload, possibly empty
    #[serde(default)]
    pub content: String,

    /// Attachment URLs in upload order
    #[serde(default)]
    pub attachments: Vec<String>,

    /// Reaction summaries in display order
    #[serde(default)]
    pub reactions: Vec<Reaction>,

    /// Id of the message this one replies to (None for root messages)
    #[serde(default)]
    pub reply_to_id: Option<MessageId>,
}

impl Message {
    /// Create a root message with no attachments or reactions
    pub fn new(
        id: impl Into<MessageId>,
        author_id: impl Into<String>,
        author_name: impl Into<String>,
        created_at: DateTime<Utc>,
        content: impl Into<String>,
    ) -> Self {
        Message {
            id: id.into(),
            author_id: author_id.into(),
            author_name: author_name.into(),
            created_at,
            content: content.into(),
            attachments: Vec::new(),
            reactions: Vec::new(),
            reply_to_id: None,
        }
    }

    pub fn replying_to(mut self, parent: impl Into<MessageId>) -> Self {
        self.reply_to_id = Some(parent.into());
        self
    }

    pub fn with_attachment(mut self, url: impl Into<String>) -> Self {
        self.attachments.push(url.into());
        self
    }

    pub fn with_reaction(mut self, emoji: impl Into<String>, count: u32) -> Self {
        self.reactions.push(Reaction::new(emoji, count));
        self
    }
}

/// One fetch snapshot of a channel's history.
///
/// Keys are unique. Iteration follows arrival order; re-inserting an existing
/// id replaces the stored message without moving it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Message>", into = "Vec<Message>")]
pub struct MessageBatch {
    arrival_order: Vec<MessageId>,
    messages: HashMap<MessageId, Message>,
}

impl MessageBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a message, returning the one it replaced if the id was known
    pub fn insert(&mut self, message: Message) -> Option<Message> {
        let id = message.id.clone();
        let previous = self.messages.insert(id.clone(), message);
        if previous.is_none() {
            self.arrival_order.push(id);
        }
        previous
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.get(id)
    }

    pub fn len(&self) -> usize {
        self.arrival_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrival_order.is_empty()
    }

    /// Messages in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.arrival_order
            .iter()
            .filter_map(|id| self.messages.get(id))
    }

    /// Split into arrival order and the id → message table
    pub(crate) fn into_parts(self) -> (Vec<MessageId>, HashMap<MessageId, Message>) {
        (self.arrival_order, self.messages)
    }
}

impl FromIterator<Message> for MessageBatch {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        let mut batch = MessageBatch::new();
        for message in iter {
            batch.insert(message);
        }
        batch
    }
}

impl From<Vec<Message>> for MessageBatch {
    fn from(messages: Vec<Message>) -> Self {
        messages.into_iter().collect()
    }
}

impl From<MessageBatch> for Vec<Message> {
    fn from(batch: MessageBatch) -> Self {
        let (order, mut messages) = batch.into_parts();
        order
            .into_iter()
            .filter_map(|id| messages.remove(&id))
            .collect()
    }
}
