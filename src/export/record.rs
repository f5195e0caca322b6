//! Per-message export projection
//!
//! Every format reads message fields through `ExportRecord`. The text writer
//! uses the sender name and content, the CSV writer joins the list fields and
//! the JSON writer keeps them as arrays.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::Serialize;

use crate::threading::{Conversation, Message};

/// One exported message row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord<'a> {
    pub sender_id: &'a str,
    pub sender_name: &'a str,
    pub timestamp: String,
    pub conversation_id: &'a str,
    pub content: &'a str,
    pub attachments: Vec<&'a str>,
    pub reactions: Vec<String>,
}

impl<'a> ExportRecord<'a> {
    /// Column names, in output order
    pub const FIELDS: [&'static str; 7] = [
        "sender_id",
        "sender_name",
        "timestamp",
        "conversation_id",
        "content",
        "attachments",
        "reactions",
    ];

    pub fn new(message: &'a Message, conversation_id: &'a str) -> Self {
        ExportRecord {
            sender_id: &message.author_id,
            sender_name: &message.author_name,
            timestamp: format_timestamp(&message.created_at),
            conversation_id,
            content: &message.content,
            attachments: message.attachments.iter().map(String::as_str).collect(),
            reactions: message.reactions.iter().map(|r| r.label()).collect(),
        }
    }

    /// Records for every message of a conversation, root first
    pub fn for_conversation(conversation: &'a Conversation) -> Vec<Self> {
        let conversation_id = conversation.conversation_id().as_str();
        conversation
            .messages()
            .iter()
            .map(|message| ExportRecord::new(message, conversation_id))
            .collect()
    }

    /// Flattened CSV row with list fields comma-joined
    pub fn to_row(&self) -> [String; 7] {
        [
            self.sender_id.to_string(),
            self.sender_name.to_string(),
            self.timestamp.clone(),
            self.conversation_id.to_string(),
            self.content.to_string(),
            self.attachments.join(","),
            self.reactions.join(","),
        ]
    }
}

/// ISO-8601 with an explicit `+00:00` offset, e.g. `2024-05-01T10:00:00+00:00`
///
/// Timestamps with a fractional part carry exactly six sub-second digits,
/// e.g. `2024-05-01T10:00:00.250000+00:00`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    let precision = if timestamp.nanosecond() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    timestamp.to_rfc3339_opts(precision, false)
}
