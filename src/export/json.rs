//! JSON rendering
//!
//! An array of conversations, each an array of message objects. Indented
//! with four spaces; non-ASCII text is written as-is (serde_json only escapes
//! control characters, quotes and backslashes).

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::ExportRecord;
use super::error::ExportResult;
use crate::threading::ConversationSet;

pub fn render_json(conversations: &ConversationSet) -> ExportResult<Vec<u8>> {
    let document: Vec<Vec<ExportRecord<'_>>> = conversations
        .iter()
        .map(ExportRecord::for_conversation)
        .collect();

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;

    Ok(buffer)
}
