//! Plain-text transcript
//!
//! One `"<author_name>: <content>"` line per message, and a blank line after
//! every conversation. Content is passed through untouched, newlines included.

use super::record::ExportRecord;
use crate::threading::ConversationSet;

pub fn render_text(conversations: &ConversationSet) -> Vec<u8> {
    let mut transcript = String::new();

    for conversation in conversations {
        for record in ExportRecord::for_conversation(conversation) {
            transcript.push_str(record.sender_name);
            transcript.push_str(": ");
            transcript.push_str(record.content);
            transcript.push('\n');
        }
        transcript.push('\n');
    }

    transcript.into_bytes()
}
