//! CSV rendering
//!
//! Header row followed by one row per message. Conversations are contiguous
//! blocks of rows sharing a `conversation_id`; there are no separator rows.
//! Quoting is minimal (only fields containing a delimiter, quote or line
//! break) and records end in `\r\n`.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::error::{ExportError, ExportResult};
use super::{ArtifactFormat, ExportRecord};
use crate::threading::ConversationSet;

pub fn render_csv(conversations: &ConversationSet) -> ExportResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(ExportRecord::FIELDS)?;

    for conversation in conversations {
        for record in ExportRecord::for_conversation(conversation) {
            writer.write_record(record.to_row())?;
        }
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::serialization(ArtifactFormat::Csv, err.error()))
}
