//! Conversation export module
//!
//! Serializes a `ConversationSet` into three artifacts: a plain-text
//! transcript, a CSV table and a nested JSON document. All three are rendered
//! in memory from the same per-message `ExportRecord`, so they always agree
//! on conversation membership, order and field values.
//!
//! ## Module Structure
//!
//! - `record`: Shared per-message projection (the seven exported fields)
//! - `text`: `"<author>: <content>"` transcript
//! - `tabular`: CSV rendering
//! - `json`: JSON rendering
//! - `artifacts`: The rendered bundle, file naming and all-or-nothing writes
//! - `error`: Export errors

pub mod artifacts;
pub mod error;
pub mod json;
pub mod record;
pub mod tabular;
pub mod text;

pub use artifacts::{ArtifactFormat, ArtifactNames, ExportArtifacts, ExportedFiles};
pub use error::{ExportError, ExportResult};
pub use record::ExportRecord;

use crate::threading::ConversationSet;

/// Render all three artifacts for a conversation set
///
/// Nothing is returned unless every format rendered, so callers never hold a
/// partial bundle.
pub fn export_conversations(conversations: &ConversationSet) -> ExportResult<ExportArtifacts> {
    let text = text::render_text(conversations);
    let csv = tabular::render_csv(conversations)?;
    let json = json::render_json(conversations)?;

    log::debug!(
        "rendered {} conversations: {} text bytes, {} csv bytes, {} json bytes",
        conversations.len(),
        text.len(),
        csv.len(),
        json.len()
    );

    Ok(ExportArtifacts { text, csv, json })
}
