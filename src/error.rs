use thiserror::Error;

use crate::export::ExportError;
use crate::settings::SettingsError;
use crate::source::SourceError;

/// Everything that can stop an export request
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("user {user_id} may not export conversations in guild {guild_id}")]
    Unauthorized { guild_id: String, user_id: String },
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ExporterError {
    /// Short message safe to show the requester
    ///
    /// Internal details (paths, parser output) stay in the `Display` text,
    /// which callers log.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExporterError::Unauthorized { .. } => "You are not allowed to use this command.",
            ExporterError::Source(_) => {
                "Could not fetch the channel history. Please try again later."
            }
            ExporterError::Settings(_) => {
                "The exporter is misconfigured. Please contact an administrator."
            }
            ExporterError::Export(_) => "Failed to export the conversations.",
        }
    }
}
