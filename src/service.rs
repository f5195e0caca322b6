//! Export request handling
//!
//! The chat client turns a user's export command into an `ExportRequest` and
//! hands it to `ExportService::handle`. The service checks the guild's
//! allow-list, fetches the history, threads it, renders the three artifacts
//! and writes them. Acknowledging the command and uploading the files stay
//! with the client.

use std::path::PathBuf;

use crate::error::ExporterError;
use crate::export::{ArtifactNames, ExportedFiles, export_conversations};
use crate::settings::SettingsRepository;
use crate::source::MessageSource;
use crate::threading::build_conversations_with_stats;

/// One user's request to export a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub guild_id: String,
    pub channel_id: String,
    /// User id of whoever issued the command
    pub requester: String,
    /// Role ids the requester holds in the guild
    pub roles: Vec<String>,
}

/// Result of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub files: ExportedFiles,
    pub conversations: usize,
    pub messages: usize,
}

pub struct ExportService<R> {
    settings: R,
    output_dir: PathBuf,
}

impl<R: SettingsRepository> ExportService<R> {
    pub fn new(settings: R, output_dir: impl Into<PathBuf>) -> Self {
        ExportService {
            settings,
            output_dir: output_dir.into(),
        }
    }

    /// Whether the requester passes the guild's allow-list
    pub fn is_authorized(&self, request: &ExportRequest) -> bool {
        self.settings
            .get(&request.guild_id)
            .allows(&request.requester, &request.roles)
    }

    /// Run one export end to end
    ///
    /// Authorization is checked before any history is fetched. Artifacts are
    /// rendered in memory and only written once all three succeeded.
    pub fn handle(
        &self,
        request: &ExportRequest,
        source: &dyn MessageSource,
    ) -> Result<ExportOutcome, ExporterError> {
        if !self.is_authorized(request) {
            log::info!(
                "rejected export of channel {} by user {} in guild {}",
                request.channel_id,
                request.requester,
                request.guild_id
            );
            return Err(ExporterError::Unauthorized {
                guild_id: request.guild_id.clone(),
                user_id: request.requester.clone(),
            });
        }

        let batch = source.fetch_history(&request.guild_id, &request.channel_id)?;
        let (conversations, stats) = build_conversations_with_stats(batch);
        let artifacts = export_conversations(&conversations)?;

        let names = ArtifactNames::for_channel(&request.guild_id, &request.channel_id);
        let files = artifacts.write_to_dir(&self.output_dir, &names)?;

        log::info!(
            "exported {} messages in {} conversations from channel {} ({} dangling replies)",
            stats.messages,
            stats.conversations,
            request.channel_id,
            stats.dangling_references
        );

        Ok(ExportOutcome {
            files,
            conversations: stats.conversations,
            messages: stats.messages,
        })
    }
}
