use std::path::PathBuf;

use clap::Parser;

use conversation_exporter::init_logger;
use conversation_exporter::settings::{
    GuildSettings, JsonFileSettingsRepository, SettingsError, SettingsRepository,
};

#[derive(Parser, Debug)]
#[command(
    name = "add_settings",
    about = "Register which roles and users may export conversations in a guild"
)]
struct Args {
    /// Settings file to create or update.
    file_location: PathBuf,

    /// Guild id the allow-list applies to.
    guild_id: String,

    /// Comma-separated role ids allowed to export (may be empty).
    allowed_role_ids: String,

    /// Comma-separated user ids allowed to export (may be empty).
    allowed_user_ids: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let args = Args::parse();

    let mut repository = match JsonFileSettingsRepository::load(&args.file_location) {
        Ok(repository) => repository,
        Err(SettingsError::Parse { path, source }) => {
            log::warn!(
                "ignoring unreadable settings in {}: {}",
                path.display(),
                source
            );
            JsonFileSettingsRepository::empty(&args.file_location)
        }
        Err(err) => return Err(err.into()),
    };

    let settings = GuildSettings::from_id_lists(&args.allowed_role_ids, &args.allowed_user_ids);
    repository.update(&args.guild_id, settings)?;

    println!(
        "Settings added for guild {} at {}",
        args.guild_id,
        args.file_location.display()
    );
    Ok(())
}
