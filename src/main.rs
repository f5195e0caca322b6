use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use conversation_exporter::config::ExporterConfig;
use conversation_exporter::settings::JsonFileSettingsRepository;
use conversation_exporter::source::SnapshotSource;
use conversation_exporter::{ExportRequest, ExportService, init_logger};

#[derive(Parser, Debug)]
#[command(
    name = "conversation-exporter",
    about = "Export a channel's message history as reply-chain conversations"
)]
struct Args {
    /// Path to the guild allow-list file (default: ./config/bot_config.json).
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// JSON snapshot of the channel history (array of messages).
    #[arg(short, long)]
    batch: PathBuf,

    /// Guild the channel belongs to.
    #[arg(long)]
    guild_id: String,

    /// Channel whose history is exported.
    #[arg(long)]
    channel_id: String,

    /// User id of the requester.
    #[arg(long)]
    user_id: String,

    /// Comma-separated role ids held by the requester.
    #[arg(long, value_delimiter = ',')]
    roles: Vec<String>,

    /// Directory for the exported files (default: current directory).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_logger();

    let args = Args::parse();
    let config = ExporterConfig::from_env().with_overrides(args.settings, args.output_dir);

    if !config.settings_path.is_file() {
        log::error!("settings file not found: {}", config.settings_path.display());
        return Ok(ExitCode::FAILURE);
    }

    log::info!("starting conversation export");

    let settings = JsonFileSettingsRepository::load(&config.settings_path)?;
    let service = ExportService::new(settings, &config.output_dir);
    let source = SnapshotSource::new(args.batch);

    let request = ExportRequest {
        guild_id: args.guild_id,
        channel_id: args.channel_id,
        requester: args.user_id,
        roles: args.roles,
    };

    match service.handle(&request, &source) {
        Ok(outcome) => {
            println!(
                "Exported {} messages in {} conversations:",
                outcome.messages, outcome.conversations
            );
            for path in outcome.files.paths() {
                println!("  {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            log::warn!("export failed: {}", err);
            eprintln!("{}", err.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
