//! Export a chat channel's history as reply-chain conversations.
//!
//! `threading` rebuilds conversations from a fetched message batch, `export`
//! renders them as text, CSV and JSON, and `service` ties both to the guild
//! allow-lists in `settings` and a history `source`.

pub mod config;
pub mod error;
pub mod export;
pub mod service;
pub mod settings;
pub mod source;
pub mod threading;

use env_logger::Env;
use std::sync::Once;

pub use error::ExporterError;
pub use service::{ExportOutcome, ExportRequest, ExportService};

static LOGGER: Once = Once::new();

/// Initialise `env_logger` once; `RUST_LOG` overrides the `info` default
pub fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_is_idempotent() {
        // Both binaries call this; a second global logger init would panic
        init_logger();
        init_logger();
        log::debug!("logger ready");
    }
}
