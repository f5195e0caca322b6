use std::env;
use std::path::PathBuf;

pub const DEFAULT_SETTINGS_PATH: &str = "./config/bot_config.json";
pub const DEFAULT_OUTPUT_DIR: &str = ".";

fn env_path(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Runtime configuration for the exporter binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    /// JSON file holding per-guild allow-lists
    pub settings_path: PathBuf,
    /// Directory export artifacts are written to
    pub output_dir: PathBuf,
}

impl ExporterConfig {
    pub fn from_env() -> Self {
        Self {
            settings_path: env_path("EXPORTER_SETTINGS_PATH", DEFAULT_SETTINGS_PATH),
            output_dir: env_path("EXPORTER_OUTPUT_DIR", DEFAULT_OUTPUT_DIR),
        }
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(mut self, settings_path: Option<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        if let Some(path) = settings_path {
            self.settings_path = path;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let config = ExporterConfig {
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
        .with_overrides(Some(PathBuf::from("/etc/exporter.json")), None);

        assert_eq!(config.settings_path, PathBuf::from("/etc/exporter.json"));
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_env_path_falls_back_to_default() {
        let path = env_path("EXPORTER_TEST_UNSET_VARIABLE", "fallback.json");
        assert_eq!(path, PathBuf::from("fallback.json"));
    }
}
