//! Settings repositories
//!
//! The JSON file repository loads the whole file once and keeps it in
//! memory. `update` writes the full map back to the file it was loaded from;
//! `override_settings` only changes the in-memory copy.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::error::{SettingsError, SettingsResult};
use super::guild::GuildSettings;

/// Access to per-guild export permissions
pub trait SettingsRepository {
    /// Settings for a guild, or the empty allow-list if none are stored
    fn get(&self, guild_id: &str) -> GuildSettings;

    /// Replace a guild's settings and persist the change
    fn update(&mut self, guild_id: &str, settings: GuildSettings) -> SettingsResult<()>;

    /// Replace a guild's settings without persisting
    fn override_settings(&mut self, guild_id: &str, settings: GuildSettings);
}

/// Repository backed by a JSON settings file
#[derive(Debug, Clone)]
pub struct JsonFileSettingsRepository {
    path: PathBuf,
    guilds: BTreeMap<String, GuildSettings>,
}

impl JsonFileSettingsRepository {
    /// Load settings from `path`
    ///
    /// A missing file is not an error: the repository starts empty and the
    /// file (and its parent directory) is created right away.
    pub fn load(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();

        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("settings file {} not found, creating new one", path.display());
                let repository = Self::empty(path);
                repository.save()?;
                return Ok(repository);
            }
            Err(source) => return Err(SettingsError::Read { path, source }),
        };

        let guilds: BTreeMap<String, GuildSettings> = serde_json::from_slice(&data)
            .map_err(|source| SettingsError::Parse {
                path: path.clone(),
                source,
            })?;

        log::info!(
            "loaded settings for {} guilds from {}",
            guilds.len(),
            path.display()
        );

        Ok(Self { path, guilds })
    }

    /// Repository with no guilds that will save to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guilds: BTreeMap::new(),
        }
    }

    /// Ids of all guilds with stored settings, sorted
    pub fn guild_ids(&self) -> impl Iterator<Item = &str> {
        self.guilds.keys().map(String::as_str)
    }

    /// Write every guild's settings to the backing file
    ///
    /// The file is replaced atomically so a crash mid-write keeps the old
    /// contents.
    pub fn save(&self) -> SettingsResult<()> {
        let encoded = serde_json::to_vec_pretty(&self.guilds)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|source| self.write_error(source))?;

        let mut file = NamedTempFile::new_in(dir).map_err(|source| self.write_error(source))?;
        file.write_all(&encoded)
            .map_err(|source| self.write_error(source))?;
        file.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        log::debug!(
            "saved settings for {} guilds to {}",
            self.guilds.len(),
            self.path.display()
        );

        Ok(())
    }

    fn write_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsRepository for JsonFileSettingsRepository {
    fn get(&self, guild_id: &str) -> GuildSettings {
        self.guilds.get(guild_id).cloned().unwrap_or_default()
    }

    fn update(&mut self, guild_id: &str, settings: GuildSettings) -> SettingsResult<()> {
        self.guilds.insert(guild_id.to_string(), settings);
        self.save()
    }

    fn override_settings(&mut self, guild_id: &str, settings: GuildSettings) {
        self.guilds.insert(guild_id.to_string(), settings);
    }
}

/// Repository that never touches the filesystem
#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsRepository {
    guilds: HashMap<String, GuildSettings>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsRepository for InMemorySettingsRepository {
    fn get(&self, guild_id: &str) -> GuildSettings {
        self.guilds.get(guild_id).cloned().unwrap_or_default()
    }

    fn update(&mut self, guild_id: &str, settings: GuildSettings) -> SettingsResult<()> {
        self.override_settings(guild_id, settings);
        Ok(())
    }

    fn override_settings(&mut self, guild_id: &str, settings: GuildSettings) {
        self.guilds.insert(guild_id.to_string(), settings);
    }
}
