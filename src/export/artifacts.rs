//! Rendered artifact bundle and file output
//!
//! Files are named `{guild_id}_{channel_id}_conversations.{txt,csv,json}`.
//! Writing stages all three as temporary files in the target directory and
//! renames them into place only after every one of them was written. Files
//! from an earlier export are moved aside first; if any rename fails, the
//! files already placed are taken back out and the old ones restored, so the
//! directory ends up with either the complete new export or the old state.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile, TempPath};

use super::error::{ExportError, ExportResult};

/// The three output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactFormat {
    Text,
    Csv,
    Json,
}

impl ArtifactFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Text => "txt",
            ArtifactFormat::Csv => "csv",
            ArtifactFormat::Json => "json",
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactFormat::Text => f.write_str("text"),
            ArtifactFormat::Csv => f.write_str("CSV"),
            ArtifactFormat::Json => f.write_str("JSON"),
        }
    }
}

/// File name stem shared by the three artifacts of one channel export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    stem: String,
}

impl ArtifactNames {
    pub fn for_channel(guild_id: &str, channel_id: &str) -> Self {
        ArtifactNames {
            stem: format!("{}_{}_conversations", guild_id, channel_id),
        }
    }

    pub fn file_name(&self, format: ArtifactFormat) -> String {
        format!("{}.{}", self.stem, format.extension())
    }
}

/// Rendered export, one UTF-8 buffer per format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifacts {
    pub text: Vec<u8>,
    pub csv: Vec<u8>,
    pub json: Vec<u8>,
}

impl ExportArtifacts {
    pub fn bytes(&self, format: ArtifactFormat) -> &[u8] {
        match format {
            ArtifactFormat::Text => &self.text,
            ArtifactFormat::Csv => &self.csv,
            ArtifactFormat::Json => &self.json,
        }
    }

    /// Write all three artifacts into `dir`, replacing older exports
    pub fn write_to_dir(&self, dir: &Path, names: &ArtifactNames) -> ExportResult<ExportedFiles> {
        std::fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))?;

        // Stage everything first; an unpersisted temp file is deleted on drop
        let staged = [
            (ArtifactFormat::Text, self.stage(dir, ArtifactFormat::Text)?),
            (ArtifactFormat::Csv, self.stage(dir, ArtifactFormat::Csv)?),
            (ArtifactFormat::Json, self.stage(dir, ArtifactFormat::Json)?),
        ];

        let mut placed: Vec<Replacement> = Vec::with_capacity(staged.len());
        for (format, file) in staged {
            let target = dir.join(names.file_name(format));
            match replace(file, dir, &target) {
                Ok(replacement) => {
                    log::debug!("wrote {} artifact to {}", format, target.display());
                    placed.push(replacement);
                }
                Err(err) => {
                    roll_back(placed);
                    return Err(err);
                }
            }
        }

        // Backups of the previous export are removed when `placed` drops
        Ok(ExportedFiles {
            text: dir.join(names.file_name(ArtifactFormat::Text)),
            csv: dir.join(names.file_name(ArtifactFormat::Csv)),
            json: dir.join(names.file_name(ArtifactFormat::Json)),
        })
    }

    fn stage(&self, dir: &Path, format: ArtifactFormat) -> ExportResult<NamedTempFile> {
        let mut file = NamedTempFile::new_in(dir).map_err(|e| ExportError::io(dir, e))?;
        let staging_path = file.path().to_path_buf();

        file.write_all(self.bytes(format))
            .map_err(|e| ExportError::io(&staging_path, e))?;
        file.flush().map_err(|e| ExportError::io(&staging_path, e))?;

        Ok(file)
    }
}

/// A target that now holds a new artifact, plus what it held before
struct Replacement {
    target: PathBuf,
    backup: Option<TempPath>,
}

/// Move any existing `target` aside, then rename the staged file onto it
fn replace(file: NamedTempFile, dir: &Path, target: &Path) -> ExportResult<Replacement> {
    let backup = match std::fs::symlink_metadata(target) {
        Ok(_) => {
            let backup = Builder::new()
                .prefix(".backup-")
                .tempfile_in(dir)
                .map_err(|e| ExportError::io(dir, e))?
                .into_temp_path();
            std::fs::rename(target, &backup).map_err(|e| ExportError::io(target, e))?;
            Some(backup)
        }
        Err(_) => None,
    };

    if let Err(e) = file.persist(target) {
        if let Some(backup) = &backup {
            restore(backup, target);
        }
        return Err(ExportError::io(target, e.error));
    }

    Ok(Replacement {
        target: target.to_path_buf(),
        backup,
    })
}

/// Undo already placed artifacts, newest first
fn roll_back(placed: Vec<Replacement>) {
    for replacement in placed.into_iter().rev() {
        match &replacement.backup {
            Some(backup) => restore(backup, &replacement.target),
            None => {
                if let Err(e) = std::fs::remove_file(&replacement.target) {
                    log::warn!("could not remove {}: {}", replacement.target.display(), e);
                }
            }
        }
    }
}

fn restore(backup: &TempPath, target: &Path) {
    if let Err(e) = std::fs::rename(backup, target) {
        log::warn!("could not restore {}: {}", target.display(), e);
    }
}

/// Paths of a written export, ready to hand to an uploader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub text: PathBuf,
    pub csv: PathBuf,
    pub json: PathBuf,
}

impl ExportedFiles {
    /// Upload order: CSV, JSON, then the transcript
    pub fn paths(&self) -> [&Path; 3] {
        [&self.csv, &self.json, &self.text]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_artifacts() -> ExportArtifacts {
        ExportArtifacts {
            text: b"A: hi\n\n".to_vec(),
            csv: b"header\r\n".to_vec(),
            json: b"[]".to_vec(),
        }
    }

    #[test]
    fn test_artifact_names() {
        let names = ArtifactNames::for_channel("123", "456");

        assert_eq!(names.file_name(ArtifactFormat::Text), "123_456_conversations.txt");
        assert_eq!(names.file_name(ArtifactFormat::Csv), "123_456_conversations.csv");
        assert_eq!(names.file_name(ArtifactFormat::Json), "123_456_conversations.json");
    }

    #[test]
    fn test_write_to_dir_creates_all_three() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = sample_artifacts();

        let files = artifacts
            .write_to_dir(dir.path(), &ArtifactNames::for_channel("1", "2"))
            .unwrap();

        assert_eq!(files.text, dir.path().join("1_2_conversations.txt"));
        assert_eq!(std::fs::read(&files.text).unwrap(), artifacts.text);
        assert_eq!(std::fs::read(&files.csv).unwrap(), artifacts.csv);
        assert_eq!(std::fs::read(&files.json).unwrap(), artifacts.json);

        // No staging leftovers
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_write_to_dir_replaces_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let names = ArtifactNames::for_channel("1", "2");
        std::fs::write(dir.path().join("1_2_conversations.json"), b"stale").unwrap();

        let files = sample_artifacts().write_to_dir(dir.path(), &names).unwrap();

        assert_eq!(std::fs::read(&files.json).unwrap(), b"[]");
    }

    #[test]
    fn test_write_to_dir_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("guild");

        let files = sample_artifacts()
            .write_to_dir(&nested, &ArtifactNames::for_channel("1", "2"))
            .unwrap();

        assert!(files.csv.exists());
    }

    #[test]
    fn test_write_to_dir_removes_backups_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let names = ArtifactNames::for_channel("1", "2");
        sample_artifacts().write_to_dir(dir.path(), &names).unwrap();

        sample_artifacts().write_to_dir(dir.path(), &names).unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_failed_write_restores_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let names = ArtifactNames::for_channel("1", "2");
        std::fs::write(dir.path().join("1_2_conversations.txt"), b"OLD TEXT").unwrap();
        std::fs::write(dir.path().join("1_2_conversations.csv"), b"OLD CSV").unwrap();
        // A non-empty directory where the JSON file should go cannot be replaced
        let blocker = dir.path().join("1_2_conversations.json");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        let result = sample_artifacts().write_to_dir(dir.path(), &names);

        assert!(matches!(result, Err(ExportError::Io { .. })));
        assert_eq!(
            std::fs::read(dir.path().join("1_2_conversations.txt")).unwrap(),
            b"OLD TEXT"
        );
        assert_eq!(
            std::fs::read(dir.path().join("1_2_conversations.csv")).unwrap(),
            b"OLD CSV"
        );
        assert!(blocker.join("keep").exists());
        // No staged or backup files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_failed_write_removes_new_files_when_none_existed() {
        let dir = tempfile::tempdir().unwrap();
        let names = ArtifactNames::for_channel("1", "2");
        let blocker = dir.path().join("1_2_conversations.json");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        assert!(sample_artifacts().write_to_dir(dir.path(), &names).is_err());

        assert!(!dir.path().join("1_2_conversations.txt").exists());
        assert!(!dir.path().join("1_2_conversations.csv").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
