use std::env;
use std::io;
use std::path::{Path, PathBuf};

use crate::store::NoteStore;

pub const STORE_ENV: &str = "ANNO_FILE";
pub const CONFIG_ENV: &str = "ANNO_CONFIG_DIR";

/// Filesystem locations used by every command. Built once and passed down.
#[derive(Debug, Clone)]
pub struct Paths {
    pub annotations_file: PathBuf,
    pub config_dir: PathBuf,
}

impl Paths {
    pub fn new(annotations_file: impl Into<PathBuf>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            annotations_file: annotations_file.into(),
            config_dir: config_dir.into(),
        }
    }

    /// `ANNO_FILE` / `ANNO_CONFIG_DIR` win; otherwise
    /// `~/.local/share/annotations.json` and `~/.config/anno`.
    pub fn from_env() -> io::Result<Self> {
        let store = env::var_os(STORE_ENV).map(PathBuf::from);
        let config = env::var_os(CONFIG_ENV).map(PathBuf::from);
        if let (Some(store), Some(config)) = (&store, &config) {
            return Ok(Self::new(store, config));
        }

        let home = env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
            io::Error::other(format!(
                "HOME not set; set {STORE_ENV} and {CONFIG_ENV} explicitly"
            ))
        })?;
        Ok(Self::new(
            store.unwrap_or_else(|| home.join(".local/share/annotations.json")),
            config.unwrap_or_else(|| home.join(".config/anno")),
        ))
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.config_dir.join("backups")
    }

    pub fn store(&self) -> NoteStore {
        NoteStore::new(&self.annotations_file)
    }

    /// Name the store file has inside backup archives.
    pub fn store_file_name(&self) -> String {
        file_name(&self.annotations_file)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("annotations.json")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_locations() {
        let paths = Paths::new("/data/notes.json", "/cfg/anno");
        assert_eq!(paths.settings_file(), PathBuf::from("/cfg/anno/settings.json"));
        assert_eq!(paths.backup_dir(), PathBuf::from("/cfg/anno/backups"));
        assert_eq!(paths.store_file_name(), "notes.json");
        assert_eq!(paths.store().path(), Path::new("/data/notes.json"));
    }
}
