//! Local file store adapter
//!
//! Recordings live in a per-user data directory; bundled assets ship in an
//! `assets` directory next to the executable.

use std::env;
use std::path::{Path, PathBuf};

use crate::application::ports::FileStore;
use crate::domain::config::AppConfig;
use crate::domain::recording::FileRef;

use super::config::APP_DIR_NAME;

/// Expand a leading `~` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}

/// `<data dir>/record-play/recordings`
pub fn default_recordings_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("recordings")
}

/// `assets/` next to the executable, else `<data dir>/record-play/assets`
pub fn default_assets_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME)
                .join("assets")
        })
}

/// File store over a recordings directory and an assets directory
#[derive(Debug, Clone)]
pub struct DocumentsFileStore {
    recordings_dir: PathBuf,
    assets_dir: PathBuf,
}

impl DocumentsFileStore {
    /// Create a store over explicit directories
    pub fn new(recordings_dir: impl Into<PathBuf>, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            recordings_dir: recordings_dir.into(),
            assets_dir: assets_dir.into(),
        }
    }

    /// Create a store from config, falling back to the platform defaults
    pub fn from_config(config: &AppConfig) -> Self {
        let recordings_dir = config
            .recordings_dir
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(expand_home)
            .unwrap_or_else(default_recordings_dir);
        let assets_dir = config
            .assets_dir
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(expand_home)
            .unwrap_or_else(default_assets_dir);

        Self::new(recordings_dir, assets_dir)
    }

    /// Directory recordings are written to
    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }

    /// Directory bundled assets are read from
    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }
}

impl FileStore for DocumentsFileStore {
    fn overwritable_file_reference(&self, name: &str) -> FileRef {
        FileRef::new(self.recordings_dir.join(name))
    }

    fn exists(&self, file: &FileRef) -> bool {
        file.path().is_file()
    }

    fn bundled_asset_reference(&self, name: &str) -> FileRef {
        FileRef::new(self.assets_dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_resolve_under_directories() {
        let store = DocumentsFileStore::new("/data/takes", "/opt/app/assets");
        assert_eq!(
            store.overwritable_file_reference("myRecording.wav").path(),
            Path::new("/data/takes/myRecording.wav")
        );
        assert_eq!(
            store.bundled_asset_reference("music.mp3").path(),
            Path::new("/opt/app/assets/music.mp3")
        );
    }

    #[test]
    fn same_name_gives_same_reference() {
        let store = DocumentsFileStore::new("/data/takes", "/assets");
        assert_eq!(
            store.overwritable_file_reference("a.wav"),
            store.overwritable_file_reference("a.wav")
        );
    }

    #[test]
    fn exists_tracks_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentsFileStore::new(dir.path(), dir.path());
        let file = store.overwritable_file_reference("take.wav");

        assert!(!store.exists(&file));
        std::fs::write(file.path(), b"RIFF").unwrap();
        assert!(store.exists(&file));
    }

    #[test]
    fn directories_are_not_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentsFileStore::new(dir.path(), dir.path());
        let sub = store.overwritable_file_reference("sub");
        std::fs::create_dir(sub.path()).unwrap();
        assert!(!store.exists(&sub));
    }

    #[test]
    fn from_config_uses_overrides() {
        let config = AppConfig {
            recordings_dir: Some("/tmp/takes".into()),
            assets_dir: Some("/tmp/assets".into()),
            ..Default::default()
        };
        let store = DocumentsFileStore::from_config(&config);
        assert_eq!(store.recordings_dir(), Path::new("/tmp/takes"));
        assert_eq!(store.assets_dir(), Path::new("/tmp/assets"));
    }

    #[test]
    fn from_config_defaults_under_app_dir() {
        let store = DocumentsFileStore::from_config(&AppConfig::empty());
        assert!(store.recordings_dir().ends_with("record-play/recordings"));
    }

    #[test]
    fn expand_home_only_touches_leading_tilde() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("rel/~/x"), PathBuf::from("rel/~/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/takes"), home.join("takes"));
        }
    }
}
