//! File store port interface

use crate::domain::recording::FileRef;

/// Port resolving the recording file and bundled assets
pub trait FileStore: Send + Sync {
    /// Reference to a writable file that each new recording overwrites
    fn overwritable_file_reference(&self, name: &str) -> FileRef;

    /// Check whether the referenced file exists
    fn exists(&self, file: &FileRef) -> bool;

    /// Reference to a read-only asset shipped with the application
    fn bundled_asset_reference(&self, name: &str) -> FileRef;
}
