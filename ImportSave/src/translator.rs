//! The contract every legacy savegame translator fulfils

use std::path::Path;

use crate::error::Result;
use crate::package::SessionPackage;

/// Converts one legacy savegame format into a [`SessionPackage`]
pub trait Translator {
    /// Human readable name of the format, used in log output
    fn format_name(&self) -> &'static str;

    /// File extensions (lowercase, without dot) this format is saved under
    fn known_extensions(&self) -> &'static [&'static str];

    /// Prefixes of the game identity keys this format can hold
    fn base_game_id_keys(&self) -> &'static [&'static str];

    /// Inspect the start of `path`
    ///
    /// Must not leave the file open, whatever the outcome. Any read failure
    /// counts as "not recognized".
    fn recognize(&self, path: &Path) -> bool;

    /// Decode `path` into a session package held in memory
    ///
    /// `hint` is the user supplied game identity key, used when the save
    /// itself does not name its game unambiguously.
    fn convert(&self, path: &Path, hint: Option<&str>) -> Result<SessionPackage>;

    /// Whether a game identity hint names a game of this format
    fn matches_game_id(&self, hint: &str) -> bool {
        self.base_game_id_keys()
            .iter()
            .any(|prefix| hint.starts_with(prefix))
    }

    /// Whether `path` carries one of this format's extensions
    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| self.known_extensions().contains(&ext.as_str()))
    }
}
