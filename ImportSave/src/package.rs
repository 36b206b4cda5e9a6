//! A converted game session, ready to be written as a package

use std::path::{Path, PathBuf};

use crate::archive::{
    ArchiveBuilder, INFO_ENTRY, PACKAGE_EXTENSION, SCRIPT_STATE_ENTRY, map_state_entry_name,
};
use crate::error::{Error, Result};
use crate::session::{MapUri, SessionMetadata, compose_info_text};

/// Everything decoded from one savegame
#[derive(Debug, Clone)]
pub struct SessionPackage {
    pub metadata: SessionMetadata,
    /// File the session was converted from
    pub source_path: PathBuf,
    /// Format version recorded in the source file
    pub source_version: i32,
    /// Map states in output order, each already prefixed with its header
    pub map_states: Vec<(MapUri, Vec<u8>)>,
    /// Serialized ACS state (Hexen only)
    pub script_state: Option<Vec<u8>>,
}

impl SessionPackage {
    /// Compose every package entry in memory
    ///
    /// # Errors
    /// Returns [`Error::DuplicateEntry`] if two map states share a map URI.
    pub fn to_archive(&self) -> Result<ArchiveBuilder> {
        let mut archive = ArchiveBuilder::new();
        let info = compose_info_text(&self.metadata, &self.source_path, self.source_version)?;
        archive.add_text(INFO_ENTRY, &info)?;

        for (map, state) in &self.map_states {
            archive.add_binary(&map_state_entry_name(map), state.clone())?;
        }

        if let Some(script_state) = &self.script_state {
            archive.add_binary(SCRIPT_STATE_ENTRY, script_state.clone())?;
        }

        Ok(archive)
    }

    /// Package path for this session inside `output_dir`
    pub fn output_path(&self, output_dir: &Path) -> Result<PathBuf> {
        let stem = self
            .source_path
            .file_stem()
            .ok_or_else(|| Error::InvalidPath(self.source_path.display().to_string()))?;
        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(PACKAGE_EXTENSION);
        Ok(output_dir.join(file_name))
    }

    /// Compose the package and write it to `output_dir`
    ///
    /// Nothing is written unless every entry could be composed.
    ///
    /// # Returns
    /// The path of the written package.
    pub fn write_to(&self, output_dir: &Path) -> Result<PathBuf> {
        let archive = self.to_archive()?;
        let path = self.output_path(output_dir)?;
        archive.write_to(&path)?;
        tracing::info!(
            "Wrote {} ({} entries)",
            path.display(),
            archive.len()
        );
        Ok(path)
    }
}
