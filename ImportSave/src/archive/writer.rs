//! In-memory ZIP package builder

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::{Error, Result};

#[derive(Debug)]
struct Entry {
    name: String,
    data: Vec<u8>,
}

/// Collects package entries and writes them as one ZIP file
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    entries: Vec<Entry>,
    names: HashSet<String>,
}

impl ArchiveBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text entry
    pub fn add_text(&mut self, name: &str, text: &str) -> Result<()> {
        self.add_binary(name, text.as_bytes().to_vec())
    }

    /// Add a binary entry
    ///
    /// # Errors
    /// Returns [`Error::DuplicateEntry`] if an entry with this name exists.
    pub fn add_binary(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        if !self.names.insert(name.to_string()) {
            return Err(Error::DuplicateEntry(name.to_string()));
        }
        self.entries.push(Entry {
            name: name.to_string(),
            data,
        });
        Ok(())
    }

    /// Entry names in insertion order
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Data of a named entry
    pub fn entry(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the package to `path`
    ///
    /// The package is written to a sibling temporary file first and renamed
    /// into place, so a failed write never leaves a truncated package behind.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let partial = partial_path(path)?;
        if let Err(e) = self.write_zip(&partial) {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }
        fs::rename(&partial, path)?;
        Ok(())
    }

    fn write_zip(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::open(path, e))?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }

        let mut out = zip.finish()?;
        out.flush()?;
        Ok(())
    }
}

fn partial_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| Error::InvalidPath(path.display().to_string()))?;
    let mut partial = name.to_os_string();
    partial.push(".partial");
    Ok(path.with_file_name(partial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_duplicate_entry_rejected() {
        let mut builder = ArchiveBuilder::new();
        builder.add_binary("maps/MAP01State", vec![1]).unwrap();
        let err = builder.add_binary("maps/MAP01State", vec![2]).unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry(_)));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out").join("hex0.save");

        let mut builder = ArchiveBuilder::new();
        builder.add_text("Info", "sessionId: 1\n").unwrap();
        builder.add_binary("maps/MAP01State", vec![0xAB; 32]).unwrap();
        builder.write_to(&target).unwrap();

        assert!(!dir.path().join("out").join("hex0.save.partial").exists());

        let mut archive = zip::ZipArchive::new(File::open(&target).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let mut info = String::new();
        archive.by_name("Info").unwrap().read_to_string(&mut info).unwrap();
        assert_eq!(info, "sessionId: 1\n");
        let mut state = Vec::new();
        archive.by_name("maps/MAP01State").unwrap().read_to_end(&mut state).unwrap();
        assert_eq!(state, vec![0xAB; 32]);
    }
}
