//! Batch conversion
//!
//! Files are converted one at a time, in the order given. A failing file is
//! logged and counted; it never stops the rest of the batch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::formats::GameFamily;
use crate::formats::native::hub::{MAX_HUB_MAPS, side_car_path};
use crate::registry::FormatRegistry;

/// Settings shared by every file of a batch
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Directory the packages are written to
    pub output_dir: PathBuf,
    /// Game identity key for saves that do not name their game unambiguously
    pub game_id_hint: Option<String>,
}

impl ConvertOptions {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            game_id_hint: None,
        }
    }

    #[must_use]
    pub fn with_game_id_hint(mut self, hint: impl Into<String>) -> Self {
        self.game_id_hint = Some(hint.into());
        self
    }
}

/// Progress update sent before each file is converted
#[derive(Debug, Clone)]
pub struct ConvertProgress {
    /// Current file number (1-indexed)
    pub current: usize,
    pub total: usize,
    pub current_file: String,
}

/// Result of a batch conversion
#[derive(Debug, Clone, Default)]
pub struct BatchConvertResult {
    /// Number of packages written
    pub success_count: usize,
    /// Number of files that failed to convert
    pub fail_count: usize,
    /// Messages for each file processed
    pub results: Vec<String>,
    /// Packages written, in input order
    pub outputs: Vec<PathBuf>,
}

/// Find all files with one of `extensions` in a directory recursively
///
/// # Returns
/// A sorted list of matching paths.
pub fn find_save_files<P: AsRef<Path>>(dir: P, extensions: &[&str]) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.path().is_file()
                && e.path().extension().is_some_and(|ext| {
                    extensions.iter().any(|known| ext.eq_ignore_ascii_case(known))
                })
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

/// Expand directories among `inputs` into the save files they contain
///
/// Plain paths are passed through unchanged, so a missing file still shows up
/// as a failure of its own. Hexen hub side-cars are dropped when their main
/// save is in the list; they are read as part of that save.
pub fn expand_inputs(inputs: &[PathBuf], extensions: &[&str]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = find_save_files(input, extensions);
            if found.is_empty() {
                tracing::warn!("No savegames found in {}", input.display());
            }
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    drop_hub_side_cars(files)
}

fn drop_hub_side_cars(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let hexen_extensions = GameFamily::Hexen.known_extensions();
    let side_cars: HashSet<PathBuf> = files
        .iter()
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| hexen_extensions.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        })
        .flat_map(|main| (1..=MAX_HUB_MAPS).filter_map(move |index| side_car_path(main, index).ok()))
        .collect();

    files
        .into_iter()
        .filter(|path| {
            let side_car = side_cars.contains(path);
            if side_car {
                tracing::debug!("Skipping hub side-car {}", path.display());
            }
            !side_car
        })
        .collect()
}

/// Convert a single savegame and write its package
///
/// # Returns
/// The path of the written package.
pub fn convert_file(registry: &FormatRegistry, path: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    let package = registry.convert(path, options.game_id_hint.as_deref())?;
    package.write_to(&options.output_dir)
}

/// Like [`convert_file`], but refuse to overwrite a package in `written`
fn convert_unique(
    registry: &FormatRegistry,
    path: &Path,
    options: &ConvertOptions,
    written: &mut HashSet<PathBuf>,
) -> Result<PathBuf> {
    let package = registry.convert(path, options.game_id_hint.as_deref())?;
    let output = package.output_path(&options.output_dir)?;
    if written.contains(&output) {
        return Err(Error::OutputConflict { path: output });
    }
    let output = package.write_to(&options.output_dir)?;
    written.insert(output.clone());
    Ok(output)
}

/// Convert every file in `files`, sequentially
///
/// Inputs that map to the same package name (`a/save0.dsg`, `b/save0.dsg`)
/// do not overwrite each other: the first one wins and the later ones fail.
pub fn convert_batch<F>(
    registry: &FormatRegistry,
    files: &[PathBuf],
    options: &ConvertOptions,
    progress: F,
) -> BatchConvertResult
where
    F: Fn(&ConvertProgress),
{
    let mut result = BatchConvertResult::default();
    let mut written = HashSet::new();
    let total = files.len();

    for (index, path) in files.iter().enumerate() {
        let display_path = path.display().to_string();
        progress(&ConvertProgress {
            current: index + 1,
            total,
            current_file: display_path.clone(),
        });

        match convert_unique(registry, path, options, &mut written) {
            Ok(output) => {
                result.success_count += 1;
                result
                    .results
                    .push(format!("Converted: {display_path} -> {}", output.display()));
                result.outputs.push(output);
            }
            Err(e) => {
                tracing::error!("Failed to convert {display_path}: [{}] {e}", e.kind());
                result.fail_count += 1;
                result.results.push(format!("Failed {display_path}: {e}"));
            }
        }
    }

    result
}
