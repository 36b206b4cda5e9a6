//! CLI command for savegame conversion

use std::path::PathBuf;
use std::time::Instant;

use crate::batch::{ConvertOptions, convert_batch, expand_inputs};
use crate::cli::progress::{DISK, GEAR, LOOKING_GLASS, print_done, print_step};
use crate::registry::FormatRegistry;

/// Convert every input and report a summary
///
/// Per-file failures are reported but do not make the command fail.
pub fn execute(
    inputs: &[PathBuf],
    output: Option<&str>,
    id_key: Option<&str>,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let output_dir = resolve_output_dir(output)?;

    let registry = FormatRegistry::with_default_translators();
    let files = expand_inputs(inputs, &registry.known_extensions());
    if files.is_empty() {
        anyhow::bail!("No savegames to convert");
    }

    let mut options = ConvertOptions::new(&output_dir);
    if let Some(key) = id_key.filter(|key| !key.is_empty()) {
        options = options.with_game_id_hint(key);
    }

    if !quiet {
        println!(
            "{LOOKING_GLASS}Converting {} savegame(s) to {}",
            files.len(),
            output_dir.display()
        );
    }

    let result = convert_batch(&registry, &files, &options, |progress| {
        if !quiet {
            print_step(progress.current, progress.total, GEAR, &progress.current_file);
        }
    });

    if !quiet {
        for output in &result.outputs {
            println!("{DISK}{}", output.display());
        }
        println!(
            "{} converted, {} failed",
            result.success_count, result.fail_count
        );
        print_done(started.elapsed());
    }

    Ok(())
}

/// Expand `~` and environment variables; default to the working directory
fn resolve_output_dir(output: Option<&str>) -> anyhow::Result<PathBuf> {
    match output {
        Some(dir) => {
            let expanded = shellexpand::full(dir)
                .map_err(|e| anyhow::anyhow!("Invalid output directory {dir}: {e}"))?;
            Ok(PathBuf::from(expanded.as_ref()))
        }
        None => Ok(std::env::current_dir()?),
    }
}
