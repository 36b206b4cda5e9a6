//! importsave CLI - convert legacy savegames to Doomsday session packages

pub mod convert;
pub mod progress;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Single-dash spellings accepted for compatibility, and their long forms
const LEGACY_FLAGS: &[(&str, &str)] = &[("-idKey", "--id-key"), ("-output", "--output")];

#[derive(Parser, Debug)]
#[command(name = "importsave", version)]
#[command(about = "Convert legacy Doom, Heretic and Hexen savegames to Doomsday session packages", long_about = None)]
pub struct Cli {
    /// Savegame files, or directories to search for savegames
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Game identity key for saves that do not name their game (e.g. doom2-plut)
    #[arg(long = "id-key", value_name = "KEY")]
    pub id_key: Option<String>,

    /// Directory the packages are written to [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<String>,

    /// Log decoded header fields and skipped files
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report failures
    #[arg(short, long)]
    pub quiet: bool,
}

/// Rewrite `-idKey` and `-output` (also in `-flag=value` form) to the long
/// flags clap understands
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            for (legacy, long) in LEGACY_FLAGS {
                if text == *legacy {
                    return OsString::from(*long);
                }
                if let Some(value) = text.strip_prefix(legacy).and_then(|rest| rest.strip_prefix('=')) {
                    return OsString::from(format!("{long}={value}"));
                }
            }
            arg
        })
        .collect()
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the importsave CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse_from(normalize_legacy_flags(std::env::args_os()));
    init_logging(cli.verbose, cli.quiet);
    convert::execute(
        &cli.inputs,
        cli.output.as_deref(),
        cli.id_key.as_deref(),
        cli.quiet,
    )
}
