//! # importsave
//!
//! Converts savegames written by legacy Doom, Heretic and Hexen ports into
//! Doomsday session packages.
//!
//! ## Supported Formats
//!
//! - **id Tech 1** - Doom v1.9 and Heretic v1.3 savegames
//! - **Native** - Doomsday savegame versions 0 to 13 for Doom, Heretic and
//!   Hexen, including Hexen hub side-car files and ACS script state
//!
//! Each converted save becomes one ZIP package (`<name>.save`) holding an
//! `Info` metadata entry, one `maps/<map>State` entry per map and, for Hexen,
//! an `ACScriptState` entry.
//!
//! ## Quick Start
//!
//! ```no_run
//! use importsave::prelude::*;
//! use std::path::Path;
//!
//! let registry = FormatRegistry::with_default_translators();
//! let package = registry.convert(Path::new("hexen0.hxs"), None)?;
//! let written = package.write_to(Path::new("converted/"))?;
//! println!("Wrote {}", written.display());
//! # Ok::<(), importsave::Error>(())
//! ```
//!
//! Legacy saves that do not say which Doom 2 release they belong to need a
//! game identity hint:
//!
//! ```no_run
//! use importsave::prelude::*;
//! use std::path::Path;
//!
//! let registry = FormatRegistry::with_default_translators();
//! let package = registry.convert(Path::new("doomsav0.dsg"), Some("doom2-plut"))?;
//! assert_eq!(package.metadata.game_identity_key, "doom2-plut");
//! # Ok::<(), importsave::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `importsave` command-line binary

pub mod archive;
pub mod batch;
pub mod error;
pub mod formats;
pub mod io;
pub mod package;
pub mod registry;
pub mod session;
pub mod translator;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};

    pub use crate::batch::{
        BatchConvertResult, ConvertOptions, ConvertProgress, convert_batch, convert_file,
        expand_inputs, find_save_files,
    };
    pub use crate::formats::{GameFamily, Id1Format, Id1Translator, NativeTranslator};
    pub use crate::package::SessionPackage;
    pub use crate::registry::FormatRegistry;
    pub use crate::session::{GameRules, MapUri, MonsterRule, SessionMetadata};
    pub use crate::translator::Translator;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
