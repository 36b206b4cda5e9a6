//! Error types for `ImportSave`

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The error type for `ImportSave` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source file (or a side-car map file that exists) could not be opened.
    #[error("failed to open {path}: {source}")]
    FileOpen {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Unexpected end of file.
    #[error("unexpected end of file")]
    UnexpectedEof,

    // ==================== Recognition Errors ====================
    /// No registered translator recognizes the file.
    #[error("unknown savegame format: {path}")]
    UnknownFormat {
        /// The file that was not recognized.
        path: PathBuf,
    },

    /// The magic number did not match the expected format.
    #[error("invalid {family} savegame magic: {found:#010x}")]
    InvalidMagic {
        /// The game family the translator expects.
        family: &'static str,
        /// The magic number read from the file.
        found: i32,
    },

    /// The format version is outside the supported range, or is a known-bad
    /// version for this game family.
    #[error("unsupported {family} savegame version: {version}")]
    UnsupportedVersion {
        /// The game family the translator expects.
        family: &'static str,
        /// The version number found in the file.
        version: i32,
    },

    /// The legacy game mode index does not appear in the identity table.
    #[error("unknown {family} game mode: {gamemode}")]
    UnknownGameMode {
        /// The game family the translator expects.
        family: &'static str,
        /// The raw game mode index.
        gamemode: i32,
    },

    /// The ACS script state uses an unknown sub-version.
    #[error("unsupported ACS script state version: {version} (supported: 1-3)")]
    UnsupportedScriptVersion {
        /// The sub-version byte found in the file.
        version: u8,
    },

    // ==================== Decode Errors ====================
    /// The legacy game code maps to several releases and no hint was given.
    #[error("{format} game identity code {code} is ambiguous (use -idKey to disambiguate)")]
    AmbigousGameId {
        /// The savegame format that stored the code.
        format: &'static str,
        /// The legacy code (game mode index or format version).
        code: i32,
    },

    /// A segment marker did not match; the stream is misaligned.
    #[error("corrupt savegame: expected segment {expected}, found {found}")]
    SegmentMismatch {
        /// The expected segment id.
        expected: i32,
        /// The segment id actually read.
        found: i32,
    },

    /// A count or length field holds an impossible value.
    #[error("corrupt savegame: {0}")]
    CorruptData(String),

    /// The decoder does not support this part of the format.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    // ==================== Output Errors ====================
    /// Writing the session package failed.
    #[error("archive error: {0}")]
    Archive(String),

    /// An entry with the same name already exists in the package.
    #[error("duplicate archive entry: {0}")]
    DuplicateEntry(String),

    /// Another file of the same batch already produced this package.
    #[error("{} was already written by an earlier file in this batch", path.display())]
    OutputConflict { path: PathBuf },

    /// JSON serialization error while building the metadata record.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid path.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Error::Io(io),
            other => Error::Archive(other.to_string()),
        }
    }
}

/// Coarse classification of an [`Error`].
///
/// Recognition failures and decode failures are reported to the user in
/// these four classes; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileOpenError,
    UnknownFormat,
    AmbigousGameId,
    ReadError,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::FileOpenError => "FileOpenError",
            ErrorKind::UnknownFormat => "UnknownFormat",
            ErrorKind::AmbigousGameId => "AmbigousGameId",
            ErrorKind::ReadError => "ReadError",
            ErrorKind::Other => "Error",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileOpen { .. } => ErrorKind::FileOpenError,
            Error::UnknownFormat { .. }
            | Error::InvalidMagic { .. }
            | Error::UnsupportedVersion { .. }
            | Error::UnknownGameMode { .. }
            | Error::UnsupportedScriptVersion { .. } => ErrorKind::UnknownFormat,
            Error::AmbigousGameId { .. } => ErrorKind::AmbigousGameId,
            Error::SegmentMismatch { .. } | Error::CorruptData(_) | Error::UnexpectedEof => {
                ErrorKind::ReadError
            }
            _ => ErrorKind::Other,
        }
    }

    /// Wrap an IO error from opening `path`.
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileOpen {
            path: path.into(),
            source,
        }
    }
}

/// A specialized Result type for `ImportSave` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err = Error::UnsupportedVersion { family: "Hexen", version: 3 };
        assert_eq!(err.kind(), ErrorKind::UnknownFormat);

        let err = Error::SegmentMismatch { expected: 116, found: 0 };
        assert_eq!(err.kind(), ErrorKind::ReadError);

        let err = Error::open("missing.hxs", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(err.kind(), ErrorKind::FileOpenError);
        assert!(err.to_string().contains("missing.hxs"));
    }
}
