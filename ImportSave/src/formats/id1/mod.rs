//! Raw savegames of the original id Tech 1 games
//!
//! These saves have no magic number. They are recognized by the version tag
//! stored after the description:
//!
//! ```text
//! description    24 bytes, NUL padded
//! version tag    16 bytes, e.g. "version 109"
//! skill          u8
//! episode        u8
//! map            u8
//! players        4 x u8
//! level time     24-bit big-endian
//! map state      remainder of the file
//! ```

use std::io::{Read, Seek};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};

use super::native::GameFamily;
use super::uses_flat_map_numbering;
use crate::archive::compose_map_state_header;
use crate::error::{Error, Result};
use crate::io::{ByteCursor, FileCursor, StreamCursor};
use crate::package::SessionPackage;
use crate::session::{GameRules, MapUri, NUM_SKILL_MODES, SessionMetadata};
use crate::translator::Translator;

const DESCRIPTION_LEN: usize = 24;
const VERSION_TAG_LEN: usize = 16;

/// Number of player slots in a vanilla save
pub const MAX_PLAYERS: usize = 4;

/// The id Tech 1 savegame versions that can be converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Id1Format {
    /// Doom v1.9
    DoomV9,
    /// Heretic v1.3
    HereticV13,
}

impl Id1Format {
    /// Version number encoded in the tag
    #[must_use]
    pub fn version(self) -> i32 {
        match self {
            Id1Format::DoomV9 => 109,
            Id1Format::HereticV13 => 130,
        }
    }

    /// The tag as stored in the file (without padding)
    #[must_use]
    pub fn version_tag(self) -> String {
        format!("version {}", self.version())
    }

    /// Native family whose map state serialization this format shares
    #[must_use]
    pub fn family(self) -> GameFamily {
        match self {
            Id1Format::DoomV9 => GameFamily::Doom,
            Id1Format::HereticV13 => GameFamily::Heretic,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Id1Format::DoomV9 => "Doom v1.9",
            Id1Format::HereticV13 => "Heretic v1.3",
        }
    }

    fn identity_prefixes(self) -> &'static [&'static str] {
        match self {
            Id1Format::DoomV9 => &["doom1", "doom2", "chex", "hacx", "freedm"],
            Id1Format::HereticV13 => &["heretic"],
        }
    }

    /// The game identity when no usable hint was given
    fn default_identity(self) -> Option<&'static str> {
        match self {
            // One Doom savegame layout covers every Doom release
            Id1Format::DoomV9 => None,
            Id1Format::HereticV13 => Some("heretic"),
        }
    }
}

/// Translator for one id Tech 1 savegame version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id1Translator {
    format: Id1Format,
}

impl Id1Translator {
    #[must_use]
    pub fn new(format: Id1Format) -> Self {
        Self { format }
    }

    #[must_use]
    pub fn format(&self) -> Id1Format {
        self.format
    }

    fn read_version_tag<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<String> {
        cursor.seek(DESCRIPTION_LEN as u64)?;
        cursor.read_fixed_string(VERSION_TAG_LEN)
    }

    fn resolve_identity(&self, hint: Option<&str>) -> Result<String> {
        if let Some(hint) = hint.filter(|hint| self.matches_game_id(hint)) {
            return Ok(hint.to_string());
        }
        self.format
            .default_identity()
            .map(str::to_string)
            .ok_or(Error::AmbigousGameId {
                format: self.format.name(),
                code: self.format.version(),
            })
    }
}

impl Translator for Id1Translator {
    fn format_name(&self) -> &'static str {
        self.format.name()
    }

    fn known_extensions(&self) -> &'static [&'static str] {
        self.format.family().known_extensions()
    }

    fn base_game_id_keys(&self) -> &'static [&'static str] {
        self.format.identity_prefixes()
    }

    fn recognize(&self, path: &Path) -> bool {
        FileCursor::open(path)
            .and_then(|mut cursor| Self::read_version_tag(&mut cursor))
            .is_ok_and(|tag| tag == self.format.version_tag())
    }

    fn convert(&self, path: &Path, hint: Option<&str>) -> Result<SessionPackage> {
        let mut cursor = StreamCursor::open_stream(path)?;
        let session_id = crc32fast::hash(cursor.contents()) as i32;

        let description = cursor.read_fixed_string(DESCRIPTION_LEN)?;
        if cursor.read_fixed_string(VERSION_TAG_LEN)? != self.format.version_tag() {
            return Err(Error::UnknownFormat {
                path: path.to_path_buf(),
            });
        }
        let game_identity_key = self.resolve_identity(hint)?;

        let skill = i32::from(cursor.read_u8()?);
        if skill >= NUM_SKILL_MODES {
            return Err(Error::NotImplemented("id Tech 1 skill levels above nightmare"));
        }

        let mut episode = i32::from(cursor.read_u8()?);
        let map = i32::from(cursor.read_u8()?);
        if uses_flat_map_numbering(&game_identity_key) {
            episode = 0;
        }
        let map_uri = MapUri::compose(episode, map);

        let players = (0..MAX_PLAYERS)
            .map(|_| cursor.read_bool())
            .collect::<Result<Vec<_>>>()?;
        let map_time = BigEndian::read_u24(&cursor.read_bytes(3)?) as i32;

        let mut state = compose_map_state_header(self.format.family().magic(), self.format.version()).to_vec();
        state.extend_from_slice(&cursor.read_remaining()?);

        tracing::debug!(
            "{}: game={game_identity_key} map={map_uri} skill={skill} time={map_time}",
            self.format.name()
        );
        tracing::info!("Converted {} save {}", self.format.name(), path.display());

        Ok(SessionPackage {
            metadata: SessionMetadata {
                game_identity_key,
                user_description: description,
                map_uri,
                map_time: Some(map_time),
                players: Some(players),
                session_id,
                game_rules: GameRules {
                    skill,
                    ..GameRules::default()
                },
            },
            source_path: path.to_path_buf(),
            source_version: self.format.version(),
            map_states: vec![(map_uri, state)],
            script_state: None,
        })
    }
}
