//! Per-game constants of the native savegame format

use std::fmt;

use crate::error::{Error, Result};

/// Oldest supported native format version
pub const MIN_VERSION: i32 = 0;

/// Newest supported native format version
pub const MAX_VERSION: i32 = 13;

/// Hexen version 3 saves were written with a broken field layout
const HEXEN_CORRUPT_VERSION: i32 = 3;

const DOOM_IDENTITY_KEYS: &[&str] = &[
    "doom1-share",
    "doom1",
    "doom1-ultimate",
    "chex",
    "doom2",
    "doom2-plut",
    "doom2-tnt",
    "hacx",
];

const HERETIC_IDENTITY_KEYS: &[&str] = &["heretic-share", "heretic", "heretic-ext"];

const HEXEN_IDENTITY_KEYS: &[&str] = &[
    "hexen-demo",
    "hexen",
    "hexen-dk",
    "hexen-betademo",
    "hexen-v10",
];

// Game mode enums used before the identity tables above existed
// (shareware, registered, commercial/extended, retail, indetermined)
const DOOM_LEGACY_GAMEMODES: &[usize] = &[0, 1, 4, 2, 0];
const HERETIC_LEGACY_GAMEMODES: &[usize] = &[0, 1, 2, 1];
const HEXEN_LEGACY_GAMEMODES: &[usize] = &[0, 1, 2, 1];

/// Legacy Doom `commercial` could be any of the Doom 2 releases
const DOOM_AMBIGUOUS_INDEX: usize = 4;

/// One of the three games writing the native format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameFamily {
    Doom,
    Heretic,
    Hexen,
}

/// Outcome of looking up a legacy game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityLookup {
    /// The code names exactly one release
    Known(&'static str),
    /// The code names several releases; a hint is required
    Ambiguous,
}

impl GameFamily {
    /// Magic number at offset 0 of every native savegame
    #[must_use]
    pub fn magic(self) -> i32 {
        match self {
            GameFamily::Doom => 0x1DEAD666,
            GameFamily::Heretic => 0x7D9A12C5,
            GameFamily::Hexen => 0x1B17CC00,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            GameFamily::Doom => "Doom",
            GameFamily::Heretic => "Heretic",
            GameFamily::Hexen => "Hexen",
        }
    }

    /// Savegame file extensions (lowercase, without dot)
    #[must_use]
    pub fn known_extensions(self) -> &'static [&'static str] {
        match self {
            GameFamily::Doom => &["dsg"],
            GameFamily::Heretic => &["hsg"],
            GameFamily::Hexen => &["hxs"],
        }
    }

    /// Prefixes of the game identity keys this family covers
    #[must_use]
    pub fn base_game_id_keys(self) -> &'static [&'static str] {
        match self {
            GameFamily::Doom => &["doom", "chex", "hacx", "freedm"],
            GameFamily::Heretic => &["heretic"],
            GameFamily::Hexen => &["hexen"],
        }
    }

    /// Whether this family stores ACS script state and hub side-car files
    #[must_use]
    pub fn has_scripting(self) -> bool {
        self == GameFamily::Hexen
    }

    /// Check a `(magic, version)` header against this family
    ///
    /// # Errors
    /// Returns [`Error::InvalidMagic`] or [`Error::UnsupportedVersion`].
    pub fn check_header(self, magic: i32, version: i32) -> Result<()> {
        if magic != self.magic() {
            return Err(Error::InvalidMagic {
                family: self.name(),
                found: magic,
            });
        }
        if !(MIN_VERSION..=MAX_VERSION).contains(&version)
            || (self == GameFamily::Hexen && version == HEXEN_CORRUPT_VERSION)
        {
            return Err(Error::UnsupportedVersion {
                family: self.name(),
                version,
            });
        }
        Ok(())
    }

    fn identity_keys(self) -> &'static [&'static str] {
        match self {
            GameFamily::Doom => DOOM_IDENTITY_KEYS,
            GameFamily::Heretic => HERETIC_IDENTITY_KEYS,
            GameFamily::Hexen => HEXEN_IDENTITY_KEYS,
        }
    }

    /// Versions below this stored the legacy game mode enum
    fn legacy_gamemode_threshold(self) -> i32 {
        match self {
            GameFamily::Doom => 9,
            GameFamily::Heretic => 8,
            GameFamily::Hexen => 10,
        }
    }

    fn legacy_gamemodes(self) -> &'static [usize] {
        match self {
            GameFamily::Doom => DOOM_LEGACY_GAMEMODES,
            GameFamily::Heretic => HERETIC_LEGACY_GAMEMODES,
            GameFamily::Hexen => HEXEN_LEGACY_GAMEMODES,
        }
    }

    /// Map a stored game mode to a game identity key
    ///
    /// # Errors
    /// Returns [`Error::UnknownGameMode`] if the index is out of range.
    pub fn lookup_identity(self, gamemode: i32, version: i32) -> Result<IdentityLookup> {
        let unknown = || Error::UnknownGameMode {
            family: self.name(),
            gamemode,
        };
        let mut index = usize::try_from(gamemode).map_err(|_| unknown())?;

        if version < self.legacy_gamemode_threshold() {
            index = *self.legacy_gamemodes().get(index).ok_or_else(unknown)?;
            if self == GameFamily::Doom && index == DOOM_AMBIGUOUS_INDEX {
                return Ok(IdentityLookup::Ambiguous);
            }
        }

        self.identity_keys()
            .get(index)
            .copied()
            .map(IdentityLookup::Known)
            .ok_or_else(unknown)
    }

    /// Resolve the game identity key, consulting `hint` for ambiguous codes
    ///
    /// # Errors
    /// Returns [`Error::AmbigousGameId`] if the code is ambiguous and no hint
    /// was supplied.
    pub fn resolve_identity(self, gamemode: i32, version: i32, hint: Option<&str>) -> Result<String> {
        match self.lookup_identity(gamemode, version)? {
            IdentityLookup::Known(key) => Ok(key.to_string()),
            IdentityLookup::Ambiguous => match hint {
                Some(hint) if !hint.is_empty() => Ok(hint.to_string()),
                _ => Err(Error::AmbigousGameId {
                    format: self.name(),
                    code: gamemode,
                }),
            },
        }
    }
}

impl fmt::Display for GameFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
