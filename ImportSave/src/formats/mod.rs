//! Legacy savegame formats
//!
//! - [`id1`]: the raw savegames written by the original id Tech 1 games
//! - [`native`]: the versioned savegame format shared by Doom, Heretic and Hexen

pub mod id1;
pub mod native;

pub use id1::{Id1Format, Id1Translator};
pub use native::{GameFamily, NativeTranslator};

/// Game identity key prefixes whose maps are numbered without episodes
const FLAT_MAP_PREFIXES: &[&str] = &["hexen", "doom2"];

/// Game identity keys (matched exactly) whose maps are numbered without episodes
const FLAT_MAP_GAMES: &[&str] = &["hacx", "freedm"];

/// Whether the game identified by `game_identity_key` ignores the episode
/// number, so that its maps are `MAPnn` rather than `ExMy`
#[must_use]
pub fn uses_flat_map_numbering(game_identity_key: &str) -> bool {
    FLAT_MAP_PREFIXES
        .iter()
        .any(|prefix| game_identity_key.starts_with(prefix))
        || FLAT_MAP_GAMES.contains(&game_identity_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_map_numbering() {
        for key in ["doom2", "doom2-plut", "doom2-tnt", "hexen", "hexen-dk", "hacx", "freedm"] {
            assert!(uses_flat_map_numbering(key), "{key}");
        }
        for key in ["doom1", "doom1-ultimate", "chex", "heretic", "heretic-ext", "hacx2"] {
            assert!(!uses_flat_map_numbering(key), "{key}");
        }
    }
}
