//! Native savegame format shared by Doom, Heretic and Hexen
//!
//! Every native save starts with `(magic: i32, version: i32)`. The magic names
//! the game family, the version (0 to 13) selects one [`HeaderLayout`]. What
//! follows the header fields is the serialized map state, which is carried
//! over untouched. Hexen additionally stores ACS script state after the
//! header and keeps each visited hub map in a side-car file.

pub mod family;
pub mod header;
pub mod hub;
pub mod layout;
pub mod script;

pub use family::{GameFamily, IdentityLookup, MAX_VERSION, MIN_VERSION};
pub use header::{SaveHeader, decode_header, decode_skill};
pub use hub::{HubMap, collect_hub_maps, side_car_path};
pub use layout::{HeaderLayout, ScriptSegment};
pub use script::{DeferredTask, ScriptState};

use std::path::Path;

use crate::archive::compose_map_state_header;
use crate::error::{Error, Result};
use crate::io::FileCursor;
use crate::package::SessionPackage;
use crate::session::SessionMetadata;
use crate::translator::Translator;

/// Translator for one family of the native format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeTranslator {
    family: GameFamily,
}

impl NativeTranslator {
    #[must_use]
    pub fn new(family: GameFamily) -> Self {
        Self { family }
    }

    #[must_use]
    pub fn family(&self) -> GameFamily {
        self.family
    }

    /// Read `(magic, version)`; the file is closed when this returns
    fn peek_header(path: &Path) -> Result<(i32, i32)> {
        let mut cursor = FileCursor::open(path)?;
        Ok((cursor.read_i32()?, cursor.read_i32()?))
    }
}

impl Translator for NativeTranslator {
    fn format_name(&self) -> &'static str {
        match self.family {
            GameFamily::Doom => "Doomsday (Doom)",
            GameFamily::Heretic => "Doomsday (Heretic)",
            GameFamily::Hexen => "Doomsday (Hexen)",
        }
    }

    fn known_extensions(&self) -> &'static [&'static str] {
        self.family.known_extensions()
    }

    fn base_game_id_keys(&self) -> &'static [&'static str] {
        self.family.base_game_id_keys()
    }

    fn recognize(&self, path: &Path) -> bool {
        match Self::peek_header(path) {
            Ok((magic, version)) => self.family.check_header(magic, version).is_ok(),
            Err(_) => false,
        }
    }

    fn convert(&self, path: &Path, hint: Option<&str>) -> Result<SessionPackage> {
        let family = self.family;

        let (header, script_state, player_data, magic, version) = {
            let mut cursor = FileCursor::open(path)?;
            let magic = cursor.read_i32()?;
            let version = cursor.read_i32()?;
            family.check_header(magic, version)?;
            let layout = HeaderLayout::select(family, version).ok_or(Error::UnsupportedVersion {
                family: family.name(),
                version,
            })?;

            let header = decode_header(&mut cursor, family, version, &layout, hint)?;
            let script_state = match layout.script {
                ScriptSegment::Absent => None,
                segment => Some(ScriptState::decode(&mut cursor, segment)?),
            };
            (header, script_state, cursor.read_remaining()?, magic, version)
        };

        let state_header = compose_map_state_header(magic, version);
        let current_map = header.map_uri();
        let mut map_time = header.map_time;

        let map_states = if family.has_scripting() {
            let hubs = collect_hub_maps(path, &state_header, &player_data)?;
            if let Some(hub) = hubs.iter().find(|hub| hub.map == current_map) {
                map_time = hub.map_time.or(map_time);
            } else {
                tracing::warn!("No side-car found for the current map {current_map}");
            }
            hubs.into_iter().map(|hub| (hub.map, hub.state)).collect()
        } else {
            let mut state = Vec::with_capacity(state_header.len() + player_data.len());
            state.extend_from_slice(&state_header);
            state.extend_from_slice(&player_data);
            vec![(current_map, state)]
        };

        tracing::info!(
            "Converted {} save {}: {} map state(s)",
            family,
            path.display(),
            map_states.len()
        );

        Ok(SessionPackage {
            metadata: SessionMetadata {
                game_identity_key: header.game_identity_key,
                user_description: header.description,
                map_uri: current_map,
                map_time,
                players: header.players,
                session_id: header.session_id,
                game_rules: header.rules,
            },
            source_path: path.to_path_buf(),
            source_version: version,
            map_states,
            script_state: script_state.map(|state| state.to_bytes()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn doom_v13_save(gamemode: i32, map: u8) -> Vec<u8> {
        let mut data = GameFamily::Doom.magic().to_le_bytes().to_vec();
        data.extend_from_slice(&13_i32.to_le_bytes());
        data.extend_from_slice(&gamemode.to_le_bytes());
        data.extend_from_slice(&4_i32.to_le_bytes());
        data.extend_from_slice(b"Test");
        // skill, episode, map, deathmatch, fast, noMonsters, respawn
        data.extend_from_slice(&[2, 1, map, 0, 0, 0, 0]);
        data.extend_from_slice(&500_i32.to_le_bytes());
        data.extend_from_slice(&[1u8; 16]);
        data.extend_from_slice(&9_i32.to_le_bytes());
        data.extend_from_slice(b"MAPSTATE");
        data
    }

    #[test]
    fn test_recognize_only_matching_family() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doomsav0.dsg");
        fs::write(&path, doom_v13_save(4, 1)).unwrap();

        assert!(NativeTranslator::new(GameFamily::Doom).recognize(&path));
        assert!(!NativeTranslator::new(GameFamily::Heretic).recognize(&path));
        assert!(!NativeTranslator::new(GameFamily::Doom).recognize(&dir.path().join("missing.dsg")));
    }

    #[test]
    fn test_hexen_v3_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hex0.hxs");
        let mut data = GameFamily::Hexen.magic().to_le_bytes().to_vec();
        data.extend_from_slice(&3_i32.to_le_bytes());
        fs::write(&path, data).unwrap();

        let translator = NativeTranslator::new(GameFamily::Hexen);
        assert!(!translator.recognize(&path));
        let err = translator.convert(&path, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion { version: 3, .. }));
    }

    #[test]
    fn test_single_map_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doomsav0.dsg");
        fs::write(&path, doom_v13_save(4, 7)).unwrap();

        let package = NativeTranslator::new(GameFamily::Doom).convert(&path, None).unwrap();
        assert_eq!(package.metadata.game_identity_key, "doom2");
        assert_eq!(package.metadata.map_uri.to_string(), "Maps:MAP07");
        assert_eq!(package.metadata.map_time, Some(500));
        assert_eq!(package.source_version, 13);
        assert_eq!(package.map_states.len(), 1);

        let (map, state) = &package.map_states[0];
        assert_eq!(map.path(), "MAP07");
        assert_eq!(&state[..8], &compose_map_state_header(GameFamily::Doom.magic(), 13));
        assert_eq!(&state[8..], b"MAPSTATE");
        assert!(package.script_state.is_none());
    }
}
