//! Native savegame header decoding

use std::io::{Read, Seek};

use super::family::GameFamily;
use super::layout::{DescriptionEncoding, HeaderLayout, SkillEncoding};
use crate::error::Result;
use crate::formats::uses_flat_map_numbering;
use crate::io::ByteCursor;
use crate::session::{GameRules, MapUri, MonsterRule, NUM_SKILL_MODES, SKILL_NO_THINGS};

/// Number of player slots stored by the Doom and Heretic header
pub const MAX_PLAYERS: usize = 16;

/// Decoded header fields of a native savegame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveHeader {
    pub game_identity_key: String,
    pub description: String,
    pub episode: i32,
    pub map: i32,
    pub rules: GameRules,
    pub map_time: Option<i32>,
    pub players: Option<Vec<bool>>,
    pub session_id: i32,
}

impl SaveHeader {
    /// The current map, with the episode dropped for flat-numbered games
    #[must_use]
    pub fn map_uri(&self) -> MapUri {
        MapUri::compose(self.episode, self.map)
    }
}

/// Split a packed skill byte into `(skill, fast)`
///
/// Skill values outside the defined levels mean "spawn no things"; such a
/// byte never carries a fast flag, even when its high bit is set.
#[must_use]
pub fn decode_skill(byte: u8, encoding: SkillEncoding) -> (i32, bool) {
    let skill = i32::from(byte & 0x7f);
    if skill >= NUM_SKILL_MODES {
        return (SKILL_NO_THINGS, false);
    }
    match encoding {
        SkillEncoding::PackedFast => (skill, byte & 0x80 != 0),
        SkillEncoding::SkillOnly => (skill, false),
    }
}

/// Decode the header fields following `(magic, version)`
///
/// `hint` disambiguates legacy game modes that map to several releases.
pub fn decode_header<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    family: GameFamily,
    version: i32,
    layout: &HeaderLayout,
    hint: Option<&str>,
) -> Result<SaveHeader> {
    let gamemode = cursor.read_i32()?;
    let game_identity_key = family.resolve_identity(gamemode, version, hint)?;

    let description = match layout.description {
        DescriptionEncoding::Fixed(len) => cursor.read_fixed_string(len)?,
        DescriptionEncoding::LengthPrefixed => cursor.read_prefixed_string()?,
    };

    let (skill, mut fast) = decode_skill(cursor.read_u8()?, layout.skill);

    let mut episode = i32::from(cursor.read_u8()?);
    let map = i32::from(cursor.read_u8()?);
    if uses_flat_map_numbering(&game_identity_key) {
        episode = 0;
    }

    let deathmatch = cursor.read_u8()?;
    if layout.standalone_fast {
        // Overrides whatever the skill byte said
        fast = cursor.read_bool()?;
    }
    let no_monsters = cursor.read_bool()?;
    let monster_flag = cursor.read_bool()?;
    let monsters = if layout.random_classes {
        MonsterRule::RandomClasses(monster_flag)
    } else {
        MonsterRule::RespawnMonsters(monster_flag)
    };

    let (map_time, players) = if layout.player_tail {
        if layout.struct_padding {
            cursor.skip(2)?;
        }
        let map_time = cursor.read_i32()?;
        let mut players = Vec::with_capacity(MAX_PLAYERS);
        for _ in 0..MAX_PLAYERS {
            players.push(cursor.read_bool()?);
        }
        (Some(map_time), Some(players))
    } else {
        (None, None)
    };

    let session_id = cursor.read_i32()?;

    tracing::debug!(
        "{family} v{version}: game={game_identity_key} map={} skill={skill} fast={fast}",
        MapUri::compose(episode, map)
    );

    Ok(SaveHeader {
        game_identity_key,
        description,
        episode,
        map,
        rules: GameRules {
            skill,
            fast,
            deathmatch,
            no_monsters,
            monsters,
        },
        map_time,
        players,
        session_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    #[test]
    fn test_skill_byte_sentinels() {
        assert_eq!(decode_skill(0xFF, SkillEncoding::PackedFast), (-1, false));
        assert_eq!(decode_skill(0x85, SkillEncoding::PackedFast), (-1, false));
        assert_eq!(decode_skill(0x03, SkillEncoding::PackedFast), (3, false));
        assert_eq!(decode_skill(0x82, SkillEncoding::PackedFast), (2, true));
        assert_eq!(decode_skill(0x82, SkillEncoding::SkillOnly), (2, false));
        assert_eq!(decode_skill(0x05, SkillEncoding::SkillOnly), (-1, false));
    }

    struct HeaderBytes(Vec<u8>);

    impl HeaderBytes {
        fn new(gamemode: i32) -> Self {
            Self(gamemode.to_le_bytes().to_vec())
        }
        fn fixed(mut self, text: &str) -> Self {
            let mut field = text.as_bytes().to_vec();
            field.resize(24, 0);
            self.0.extend_from_slice(&field);
            self
        }
        fn prefixed(mut self, text: &str) -> Self {
            self.0.extend_from_slice(&(text.len() as i32).to_le_bytes());
            self.0.extend_from_slice(text.as_bytes());
            self
        }
        fn bytes(mut self, bytes: &[u8]) -> Self {
            self.0.extend_from_slice(bytes);
            self
        }
        fn int(mut self, value: i32) -> Self {
            self.0.extend_from_slice(&value.to_le_bytes());
            self
        }
        fn decode(self, family: GameFamily, version: i32, hint: Option<&str>) -> Result<SaveHeader> {
            let layout = HeaderLayout::select(family, version).unwrap();
            let mut cursor = ByteCursor::new(Cursor::new(self.0)).unwrap();
            decode_header(&mut cursor, family, version, &layout, hint)
        }
    }

    #[test]
    fn test_doom_v9_with_padding() {
        let mut players = [0u8; 16];
        players[0] = 1;
        players[3] = 1;
        let header = HeaderBytes::new(1)
            .fixed("Before the boss")
            // skill 4 + fast, E2M5, deathmatch 2, no monsters, respawn
            .bytes(&[0x84, 2, 5, 2, 1, 1])
            .bytes(&[0xCD, 0xCD])
            .int(4200)
            .bytes(&players)
            .int(-77)
            .decode(GameFamily::Doom, 9, None)
            .unwrap();

        assert_eq!(header.game_identity_key, "doom1");
        assert_eq!(header.description, "Before the boss");
        assert_eq!(header.map_uri().path(), "E2M5");
        assert_eq!(header.rules.skill, 4);
        assert!(header.rules.fast);
        assert_eq!(header.rules.deathmatch, 2);
        assert!(header.rules.no_monsters);
        assert_eq!(header.rules.monsters, MonsterRule::RespawnMonsters(true));
        assert_eq!(header.map_time, Some(4200));
        let players = header.players.unwrap();
        assert_eq!(players.len(), 16);
        assert!(players[0] && players[3] && !players[1]);
        assert_eq!(header.session_id, -77);
    }

    #[test]
    fn test_v13_standalone_fast_wins() {
        // The standalone byte decides "fast"; the skill byte high bit is ignored
        let header = HeaderBytes::new(4)
            .prefixed("MAP07")
            .bytes(&[0x82, 1, 7, 0, 1, 0, 0])
            .int(35)
            .bytes(&[0u8; 16])
            .int(1)
            .decode(GameFamily::Doom, 13, None)
            .unwrap();
        assert_eq!(header.rules.skill, 2);
        assert!(header.rules.fast);
        // doom2 has no episodes
        assert_eq!(header.episode, 0);
        assert_eq!(header.map_uri().path(), "MAP07");
    }

    #[test]
    fn test_heretic_v12_no_padding() {
        let header = HeaderBytes::new(2)
            .prefixed("Hell's Maw")
            .bytes(&[0xFF, 3, 2, 0, 0, 0])
            .int(99)
            .bytes(&[1u8; 16])
            .int(5)
            .decode(GameFamily::Heretic, 12, None)
            .unwrap();
        assert_eq!(header.game_identity_key, "heretic-ext");
        assert_eq!(header.rules.skill, -1);
        assert!(!header.rules.fast);
        assert_eq!(header.map_uri().path(), "E3M2");
        assert_eq!(header.map_time, Some(99));
    }

    #[test]
    fn test_hexen_header_has_no_tail() {
        let header = HeaderBytes::new(1)
            .prefixed("Winnowing Hall")
            .bytes(&[0x83, 1, 2, 0, 0, 1])
            .int(1234)
            .decode(GameFamily::Hexen, 11, None)
            .unwrap();
        assert_eq!(header.game_identity_key, "hexen");
        assert_eq!(header.rules.skill, 3);
        assert!(!header.rules.fast);
        assert_eq!(header.episode, 0);
        assert_eq!(header.rules.monsters, MonsterRule::RandomClasses(true));
        assert_eq!(header.map_time, None);
        assert_eq!(header.players, None);
        assert_eq!(header.session_id, 1234);
    }

    #[test]
    fn test_ambiguous_legacy_doom2() {
        let bytes = || {
            HeaderBytes::new(2)
                .fixed("plutonia?")
                .bytes(&[0x02, 1, 3, 0, 0, 0, 0, 0])
                .int(0)
                .bytes(&[0u8; 16])
                .int(0)
        };
        let err = bytes().decode(GameFamily::Doom, 5, None).unwrap_err();
        assert!(matches!(err, Error::AmbigousGameId { .. }));

        let header = bytes().decode(GameFamily::Doom, 5, Some("doom2-plut")).unwrap();
        assert_eq!(header.game_identity_key, "doom2-plut");
        assert_eq!(header.map_uri().path(), "MAP03");
    }
}
