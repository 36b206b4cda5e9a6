//! Game session metadata
//!
//! A [`SessionMetadata`] describes one converted savegame. It is serialized to
//! an ordered key/value record (see [`SessionMetadata::to_record`]) and
//! rendered as the package's `Info` entry by [`compose_info_text`].

mod info;
mod map_uri;

pub use info::{compose_info_text, compose_info_text_at, render_record};
pub use map_uri::{MAP_URI_SCHEME, MapUri};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Skill value meaning "spawn no things"
pub const SKILL_NO_THINGS: i32 = -1;

/// Number of defined skill levels
pub const NUM_SKILL_MODES: i32 = 5;

/// Per-family monster rule; exactly one is stored per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MonsterRule {
    RespawnMonsters(bool),
    RandomClasses(bool),
}

/// Rules the session was started with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRules {
    pub skill: i32,
    pub fast: bool,
    pub deathmatch: u8,
    pub no_monsters: bool,
    #[serde(flatten)]
    pub monsters: MonsterRule,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            skill: 2,
            fast: false,
            deathmatch: 0,
            no_monsters: false,
            monsters: MonsterRule::RespawnMonsters(false),
        }
    }
}

/// Descriptive state of one game session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub game_identity_key: String,
    pub user_description: String,
    pub map_uri: MapUri,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_time: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<bool>>,
    pub session_id: i32,
    pub game_rules: GameRules,
}

impl SessionMetadata {
    /// Serialize into an ordered key/value record
    pub fn to_record(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            // A struct always serializes to an object
            _ => Ok(Map::new()),
        }
    }
}
