//! Session package output
//!
//! A converted savegame is a ZIP package holding an `Info` text entry,
//! one `maps/<map>State` entry per map and, for Hexen, an `ACScriptState`
//! entry. Entries are collected in memory by [`ArchiveBuilder`] and the file
//! is only created once the whole package has been composed.

mod writer;

pub use writer::ArchiveBuilder;

use byteorder::{ByteOrder, LittleEndian};

use crate::session::MapUri;

/// Name of the metadata entry
pub const INFO_ENTRY: &str = "Info";

/// Name of the Hexen script state entry
pub const SCRIPT_STATE_ENTRY: &str = "ACScriptState";

/// File extension of produced packages
pub const PACKAGE_EXTENSION: &str = "save";

/// Size of the header prepended to every map state entry
pub const MAP_STATE_HEADER_SIZE: usize = 8;

/// Compose the header prepended to a map state: `magic` then `version`
#[must_use]
pub fn compose_map_state_header(magic: i32, version: i32) -> [u8; MAP_STATE_HEADER_SIZE] {
    let mut header = [0u8; MAP_STATE_HEADER_SIZE];
    LittleEndian::write_i32(&mut header[..4], magic);
    LittleEndian::write_i32(&mut header[4..], version);
    header
}

/// Package entry name for a map's state, e.g. `maps/E1M1State`
#[must_use]
pub fn map_state_entry_name(map: &MapUri) -> String {
    format!("maps/{}State", map.path())
}
