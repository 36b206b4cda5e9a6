//! Hexen hub reassembly
//!
//! A Hexen save keeps the shared player state in the main file and each
//! visited hub map in a side-car file named `<stem><NN>.<ext>`. Side-cars for
//! maps that were never visited simply do not exist.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};

use crate::archive::MAP_STATE_HEADER_SIZE;
use crate::error::{Error, Result};
use crate::session::MapUri;

/// Highest hub map index checked for a side-car file
pub const MAX_HUB_MAPS: i32 = 99;

/// Offset of the map time inside a side-car file (after its magic, version
/// and skill bytes)
const SIDE_CAR_MAP_TIME_OFFSET: usize = 5;

/// One reassembled hub map
#[derive(Debug, Clone)]
pub struct HubMap {
    pub map: MapUri,
    /// `[header][player data][side-car data]`
    pub state: Vec<u8>,
    /// Map time recorded in the side-car, if it is long enough to hold one
    pub map_time: Option<i32>,
}

/// Path of the side-car file for hub map `index`
pub fn side_car_path(path: &Path, index: i32) -> Result<PathBuf> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::InvalidPath(path.display().to_string()))?;
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}{index:02}.{ext}"),
        None => format!("{stem}{index:02}"),
    };
    Ok(path.with_file_name(name))
}

/// Read the map time stored at a fixed offset of a side-car file
#[must_use]
pub fn side_car_map_time(data: &[u8]) -> Option<i32> {
    data.get(SIDE_CAR_MAP_TIME_OFFSET..SIDE_CAR_MAP_TIME_OFFSET + 4)
        .map(LittleEndian::read_i32)
}

/// Collect every hub map that has a side-car next to `path`
///
/// Missing side-cars are skipped; a side-car that exists but cannot be read
/// is an error.
pub fn collect_hub_maps(
    path: &Path,
    header: &[u8; MAP_STATE_HEADER_SIZE],
    player_data: &[u8],
) -> Result<Vec<HubMap>> {
    let mut maps = Vec::new();

    for index in 1..=MAX_HUB_MAPS {
        let side_car = side_car_path(path, index)?;
        let data = match fs::read(&side_car) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(Error::open(side_car, e)),
        };
        tracing::debug!("Found hub map {index:02}: {} ({} bytes)", side_car.display(), data.len());

        let map_time = side_car_map_time(&data);
        if map_time.is_none() {
            tracing::warn!("Side-car {} is too short to hold a map time", side_car.display());
        }

        let mut state = Vec::with_capacity(header.len() + player_data.len() + data.len());
        state.extend_from_slice(header);
        state.extend_from_slice(player_data);
        state.extend_from_slice(&data);

        maps.push(HubMap {
            map: MapUri::flat(index),
            state,
            map_time,
        });
    }

    Ok(maps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_car_naming() {
        let path = Path::new("/saves/hex6.hxs");
        assert_eq!(side_car_path(path, 1).unwrap(), Path::new("/saves/hex601.hxs"));
        assert_eq!(side_car_path(path, 42).unwrap(), Path::new("/saves/hex642.hxs"));
        assert_eq!(side_car_path(Path::new("slot"), 9).unwrap(), Path::new("slot09"));
    }

    #[test]
    fn test_side_car_map_time() {
        let mut data = vec![0u8; 5];
        data.extend_from_slice(&777_i32.to_le_bytes());
        assert_eq!(side_car_map_time(&data), Some(777));
        assert_eq!(side_car_map_time(&data[..8]), None);
    }

    #[test]
    fn test_sparse_hub_set() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("hex0.hxs");
        for index in [1_i32, 2, 5] {
            let mut data = vec![index as u8; 5];
            data.extend_from_slice(&(index * 100).to_le_bytes());
            fs::write(side_car_path(&main, index).unwrap(), data).unwrap();
        }

        let header = [1, 2, 3, 4, 5, 6, 7, 8];
        let maps = collect_hub_maps(&main, &header, b"PLAYERS").unwrap();

        let names: Vec<String> = maps.iter().map(|m| m.map.path()).collect();
        assert_eq!(names, ["MAP01", "MAP02", "MAP05"]);
        assert_eq!(maps[2].map_time, Some(500));
        assert_eq!(&maps[0].state[..8], &header);
        assert_eq!(&maps[0].state[8..15], b"PLAYERS");
        assert_eq!(maps[0].state[15], 1);
    }
}
