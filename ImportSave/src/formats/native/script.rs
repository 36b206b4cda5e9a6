//! Hexen ACS script state: world variables and deferred script tasks

use std::io::{Read, Seek};

use super::layout::ScriptSegment;
use crate::error::{Error, Result};
use crate::io::ByteCursor;
use crate::session::MapUri;

/// Number of ACS world variables
pub const WORLD_VAR_COUNT: usize = 64;

/// Segment id marking the script state in version 7 and later
pub const SCRIPT_SEGMENT_ID: i32 = 116;

/// Padding after the task store in unmarked (pre-7) saves
const LEGACY_TRAILING_PADDING: u64 = 12;

const SUPPORTED_SUB_VERSIONS: std::ops::RangeInclusive<u8> = 1..=3;

/// A script start queued for a map that was not loaded at the time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredTask {
    pub map_number: i32,
    pub script_number: i32,
    pub args: [u8; 4],
}

impl DeferredTask {
    /// Map number zero marks an unused store slot
    pub fn is_used(&self) -> bool {
        self.map_number != 0
    }
}

/// World variables plus pending script starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptState {
    pub sub_version: u8,
    pub world_vars: Vec<i32>,
    pub tasks: Vec<DeferredTask>,
}

impl ScriptState {
    /// Decode the script state segment; unused task slots are dropped
    pub fn decode<R: Read + Seek>(cursor: &mut ByteCursor<R>, segment: ScriptSegment) -> Result<Self> {
        let sub_version = match segment {
            ScriptSegment::Marked => {
                let found = cursor.read_i32()?;
                if found != SCRIPT_SEGMENT_ID {
                    return Err(Error::SegmentMismatch {
                        expected: SCRIPT_SEGMENT_ID,
                        found,
                    });
                }
                cursor.read_u8()?
            }
            ScriptSegment::Legacy | ScriptSegment::Absent => 1,
        };
        if !SUPPORTED_SUB_VERSIONS.contains(&sub_version) {
            return Err(Error::UnsupportedScriptVersion { version: sub_version });
        }

        let mut world_vars = Vec::with_capacity(WORLD_VAR_COUNT);
        for _ in 0..WORLD_VAR_COUNT {
            world_vars.push(cursor.read_i32()?);
        }

        let count = cursor.read_i32()?;
        let count = usize::try_from(count)
            .map_err(|_| Error::CorruptData(format!("negative ACS task count {count}")))?;

        let mut tasks = Vec::new();
        let mut dropped = 0usize;
        for _ in 0..count {
            let task = DeferredTask {
                map_number: cursor.read_i32()?,
                script_number: cursor.read_i32()?,
                args: {
                    let mut args = [0u8; 4];
                    args.copy_from_slice(&cursor.read_bytes(4)?);
                    args
                },
            };
            if task.is_used() {
                tasks.push(task);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::debug!("Dropped {dropped} unused ACS task slots");
        }

        if segment == ScriptSegment::Legacy {
            cursor.skip(LEGACY_TRAILING_PADDING)?;
        }

        Ok(Self {
            sub_version,
            world_vars,
            tasks,
        })
    }

    /// Serialize for the `ACScriptState` package entry
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(WORLD_VAR_COUNT * 4 + 4 + self.tasks.len() * 24);
        for &var in &self.world_vars {
            out.extend_from_slice(&var.to_le_bytes());
        }
        out.extend_from_slice(&(self.tasks.len() as i32).to_le_bytes());
        for task in &self.tasks {
            let uri = MapUri::flat(task.map_number).to_string();
            out.extend_from_slice(&(uri.len() as u32).to_le_bytes());
            out.extend_from_slice(uri.as_bytes());
            out.extend_from_slice(&task.script_number.to_le_bytes());
            out.extend_from_slice(&task.args);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ByteCursor;
    use std::io::Cursor;

    fn segment_bytes(prefix: &[u8], tasks: &[(i32, i32, [u8; 4])]) -> Vec<u8> {
        let mut data = prefix.to_vec();
        for i in 0..WORLD_VAR_COUNT as i32 {
            data.extend_from_slice(&(i * 10).to_le_bytes());
        }
        data.extend_from_slice(&(tasks.len() as i32).to_le_bytes());
        for (map, script, args) in tasks {
            data.extend_from_slice(&map.to_le_bytes());
            data.extend_from_slice(&script.to_le_bytes());
            data.extend_from_slice(args);
        }
        data
    }

    fn marked_prefix(sub_version: u8) -> Vec<u8> {
        let mut prefix = SCRIPT_SEGMENT_ID.to_le_bytes().to_vec();
        prefix.push(sub_version);
        prefix
    }

    fn decode(data: Vec<u8>, segment: ScriptSegment) -> Result<ScriptState> {
        let mut cursor = ByteCursor::new(Cursor::new(data)).unwrap();
        ScriptState::decode(&mut cursor, segment)
    }

    #[test]
    fn test_unused_tasks_filtered() {
        let tasks = [
            (2, 10, [1, 2, 3, 4]),
            (0, 11, [0; 4]),
            (5, 12, [9, 9, 9, 9]),
            (0, 0, [0; 4]),
            (3, 13, [0; 4]),
        ];
        let state = decode(segment_bytes(&marked_prefix(2), &tasks), ScriptSegment::Marked).unwrap();
        assert_eq!(state.world_vars.len(), WORLD_VAR_COUNT);
        assert_eq!(state.world_vars[63], 630);
        assert_eq!(state.tasks.len(), 3);
        assert!(state.tasks.iter().all(DeferredTask::is_used));

        let bytes = state.to_bytes();
        let mut cursor = ByteCursor::new(Cursor::new(bytes)).unwrap();
        cursor.skip(WORLD_VAR_COUNT as u64 * 4).unwrap();
        assert_eq!(cursor.read_i32().unwrap(), 3);
        let uri_len = cursor.read_i32().unwrap() as usize;
        assert_eq!(cursor.read_fixed_string(uri_len).unwrap(), "Maps:MAP02");
        assert_eq!(cursor.read_i32().unwrap(), 10);
        assert_eq!(cursor.read_bytes(4).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_serialized_layout() {
        let state = ScriptState {
            sub_version: 3,
            world_vars: vec![-1; WORLD_VAR_COUNT],
            tasks: vec![DeferredTask {
                map_number: 12,
                script_number: -7,
                args: [5, 6, 7, 8],
            }],
        };
        let bytes = state.to_bytes();

        let mut expected = Vec::new();
        for _ in 0..WORLD_VAR_COUNT {
            expected.extend_from_slice(&[0xFF; 4]);
        }
        expected.extend_from_slice(&[1, 0, 0, 0]);
        expected.extend_from_slice(&[10, 0, 0, 0]);
        expected.extend_from_slice(b"Maps:MAP12");
        expected.extend_from_slice(&[0xF9, 0xFF, 0xFF, 0xFF]);
        expected.extend_from_slice(&[5, 6, 7, 8]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_segment_mismatch_is_fatal() {
        let mut prefix = 115_i32.to_le_bytes().to_vec();
        prefix.push(1);
        let err = decode(segment_bytes(&prefix, &[]), ScriptSegment::Marked).unwrap_err();
        assert!(matches!(err, Error::SegmentMismatch { expected: 116, found: 115 }));
    }

    #[test]
    fn test_unknown_sub_version() {
        let err = decode(segment_bytes(&marked_prefix(4), &[]), ScriptSegment::Marked).unwrap_err();
        assert!(matches!(err, Error::UnsupportedScriptVersion { version: 4 }));
    }

    #[test]
    fn test_legacy_segment_skips_padding() {
        let mut data = segment_bytes(&[], &[(1, 1, [0; 4])]);
        data.extend_from_slice(&[0xEE; 12]);
        data.push(0x42);
        let mut cursor = ByteCursor::new(Cursor::new(data)).unwrap();
        let state = ScriptState::decode(&mut cursor, ScriptSegment::Legacy).unwrap();
        assert_eq!(state.sub_version, 1);
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(cursor.read_u8().unwrap(), 0x42);
    }
}
