//! Canonical map identifiers

use std::fmt;

use serde::{Serialize, Serializer};

/// Resource scheme every map URI lives under
pub const MAP_URI_SCHEME: &str = "Maps";

/// A map identified by episode and map number
///
/// Episode zero denotes a flat (episode-less) map numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapUri {
    episode: i32,
    map: i32,
}

impl MapUri {
    /// Compose a map URI; an episode of zero yields `MAPnn` numbering
    #[must_use]
    pub fn compose(episode: i32, map: i32) -> Self {
        Self {
            episode: episode.max(0),
            map,
        }
    }

    /// Map URI for a flat map number (hubs, script tasks)
    #[must_use]
    pub fn flat(map: i32) -> Self {
        Self::compose(0, map)
    }

    pub fn episode(&self) -> i32 {
        self.episode
    }

    pub fn map(&self) -> i32 {
        self.map
    }

    /// The path part without the scheme, e.g. `E1M1` or `MAP01`
    #[must_use]
    pub fn path(&self) -> String {
        if self.episode > 0 {
            format!("E{}M{}", self.episode, self.map)
        } else {
            format!("MAP{:02}", self.map)
        }
    }
}

impl fmt::Display for MapUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MAP_URI_SCHEME}:{}", self.path())
    }
}

impl Serialize for MapUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
