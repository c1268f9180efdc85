//! Document types that guidance is mined from, and their fixed trust ordering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GuidanceError;

/// The kind of document a guidance statement came from.
///
/// Variant order is the iteration order of an [`ItemsBySource`](crate::ItemsBySource)
/// map, which keeps bucket discovery deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    PressRelease,
    Presentation,
    Transcript,
}

impl Source {
    /// All sources, highest trust first.
    pub const ALL: [Source; 3] = [Self::PressRelease, Self::Presentation, Self::Transcript];

    /// Trust rank used as the display-field tie-break: press_release=3 > presentation=2 > transcript=1.
    pub fn rank(&self) -> u8 {
        match self {
            Self::PressRelease => 3,
            Self::Presentation => 2,
            Self::Transcript => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PressRelease => "press_release",
            Self::Presentation => "presentation",
            Self::Transcript => "transcript",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = GuidanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "press_release" => Ok(Self::PressRelease),
            "presentation" => Ok(Self::Presentation),
            "transcript" => Ok(Self::Transcript),
            other => Err(GuidanceError::UnknownSource(other.to_string())),
        }
    }
}
