//! Versioned state snapshots
//!
//! A snapshot is a JSON envelope around the full [`GameState`], RNG position
//! included, so decoding one yields a state that ticks on exactly like the
//! original.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Current envelope version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a GameState,
}

/// Decoded only after [`VersionOnly`] has vetted the version key
#[derive(Deserialize)]
struct Envelope {
    state: GameState,
}

#[derive(Deserialize)]
struct VersionOnly {
    version: u32,
}

#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    UnsupportedVersion { found: u32 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "malformed snapshot: {e}"),
            Self::UnsupportedVersion { found } => write!(
                f,
                "unsupported snapshot version {found} (expected {SNAPSHOT_VERSION})"
            ),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

pub fn encode(state: &GameState) -> Result<String, SnapshotError> {
    let envelope = EnvelopeRef {
        version: SNAPSHOT_VERSION,
        state,
    };
    Ok(serde_json::to_string(&envelope)?)
}

pub fn decode(json: &str) -> Result<GameState, SnapshotError> {
    // Check the version first so a newer layout reports as such, not as bad JSON
    let VersionOnly { version } = serde_json::from_str(json)?;
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion { found: version });
    }
    let envelope: Envelope = serde_json::from_str(json)?;
    Ok(envelope.state)
}
