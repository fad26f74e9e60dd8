//! Deterministic fixtures for tests and host integrations.

use std::sync::Mutex;

use hashbrown::HashMap;

use crate::error::FrameError;
use crate::frame::Pose;
use crate::oracle::{OracleQuery, TransformOracle};
use crate::Result;

/// A scripted [`TransformOracle`]: answers only the (target, source) pairs it
/// has been told about, plus the trivial identity when target equals source.
/// Entries can be rescripted mid-test through a shared reference.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    transforms: Mutex<HashMap<(String, String), Pose>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the pose of `source` expressed in `target`.
    pub fn set(&self, target: &str, source: &str, pose: Pose) {
        self.lock()
            .insert((target.to_string(), source.to_string()), pose);
    }

    /// Forget a scripted pair, making it unresolvable again.
    pub fn clear(&self, target: &str, source: &str) {
        self.lock()
            .remove(&(target.to_string(), source.to_string()));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), Pose>> {
        self.transforms.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TransformOracle for ScriptedOracle {
    fn resolve(&self, target: &str, source: &str, _query: &OracleQuery) -> Result<Pose> {
        if target == source {
            return Ok(Pose::identity());
        }
        self.lock()
            .get(&(target.to_string(), source.to_string()))
            .copied()
            .ok_or_else(|| FrameError::OracleUnavailable {
                target: target.to_string(),
                source_frame: source.to_string(),
            })
    }
}
