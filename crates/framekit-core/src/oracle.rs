//! The transform oracle: the external live transform-resolution service this
//! core queries but does not implement.

use std::time::Duration;

use crate::frame::Pose;
use crate::Result;

/// Point-in-time query parameters passed through to the oracle.
///
/// `at_time` of 0.0 requests the most recent transform. Both waits are
/// bounded; the oracle never blocks past `timeout`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OracleQuery {
    pub at_time: f64,
    pub timeout: Duration,
    pub polling_interval: Duration,
}

/// Injected capability answering "what is the current pose of `source`
/// expressed in `target`" with a bounded wait.
///
/// Implementations wrap a live, time-varying transform service (e.g. a tf
/// buffer); tests substitute the deterministic
/// [`ScriptedOracle`](crate::fixtures::ScriptedOracle). The core never embeds
/// a polling loop of its own.
pub trait TransformOracle {
    /// Resolve the pose of `source` relative to `target`, or
    /// `OracleUnavailable` once the timeout elapses.
    fn resolve(&self, target: &str, source: &str, query: &OracleQuery) -> Result<Pose>;

    /// Cheap availability probe; the default simply attempts a resolution.
    fn can_resolve(&self, target: &str, source: &str, query: &OracleQuery) -> bool {
        self.resolve(target, source, query).is_ok()
    }
}
