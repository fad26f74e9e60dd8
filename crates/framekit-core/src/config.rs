//! Editor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::oracle::OracleQuery;

/// Tunables for the editor and its oracle queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name of the root sentinel frame.
    pub root_frame: String,
    /// Bounded wait for a single transform resolution.
    pub oracle_timeout: Duration,
    /// How often the oracle client polls while waiting.
    pub oracle_polling_interval: Duration,
    /// Optional cap on the undo history; the oldest entry is dropped when
    /// the cap is exceeded.
    pub max_history: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_frame: crate::frame::DEFAULT_ROOT.to_string(),
            oracle_timeout: Duration::from_secs(1),
            oracle_polling_interval: Duration::from_millis(10),
            max_history: None,
        }
    }
}

impl Config {
    /// Query parameters for "the most recent transform" (time 0.0).
    pub fn oracle_query(&self) -> OracleQuery {
        OracleQuery {
            at_time: 0.0,
            timeout: self.oracle_timeout,
            polling_interval: self.oracle_polling_interval,
        }
    }
}
