//! Engine configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::Rank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of processes in the engine's process grid.
    pub nprocs: usize,

    /// Rank of the calling process; rank 0 is the master.
    pub rank: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nprocs: 1,
            rank: 0,
        }
    }
}

impl EngineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `EWISE_NPROCS`: number of processes
    /// - `EWISE_RANK`: rank of this process
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("EWISE_NPROCS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.nprocs = v;
            }
        }

        if let Ok(s) = std::env::var("EWISE_RANK") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.rank = v;
            }
        }

        cfg
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: EngineConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.nprocs == 0 {
            return Err(Error::Config("nprocs must be at least 1".into()));
        }
        if !Rank::new(self.rank).is_within(self.nprocs) {
            return Err(Error::Config(format!(
                "rank {} out of range for {} process(es)",
                self.rank, self.nprocs
            )));
        }
        Ok(())
    }
}
