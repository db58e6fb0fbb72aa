//! Process-role queries.
//!
//! The distributed engine owns the real process grid; operators only need to
//! know who they are (`rank`), how many peers exist, and whether they are the
//! master. `LocalGrid` answers from an `EngineConfig` for single-host runs and
//! tests.

use std::io::{self, Write};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::id::Rank;

pub trait ProcessGrid: Send + Sync {
    fn rank(&self) -> Rank;

    fn nprocs(&self) -> usize;

    /// True on the process that owns user-facing output.
    fn is_master(&self) -> bool {
        self.rank().is_root()
    }

    /// Write `msg` plus a newline, on the master only. Other ranks are silent.
    fn print_to(&self, msg: &str, out: &mut dyn Write) -> io::Result<()> {
        if !self.is_master() {
            return Ok(());
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(rank = %self.rank(), len = msg.len(), "master print");
        out.write_all(msg.as_bytes())?;
        out.write_all(b"\n")
    }

    fn print(&self, msg: &str) -> io::Result<()> {
        self.print_to(msg, &mut io::stdout().lock())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalGrid {
    rank: Rank,
    nprocs: usize,
}

impl LocalGrid {
    /// The single-process grid: one process, which is the master.
    pub fn single() -> Self {
        Self {
            rank: Rank::ROOT,
            nprocs: 1,
        }
    }

    pub fn from_config(cfg: &EngineConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            rank: Rank::new(cfg.rank),
            nprocs: cfg.nprocs,
        })
    }
}

impl ProcessGrid for LocalGrid {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn nprocs(&self) -> usize {
        self.nprocs
    }
}
