use crate::error::{FoldError, Result};

pub const ROOT: usize = 0;

/// Position of a rank on the fixed logical ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingTopology {
    rank: usize,
    size: usize,
}

impl RingTopology {
    pub fn new(rank: usize, size: usize) -> Result<Self> {
        if size == 0 || rank >= size {
            return Err(FoldError::Configuration(format!(
                "rank {} is not part of a ring of size {}",
                rank, size
            )));
        }
        Ok(Self { rank, size })
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn next(&self) -> usize {
        (self.rank + 1) % self.size
    }

    pub fn previous(&self) -> usize {
        (self.rank + self.size - 1) % self.size
    }

    pub fn is_root(&self) -> bool {
        self.rank == ROOT
    }

    /// A ring of one has nobody to exchange with
    pub fn has_neighbors(&self) -> bool {
        self.size > 1
    }
}
