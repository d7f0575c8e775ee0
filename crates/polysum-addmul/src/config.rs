//! Tuning knobs for the block pipeline.

use crate::error::AddmulError;

/// Configuration for a sum of products.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddmulConfig {
    /// Terms produced per `produce_block` call.
    pub block_size: usize,
    /// Full blocks a term may queue ahead of the merge.
    pub num_blocks: usize,
}

impl Default for AddmulConfig {
    fn default() -> Self {
        Self {
            block_size: 256,
            num_blocks: 4,
        }
    }
}

impl AddmulConfig {
    /// Sets the block size.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Sets the number of queued blocks per term.
    #[must_use]
    pub fn with_num_blocks(mut self, num_blocks: usize) -> Self {
        self.num_blocks = num_blocks;
        self
    }

    /// Terms a single term may buffer ahead of the merge.
    #[must_use]
    pub fn ring_capacity(&self) -> usize {
        self.block_size * self.num_blocks
    }

    /// Checks that both knobs are positive.
    ///
    /// # Errors
    ///
    /// Returns [`AddmulError::ZeroBlockSize`] or [`AddmulError::ZeroBlocks`].
    pub fn validate(&self) -> Result<(), AddmulError> {
        if self.block_size == 0 {
            return Err(AddmulError::ZeroBlockSize);
        }
        if self.num_blocks == 0 {
            return Err(AddmulError::ZeroBlocks);
        }
        Ok(())
    }
}
