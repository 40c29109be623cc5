use std::sync::Arc;

use log::{info, warn};

use super::{Chunk, Miner};
use crate::config::ChainConfig;
use crate::error::{ChainError, Result};

/// In-memory append-only chain of mined and hashed chunks.
#[derive(Debug)]
pub struct Chain {
    chunks: Vec<Arc<Chunk>>,
    difficulty: u64,
}

impl Chain {
    /// Initialize a chain with a mined and hashed genesis chunk.
    pub fn new(config: &ChainConfig) -> Result<Self> {
        let mut genesis = Chunk::genesis(config.difficulty, config.genesis_data.clone());
        genesis.mine();
        genesis.generate_hash(true)?;
        info!(
            "genesis mined nonce={} difficulty={}",
            genesis.proof_of_work.value(),
            genesis.difficulty
        );

        Ok(Self {
            chunks: vec![Arc::new(genesis)],
            difficulty: config.difficulty,
        })
    }

    /// Return the last chunk in the chain.
    pub fn tip(&self) -> &Arc<Chunk> {
        self.chunks
            .last()
            .expect("Chain should always have at least the genesis chunk")
    }

    pub fn genesis(&self) -> &Arc<Chunk> {
        &self.chunks[0]
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Chunk>> {
        self.chunks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Chunk>> {
        self.chunks.iter()
    }

    /// Mine and append a new chunk carrying `data` on top of the tip.
    pub fn mine_chunk(&mut self, data: impl Into<String>) -> Result<&Arc<Chunk>> {
        let mut chunk = Chunk::child(self.tip(), self.difficulty, data);
        chunk.mine();
        chunk.generate_hash(true)?;
        Ok(self.push(chunk))
    }

    /// Append a chunk mined elsewhere. It must extend the current tip and
    /// pass `is_valid` with a nonce that solves its own puzzle.
    pub fn append(&mut self, chunk: Chunk) -> Result<&Arc<Chunk>> {
        let tip = self.tip();
        let extends_tip = chunk
            .parent_link()
            .is_some_and(|parent| Arc::ptr_eq(parent, tip));
        if !extends_tip {
            warn!(
                "rejected chunk #{}: does not extend tip #{}",
                chunk.index, tip.index
            );
            return Err(ChainError::ParentMismatch {
                expected: tip.index,
                found: chunk.parent().index,
            });
        }

        if !chunk.is_valid() || !chunk.is_valid_pow() {
            warn!("rejected chunk #{}: failed validation", chunk.index);
            return Err(ChainError::InvalidChunk { index: chunk.index });
        }

        Ok(self.push(chunk))
    }

    fn push(&mut self, chunk: Chunk) -> &Arc<Chunk> {
        info!(
            "appended chunk #{} nonce={} hash={}",
            chunk.index,
            chunk.proof_of_work.value(),
            hex::encode(&chunk.hash)
        );
        self.chunks.push(Arc::new(chunk));
        self.tip()
    }

    /// Validate every chunk and every link back to genesis.
    pub fn is_valid_chain(&self) -> bool {
        for (position, chunk) in self.chunks.iter().enumerate() {
            let linked = match (position, chunk.parent_link()) {
                (0, None) => true,
                (0, Some(_)) | (_, None) => false,
                (_, Some(parent)) => Arc::ptr_eq(parent, &self.chunks[position - 1]),
            };

            if !linked || !chunk.is_valid() || !chunk.is_valid_pow() {
                warn!("chain invalid at chunk #{}", chunk.index);
                return false;
            }
        }

        true
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Always false: the genesis chunk is never removed.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn difficulty(&self) -> u64 {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: u64) {
        // Affects future chunks only.
        self.difficulty = difficulty;
    }
}
