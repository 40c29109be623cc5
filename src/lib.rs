//! Minimal proof-of-work chain.
//!
//! Each [`Chunk`] links to its parent. Its nonce solves a puzzle seeded by the
//! parent's nonce, and its content hash commits to the parent's hash.
//!
//! ```
//! use std::sync::Arc;
//! use chunk_chain::{Chunk, Miner};
//!
//! let mut genesis = Chunk::genesis(1, "a");
//! genesis.mine();
//! genesis.generate_hash(true).unwrap();
//! let genesis = Arc::new(genesis);
//!
//! let mut child = Chunk::child(&genesis, 1, "b");
//! child.mine();
//! child.generate_hash(true).unwrap();
//! assert!(child.is_valid());
//! ```

pub mod chain;
pub mod config;
pub mod error;

pub use chain::{Chain, Chunk, DEFAULT_DIFFICULTY, Miner, ProofOfWork};
pub use config::ChainConfig;
pub use error::{ChainError, Result};
