pub mod chunk;
pub mod miner;
pub mod model;

pub use chunk::{Chunk, ProofOfWork};
pub use miner::Miner;
pub use model::Chain;

/// Default Proof-of-Work difficulty (number of leading zero hex characters).
pub const DEFAULT_DIFFICULTY: u64 = 3;

/// Payload of the genesis chunk when none is configured.
pub const DEFAULT_GENESIS_DATA: &str = "genesis";
