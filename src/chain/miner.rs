use crate::error::Result;

/// Proof-of-work capability of a chain record.
///
/// `Chunk` is the only implementer today; the trait is object safe so other
/// puzzle variants can sit behind `&dyn Miner`.
pub trait Miner {
    /// Search nonces from zero until one satisfies the difficulty, store it
    /// and return it. Runs without bound.
    fn mine(&mut self) -> u64;

    fn is_mined(&self) -> bool;

    /// Canonical bytes the content hash is computed over.
    fn encode(&self) -> Result<Vec<u8>>;

    /// Does `nonce` solve this record's puzzle against its parent's nonce?
    fn validate_pow(&self, nonce: u64) -> bool;

    fn is_valid_pow(&self) -> bool;

    /// SHA-256 over `encode()`. With `commit` the digest is also stored.
    fn generate_hash(&mut self, commit: bool) -> Result<Vec<u8>>;

    /// Parent link and self consistency. Only the immediate parent is checked.
    fn is_valid(&self) -> bool;
}
