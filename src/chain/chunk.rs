use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::Miner;
use crate::error::Result;

/// Proof-of-work state of a chunk.
///
/// The numeric value is `0` while unmined, which is also a legitimate
/// solution at difficulty 0. The tag keeps the two apart for `is_mined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProofOfWork {
    #[default]
    Unmined,
    Solved(u64),
}

impl ProofOfWork {
    /// Value fed to the puzzle and written to the canonical record.
    pub fn value(self) -> u64 {
        match self {
            Self::Unmined => 0,
            Self::Solved(nonce) => nonce,
        }
    }

    pub fn is_solved(self) -> bool {
        matches!(self, Self::Solved(_))
    }
}

#[derive(Clone, Default)]
enum Lineage {
    #[default]
    Genesis,
    Child(Arc<Chunk>),
}

impl fmt::Debug for Lineage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lineage::Genesis => f.write_str("Genesis"),
            Lineage::Child(parent) => write!(f, "Child(#{})", parent.index),
        }
    }
}

/// A single linked record in the chain.
#[derive(Debug, Clone)]
pub struct Chunk {
    lineage: Lineage,
    /// Content hash, empty until generated.
    pub hash: Vec<u8>,
    pub index: u64,
    pub proof_of_work: ProofOfWork,
    /// Leading `'0'` hex characters the puzzle digest must have.
    pub difficulty: u64,
    pub data: String,
    pub timestamp: DateTime<Utc>,
}

/// Canonical record. The hash input is this record without `hash`.
#[derive(Serialize)]
struct ChunkRecord<'a> {
    parent_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<String>,
    index: u64,
    pow: u64,
    difficulty: u64,
    data: &'a str,
    timestamp: &'a DateTime<Utc>,
}

impl Chunk {
    /// Create an unmined, unhashed chunk on top of `parent`, or a genesis
    /// chunk when there is none.
    pub fn new(parent: Option<&Arc<Chunk>>, difficulty: u64, data: impl Into<String>) -> Self {
        let (lineage, index) = match parent {
            Some(parent) => (Lineage::Child(Arc::clone(parent)), parent.index + 1),
            None => (Lineage::Genesis, 0),
        };

        Self {
            lineage,
            hash: Vec::new(),
            index,
            proof_of_work: ProofOfWork::Unmined,
            difficulty,
            data: data.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn genesis(difficulty: u64, data: impl Into<String>) -> Self {
        Self::new(None, difficulty, data)
    }

    pub fn child(parent: &Arc<Chunk>, difficulty: u64, data: impl Into<String>) -> Self {
        Self::new(Some(parent), difficulty, data)
    }

    /// Zero-valued stand-in for the parent of a genesis chunk.
    fn virtual_parent() -> Self {
        Self {
            lineage: Lineage::Genesis,
            hash: Vec::new(),
            index: 0,
            proof_of_work: ProofOfWork::Unmined,
            difficulty: 0,
            data: String::new(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self.lineage, Lineage::Genesis)
    }

    /// The real parent, if any.
    pub fn parent_link(&self) -> Option<&Arc<Chunk>> {
        match &self.lineage {
            Lineage::Genesis => None,
            Lineage::Child(parent) => Some(parent),
        }
    }

    /// Always a concrete parent. Genesis chunks get a fresh zero-valued one.
    pub fn parent(&self) -> Cow<'_, Chunk> {
        match &self.lineage {
            Lineage::Genesis => Cow::Owned(Self::virtual_parent()),
            Lineage::Child(parent) => Cow::Borrowed(parent.as_ref()),
        }
    }

    fn record(&self, with_hash: bool) -> ChunkRecord<'_> {
        ChunkRecord {
            parent_hash: hex::encode(&self.parent().hash),
            hash: with_hash.then(|| hex::encode(&self.hash)),
            index: self.index,
            pow: self.proof_of_work.value(),
            difficulty: self.difficulty,
            data: &self.data,
            timestamp: &self.timestamp,
        }
    }

    /// Content hash as it would be generated now, without touching `hash`.
    pub fn compute_hash(&self) -> Result<Vec<u8>> {
        let encoded = self.encode()?;
        Ok(Sha256::digest(&encoded).to_vec())
    }

    fn has_consistent_hash(&self) -> bool {
        match self.compute_hash() {
            Ok(sum) => sum == self.hash,
            Err(err) => {
                warn!("chunk #{} could not be re-hashed: {}", self.index, err);
                false
            }
        }
    }

    /// Like `mine`, but gives up after `max_attempts` nonces. Nothing is
    /// stored when no solution is found.
    pub fn try_mine(&mut self, max_attempts: u64) -> Option<u64> {
        let parent_pow = self.parent().proof_of_work.value();
        let nonce = (0..max_attempts).find(|&n| solves(parent_pow, n, self.difficulty))?;
        Some(self.commit_nonce(nonce))
    }

    fn commit_nonce(&mut self, nonce: u64) -> u64 {
        self.proof_of_work = ProofOfWork::Solved(nonce);
        debug!(
            "mined chunk #{} nonce={} difficulty={}",
            self.index, nonce, self.difficulty
        );
        nonce
    }

    /// `is_valid` for this chunk and every ancestor down to genesis, plus
    /// this chunk's own nonce, which `is_valid` leaves to its children.
    pub fn is_valid_lineage(&self) -> bool {
        if !self.is_valid_pow() {
            return false;
        }

        let mut current = self;
        loop {
            if !current.is_valid() {
                return false;
            }
            match &current.lineage {
                Lineage::Genesis => return true,
                Lineage::Child(parent) => current = parent.as_ref(),
            }
        }
    }

    /// External record, including the chunk's own hash.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for Chunk {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.record(true).serialize(serializer)
    }
}

/// Lowercase hex SHA-256 of the decimal parent nonce followed by the
/// decimal candidate nonce.
fn pow_digest(parent_pow: u64, nonce: u64) -> String {
    let preimage = format!("{parent_pow}{nonce}");
    hex::encode(Sha256::digest(preimage.as_bytes()))
}

/// A difficulty wider than the digest can never be met.
fn meets_difficulty(digest: &str, difficulty: u64) -> bool {
    let Ok(width) = usize::try_from(difficulty) else {
        return false;
    };
    digest.len() >= width && digest.bytes().take(width).all(|b| b == b'0')
}

fn solves(parent_pow: u64, nonce: u64, difficulty: u64) -> bool {
    meets_difficulty(&pow_digest(parent_pow, nonce), difficulty)
}

impl Miner for Chunk {
    fn mine(&mut self) -> u64 {
        let parent_pow = self.parent().proof_of_work.value();
        let mut nonce: u64 = 0;
        while !solves(parent_pow, nonce, self.difficulty) {
            nonce = nonce.wrapping_add(1);
        }

        self.commit_nonce(nonce)
    }

    fn is_mined(&self) -> bool {
        self.proof_of_work.is_solved()
    }

    fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.record(false))?)
    }

    fn validate_pow(&self, nonce: u64) -> bool {
        solves(self.parent().proof_of_work.value(), nonce, self.difficulty)
    }

    fn is_valid_pow(&self) -> bool {
        self.validate_pow(self.proof_of_work.value())
    }

    fn generate_hash(&mut self, commit: bool) -> Result<Vec<u8>> {
        let sum = self.compute_hash()?;
        if commit {
            self.hash = sum.clone();
        }
        Ok(sum)
    }

    fn is_valid(&self) -> bool {
        let linked = match &self.lineage {
            Lineage::Genesis => true,
            Lineage::Child(parent) => {
                parent.index.checked_add(1) == Some(self.index)
                    && parent.is_valid_pow()
                    && parent.has_consistent_hash()
            }
        };

        linked && self.is_mined() && self.has_consistent_hash()
    }
}
