use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generate a document seed from its storage key using CRC32
pub fn get_document_seed(key: &str) -> String {
    let mut buff = String::from(key);
    if !key.starts_with("page://") {
        buff = format!("page://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Opaque block identifier, unique within one document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sequence number of an id minted by a generator with the given seed
    fn sequence_for_seed(&self, seed: &str) -> Option<u64> {
        self.0
            .strip_prefix(seed)
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|n| n.parse().ok())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Sequential block id generator for one document.
///
/// The counter is never rewound: ids handed out before an undo are not
/// handed out again.
#[derive(Debug, Clone)]
pub struct BlockIdGenerator {
    seed: String, // Document seed (CRC32)
    count: u64,   // Sequential counter
}

impl BlockIdGenerator {
    pub fn new(document_key: &str) -> Self {
        Self {
            seed: get_document_seed(document_key),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> BlockId {
        self.count += 1;
        BlockId(format!("{}-{}", self.seed, self.count))
    }

    /// Move the counter past every id already present in a loaded document
    pub fn resume_after<'a>(&mut self, existing: impl IntoIterator<Item = &'a BlockId>) {
        for id in existing {
            if let Some(n) = id.sequence_for_seed(&self.seed) {
                self.count = self.count.max(n);
            }
        }
    }

    /// Get document seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}
