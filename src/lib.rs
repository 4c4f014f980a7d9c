//! Streaming Merkle roots and inclusion proofs over a sequence of data segments.
//!
//! Leaves are accepted one at a time without knowing their final count. [`RTree`] keeps only
//! what it needs for the root, [`ProofTree`] additionally tracks one target leaf and can emit
//! its inclusion proof at any point, and [`verify`] checks such a proof on its own.

pub mod error;
pub mod hash;
pub mod hashtree;
pub mod reader;
pub mod verify;

pub use error::{Error, Result};
pub use hash::{Digest, HashKind, MerkleHasher, leaf_hash, node_hash};
pub use hashtree::HashTree;
pub use hashtree::proof::{Proof, ProofTree, legacy_verify};
pub use hashtree::root::RTree;
pub use reader::{build_reader_proof, legacy_build_reader_proof, legacy_reader_root, read_all, reader_root};
pub use verify::verify;

pub fn splitmix64(x: u64) -> u64 {
  let mut z = x.wrapping_add(0x9e3779b97f4a7c15);
  z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
  z ^ (z >> 31)
}
