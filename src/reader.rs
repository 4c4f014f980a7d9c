use std::io::{ErrorKind, Read};

use tracing::debug;

use crate::error::{Error, Result};
use crate::hash::{Digest, MerkleHasher};
use crate::hashtree::HashTree;
use crate::hashtree::proof::{Proof, ProofTree};
use crate::hashtree::root::RTree;

/// Push the stream into `tree` as `segment_size`-byte leaves and return how many were pushed.
///
/// A final segment shorter than `segment_size` becomes the last leaf; an empty stream pushes
/// nothing.
pub fn read_all<T: HashTree + ?Sized, R: Read>(tree: &mut T, mut reader: R, segment_size: usize) -> Result<u64> {
  if segment_size == 0 {
    return Err(Error::InvalidState("segment size must be positive".to_string()));
  }
  let mut segment = vec![0u8; segment_size];
  let mut count = 0u64;
  loop {
    let len = read_segment(&mut reader, &mut segment)?;
    if len == 0 {
      break;
    }
    tree.push(&segment[..len]);
    count += 1;
    if len < segment_size {
      break;
    }
  }
  debug!(segments = count, segment_size, "stream consumed");
  Ok(count)
}

/// Fill `buffer` unless the stream ends first.
fn read_segment<R: Read>(reader: &mut R, buffer: &mut [u8]) -> std::io::Result<usize> {
  let mut filled = 0;
  while filled < buffer.len() {
    match reader.read(&mut buffer[filled..]) {
      Ok(0) => break,
      Ok(len) => filled += len,
      Err(e) if e.kind() == ErrorKind::Interrupted => (),
      Err(e) => return Err(e),
    }
  }
  Ok(filled)
}

/// Root over the stream split into `segment_size`-byte leaves; `None` for an empty stream.
pub fn reader_root<R: Read, H: MerkleHasher>(reader: R, hasher: H, segment_size: usize) -> Result<Option<Digest>> {
  let mut tree = RTree::new(hasher);
  tree.read_all(reader, segment_size)?;
  Ok(tree.root())
}

/// Inclusion proof of leaf `index` of the stream split into `segment_size`-byte leaves.
pub fn build_reader_proof<R: Read, H: MerkleHasher>(
  reader: R,
  hasher: H,
  segment_size: usize,
  index: u64,
) -> Result<Proof> {
  let mut tree = ProofTree::new(hasher);
  tree.set_target(index)?;
  tree.read_all(reader, segment_size)?;
  tree.prove()
}

pub fn legacy_reader_root<R: Read, H: MerkleHasher>(reader: R, hasher: H, segment_size: usize) -> Result<Option<Digest>> {
  let mut tree = ProofTree::new(hasher);
  tree.read_all(reader, segment_size)?;
  Ok(tree.legacy_root())
}

pub fn legacy_build_reader_proof<R: Read, H: MerkleHasher>(
  reader: R,
  hasher: H,
  segment_size: usize,
  index: u64,
) -> Result<Proof> {
  let mut tree = ProofTree::new(hasher);
  tree.set_target(index)?;
  tree.read_all(reader, segment_size)?;
  tree.legacy_prove()
}
