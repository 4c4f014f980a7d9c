use std::io::Read;

use crate::error::Result;
use crate::hash::Digest;

pub mod proof;
pub mod root;

/// Core streaming hash tree abstraction
pub trait HashTree {
  /// Append the next leaf segment to the tree
  fn push(&mut self, data: &[u8]);

  /// Get the current size (number of leaves pushed so far)
  fn size(&self) -> u64;

  /// Get the root over the leaves pushed so far, or `None` if the tree is empty
  fn root(&mut self) -> Option<Digest>;

  /// Push every `segment_size` bytes of the stream as a leaf
  fn read_all<R: Read>(&mut self, reader: R, segment_size: usize) -> Result<u64>
  where
    Self: Sized,
  {
    crate::reader::read_all(self, reader, segment_size)
  }
}

/// Root hash of a complete binary subtree spanning `2^height` contiguous leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubTree {
  pub height: u32,
  pub sum: Digest,
}
