use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::hash::{Digest, MerkleHasher, leaf_hash, node_hash};
use crate::hashtree::{HashTree, SubTree};
use crate::verify::verify;

mod legacy;

pub use legacy::legacy_verify;

/// Inclusion proof of one leaf, taken over the leaves pushed at the time it was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
  pub root: Digest,
  /// The target leaf's segment followed by one sibling digest per level, lowest first.
  pub proof_set: Vec<Digest>,
  pub index: u64,
  pub leaves: u64,
}

impl Proof {
  pub fn verify<H: MerkleHasher + ?Sized>(&self, hasher: &mut H) -> bool {
    verify(hasher, &self.root, &self.proof_set, self.index)
  }
}

/// Streaming Merkle tree that can track one target leaf and emit its inclusion proof.
///
/// Pending subtrees are kept as a stack whose heights strictly decrease towards the top, so
/// pushing a leaf behaves like incrementing a binary counter: equal heights at the top carry
/// into one subtree of the next height. Root and proof queries fold a copy of that stack,
/// which leaves the tree ready to accept further leaves.
pub struct ProofTree<H: MerkleHasher> {
  hasher: H,
  subtrees: Vec<SubTree>,
  current_index: u64,
  target: Option<u64>,
  proof_set: Vec<Digest>,
}

impl<H: MerkleHasher> ProofTree<H> {
  pub fn new(hasher: H) -> Self {
    ProofTree { hasher, subtrees: Vec::new(), current_index: 0, target: None, proof_set: Vec::new() }
  }

  /// Fix the leaf whose inclusion proof is accumulated. Only allowed once, before any push.
  pub fn set_target(&mut self, index: u64) -> Result<()> {
    if self.current_index > 0 {
      return Err(Error::InvalidState(format!("cannot set proof target after {} leaves were pushed", self.current_index)));
    }
    if let Some(target) = self.target {
      return Err(Error::InvalidState(format!("proof target already set to {target}")));
    }
    debug!(target_index = index, "proof target fixed");
    self.target = Some(index);
    Ok(())
  }

  pub fn target(&self) -> Option<u64> {
    self.target
  }

  /// Build the inclusion proof of the target leaf over all leaves pushed so far.
  pub fn prove(&mut self) -> Result<Proof> {
    let target = self.target.ok_or_else(|| Error::InvalidState("no proof target was set".to_string()))?;
    let incomplete = Error::IncompleteProof { target, leaves: self.current_index };
    if self.proof_set.is_empty() {
      return Err(incomplete);
    }
    let mut proof_set = self.proof_set.clone();
    let root = self.collapse(&mut proof_set).ok_or(incomplete)?;
    debug!(target_index = target, leaves = self.current_index, levels = proof_set.len() - 1, "proof built");
    Ok(Proof { root, proof_set, index: target, leaves: self.current_index })
  }

  /// Merge the two topmost subtrees while their heights match.
  fn join_all_subtrees(&mut self) {
    while let [.., left, right] = &self.subtrees[..] {
      if left.height != right.height {
        break;
      }
      let height = right.height;
      if let Some(target) = self.target
        && self.proof_set.len() == height as usize + 1
      {
        // first leaf of the right half
        let mid = (self.current_index >> height) << height;
        let sibling = if target < mid { right.sum.clone() } else { left.sum.clone() };
        trace!(height, target_index = target, "proof sibling captured");
        self.proof_set.push(sibling);
      }
      let sum = node_hash(&mut self.hasher, &left.sum, &right.sum);
      self.subtrees.truncate(self.subtrees.len() - 2);
      self.subtrees.push(SubTree { height: height + 1, sum });
    }
  }

  /// Fold copies of the pending subtrees into a root, smallest first, completing `proof_set`
  /// with the siblings still owed above the target's complete subtree.
  fn collapse(&mut self, proof_set: &mut Vec<Digest>) -> Option<Digest> {
    let ProofTree { hasher, subtrees, current_index, target, .. } = self;
    let (head, rest) = subtrees.split_last()?;
    let mut current = head.clone();
    for left in rest.iter().rev() {
      current = join_and_fill(hasher, left, current, proof_set, *target, *current_index);
    }
    Some(current.sum)
  }
}

/// Join `left` with a virtual copy of the smaller `right`, padding `right` by self-combination
/// until both heights are equal.
fn join_and_fill<H: MerkleHasher>(
  hasher: &mut H,
  left: &SubTree,
  mut right: SubTree,
  proof_set: &mut Vec<Digest>,
  target: Option<u64>,
  leaves: u64,
) -> SubTree {
  while right.height < left.height {
    if proof_set.len() == right.height as usize + 1 {
      proof_set.push(right.sum.clone());
    }
    right.sum = node_hash(hasher, &right.sum, &right.sum);
    right.height += 1;
  }
  if let Some(target) = target
    && proof_set.len() == right.height as usize + 1
  {
    let mid = (leaves >> right.height) << right.height;
    proof_set.push(if target < mid { right.sum.clone() } else { left.sum.clone() });
  }
  SubTree { height: left.height + 1, sum: node_hash(hasher, &left.sum, &right.sum) }
}

impl<H: MerkleHasher> HashTree for ProofTree<H> {
  fn push(&mut self, data: &[u8]) {
    if self.target == Some(self.current_index) {
      self.proof_set.push(data.to_vec());
    }
    let sum = leaf_hash(&mut self.hasher, data);
    self.subtrees.push(SubTree { height: 0, sum });
    self.join_all_subtrees();
    self.current_index += 1;
  }

  fn size(&self) -> u64 {
    self.current_index
  }

  fn root(&mut self) -> Option<Digest> {
    self.collapse(&mut Vec::new())
  }
}
