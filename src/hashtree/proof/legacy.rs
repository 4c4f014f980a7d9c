//! Single-use root and proof construction that consumes the pending subtrees.
//!
//! Kept as an independent cross-check of the streaming builder: the fold here walks the stack
//! in three explicit phases instead of tracking owed proof heights, and the matching verifier
//! rebuilds the tree shape from the leaf count.

use crate::error::{Error, Result};
use crate::hash::{Digest, MerkleHasher, leaf_hash, node_hash};
use crate::hashtree::SubTree;

use super::{Proof, ProofTree};

impl<H: MerkleHasher> ProofTree<H> {
  /// Root over all leaves pushed, consuming the tree.
  pub fn legacy_root(self) -> Option<Digest> {
    let ProofTree { mut hasher, mut subtrees, .. } = self;
    let mut current = subtrees.pop()?;
    while let Some(left) = subtrees.pop() {
      let right = pad(&mut hasher, current, left.height);
      current = join(&mut hasher, left, right);
    }
    Some(current.sum)
  }

  /// Inclusion proof of the target leaf over all leaves pushed, consuming the tree.
  pub fn legacy_prove(self) -> Result<Proof> {
    let ProofTree { mut hasher, mut subtrees, current_index, target, mut proof_set } = self;
    let target = target.ok_or_else(|| Error::InvalidState("no proof target was set".to_string()))?;
    let incomplete = || Error::IncompleteProof { target, leaves: current_index };
    if proof_set.is_empty() {
      return Err(incomplete());
    }

    // The complete subtree holding the target has not merged any further, so it is the one
    // pending subtree whose height equals the number of siblings collected so far.
    let anchor = (proof_set.len() - 1) as u32;

    // Everything pushed after that subtree folds into one aggregate to its right.
    let mut aggregate: Option<SubTree> = None;
    let mut current = loop {
      let subtree = subtrees.pop().ok_or_else(incomplete)?;
      if subtree.height == anchor {
        break subtree;
      }
      aggregate = Some(match aggregate {
        None => subtree,
        Some(right) => {
          let right = pad(&mut hasher, right, subtree.height);
          join(&mut hasher, subtree, right)
        }
      });
    };
    if let Some(right) = aggregate {
      let right = pad(&mut hasher, right, anchor);
      proof_set.push(right.sum.clone());
      current = join(&mut hasher, current, right);
    }

    // Everything pushed before it is a left sibling; the target side pads itself up to each.
    while let Some(left) = subtrees.pop() {
      while current.height < left.height {
        proof_set.push(current.sum.clone());
        let height = current.height + 1;
        current = pad(&mut hasher, current, height);
      }
      proof_set.push(left.sum.clone());
      current = join(&mut hasher, left, current);
    }

    Ok(Proof { root: current.sum, proof_set, index: target, leaves: current_index })
  }
}

fn pad<H: MerkleHasher>(hasher: &mut H, mut subtree: SubTree, height: u32) -> SubTree {
  while subtree.height < height {
    subtree.sum = node_hash(hasher, &subtree.sum, &subtree.sum);
    subtree.height += 1;
  }
  subtree
}

fn join<H: MerkleHasher>(hasher: &mut H, left: SubTree, right: SubTree) -> SubTree {
  debug_assert_eq!(left.height, right.height);
  SubTree { height: left.height + 1, sum: node_hash(hasher, &left.sum, &right.sum) }
}

/// Verify a proof against the shape of a tree of `leaves` leaves.
///
/// At every level the node count is halved rounding up; a level with an odd count pairs its
/// last node with itself, so the proof entry for that position must repeat the running sum.
pub fn legacy_verify<H: MerkleHasher + ?Sized>(
  hasher: &mut H,
  root: &[u8],
  proof_set: &[Digest],
  index: u64,
  leaves: u64,
) -> bool {
  let Some((leaf, siblings)) = proof_set.split_first() else {
    return false;
  };
  if index >= leaves {
    return false;
  }

  let mut sum = leaf_hash(hasher, leaf);
  let mut siblings = siblings.iter();
  let mut position = index;
  let mut width = leaves;
  while width > 1 {
    let Some(sibling) = siblings.next() else {
      return false;
    };
    sum = if position % 2 == 1 {
      node_hash(hasher, sibling, &sum)
    } else if position + 1 == width {
      if *sibling != sum {
        return false;
      }
      node_hash(hasher, &sum, &sum)
    } else {
      node_hash(hasher, &sum, sibling)
    };
    position /= 2;
    width = width.div_ceil(2);
  }
  siblings.next().is_none() && sum == root
}
