use crate::hash::{Digest, MerkleHasher, leaf_hash, node_hash};

/// Check that `proof_set` leads from its first entry, the leaf segment at `index`, to `root`.
///
/// Bit `i - 1` of `index` tells whether the running sum is the right (1) or the left (0) child
/// at level `i`. The total leaf count is not needed: irregular tree shapes are already folded
/// into the entries of the proof set.
pub fn verify<H: MerkleHasher + ?Sized>(hasher: &mut H, root: &[u8], proof_set: &[Digest], index: u64) -> bool {
  let Some((leaf, siblings)) = proof_set.split_first() else {
    return false;
  };
  // an index pointing past the levels covered by the proof can't be the proven leaf
  if index.checked_shr(siblings.len() as u32).is_some_and(|rest| rest != 0) {
    return false;
  }

  let mut sum = leaf_hash(hasher, leaf);
  for (level, sibling) in siblings.iter().enumerate() {
    let bit = index.checked_shr(level as u32).unwrap_or(0) & 1;
    sum = if bit == 1 { node_hash(hasher, sibling, &sum) } else { node_hash(hasher, &sum, sibling) };
  }
  sum == root
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::hashtree::HashTree;
  use crate::hashtree::proof::ProofTree;

  #[test]
  fn empty_proof_set_is_rejected() {
    let mut hasher = blake3::Hasher::new();
    let root = leaf_hash(&mut hasher, b"x");
    assert!(!verify(&mut hasher, &root, &[], 0));
  }

  #[test]
  fn single_leaf_proof() {
    let mut hasher = blake3::Hasher::new();
    let root = leaf_hash(&mut hasher, b"only");
    assert!(verify(&mut hasher, &root, &[b"only".to_vec()], 0));
    assert!(!verify(&mut hasher, &root, &[b"only".to_vec()], 1));
    assert!(!verify(&mut hasher, &root, &[b"other".to_vec()], 0));
  }

  #[test]
  fn two_leaf_proofs_swap_sides() {
    let mut h = blake3::Hasher::new();
    let l0 = leaf_hash(&mut h, b"zero");
    let l1 = leaf_hash(&mut h, b"one");
    let root = node_hash(&mut h, &l0, &l1);
    assert!(verify(&mut h, &root, &[b"zero".to_vec(), l1.clone()], 0));
    assert!(verify(&mut h, &root, &[b"one".to_vec(), l0.clone()], 1));
    assert!(!verify(&mut h, &root, &[b"zero".to_vec(), l1], 1));
  }

  #[test]
  fn index_beyond_proof_depth_is_rejected() {
    let mut tree = ProofTree::new(blake3::Hasher::new());
    tree.set_target(3).unwrap();
    for i in 0..8u64 {
      tree.push(&i.to_le_bytes());
    }
    let proof = tree.prove().unwrap();
    let mut h = blake3::Hasher::new();
    assert!(verify(&mut h, &proof.root, &proof.proof_set, 3));
    for bit in 3..u64::BITS {
      assert!(!verify(&mut h, &proof.root, &proof.proof_set, 3 | (1 << bit)), "bit {bit}");
    }
  }
}
