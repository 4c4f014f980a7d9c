use crate::hash::{Digest, MerkleHasher, leaf_hash, node_hash};
use crate::hashtree::HashTree;

/// Root-only accumulator.
///
/// Keeps one optional digest per height, like the digits of a binary counter over the number
/// of leaves pushed. Memory stays at `log2(n)` digests and no inclusion proof can be produced.
pub struct RTree<H: MerkleHasher> {
  hasher: H,
  slots: Vec<Option<Digest>>,
  size: u64,
}

impl<H: MerkleHasher> RTree<H> {
  pub fn new(hasher: H) -> Self {
    RTree { hasher, slots: Vec::with_capacity(1), size: 0 }
  }

  /// Number of digests currently held.
  pub fn occupied(&self) -> usize {
    self.slots.iter().filter(|slot| slot.is_some()).count()
  }
}

impl<H: MerkleHasher> HashTree for RTree<H> {
  fn push(&mut self, data: &[u8]) {
    self.size += 1;
    let mut sum = leaf_hash(&mut self.hasher, data);
    for slot in self.slots.iter_mut() {
      match slot.take() {
        Some(left) => sum = node_hash(&mut self.hasher, &left, &sum),
        None => {
          *slot = Some(sum);
          return;
        }
      }
    }
    self.slots.push(Some(sum));
  }

  fn size(&self) -> u64 {
    self.size
  }

  fn root(&mut self) -> Option<Digest> {
    let top = self.slots.iter().rposition(Option::is_some)?;
    let mut root: Option<Digest> = None;
    for (height, slot) in self.slots[..=top].iter().enumerate() {
      root = match (slot, root) {
        (Some(sum), Some(acc)) => Some(node_hash(&mut self.hasher, sum, &acc)),
        // the lowest pending subtree pairs with its own virtual padding
        (Some(sum), None) if height < top => Some(node_hash(&mut self.hasher, sum, sum)),
        (Some(sum), None) => Some(sum.clone()),
        (None, Some(acc)) => Some(node_hash(&mut self.hasher, &acc, &acc)),
        (None, None) => None,
      };
    }
    root
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::splitmix64;

  fn leaf(i: u64) -> [u8; 8] {
    splitmix64(i).to_le_bytes()
  }

  #[test]
  fn empty_tree_has_no_root() {
    let mut tree = RTree::new(blake3::Hasher::new());
    assert_eq!(None, tree.root());
    assert_eq!(0, tree.size());
  }

  #[test]
  fn single_leaf_root_is_leaf_hash() {
    let mut tree = RTree::new(blake3::Hasher::new());
    tree.push(&leaf(0));
    assert_eq!(Some(blake3::hash(&leaf(0)).as_bytes().to_vec()), tree.root());
  }

  #[test]
  fn three_leaves_pad_the_last_one() {
    let mut h = blake3::Hasher::new();
    let l0 = leaf_hash(&mut h, &leaf(0));
    let l1 = leaf_hash(&mut h, &leaf(1));
    let l2 = leaf_hash(&mut h, &leaf(2));
    let left = node_hash(&mut h, &l0, &l1);
    let right = node_hash(&mut h, &l2, &l2);
    let expected = node_hash(&mut h, &left, &right);

    let mut tree = RTree::new(blake3::Hasher::new());
    for i in 0..3 {
      tree.push(&leaf(i));
    }
    assert_eq!(Some(expected), tree.root());
  }

  #[test]
  fn slots_follow_binary_counter() {
    let mut tree = RTree::new(blake3::Hasher::new());
    for i in 0..1000u64 {
      tree.push(&leaf(i));
      assert_eq!((i + 1).count_ones() as usize, tree.occupied(), "after {} leaves", i + 1);
    }
  }

  #[test]
  fn root_query_does_not_disturb_pushes() {
    let mut queried = RTree::new(blake3::Hasher::new());
    let mut plain = RTree::new(blake3::Hasher::new());
    for i in 0..37 {
      queried.push(&leaf(i));
      plain.push(&leaf(i));
      queried.root();
    }
    assert_eq!(plain.root(), queried.root());
  }
}
