use std::fmt::Display;

/// Raw digest bytes, as long as the output of the hasher that produced them.
pub type Digest = Vec<u8>;

/// A stateful, resettable hash primitive injected into the trees.
pub trait MerkleHasher {
  fn reset(&mut self);

  fn write(&mut self, data: &[u8]);

  /// Finalize the data written since the last reset.
  fn sum(&mut self) -> Digest;
}

impl MerkleHasher for blake3::Hasher {
  fn reset(&mut self) {
    blake3::Hasher::reset(self);
  }

  fn write(&mut self, data: &[u8]) {
    self.update(data);
  }

  fn sum(&mut self) -> Digest {
    self.finalize().as_bytes().to_vec()
  }
}

impl MerkleHasher for sha2::Sha256 {
  fn reset(&mut self) {
    sha2::Digest::reset(self);
  }

  fn write(&mut self, data: &[u8]) {
    sha2::Digest::update(self, data);
  }

  fn sum(&mut self) -> Digest {
    sha2::Digest::finalize_reset(self).to_vec()
  }
}

impl<H: MerkleHasher + ?Sized> MerkleHasher for Box<H> {
  fn reset(&mut self) {
    (**self).reset()
  }

  fn write(&mut self, data: &[u8]) {
    (**self).write(data)
  }

  fn sum(&mut self) -> Digest {
    (**self).sum()
  }
}

/// Hash of a leaf segment: `H(data)`.
///
/// No leaf/node domain-separation prefix is applied, so leaf and node digests share a space.
pub fn leaf_hash<H: MerkleHasher + ?Sized>(hasher: &mut H, data: &[u8]) -> Digest {
  hasher.reset();
  hasher.write(data);
  hasher.sum()
}

/// Hash of an internal node: `H(left || right)`.
pub fn node_hash<H: MerkleHasher + ?Sized>(hasher: &mut H, left: &[u8], right: &[u8]) -> Digest {
  hasher.reset();
  hasher.write(left);
  hasher.write(right);
  hasher.sum()
}

/// Hash primitives selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HashKind {
  Blake3,
  Sha256,
}

impl HashKind {
  pub fn hasher(&self) -> Box<dyn MerkleHasher> {
    match self {
      HashKind::Blake3 => Box::new(blake3::Hasher::new()),
      HashKind::Sha256 => Box::new(<sha2::Sha256 as sha2::Digest>::new()),
    }
  }

  pub fn output_len(&self) -> usize {
    match self {
      HashKind::Blake3 => blake3::OUT_LEN,
      HashKind::Sha256 => 32,
    }
  }
}

impl Display for HashKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      HashKind::Blake3 => f.write_str("blake3"),
      HashKind::Sha256 => f.write_str("sha256"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn leaf_hash_is_plain_hash() {
    let mut hasher = blake3::Hasher::new();
    assert_eq!(blake3::hash(b"hello").as_bytes().to_vec(), leaf_hash(&mut hasher, b"hello"));

    let mut hasher = <sha2::Sha256 as sha2::Digest>::new();
    let expected = <sha2::Sha256 as sha2::Digest>::digest(b"hello").to_vec();
    assert_eq!(expected, leaf_hash(&mut hasher, b"hello"));
  }

  #[test]
  fn node_hash_is_concatenation() {
    let mut hasher = blake3::Hasher::new();
    let left = [0u8; 32];
    let right = [1u8; 32];
    let mut joined = left.to_vec();
    joined.extend_from_slice(&right);
    assert_eq!(blake3::hash(&joined).as_bytes().to_vec(), node_hash(&mut hasher, &left, &right));

    // order matters
    assert_ne!(node_hash(&mut hasher, &left, &right), node_hash(&mut hasher, &right, &left));
  }

  #[test]
  fn stale_state_is_discarded() {
    for kind in [HashKind::Blake3, HashKind::Sha256] {
      let mut fresh = kind.hasher();
      let expected = leaf_hash(&mut fresh, b"segment");

      let mut dirty = kind.hasher();
      dirty.write(b"left over from an unrelated caller");
      assert_eq!(expected, leaf_hash(&mut dirty, b"segment"), "{kind}");
      assert_eq!(kind.output_len(), expected.len());
    }
  }
}
