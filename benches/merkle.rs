use std::io::Cursor;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use merkle_stream::{HashTree, ProofTree, RTree, reader_root, splitmix64, verify};

const LEAVES: u64 = 4096;

fn leaves() -> Vec<[u8; 8]> {
  (0..LEAVES).map(|i| splitmix64(i).to_le_bytes()).collect()
}

fn bench_push(c: &mut Criterion) {
  let data = leaves();
  c.bench_function("rtree push 4096", |b| {
    b.iter(|| {
      let mut tree = RTree::new(blake3::Hasher::new());
      for leaf in data.iter() {
        tree.push(leaf);
      }
      tree.root()
    })
  });
  c.bench_function("prooftree push 4096", |b| {
    b.iter(|| {
      let mut tree = ProofTree::new(blake3::Hasher::new());
      tree.set_target(LEAVES / 3).unwrap();
      for leaf in data.iter() {
        tree.push(leaf);
      }
      tree.prove().unwrap()
    })
  });
}

fn bench_query(c: &mut Criterion) {
  let data = leaves();
  let mut tree = ProofTree::new(blake3::Hasher::new());
  tree.set_target(7).unwrap();
  for leaf in data.iter().take(LEAVES as usize - 1) {
    tree.push(leaf);
  }
  c.bench_function("prooftree root 4095", |b| b.iter(|| tree.root()));
  c.bench_function("prooftree prove 4095", |b| b.iter(|| tree.prove().unwrap()));

  let proof = tree.prove().unwrap();
  let mut hasher = blake3::Hasher::new();
  c.bench_function("verify 4095", |b| b.iter(|| verify(&mut hasher, &proof.root, &proof.proof_set, proof.index)));
}

fn bench_reader(c: &mut Criterion) {
  let stream = leaves().concat();
  c.bench_function("reader root 32KiB", |b| {
    b.iter_batched(|| Cursor::new(stream.clone()), |r| reader_root(r, blake3::Hasher::new(), 32).unwrap(), BatchSize::SmallInput)
  });
}

criterion_group!(benches, bench_push, bench_query, bench_reader);
criterion_main!(benches);
