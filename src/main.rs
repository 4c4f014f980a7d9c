use byteorder::{LittleEndian, WriteBytesExt};
use chrono::Local;
use clap::Parser;
use merkle_stream::{HashKind, HashTree, MerkleHasher, ProofTree, RTree, reader_root, splitmix64};
use std::error::Error;
use std::fs::create_dir_all;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::Builder;
use tracing_subscriber::EnvFilter;

mod stat;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "merkle-bench")]
#[command(author, version, about = "Measure streaming Merkle root and proof construction against the number of leaves")]
struct Args {
  /// Output directory for benchmark results and working temporary files
  #[arg(index = 1, default_value = ".")]
  dir: PathBuf,

  /// Largest number of leaves to push
  #[arg(short = 'n', long, default_value_t = 1024 * 1024)]
  max_n: u64,

  /// Number of measuring points between 0 and max-n
  #[arg(long, default_value_t = 8)]
  division: u64,

  /// Trials per measuring point
  #[arg(short, long, default_value_t = 10)]
  trials: usize,

  /// Bytes per leaf segment
  #[arg(long, default_value_t = 32)]
  segment_size: usize,

  #[arg(long, value_enum, default_value_t = HashKind::Blake3)]
  hash: HashKind,

  #[arg(short, long, default_value_t = Local::now().format("%Y%m%d%H%M%S").to_string())]
  session: String,
}

struct Experiment<'a> {
  args: &'a Args,
  name: &'static str,
}

impl Experiment<'_> {
  fn points(&self) -> impl Iterator<Item = u64> {
    let step = (self.args.max_n / self.args.division.max(1)).max(1);
    (0..=self.args.max_n).step_by(step as usize)
  }

  /// Run `f` for every measuring point and trial, then save the report as CSV.
  fn run<F: FnMut(u64) -> Result<Duration>>(&self, mut f: F) -> Result<()> {
    println!("[{}::{}]", self.name, self.args.hash);
    let mut report = stat::Report::new();
    for n in self.points() {
      for _ in 0..self.args.trials {
        report.add(n, f(n)?);
      }
      println!("  n={n}: {}", report.single(n));
    }
    let path = self.args.dir.join(format!("{}-{}-{}.csv", self.args.session, self.name, self.args.hash));
    report.save_to_csv(&path)?;
    println!("==> {}", path.to_string_lossy());
    Ok(())
  }
}

fn main() -> Result<()> {
  tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
  let args = Args::parse();

  create_dir_all(&args.dir)?;
  println!("Working directory: {:?}", &args.dir);

  Experiment { args: &args, name: "rtree-push" }.run(|n| {
    let mut tree = RTree::new(args.hash.hasher());
    push_all(&mut tree, n, args.segment_size)
  })?;

  Experiment { args: &args, name: "prooftree-push" }.run(|n| {
    let mut tree = ProofTree::new(args.hash.hasher());
    tree.set_target(n / 2)?;
    push_all(&mut tree, n, args.segment_size)
  })?;

  Experiment { args: &args, name: "prooftree-prove" }.run(|n| {
    let mut tree = ProofTree::new(args.hash.hasher());
    tree.set_target(n.saturating_sub(1) / 3)?;
    push_all(&mut tree, n.max(1), args.segment_size)?;
    let start = Instant::now();
    let proof = tree.prove()?;
    let elapsed = start.elapsed();
    assert!(proof.verify(&mut args.hash.hasher()));
    Ok(elapsed)
  })?;

  Experiment { args: &args, name: "reader-root" }.run(|n| stream_root(&args.dir, n, args.segment_size, args.hash))?;

  Ok(())
}

/// Leaf `i`: little-endian splitmix64 words cut to `segment_size` bytes.
fn segment(i: u64, segment_size: usize) -> std::io::Result<Vec<u8>> {
  let words = segment_size.div_ceil(8) as u64;
  let mut data = Vec::with_capacity(words as usize * 8);
  for k in 0..words {
    data.write_u64::<LittleEndian>(splitmix64(i.wrapping_mul(words).wrapping_add(k)))?;
  }
  data.truncate(segment_size);
  Ok(data)
}

#[inline(never)]
fn push_all<T: HashTree>(tree: &mut T, n: u64, segment_size: usize) -> Result<Duration> {
  let segments = (0..n).map(|i| segment(i, segment_size)).collect::<std::io::Result<Vec<_>>>()?;
  let start = Instant::now();
  for data in segments.iter() {
    tree.push(data);
  }
  Ok(start.elapsed())
}

/// Time `reader_root` over a temporary file holding `n` segments.
fn stream_root(dir: &Path, n: u64, segment_size: usize, hash: HashKind) -> Result<Duration> {
  let mut tf = Builder::new().prefix(".tmp-merkle-stream").suffix(".dat").tempfile_in(dir)?;
  {
    let mut writer = BufWriter::new(tf.as_file_mut());
    for i in 0..n {
      writer.write_all(&segment(i, segment_size)?)?;
    }
    writer.flush()?;
  }
  tf.seek(SeekFrom::Start(0))?;

  let hasher: Box<dyn MerkleHasher> = hash.hasher();
  let start = Instant::now();
  let root = reader_root(tf.as_file_mut(), hasher, segment_size)?;
  let elapsed = start.elapsed();
  assert_eq!(n == 0, root.is_none());
  Ok(elapsed)
}
