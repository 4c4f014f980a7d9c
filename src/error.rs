use thiserror::Error;

/// Errors raised while building or reading a streaming hash tree.
#[derive(Error, Debug)]
pub enum Error {
  /// The tree was used out of order, e.g. a proof target fixed after leaves were pushed.
  #[error("invalid state: {0}")]
  InvalidState(String),

  /// The proof target has not been pushed yet.
  #[error("proof incomplete: target leaf {target} not reached after {leaves} leaves")]
  IncompleteProof { target: u64, leaves: u64 },

  /// The underlying stream failed with something other than end-of-stream.
  #[error("stream read failed: {0}")]
  StreamRead(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
