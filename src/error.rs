// Unified error type for the pixelrot library.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SortError {
  /// A sort or exclude identifier the engine does not recognize.
  /// This aborts the render before any output is produced.
  #[error("Unknown algorithm: {name}")]
  UnknownAlgorithm { name: String },

  #[error("Invalid frame dimensions: {width}x{height}")]
  InvalidDimensions { width: u32, height: u32 },

  #[error("Frame buffer length mismatch: expected {expected} bytes, got {actual}")]
  BufferSize { expected: usize, actual: usize },

  /// The caller canceled an in-flight render job.
  #[error("Canceled")]
  Canceled,

  #[error("Invalid render parameters: {0}")]
  Config(#[from] serde_json::Error),
}
