//! Error taxonomy for the processing engine.
//!
//! Input problems, out-of-range queries, and background-job failures are
//! distinct types so callers can match on what actually went wrong.
//! Degenerate tracer stops (empty/isotropic voxels) are not errors; the
//! tracer handles them as ordinary termination.

use glam::{IVec3, UVec3};
use thiserror::Error;

/// Failure while reading or decoding the input tensor dataset.
#[derive(Debug, Error)]
pub enum InputError {
  #[error("failed to read tensor file: {0}")]
  Io(#[from] std::io::Error),

  #[error("not an NPY file (bad magic)")]
  BadMagic,

  #[error("unsupported NPY version {0}.{1}")]
  UnsupportedVersion(u8, u8),

  #[error("malformed NPY header: {0}")]
  BadHeader(String),

  #[error("unsupported dtype {0:?}, expected little-endian int64 ('<i8')")]
  UnsupportedDtype(String),

  #[error("fortran-order arrays are not supported")]
  FortranOrder,

  #[error("tensor array must be (x, y, z, 9) with positive extents, got shape {0:?}")]
  BadShape(Vec<usize>),

  #[error("payload truncated: expected {expected} bytes, found {actual}")]
  Truncated { expected: usize, actual: usize },
}

/// Out-of-range field query. Raw field access never clamps.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("coordinate {coor} outside field extents {dims}")]
pub struct FieldError {
  pub coor: IVec3,
  pub dims: UVec3,
}

/// Failure of a background job, reported through its status channel.
#[derive(Debug, Error)]
pub enum JobError {
  #[error(transparent)]
  Input(#[from] InputError),

  #[error("job was cancelled")]
  Cancelled,

  #[error("background worker stopped without reporting a result")]
  WorkerLost,
}

/// Field access was attempted before the owning load job completed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("tensor field is not loaded yet")]
pub struct NotReady;
