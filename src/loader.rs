//! Background tensor field loading.
//!
//! `TensorFieldLoader` wraps the whole decode (NPY parse, fixed-point
//! rescale, magnitude derivation) in an [`AsyncJob`] so the polling thread
//! never blocks on I/O. Field access is gated on job completion: there is
//! no partial-field read, and a consumer polling too early gets a typed
//! [`NotReady`] error instead of stale data.

use std::path::{Path, PathBuf};

use glam::{IVec3, UVec3};
use rayon::prelude::*;
use tracing::{debug, info, info_span};
use web_time::Instant;

use crate::error::{FieldError, InputError, JobError, NotReady};
use crate::field::{magnitude_of, MagnitudeField, TensorField, TENSOR_COMPONENTS};
use crate::job::{AsyncJob, CancelFlag, JobStatus};
use crate::npy;

/// Fixed-point scale of the stored integers: `raw = true_value * 10^15`.
/// The upstream exporter stores int64 because its writer has no float
/// support; decoding divides back out in f32.
pub const MAGNIFICATION: f32 = 1.0e15;

/// Result of a completed load: the tensor field plus its derived magnitude
/// field, always with identical extents.
pub struct LoadedVolume {
  pub tensors: TensorField,
  pub magnitude: MagnitudeField,
}

impl LoadedVolume {
  /// Tensor and magnitude of a single voxel.
  pub fn probe(&self, coor: IVec3) -> Result<(&[f32; TENSOR_COMPONENTS], f32), FieldError> {
    Ok((self.tensors.get(coor)?, self.magnitude.get(coor)?))
  }
}

/// Poll-driven loader. Exactly one volume is live per loader instance;
/// [`restart`](Self::restart) supersedes an in-flight load explicitly
/// (cancel-and-replace) rather than letting two workers race.
pub struct TensorFieldLoader {
  job: AsyncJob<LoadedVolume>,
}

impl TensorFieldLoader {
  /// Begin loading `path` on a dedicated worker thread.
  pub fn start(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    let mut job = AsyncJob::new("loading tensor field", move |cancel| {
      decode_volume(&path, &cancel)
    });
    job.start();
    Self { job }
  }

  /// Non-blocking status check; call once per tick from the polling thread.
  pub fn poll(&mut self) -> &JobStatus {
    self.job.poll()
  }

  /// Last observed status without re-polling.
  pub fn status(&self) -> &JobStatus {
    self.job.status()
  }

  /// True once the volume is fully decoded.
  pub fn is_completed(&mut self) -> bool {
    self.job.is_completed()
  }

  /// Progress label of the underlying job.
  pub fn description(&self) -> &str {
    self.job.description()
  }

  /// Request cooperative cancellation; the worker checks between x-slabs.
  pub fn abort(&self) {
    self.job.abort();
  }

  /// Cancel the in-flight load (if any) and start a fresh one.
  pub fn restart(&mut self, path: impl Into<PathBuf>) {
    self.job.abort();
    debug!("superseding in-flight tensor field load");
    *self = Self::start(path);
  }

  /// The loaded fields. Fails fast with [`NotReady`] until the job has
  /// been observed `Completed`, and again after the volume was moved out
  /// with [`take_volume`](Self::take_volume).
  pub fn volume(&self) -> Result<&LoadedVolume, NotReady> {
    self.job.result().ok_or(NotReady)
  }

  /// Take ownership of the loaded fields, leaving the loader empty.
  ///
  /// This succeeds at most once: afterwards [`volume`](Self::volume) and
  /// further calls here report [`NotReady`] even though the job status
  /// remains `Completed` — the loader no longer holds the fields.
  pub fn take_volume(&mut self) -> Result<LoadedVolume, NotReady> {
    self.job.take_result().ok_or(NotReady)
  }
}

/// Decode one NPY tensor dataset into a `LoadedVolume`.
///
/// Runs on the worker thread. Decode and magnitude derivation happen in a
/// single fused pass, parallelized per x-slab; the cancel flag is checked
/// once per slab.
fn decode_volume(path: &Path, cancel: &CancelFlag) -> Result<LoadedVolume, JobError> {
  let started = Instant::now();
  debug!(path = %path.display(), "reading tensor dataset");

  let raw = npy::read_file(path).map_err(JobError::Input)?;
  let (nx, ny, nz) = validate_shape(&raw.shape)?;
  let slab = ny * nz;

  let span = info_span!("decode_volume");
  let _enter = span.enter();

  let mut tensors = vec![[0.0f32; TENSOR_COMPONENTS]; nx * ny * nz];
  let mut magnitudes = vec![0.0f32; nx * ny * nz];

  tensors
    .par_chunks_mut(slab)
    .zip(magnitudes.par_chunks_mut(slab))
    .enumerate()
    .try_for_each(|(x, (tensor_slab, mag_slab))| {
      if cancel.is_cancelled() {
        return Err(JobError::Cancelled);
      }
      let base = x * slab * TENSOR_COMPONENTS;
      for (i, (cell, mag)) in tensor_slab.iter_mut().zip(mag_slab.iter_mut()).enumerate() {
        let raw_cell = &raw.data[base + i * TENSOR_COMPONENTS..base + (i + 1) * TENSOR_COMPONENTS];
        for (out, &value) in cell.iter_mut().zip(raw_cell) {
          *out = value as f32 / MAGNIFICATION;
        }
        *mag = magnitude_of(cell);
      }
      Ok(())
    })?;

  let dims = UVec3::new(nx as u32, ny as u32, nz as u32);
  info!(
    x = nx,
    y = ny,
    z = nz,
    elapsed_ms = started.elapsed().as_millis() as u64,
    "tensor field loaded"
  );

  Ok(LoadedVolume {
    tensors: TensorField::from_cells(dims, tensors),
    magnitude: MagnitudeField::from_cells(dims, magnitudes),
  })
}

/// The dataset must be 4-dimensional `(x, y, z, 9)` with positive extents.
fn validate_shape(shape: &[usize]) -> Result<(usize, usize, usize), InputError> {
  match shape {
    [x, y, z, t] if *t == TENSOR_COMPONENTS && *x > 0 && *y > 0 && *z > 0 => Ok((*x, *y, *z)),
    _ => Err(InputError::BadShape(shape.to_vec())),
  }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;
