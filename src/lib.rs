//! tractography_plugin - framework/engine independent tensor field processing
//!
//! This crate is the processing engine behind a tractography viewer: it
//! decodes a volumetric diffusion-tensor dataset on a background worker,
//! derives a connectivity-strength field, selects voxels for display, and
//! traces fiber-like streamlines along the dominant tensor direction. All
//! rendering, input handling, and scene management live downstream; this
//! crate only hands out coordinates, scalars, and job-completion signals.
//!
//! # Features
//!
//! - **Background loading**: NPY decode + fixed-point rescale on a
//!   dedicated worker, observed via poll-based job status
//! - **Magnitude derivation**: max sub-vector norm per voxel, clamped to
//!   [0, 1], computed in the same pass as the decode
//! - **Voxel selection**: strided slice previews and full-volume
//!   strength tagging above a world-space Y cutoff
//! - **Streamline tracing**: iterative dominant-direction walk with
//!   degeneracy and stall termination rules
//!
//! # Example
//!
//! ```ignore
//! use tractography_plugin::{JobStatus, StreamlineTracer, TensorFieldLoader, VoxelSelector};
//!
//! let mut loader = TensorFieldLoader::start("sample.npy");
//!
//! // Poll once per tick until the volume is ready.
//! loop {
//!     match loader.poll() {
//!         JobStatus::Completed => break,
//!         JobStatus::Failed(err) => panic!("load failed: {err}"),
//!         _ => std::thread::sleep(std::time::Duration::from_millis(10)),
//!     }
//! }
//!
//! let volume = loader.volume().unwrap();
//! let preview = VoxelSelector::new(&volume.magnitude).slice_preview(70, 2);
//! let path = StreamlineTracer::new(&volume.tensors).trace(glam::IVec3::new(30, 75, 75), 1000);
//! ```

pub mod error;
pub mod field;
pub mod job;
pub mod loader;
pub mod npy;
pub mod select;
pub mod trace;

pub use error::{FieldError, InputError, JobError, NotReady};
pub use field::{magnitude_of, MagnitudeField, TensorField, TENSOR_COMPONENTS};
pub use job::{AsyncJob, CancelFlag, JobStatus};
pub use loader::{LoadedVolume, TensorFieldLoader, MAGNIFICATION};
pub use select::{
  GridLayout, Strength, TaggedVoxel, ThresholdSelection, VoxelSelector, DEFAULT_PREVIEW_STRIDE,
  STRONG_THRESHOLD,
};
pub use trace::{Streamline, StreamlineTracer, TraceConfig};

#[cfg(test)]
pub(crate) mod test_utils;
