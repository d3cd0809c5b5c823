//! Field storage for decoded tensor data.
//!
//! A loaded volume is a pair of same-extent grids: the [`TensorField`]
//! holding the 9-component tensor per voxel, and the [`MagnitudeField`]
//! holding the derived connectivity-strength scalar per voxel.

use glam::{IVec3, UVec3};

pub mod magnitude;
pub mod tensor;

pub use magnitude::{magnitude_of, MagnitudeField};
pub use tensor::{TensorField, TENSOR_COMPONENTS};

/// True iff `coor` indexes a cell of a grid with extents `dims`.
#[inline]
pub(crate) fn contains(dims: UVec3, coor: IVec3) -> bool {
  coor.x >= 0
    && coor.y >= 0
    && coor.z >= 0
    && (coor.x as u32) < dims.x
    && (coor.y as u32) < dims.y
    && (coor.z as u32) < dims.z
}

/// Flat cell index for `coor`, x-major: `(x * ny + y) * nz + z`.
#[inline]
pub(crate) fn flat_index(dims: UVec3, coor: IVec3) -> Option<usize> {
  if !contains(dims, coor) {
    return None;
  }
  let (x, y, z) = (coor.x as usize, coor.y as usize, coor.z as usize);
  Some((x * dims.y as usize + y) * dims.z as usize + z)
}
