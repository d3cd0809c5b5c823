//! TensorField - immutable 3D grid of per-voxel diffusion tensors.

use glam::{IVec3, UVec3};

use crate::error::FieldError;

use super::{contains, flat_index};

/// Components per voxel: one 3x3 tensor stored as a flat 9-vector.
pub const TENSOR_COMPONENTS: usize = 9;

/// 3D grid of decoded tensors. Immutable once constructed; downstream
/// consumers (magnitude derivation, tracing) only ever read it.
pub struct TensorField {
  dims: UVec3,
  cells: Vec<[f32; TENSOR_COMPONENTS]>,
}

impl TensorField {
  /// Build a field from pre-decoded cells, x-major
  /// (`(x * ny + y) * nz + z`).
  ///
  /// # Panics
  /// Panics if `cells` does not hold exactly one tensor per voxel.
  pub fn from_cells(dims: UVec3, cells: Vec<[f32; TENSOR_COMPONENTS]>) -> Self {
    assert_eq!(
      cells.len(),
      dims.x as usize * dims.y as usize * dims.z as usize,
      "cell count must match extents"
    );
    Self { dims, cells }
  }

  /// Grid extents (x, y, z).
  #[inline]
  pub fn dims(&self) -> UVec3 {
    self.dims
  }

  /// True iff `coor` is a valid index on every axis.
  #[inline]
  pub fn contains(&self, coor: IVec3) -> bool {
    contains(self.dims, coor)
  }

  /// The 9-component tensor at `coor`, or an explicit range error.
  /// Never clamps.
  pub fn get(&self, coor: IVec3) -> Result<&[f32; TENSOR_COMPONENTS], FieldError> {
    flat_index(self.dims, coor)
      .map(|i| &self.cells[i])
      .ok_or(FieldError {
        coor,
        dims: self.dims,
      })
  }

  /// True iff the voxel carries any non-zero tensor component.
  pub fn has_signal(&self, coor: IVec3) -> Result<bool, FieldError> {
    Ok(self.get(coor)?.iter().any(|&v| v != 0.0))
  }

  pub(crate) fn cells(&self) -> &[[f32; TENSOR_COMPONENTS]] {
    &self.cells
  }
}

#[cfg(test)]
#[path = "tensor_test.rs"]
mod tensor_test;
