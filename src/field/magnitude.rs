//! MagnitudeField - connectivity-strength scalar derived per voxel.

use glam::{IVec3, UVec3, Vec3};
use rayon::prelude::*;

use crate::error::FieldError;

use super::{contains, flat_index, TensorField, TENSOR_COMPONENTS};

/// Strength of a single tensor: the 9 components are read column-wise as
/// three 3-vectors (0,3,6 / 1,4,7 / 2,5,8), and the largest Euclidean norm
/// wins, clamped to [0, 1].
///
/// Note the tracer reads the same 9 components row-wise; the two
/// conventions are intentionally kept separate.
#[inline]
pub fn magnitude_of(t: &[f32; TENSOR_COMPONENTS]) -> f32 {
  let a = Vec3::new(t[0], t[3], t[6]);
  let b = Vec3::new(t[1], t[4], t[7]);
  let c = Vec3::new(t[2], t[5], t[8]);
  a.length().max(b.length()).max(c.length()).clamp(0.0, 1.0)
}

/// Scalar field with the same extents as the tensor field it was derived
/// from. Recomputed on reload, never mutated in place.
pub struct MagnitudeField {
  dims: UVec3,
  cells: Vec<f32>,
}

impl MagnitudeField {
  /// Derive the magnitude of every voxel of `field` in parallel.
  pub fn derive(field: &TensorField) -> Self {
    let cells = field.cells().par_iter().map(magnitude_of).collect();
    Self {
      dims: field.dims(),
      cells,
    }
  }

  /// Build from precomputed cells, x-major. Used by the loader, which
  /// derives magnitudes in the same pass that decodes the tensors.
  ///
  /// # Panics
  /// Panics if `cells` does not hold exactly one scalar per voxel.
  pub fn from_cells(dims: UVec3, cells: Vec<f32>) -> Self {
    assert_eq!(
      cells.len(),
      dims.x as usize * dims.y as usize * dims.z as usize,
      "cell count must match extents"
    );
    Self { dims, cells }
  }

  /// Grid extents (x, y, z); always identical to the source tensor field.
  #[inline]
  pub fn dims(&self) -> UVec3 {
    self.dims
  }

  /// True iff `coor` is a valid index on every axis.
  #[inline]
  pub fn contains(&self, coor: IVec3) -> bool {
    contains(self.dims, coor)
  }

  /// Magnitude in [0, 1] at `coor`, or an explicit range error.
  pub fn get(&self, coor: IVec3) -> Result<f32, FieldError> {
    flat_index(self.dims, coor)
      .map(|i| self.cells[i])
      .ok_or(FieldError {
        coor,
        dims: self.dims,
      })
  }
}

#[cfg(test)]
#[path = "magnitude_test.rs"]
mod magnitude_test;
