//! Voxel selection for display.
//!
//! Two deterministic selection modes over a loaded [`MagnitudeField`]: a
//! cheap strided single-layer preview, and a full-volume pass that tags
//! every voxel above a world-space Y cutoff with a connectivity-strength
//! bucket. Output ordering carries no contractual meaning.

use glam::{IVec3, UVec3, Vec3};
use tracing::debug;

use crate::field::MagnitudeField;

/// Grid-to-world mapping for a displayed volume: voxels are spaced
/// `spacing` apart and the grid is centered on `center`, so
/// `world = center - dims * spacing / 2 + coor * spacing`.
///
/// Passed in explicitly by the caller; the selector discovers nothing from
/// shared state.
#[derive(Clone, Copy, Debug)]
pub struct GridLayout {
  pub center: Vec3,
  pub spacing: f32,
}

impl Default for GridLayout {
  fn default() -> Self {
    Self {
      center: Vec3::ZERO,
      spacing: 0.8,
    }
  }
}

impl GridLayout {
  /// World-space position of `coor` in a grid with extents `dims`.
  #[inline]
  pub fn world_pos(&self, dims: UVec3, coor: IVec3) -> Vec3 {
    let origin = self.center - dims.as_vec3() * self.spacing * 0.5;
    origin + coor.as_vec3() * self.spacing
  }
}

/// Magnitude above which a voxel counts as strongly connected.
pub const STRONG_THRESHOLD: f32 = 0.001;

/// Default downsampling stride for slice previews.
pub const DEFAULT_PREVIEW_STRIDE: usize = 2;

/// Connectivity-strength bucket of one voxel. Every voxel falls in exactly
/// one bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strength {
  /// No content (magnitude exactly 0).
  Empty,
  /// Weak connectivity (0 < magnitude <= 0.001).
  Weak,
  /// Strong connectivity (magnitude > 0.001).
  Strong,
}

impl Strength {
  /// Bucket for a magnitude value.
  pub fn of(magnitude: f32) -> Self {
    let magnitude = magnitude.clamp(0.0, 1.0);
    if magnitude > STRONG_THRESHOLD {
      Strength::Strong
    } else if magnitude > 0.0 {
      Strength::Weak
    } else {
      Strength::Empty
    }
  }
}

/// One selected voxel with its strength tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaggedVoxel {
  pub coor: IVec3,
  pub strength: Strength,
}

/// Result of a full-volume threshold pass.
///
/// `keep_previous` is echoed back for the downstream renderer: the selector
/// itself tracks nothing about what was previously displayed, so the flag
/// only tells the consumer whether to clear its last batch.
pub struct ThresholdSelection {
  pub voxels: Vec<TaggedVoxel>,
  pub keep_previous: bool,
}

/// Pure-read voxel selection over an already-loaded magnitude field.
pub struct VoxelSelector<'a> {
  magnitude: &'a MagnitudeField,
  layout: GridLayout,
}

impl<'a> VoxelSelector<'a> {
  pub fn new(magnitude: &'a MagnitudeField) -> Self {
    Self {
      magnitude,
      layout: GridLayout::default(),
    }
  }

  pub fn with_layout(mut self, layout: GridLayout) -> Self {
    self.layout = layout;
    self
  }

  /// Strided preview of a single coronal layer.
  ///
  /// `y_layer` is clamped into `[0, ydim - 1]` (index sanitation is
  /// intentional here, unlike raw field queries) and `stride` is sanitized
  /// to at least 1. Visits every `stride`-th voxel along X and Z at that
  /// layer and keeps those with magnitude above zero.
  pub fn slice_preview(&self, y_layer: i32, stride: usize) -> Vec<IVec3> {
    let dims = self.magnitude.dims();
    if dims.x == 0 || dims.y == 0 || dims.z == 0 {
      return Vec::new();
    }
    let y = y_layer.clamp(0, dims.y as i32 - 1);
    let stride = stride.max(1);

    let mut result = Vec::new();
    for x in (0..dims.x as i32).step_by(stride) {
      for z in (0..dims.z as i32).step_by(stride) {
        let coor = IVec3::new(x, y, z);
        if self.magnitude.get(coor).is_ok_and(|m| m > 0.0) {
          result.push(coor);
        }
      }
    }

    debug!(count = result.len(), y, stride, "slice preview selected");
    result
  }

  /// Full-volume pass: tag every voxel whose world-space Y position is at
  /// or above `y_cutoff`; voxels below the cutoff are excluded entirely.
  pub fn threshold(&self, y_cutoff: f32, keep_previous: bool) -> ThresholdSelection {
    let dims = self.magnitude.dims();

    let mut voxels = Vec::new();
    for x in 0..dims.x as i32 {
      for y in 0..dims.y as i32 {
        for z in 0..dims.z as i32 {
          let coor = IVec3::new(x, y, z);
          if self.layout.world_pos(dims, coor).y < y_cutoff {
            continue;
          }
          if let Ok(magnitude) = self.magnitude.get(coor) {
            voxels.push(TaggedVoxel {
              coor,
              strength: Strength::of(magnitude),
            });
          }
        }
      }
    }

    debug!(
      count = voxels.len(),
      y_cutoff, keep_previous, "threshold selection"
    );
    ThresholdSelection {
      voxels,
      keep_previous,
    }
  }
}

#[cfg(test)]
#[path = "select_test.rs"]
mod select_test;
