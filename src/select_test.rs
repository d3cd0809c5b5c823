use glam::{IVec3, UVec3, Vec3};

use super::*;
use crate::test_utils::magnitude_with;

fn unit_layout() -> GridLayout {
  GridLayout {
    center: Vec3::ZERO,
    spacing: 1.0,
  }
}

// =============================================================================
// Strength buckets
// =============================================================================

/// The three buckets partition [0, 1]: {0}, (0, 0.001], (0.001, 1].
#[test]
fn strength_bucket_boundaries() {
  assert_eq!(Strength::of(0.0), Strength::Empty);
  assert_eq!(Strength::of(0.0005), Strength::Weak);
  assert_eq!(Strength::of(STRONG_THRESHOLD), Strength::Weak);
  assert_eq!(Strength::of(0.002), Strength::Strong);
  assert_eq!(Strength::of(1.0), Strength::Strong);
}

// =============================================================================
// Slice-downsample mode
// =============================================================================

/// An all-zero field previews to nothing.
#[test]
fn slice_preview_of_zero_field_is_empty() {
  let mag = magnitude_with(UVec3::new(6, 4, 6), |_| 0.0);
  let selector = VoxelSelector::new(&mag);

  assert!(selector.slice_preview(1, DEFAULT_PREVIEW_STRIDE).is_empty());
}

/// Only every stride-th voxel along X and Z at the requested layer shows up.
#[test]
fn slice_preview_strides_x_and_z() {
  let mag = magnitude_with(UVec3::new(5, 3, 5), |_| 0.5);
  let selector = VoxelSelector::new(&mag);

  let picked = selector.slice_preview(1, 2);

  assert_eq!(picked.len(), 9, "5x5 layer strided by 2 is 3x3");
  for coor in &picked {
    assert_eq!(coor.y, 1, "all voxels come from the requested layer");
    assert_eq!(coor.x % 2, 0);
    assert_eq!(coor.z % 2, 0);
  }
}

/// Out-of-range layer indices clamp instead of erroring; this sanitation
/// is specific to the preview path.
#[test]
fn slice_preview_clamps_layer_index() {
  let mag = magnitude_with(UVec3::new(2, 4, 2), |c| if c.y == 3 { 1.0 } else { 0.0 });
  let selector = VoxelSelector::new(&mag);

  let above = selector.slice_preview(99, 1);
  assert!(!above.is_empty(), "layer 99 clamps to 3");
  assert!(above.iter().all(|c| c.y == 3));

  let below = selector.slice_preview(-7, 1);
  assert!(below.is_empty(), "layer -7 clamps to 0, which is all zero");
}

#[test]
fn slice_preview_sanitizes_zero_stride() {
  let mag = magnitude_with(UVec3::new(3, 1, 3), |_| 0.5);
  let selector = VoxelSelector::new(&mag);

  assert_eq!(selector.slice_preview(0, 0).len(), 9, "stride 0 acts as 1");
}

/// Voxels with magnitude exactly 0 are dropped from the preview.
#[test]
fn slice_preview_keeps_only_positive_magnitude() {
  let mag = magnitude_with(UVec3::new(4, 1, 4), |c| if c.x == 0 { 0.0 } else { 0.3 });
  let selector = VoxelSelector::new(&mag);

  let picked = selector.slice_preview(0, 2);
  assert!(picked.iter().all(|c| c.x != 0));
  assert_eq!(picked.len(), 2, "x=2 column at z in {{0, 2}}");
}

// =============================================================================
// Full-volume threshold mode
// =============================================================================

/// Every voxel at or above the cutoff lands in exactly one bucket; every
/// voxel below it is excluded.
#[test]
fn threshold_partitions_retained_voxels() {
  let dims = UVec3::new(2, 4, 2);
  // z = 0 empty, z = 1 weak on x = 0 and strong on x = 1.
  let mag = magnitude_with(dims, |c| match (c.x, c.z) {
    (_, 0) => 0.0,
    (0, _) => 0.0005,
    _ => 0.5,
  });
  let selector = VoxelSelector::new(&mag).with_layout(unit_layout());

  // With unit spacing centered at zero, world y = coor.y - 2.
  let selection = selector.threshold(-0.5, false);

  let retained = 2 * 2 * 2; // y in {2, 3}
  assert_eq!(selection.voxels.len(), retained);
  for voxel in &selection.voxels {
    assert!(voxel.coor.y >= 2, "voxels below the cutoff are excluded");
    let expected = match (voxel.coor.x, voxel.coor.z) {
      (_, 0) => Strength::Empty,
      (0, _) => Strength::Weak,
      _ => Strength::Strong,
    };
    assert_eq!(voxel.strength, expected);
  }

  // No duplicates: the partition is per-voxel.
  let mut coors: Vec<IVec3> = selection.voxels.iter().map(|v| v.coor).collect();
  coors.sort_by_key(|c| (c.x, c.y, c.z));
  coors.dedup();
  assert_eq!(coors.len(), retained);
}

/// A cutoff below the whole volume retains every voxel.
#[test]
fn threshold_below_volume_retains_all() {
  let dims = UVec3::new(3, 3, 3);
  let mag = magnitude_with(dims, |_| 0.5);
  let selector = VoxelSelector::new(&mag).with_layout(unit_layout());

  let selection = selector.threshold(f32::MIN, false);
  assert_eq!(selection.voxels.len(), 27);
}

/// A cutoff above the whole volume retains nothing.
#[test]
fn threshold_above_volume_retains_none() {
  let dims = UVec3::new(3, 3, 3);
  let mag = magnitude_with(dims, |_| 0.5);
  let selector = VoxelSelector::new(&mag).with_layout(unit_layout());

  let selection = selector.threshold(1000.0, true);
  assert!(selection.voxels.is_empty());
}

/// The keep-previous flag is echoed, not interpreted.
#[test]
fn threshold_echoes_keep_previous() {
  let mag = magnitude_with(UVec3::new(1, 1, 1), |_| 0.5);
  let selector = VoxelSelector::new(&mag);

  assert!(selector.threshold(f32::MIN, true).keep_previous);
  assert!(!selector.threshold(f32::MIN, false).keep_previous);
}

// =============================================================================
// Grid layout
// =============================================================================

/// world = center - dims * spacing / 2 + coor * spacing
#[test]
fn world_pos_centers_the_grid() {
  let layout = GridLayout {
    center: Vec3::new(10.0, 0.0, -4.0),
    spacing: 2.0,
  };
  let dims = UVec3::new(4, 4, 4);

  let origin = layout.world_pos(dims, IVec3::ZERO);
  assert_eq!(origin, Vec3::new(6.0, -4.0, -8.0));

  let far = layout.world_pos(dims, IVec3::new(3, 3, 3));
  assert_eq!(far, Vec3::new(12.0, 2.0, -2.0));
}
