use glam::{IVec3, UVec3};

use super::*;
use crate::test_utils::{field_with, uniform_field, zero_field};

#[test]
fn get_returns_cell_in_range() {
  let field = field_with(UVec3::new(2, 3, 4), |c| {
    let mut t = [0.0; TENSOR_COMPONENTS];
    t[0] = (c.x * 100 + c.y * 10 + c.z) as f32;
    t
  });

  let cell = field.get(IVec3::new(1, 2, 3)).expect("in range");
  assert_eq!(cell[0], 123.0);
}

/// Raw queries never clamp: out-of-range on any axis is an explicit error.
#[test]
fn get_rejects_out_of_range() {
  let field = zero_field(UVec3::new(2, 2, 2));

  for coor in [
    IVec3::new(2, 0, 0),
    IVec3::new(0, 2, 0),
    IVec3::new(0, 0, 2),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 0, -1),
  ] {
    let err = field.get(coor).expect_err("out of range");
    assert_eq!(err.coor, coor);
    assert_eq!(err.dims, field.dims());
  }
}

#[test]
fn contains_matches_extents() {
  let field = zero_field(UVec3::new(4, 5, 6));

  assert!(field.contains(IVec3::ZERO));
  assert!(field.contains(IVec3::new(3, 4, 5)));
  assert!(!field.contains(IVec3::new(4, 4, 5)));
  assert!(!field.contains(IVec3::new(-1, 0, 0)));
}

#[test]
fn has_signal_detects_any_component() {
  let mut tensor = [0.0; TENSOR_COMPONENTS];
  tensor[7] = 1e-6;
  let field = uniform_field(UVec3::new(1, 1, 2), tensor);

  assert!(field.has_signal(IVec3::ZERO).unwrap());

  let empty = zero_field(UVec3::new(1, 1, 1));
  assert!(!empty.has_signal(IVec3::ZERO).unwrap());
}

#[test]
#[should_panic(expected = "cell count must match extents")]
fn from_cells_rejects_wrong_length() {
  TensorField::from_cells(UVec3::new(2, 2, 2), vec![[0.0; TENSOR_COMPONENTS]; 7]);
}
