//! Test utilities: synthetic field builders and NPY byte fixtures.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{IVec3, UVec3};

use crate::field::{MagnitudeField, TensorField, TENSOR_COMPONENTS};

/// Field whose every voxel holds the same tensor.
pub fn uniform_field(dims: UVec3, tensor: [f32; TENSOR_COMPONENTS]) -> TensorField {
  let count = dims.x as usize * dims.y as usize * dims.z as usize;
  TensorField::from_cells(dims, vec![tensor; count])
}

/// All-zero tensor field.
pub fn zero_field(dims: UVec3) -> TensorField {
  uniform_field(dims, [0.0; TENSOR_COMPONENTS])
}

/// Field built from a per-voxel function, x-major like the real decode.
pub fn field_with(
  dims: UVec3,
  f: impl Fn(IVec3) -> [f32; TENSOR_COMPONENTS],
) -> TensorField {
  let mut cells = Vec::with_capacity(dims.x as usize * dims.y as usize * dims.z as usize);
  for x in 0..dims.x as i32 {
    for y in 0..dims.y as i32 {
      for z in 0..dims.z as i32 {
        cells.push(f(IVec3::new(x, y, z)));
      }
    }
  }
  TensorField::from_cells(dims, cells)
}

/// Magnitude field built from a per-voxel function, x-major.
pub fn magnitude_with(dims: UVec3, f: impl Fn(IVec3) -> f32) -> MagnitudeField {
  let mut cells = Vec::with_capacity(dims.x as usize * dims.y as usize * dims.z as usize);
  for x in 0..dims.x as i32 {
    for y in 0..dims.y as i32 {
      for z in 0..dims.z as i32 {
        cells.push(f(IVec3::new(x, y, z)));
      }
    }
  }
  MagnitudeField::from_cells(dims, cells)
}

/// Serialize a v1.0 NPY file holding C-order `<i8` data.
pub fn npy_bytes(shape: &[usize], data: &[i64]) -> Vec<u8> {
  let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
  let shape_str = if dims.len() == 1 {
    format!("({},)", dims[0])
  } else {
    format!("({})", dims.join(", "))
  };
  let mut header = format!("{{'descr': '<i8', 'fortran_order': False, 'shape': {shape_str}, }}");

  // Pad so magic + version + length + header is a multiple of 64, as numpy
  // itself writes it.
  let unpadded = 10 + header.len() + 1;
  header.push_str(&" ".repeat(unpadded.div_ceil(64) * 64 - unpadded));
  header.push('\n');

  let mut bytes = Vec::new();
  bytes.extend_from_slice(b"\x93NUMPY");
  bytes.extend_from_slice(&[1, 0]);
  bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
  bytes.extend_from_slice(header.as_bytes());
  for value in data {
    bytes.extend_from_slice(&value.to_le_bytes());
  }
  bytes
}

/// Temporary on-disk NPY fixture, removed on drop.
pub struct TempNpy {
  pub path: PathBuf,
}

impl TempNpy {
  pub fn write(name: &str, bytes: &[u8]) -> Self {
    static UNIQUE: AtomicU64 = AtomicU64::new(0);
    let n = UNIQUE.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
      "tractography_plugin_{name}_{}_{n}.npy",
      std::process::id()
    ));
    fs::write(&path, bytes).expect("writing test fixture");
    Self { path }
  }
}

impl Drop for TempNpy {
  fn drop(&mut self) {
    let _ = fs::remove_file(&self.path);
  }
}
