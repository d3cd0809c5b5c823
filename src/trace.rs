//! Streamline tracing by dominant tensor direction.
//!
//! From a start voxel, the tracer repeatedly picks the largest of the
//! voxel's three tensor sub-vectors and advances a real-valued position
//! along it, rounding down to the next grid coordinate. The walk stops on
//! leaving the volume, on an empty or isotropic voxel, or when the step
//! budget runs out. Revisiting earlier voxels (other than the immediate
//! predecessor) is accepted behavior.

use glam::{IVec3, Vec3};

use crate::field::{TensorField, TENSOR_COMPONENTS};

/// Ordered voxel path, origin-to-end. Holds each successively advanced
/// coordinate; the start voxel itself is not included. May be empty.
pub type Streamline = Vec<IVec3>;

/// Tracing parameters.
#[derive(Clone, Debug)]
pub struct TraceConfig {
  /// Advance distance per step along the major direction, in voxels.
  pub step_length: f32,

  /// Tolerance below which the three sub-vector norms count as
  /// indistinguishable (isotropic voxel).
  pub epsilon: f32,

  /// Hard cap on stall re-advances when rounding keeps landing in the
  /// current cell. Exhaustion terminates the walk.
  pub max_stall_advances: u32,
}

impl Default for TraceConfig {
  fn default() -> Self {
    Self {
      step_length: 20.0,
      epsilon: 1e-8,
      max_stall_advances: 4096,
    }
  }
}

impl TraceConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_step_length(mut self, step_length: f32) -> Self {
    self.step_length = step_length;
    self
  }

  pub fn with_epsilon(mut self, epsilon: f32) -> Self {
    self.epsilon = epsilon;
    self
  }

  pub fn with_max_stall_advances(mut self, max_stall_advances: u32) -> Self {
    self.max_stall_advances = max_stall_advances;
    self
  }
}

/// Synchronous, single-threaded tracer over a fully loaded tensor field.
pub struct StreamlineTracer<'a> {
  field: &'a TensorField,
  config: TraceConfig,
}

impl<'a> StreamlineTracer<'a> {
  pub fn new(field: &'a TensorField) -> Self {
    Self {
      field,
      config: TraceConfig::default(),
    }
  }

  pub fn with_config(mut self, config: TraceConfig) -> Self {
    self.config = config;
    self
  }

  /// Follow the dominant local direction from `start` for at most
  /// `max_steps` steps.
  ///
  /// Iterative on purpose: the budget can be large, and the walk must
  /// terminate even when the major direction barely moves the position.
  /// Every emitted coordinate is a valid field index.
  pub fn trace(&self, start: IVec3, max_steps: usize) -> Streamline {
    let mut path = Streamline::new();
    let mut coor = start;
    let mut pos = start.as_vec3();
    let mut remaining = max_steps;

    while remaining > 0 {
      let Ok(tensor) = self.field.get(coor) else {
        break;
      };
      let Some(major) = principal_direction(tensor, self.config.epsilon) else {
        break;
      };

      let step = major * self.config.step_length;
      pos += step;
      let mut next = pos.floor().as_ivec3();

      // Stall avoidance: keep advancing from the already-advanced position
      // until rounding leaves the current cell, bounded so a near-zero
      // major direction cannot loop forever.
      let mut stalls = 0;
      while next == coor {
        stalls += 1;
        if stalls > self.config.max_stall_advances {
          return path;
        }
        pos += step;
        next = pos.floor().as_ivec3();
      }

      if !self.field.contains(next) {
        break;
      }
      path.push(next);
      coor = next;
      remaining -= 1;
    }

    path
  }
}

/// Row-wise split of the 9 components into (t0,t1,t2), (t3,t4,t5),
/// (t6,t7,t8); returns the sub-vector with the largest norm.
///
/// This deliberately differs from the column-wise split the magnitude
/// derivation uses; the two conventions are preserved as-is.
fn principal_direction(t: &[f32; TENSOR_COMPONENTS], epsilon: f32) -> Option<Vec3> {
  let a = Vec3::new(t[0], t[1], t[2]);
  let b = Vec3::new(t[3], t[4], t[5]);
  let c = Vec3::new(t[6], t[7], t[8]);

  let (na, nb, nc) = (a.length(), b.length(), c.length());
  let max = na.max(nb).max(nc);
  let min = na.min(nb).min(nc);

  // empty voxel
  if max == 0.0 {
    return None;
  }
  // no distinguishable major direction
  if max - min <= epsilon {
    return None;
  }

  // a-then-b-then-c tie order
  if max == na {
    Some(a)
  } else if max == nb {
    Some(b)
  } else {
    Some(c)
  }
}

#[cfg(test)]
#[path = "trace_test.rs"]
mod trace_test;
