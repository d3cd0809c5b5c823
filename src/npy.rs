//! Minimal NPY container decoding.
//!
//! Reads the packed numpy array the dataset ships as: a v1.0/v2.0 `.npy`
//! file holding a C-order `<i8` (little-endian int64) array. Just enough of
//! the format is implemented to get the header-declared shape and the raw
//! integer payload out; everything else is rejected as malformed input.

use std::fs;
use std::path::Path;

use crate::error::InputError;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Raw integer array as stored on disk: header-declared shape plus a flat
/// C-order payload.
pub struct NpyArray {
  pub shape: Vec<usize>,
  pub data: Vec<i64>,
}

impl NpyArray {
  /// Total element count declared by the shape, saturating on overflow.
  pub fn len(&self) -> usize {
    self
      .shape
      .iter()
      .fold(1usize, |acc, &d| acc.saturating_mul(d))
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Read and decode an `.npy` file from disk.
pub fn read_file(path: &Path) -> Result<NpyArray, InputError> {
  let bytes = fs::read(path)?;
  parse(&bytes)
}

/// Decode an in-memory `.npy` byte stream.
pub fn parse(bytes: &[u8]) -> Result<NpyArray, InputError> {
  if bytes.len() < 8 || &bytes[..6] != MAGIC {
    return Err(InputError::BadMagic);
  }

  let (major, minor) = (bytes[6], bytes[7]);
  let (header, payload) = match (major, minor) {
    (1, 0) => {
      if bytes.len() < 10 {
        return Err(InputError::BadHeader("missing header length".into()));
      }
      let len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
      split_header(&bytes[10..], len)?
    }
    (2, 0) => {
      if bytes.len() < 12 {
        return Err(InputError::BadHeader("missing header length".into()));
      }
      let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
      split_header(&bytes[12..], len)?
    }
    _ => return Err(InputError::UnsupportedVersion(major, minor)),
  };

  let (descr, fortran_order, shape) = parse_dict(header)?;
  if descr != "<i8" {
    return Err(InputError::UnsupportedDtype(descr));
  }
  if fortran_order {
    return Err(InputError::FortranOrder);
  }

  // A hostile header can declare a shape whose product overflows; treat
  // that as malformed rather than wrapping.
  let expected = shape
    .iter()
    .try_fold(1usize, |acc, &d| acc.checked_mul(d))
    .and_then(|count| count.checked_mul(8))
    .ok_or_else(|| InputError::BadShape(shape.clone()))?;
  if payload.len() < expected {
    return Err(InputError::Truncated {
      expected,
      actual: payload.len(),
    });
  }

  let data = payload[..expected]
    .chunks_exact(8)
    .map(|c| i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
    .collect();

  Ok(NpyArray { shape, data })
}

fn split_header(rest: &[u8], len: usize) -> Result<(&[u8], &[u8]), InputError> {
  if rest.len() < len {
    return Err(InputError::BadHeader("header length exceeds file size".into()));
  }
  Ok(rest.split_at(len))
}

/// Pull `descr`, `fortran_order` and `shape` out of the header's python
/// dict literal, e.g.
/// `{'descr': '<i8', 'fortran_order': False, 'shape': (85, 144, 144, 9), }`.
fn parse_dict(header: &[u8]) -> Result<(String, bool, Vec<usize>), InputError> {
  let text = std::str::from_utf8(header)
    .map_err(|_| InputError::BadHeader("header is not valid utf-8".into()))?;

  let descr = {
    let value = field(text, "descr")?;
    let inner = value
      .strip_prefix('\'')
      .and_then(|v| v.split('\'').next())
      .ok_or_else(|| InputError::BadHeader("unquoted 'descr' value".into()))?;
    inner.to_string()
  };

  let fortran_order = {
    let value = field(text, "fortran_order")?;
    if value.starts_with("False") {
      false
    } else if value.starts_with("True") {
      true
    } else {
      return Err(InputError::BadHeader("bad 'fortran_order' value".into()));
    }
  };

  let shape = {
    let value = field(text, "shape")?;
    let inner = value
      .strip_prefix('(')
      .and_then(|v| v.split(')').next())
      .ok_or_else(|| InputError::BadHeader("bad 'shape' tuple".into()))?;
    inner
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(|s| {
        s.parse::<usize>()
          .map_err(|_| InputError::BadHeader(format!("bad shape entry {s:?}")))
      })
      .collect::<Result<Vec<_>, _>>()?
  };

  Ok((descr, fortran_order, shape))
}

/// Slice of `text` starting right after `'key':`, leading spaces trimmed.
fn field<'a>(text: &'a str, key: &str) -> Result<&'a str, InputError> {
  let needle = format!("'{key}':");
  let start = text
    .find(&needle)
    .ok_or_else(|| InputError::BadHeader(format!("missing '{key}'")))?
    + needle.len();
  Ok(text[start..].trim_start())
}

#[cfg(test)]
#[path = "npy_test.rs"]
mod npy_test;
