// Copyright 2025 Chisomo Makombo Sakala
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Sample inputs and the parameters shared by every backend.
//!
//! Backends receive the encoded sample bytes untouched and decode them with
//! their own codecs. The overlay palette and the gradient are defined here so
//! that each library paints the same picture with its own primitives.

use crate::config::Config;
use crate::config::CropRegion;
use crate::error::SampleError;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Packed RGBA colors of the six horizontal overlay bands, top to bottom.
pub const OVERLAY_PALETTE: [u32; 6] = [
  0xff001880, 0xffa52c80, 0xffff4180, 0x00801880, 0x0000f980, 0x86007d80,
];

/// Encoded sample images, shared read-only between operations.
#[derive(Debug, Clone)]
pub struct SampleSet {
  pub png: Arc<[u8]>,
  pub jpeg: Arc<[u8]>,
}

impl SampleSet {
  pub fn load(png: &Path, jpeg: &Path) -> Result<Self, SampleError> {
    Ok(Self {
      png: read_sample(png)?,
      jpeg: read_sample(jpeg)?,
    })
  }

  pub fn from_bytes(png: Vec<u8>, jpeg: Vec<u8>) -> Self {
    Self {
      png: Arc::from(png),
      jpeg: Arc::from(jpeg),
    }
  }
}

fn read_sample(path: &Path) -> Result<Arc<[u8]>, SampleError> {
  let bytes = fs::read(path).map_err(|source| SampleError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  if bytes.is_empty() {
    return Err(SampleError::Empty(path.to_path_buf()));
  }
  tracing::debug!(path = %path.display(), bytes = bytes.len(), "Loaded sample");
  Ok(Arc::from(bytes))
}

/// Per-run knobs of the operations, taken from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseParams {
  pub size: u32,
  pub crop: CropRegion,
  pub opacity: f32,
  pub jpeg_quality: u8,
}

impl From<&Config> for CaseParams {
  fn from(config: &Config) -> Self {
    Self {
      size: config.size,
      crop: config.crop,
      opacity: config.opacity,
      jpeg_quality: config.jpeg_quality,
    }
  }
}

impl Default for CaseParams {
  fn default() -> Self {
    CaseParams::from(&Config::default())
  }
}

/// Splits a packed `0xRRGGBBAA` color into its channels.
pub fn color_to_rgba(color: u32) -> [u8; 4] {
  color.to_be_bytes()
}

/// Overlay color of row `y` in an image `height` rows tall.
pub fn band_color(y: u32, height: u32) -> [u8; 4] {
  color_to_rgba(OVERLAY_PALETTE[band_index(y, height)])
}

/// Index into [`OVERLAY_PALETTE`] of row `y`.
pub fn band_index(y: u32, height: u32) -> usize {
  let bands = OVERLAY_PALETTE.len() as u64;
  let index = (y as u64 * bands) / height.max(1) as u64;
  (index as usize).min(OVERLAY_PALETTE.len() - 1)
}

/// First row and row count of each overlay band.
pub fn band_rows(height: u32) -> impl Iterator<Item = (usize, u32, u32)> {
  (0..OVERLAY_PALETTE.len()).filter_map(move |band| {
    let start = (0..height).find(|&y| band_index(y, height) == band)?;
    let rows = (start..height)
      .take_while(|&y| band_index(y, height) == band)
      .count() as u32;
    Some((band, start, rows))
  })
}

/// Grey level painted at `(x, y)` by the `fill_func` case.
pub fn gradient(x: u32, y: u32, size: u32) -> [u8; 4] {
  let span = 2 * (size.max(2) as u64 - 1);
  let level = ((x as u64 + y as u64) * 255 / span).min(255) as u8;
  [level, level, level, 255]
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn color_to_rgba_is_big_endian() {
    assert_eq!(color_to_rgba(0xff001880), [0xff, 0x00, 0x18, 0x80]);
    assert_eq!(color_to_rgba(0x86007d80), [0x86, 0x00, 0x7d, 0x80]);
  }

  #[test]
  fn bands_cover_every_row_in_order() {
    let height = 100;
    let rows: Vec<_> = band_rows(height).collect();
    assert_eq!(rows.len(), OVERLAY_PALETTE.len());
    assert_eq!(rows[0].1, 0);
    assert_eq!(rows.iter().map(|r| r.2).sum::<u32>(), height);
    for pair in rows.windows(2) {
      assert_eq!(pair[0].1 + pair[0].2, pair[1].1);
    }
    assert_eq!(band_color(99, height), color_to_rgba(OVERLAY_PALETTE[5]));
  }

  #[test]
  fn short_images_skip_bands() {
    let rows: Vec<_> = band_rows(3).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows.iter().map(|r| r.0).collect::<Vec<_>>(), vec![0, 2, 4]);
  }

  #[test]
  fn gradient_spans_black_to_white() {
    assert_eq!(gradient(0, 0, 1024), [0, 0, 0, 255]);
    assert_eq!(gradient(1023, 1023, 1024), [255, 255, 255, 255]);
    assert_eq!(gradient(0, 0, 1), [0, 0, 0, 255]);
  }

  #[test]
  fn load_rejects_missing_and_empty_files() {
    let dir = tempdir().unwrap();
    let empty = dir.path().join("empty.png");
    fs::write(&empty, b"").unwrap();
    let jpeg = dir.path().join("sample.jpg");
    fs::write(&jpeg, b"not really a jpeg").unwrap();

    assert!(matches!(
      SampleSet::load(&dir.path().join("missing.png"), &jpeg),
      Err(SampleError::Read { .. })
    ));
    assert!(matches!(
      SampleSet::load(&empty, &jpeg),
      Err(SampleError::Empty(_))
    ));
  }
}
