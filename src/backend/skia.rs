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

//! `tiny-skia`, driven the way a 2D canvas is: every image is a `Pixmap`
//! and every drawing goes through `fill_rect`/`draw_pixmap`.
//!
//! The crate reads and writes PNG only and has no per-channel API, so the
//! JPEG and `set_channel` cases are not declared.

use super::Backend;
use super::Operation;
use super::operation;
use crate::case::TestCase;
use crate::config::CropRegion;
use crate::error::BackendError;
use crate::samples::CaseParams;
use crate::samples::OVERLAY_PALETTE;
use crate::samples::SampleSet;
use crate::samples::band_rows;
use crate::samples::color_to_rgba;
use crate::samples::gradient;
use std::hint::black_box;
use std::sync::Arc;
use tiny_skia::Color;
use tiny_skia::IntRect;
use tiny_skia::Paint;
use tiny_skia::Pixmap;
use tiny_skia::PixmapPaint;
use tiny_skia::Rect;
use tiny_skia::Transform;

const CASES: &[TestCase] = &[
  TestCase::Create,
  TestCase::DecodePng,
  TestCase::EncodePng,
  TestCase::Composite,
  TestCase::FillStatic,
  TestCase::FillFunc,
  TestCase::Clone,
  TestCase::Crop,
];

pub struct TinySkia;

impl Backend for TinySkia {
  fn name(&self) -> &'static str {
    "tiny-skia"
  }

  fn cases(&self) -> &'static [TestCase] {
    CASES
  }

  fn prepare(
    &self,
    samples: &SampleSet,
    params: &CaseParams,
  ) -> Result<Vec<(TestCase, Operation)>, BackendError> {
    let decoded = Arc::new(decode_png(&samples.png)?);
    let overlay = Arc::new(build_overlay(decoded.width(), decoded.height())?);

    let size = params.size;
    let ops = CASES
      .iter()
      .map(|&case| {
        let op = match case {
          TestCase::Create => operation(move || {
            black_box(new_pixmap(size, size)?);
            Ok(())
          }),
          TestCase::DecodePng => {
            let png = samples.png.clone();
            operation(move || {
              black_box(decode_png(&png)?);
              Ok(())
            })
          }
          TestCase::EncodePng => {
            let decoded = decoded.clone();
            operation(move || {
              let encoded = decoded
                .encode_png()
                .map_err(|e| BackendError::Skia(e.to_string()))?;
              black_box(encoded);
              Ok(())
            })
          }
          TestCase::Composite => {
            let decoded = decoded.clone();
            let overlay = overlay.clone();
            operation(move || {
              // A canvas is cloned by drawing it onto a fresh one.
              let base: &Pixmap = &decoded;
              let top: &Pixmap = &overlay;
              let mut canvas = new_pixmap(base.width(), base.height())?;
              let paint = PixmapPaint::default();
              canvas.draw_pixmap(0, 0, base.as_ref(), &paint, Transform::identity(), None);
              canvas.draw_pixmap(0, 0, top.as_ref(), &paint, Transform::identity(), None);
              black_box(canvas);
              Ok(())
            })
          }
          TestCase::FillStatic => operation(move || {
            let mut canvas = new_pixmap(size, size)?;
            canvas.fill(Color::WHITE);
            black_box(canvas);
            Ok(())
          }),
          TestCase::FillFunc => operation(move || {
            black_box(fill_gradient(size)?);
            Ok(())
          }),
          TestCase::Clone => {
            let decoded = decoded.clone();
            operation(move || {
              black_box(Pixmap::clone(&decoded));
              Ok(())
            })
          }
          TestCase::Crop => {
            let decoded = decoded.clone();
            let region = params.crop;
            operation(move || {
              let rect = crop_rect(region)?;
              let copy = Pixmap::clone(&decoded);
              let cropped = copy
                .clone_rect(rect)
                .ok_or_else(|| BackendError::Skia("crop region outside the image".to_string()))?;
              black_box(cropped);
              Ok(())
            })
          }
          other => unreachable!("{other} is not declared by tiny-skia"),
        };
        (case, op)
      })
      .collect();

    Ok(ops)
  }
}

fn crop_rect(region: CropRegion) -> Result<IntRect, BackendError> {
  let invalid = || BackendError::Skia(format!("invalid crop region {region:?}"));
  let x = i32::try_from(region.x).map_err(|_| invalid())?;
  let y = i32::try_from(region.y).map_err(|_| invalid())?;
  IntRect::from_xywh(x, y, region.width, region.height).ok_or_else(invalid)
}

fn decode_png(data: &[u8]) -> Result<Pixmap, BackendError> {
  Pixmap::decode_png(data).map_err(|e| BackendError::Skia(e.to_string()))
}

fn new_pixmap(width: u32, height: u32) -> Result<Pixmap, BackendError> {
  Pixmap::new(width, height).ok_or(BackendError::Dimensions { width, height })
}

/// One `fill_rect` per palette band.
fn build_overlay(width: u32, height: u32) -> Result<Pixmap, BackendError> {
  let mut overlay = new_pixmap(width, height)?;
  let mut paint = Paint::default();
  paint.anti_alias = false;

  for (band, start, rows) in band_rows(height) {
    let [r, g, b, a] = color_to_rgba(OVERLAY_PALETTE[band]);
    paint.set_color_rgba8(r, g, b, a);
    if let Some(rect) = Rect::from_xywh(0.0, start as f32, width as f32, rows as f32) {
      overlay.fill_rect(rect, &paint, Transform::identity(), None);
    }
  }
  Ok(overlay)
}

/// One 1x1 `fill_rect` per pixel: a canvas has no per-pixel fill.
fn fill_gradient(size: u32) -> Result<Pixmap, BackendError> {
  let mut canvas = new_pixmap(size, size)?;
  let mut paint = Paint::default();
  paint.anti_alias = false;

  for y in 0..size {
    for x in 0..size {
      let [r, g, b, a] = gradient(x, y, size);
      paint.set_color_rgba8(r, g, b, a);
      if let Some(rect) = Rect::from_xywh(x as f32, y as f32, 1.0, 1.0) {
        canvas.fill_rect(rect, &paint, Transform::identity(), None);
      }
    }
  }
  Ok(canvas)
}
