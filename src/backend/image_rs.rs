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

//! The `image` crate: `DynamicImage` for decoded samples, `RgbaImage`
//! buffers for everything allocated by the operations.

use super::Backend;
use super::Operation;
use super::operation;
use crate::case::TestCase;
use crate::error::BackendError;
use crate::samples::CaseParams;
use crate::samples::SampleSet;
use crate::samples::band_color;
use crate::samples::gradient;
use image::DynamicImage;
use image::ImageFormat;
use image::RgbImage;
use image::Rgba;
use image::RgbaImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops;
use std::hint::black_box;
use std::io::Cursor;
use std::sync::Arc;

pub struct ImageRs;

impl Backend for ImageRs {
  fn name(&self) -> &'static str {
    "image"
  }

  fn cases(&self) -> &'static [TestCase] {
    &TestCase::ALL
  }

  fn prepare(
    &self,
    samples: &SampleSet,
    params: &CaseParams,
  ) -> Result<Vec<(TestCase, Operation)>, BackendError> {
    let decoded = Arc::new(image::load_from_memory_with_format(
      &samples.png,
      ImageFormat::Png,
    )?);
    let decoded_rgba = Arc::new(decoded.to_rgba8());
    // JPEG carries no alpha; the encoder only takes RGB input.
    let decoded_rgb = Arc::new(decoded.to_rgb8());
    let overlay = Arc::new(build_overlay(decoded.width(), decoded.height()));

    let size = params.size;
    let ops = self
      .cases()
      .iter()
      .map(|&case| {
        let op = match case {
          TestCase::Create => operation(move || {
            black_box(RgbaImage::new(size, size));
            Ok(())
          }),
          TestCase::DecodePng => {
            let png = samples.png.clone();
            operation(move || {
              black_box(image::load_from_memory_with_format(&png, ImageFormat::Png)?);
              Ok(())
            })
          }
          TestCase::DecodeJpeg => {
            let jpeg = samples.jpeg.clone();
            operation(move || {
              black_box(image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg)?);
              Ok(())
            })
          }
          TestCase::EncodePng => {
            let decoded = decoded.clone();
            operation(move || {
              let mut out = Cursor::new(Vec::new());
              decoded.write_to(&mut out, ImageFormat::Png)?;
              black_box(out);
              Ok(())
            })
          }
          TestCase::EncodeJpeg => {
            let rgb = decoded_rgb.clone();
            let quality = params.jpeg_quality;
            operation(move || {
              black_box(encode_jpeg(&rgb, quality)?);
              Ok(())
            })
          }
          TestCase::Composite => {
            let base = decoded_rgba.clone();
            let overlay = overlay.clone();
            operation(move || {
              let mut canvas = RgbaImage::clone(&base);
              imageops::overlay(&mut canvas, &*overlay, 0, 0);
              black_box(canvas);
              Ok(())
            })
          }
          TestCase::FillStatic => operation(move || {
            black_box(RgbaImage::from_pixel(size, size, Rgba([255, 255, 255, 255])));
            Ok(())
          }),
          TestCase::FillFunc => operation(move || {
            black_box(RgbaImage::from_fn(size, size, |x, y| {
              Rgba(gradient(x, y, size))
            }));
            Ok(())
          }),
          TestCase::SetChannel => {
            let base = decoded_rgba.clone();
            let opacity = params.opacity;
            operation(move || {
              let mut copy = RgbaImage::clone(&base);
              for pixel in copy.pixels_mut() {
                pixel[3] = (f32::from(pixel[3]) * opacity).round() as u8;
              }
              black_box(copy);
              Ok(())
            })
          }
          TestCase::Clone => {
            let decoded = decoded.clone();
            operation(move || {
              black_box(DynamicImage::clone(&decoded));
              Ok(())
            })
          }
          TestCase::Crop => {
            let decoded = decoded.clone();
            let region = params.crop;
            operation(move || {
              let copy = DynamicImage::clone(&decoded);
              black_box(copy.crop_imm(region.x, region.y, region.width, region.height));
              Ok(())
            })
          }
        };
        (case, op)
      })
      .collect();

    Ok(ops)
  }
}

fn encode_jpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>, BackendError> {
  let mut out = Vec::new();
  JpegEncoder::new_with_quality(&mut out, quality).encode_image(rgb)?;
  Ok(out)
}

/// Horizontal palette bands, painted pixel by pixel.
fn build_overlay(width: u32, height: u32) -> RgbaImage {
  RgbaImage::from_fn(width, height, |_, y| Rgba(band_color(y, height)))
}
