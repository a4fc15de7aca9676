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

//! Standalone codec crates with no image abstraction on top: `png`,
//! `jpeg-decoder` and `jpeg-encoder` working on plain byte buffers.
//! Only the codec cases are declared.

use super::Backend;
use super::Operation;
use super::operation;
use crate::case::TestCase;
use crate::error::BackendError;
use crate::samples::CaseParams;
use crate::samples::SampleSet;
use std::hint::black_box;
use std::sync::Arc;

const CASES: &[TestCase] = &[
  TestCase::DecodePng,
  TestCase::DecodeJpeg,
  TestCase::EncodePng,
  TestCase::EncodeJpeg,
];

pub struct Codecs;

/// Decoded PNG: 8 bits per channel, palette expanded.
#[derive(Debug, Clone)]
struct Bitmap {
  width: u32,
  height: u32,
  color: png::ColorType,
  data: Vec<u8>,
}

impl Backend for Codecs {
  fn name(&self) -> &'static str {
    "codecs"
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

    let ops = CASES
      .iter()
      .map(|&case| {
        let op = match case {
          TestCase::DecodePng => {
            let png = samples.png.clone();
            operation(move || {
              black_box(decode_png(&png)?);
              Ok(())
            })
          }
          TestCase::DecodeJpeg => {
            let jpeg = samples.jpeg.clone();
            operation(move || {
              let mut decoder = jpeg_decoder::Decoder::new(&jpeg[..]);
              black_box(decoder.decode()?);
              Ok(())
            })
          }
          TestCase::EncodePng => {
            let decoded = decoded.clone();
            operation(move || {
              black_box(encode_png(&decoded)?);
              Ok(())
            })
          }
          TestCase::EncodeJpeg => {
            let decoded = decoded.clone();
            let quality = params.jpeg_quality;
            operation(move || {
              black_box(encode_jpeg(&decoded, quality)?);
              Ok(())
            })
          }
          other => unreachable!("{other} is not declared by codecs"),
        };
        (case, op)
      })
      .collect();

    Ok(ops)
  }
}

fn decode_png(data: &[u8]) -> Result<Bitmap, BackendError> {
  let mut decoder = png::Decoder::new(data);
  decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
  let mut reader = decoder.read_info()?;

  let mut buf = vec![0; reader.output_buffer_size()];
  let info = reader.next_frame(&mut buf)?;
  buf.truncate(info.buffer_size());

  Ok(Bitmap {
    width: info.width,
    height: info.height,
    color: info.color_type,
    data: buf,
  })
}

fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, BackendError> {
  let mut out = Vec::new();
  {
    let mut encoder = png::Encoder::new(&mut out, bitmap.width, bitmap.height);
    encoder.set_color(bitmap.color);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&bitmap.data)?;
    writer.finish()?;
  }
  Ok(out)
}

fn encode_jpeg(bitmap: &Bitmap, quality: u8) -> Result<Vec<u8>, BackendError> {
  let color = match bitmap.color {
    png::ColorType::Rgba => jpeg_encoder::ColorType::Rgba,
    png::ColorType::Rgb => jpeg_encoder::ColorType::Rgb,
    png::ColorType::Grayscale => jpeg_encoder::ColorType::Luma,
    other => {
      return Err(BackendError::UnsupportedLayout(format!(
        "jpeg-encoder cannot take {other:?} input"
      )));
    }
  };
  let (Ok(width), Ok(height)) = (u16::try_from(bitmap.width), u16::try_from(bitmap.height)) else {
    return Err(BackendError::Dimensions {
      width: bitmap.width,
      height: bitmap.height,
    });
  };

  let mut out = Vec::new();
  jpeg_encoder::Encoder::new(&mut out, quality).encode(&bitmap.data, width, height, color)?;
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::test_support::synthetic_samples;

  #[test]
  fn png_round_trip_keeps_layout() {
    let samples = synthetic_samples(20, 10);
    let bitmap = decode_png(&samples.png).unwrap();
    assert_eq!((bitmap.width, bitmap.height), (20, 10));
    assert_eq!(bitmap.color, png::ColorType::Rgba);
    assert_eq!(bitmap.data.len(), 20 * 10 * 4);

    let again = decode_png(&encode_png(&bitmap).unwrap()).unwrap();
    assert_eq!(again.data, bitmap.data);
  }

  #[test]
  fn jpeg_encoding_yields_a_decodable_stream() {
    let samples = synthetic_samples(20, 10);
    let bitmap = decode_png(&samples.png).unwrap();
    let jpeg = encode_jpeg(&bitmap, 80).unwrap();

    let mut decoder = jpeg_decoder::Decoder::new(&jpeg[..]);
    decoder.decode().unwrap();
    let info = decoder.info().unwrap();
    assert_eq!((info.width, info.height), (20, 10));
  }

  #[test]
  fn grey_alpha_cannot_be_encoded_as_jpeg() {
    let bitmap = Bitmap {
      width: 1,
      height: 1,
      color: png::ColorType::GrayscaleAlpha,
      data: vec![0, 0],
    };
    assert!(matches!(
      encode_jpeg(&bitmap, 90),
      Err(BackendError::UnsupportedLayout(_))
    ));
  }
}
