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

//! Renders the console text into `results.png`: black glyphs on opaque
//! white, rasterized with `ab_glyph` straight into an `image` buffer.

use crate::error::RenderError;
use ab_glyph::Font;
use ab_glyph::FontVec;
use ab_glyph::PxScale;
use ab_glyph::ScaleFont;
use ab_glyph::point;
use image::ImageFormat;
use image::Rgba;
use image::RgbaImage;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Monospace fonts tried, in order, when no font is configured.
const SYSTEM_FONTS: &[&str] = &[
  "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
  "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
  "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
  "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
  "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
  "/System/Library/Fonts/Menlo.ttc",
  "/Library/Fonts/Courier New.ttf",
  "C:\\Windows\\Fonts\\consola.ttf",
  "C:\\Windows\\Fonts\\cour.ttf",
];

/// Margin around the text, in pixels.
const PADDING: u32 = 16;

/// Picks the font for the summary image.
///
/// A configured path is returned as is (a broken one fails later, when it is
/// loaded). Otherwise the first existing entry of [`SYSTEM_FONTS`]; `None`
/// when there is none.
pub fn resolve_font(configured: Option<&Path>) -> Option<PathBuf> {
  if let Some(path) = configured {
    return Some(path.to_path_buf());
  }
  SYSTEM_FONTS
    .iter()
    .map(PathBuf::from)
    .find(|candidate| candidate.is_file())
}

pub fn load_font(path: &Path) -> Result<FontVec, RenderError> {
  let bytes = fs::read(path).map_err(|source| RenderError::ReadFont {
    path: path.to_path_buf(),
    source,
  })?;
  FontVec::try_from_vec(bytes).map_err(|_| RenderError::InvalidFont(path.to_path_buf()))
}

/// Lays `text` out line by line and rasterizes it.
pub fn render_text(font: &impl Font, size: f32, text: &str) -> Result<RgbaImage, RenderError> {
  let lines: Vec<&str> = text.lines().collect();
  if lines.iter().all(|l| l.trim().is_empty()) {
    return Err(RenderError::EmptyText);
  }

  let scale = PxScale::from(size);
  let scaled = font.as_scaled(scale);
  let line_height = scaled.height() + scaled.line_gap();

  let text_width = lines
    .iter()
    .map(|line| line_width(&scaled, line))
    .fold(0.0f32, f32::max);
  let width = text_width.ceil() as u32 + 2 * PADDING;
  let height = (line_height * lines.len() as f32).ceil() as u32 + 2 * PADDING;

  let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

  for (row, line) in lines.iter().enumerate() {
    let baseline = PADDING as f32 + scaled.ascent() + line_height * row as f32;
    let mut caret = PADDING as f32;

    for ch in line.chars() {
      let id = font.glyph_id(ch);
      let glyph = id.with_scale_and_position(scale, point(caret, baseline));
      caret += scaled.h_advance(id);

      let Some(outlined) = font.outline_glyph(glyph) else {
        continue;
      };
      let bounds = outlined.px_bounds();
      outlined.draw(|gx, gy, coverage| {
        let x = bounds.min.x as i64 + gx as i64;
        let y = bounds.min.y as i64 + gy as i64;
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
          return;
        }
        let pixel = canvas.get_pixel_mut(x as u32, y as u32);
        let ink = (255.0 * (1.0 - coverage.clamp(0.0, 1.0))).round() as u8;
        for channel in &mut pixel.0[..3] {
          *channel = (*channel).min(ink);
        }
      });
    }
  }

  Ok(canvas)
}

fn line_width<F: Font, SF: ScaleFont<F>>(scaled: &SF, line: &str) -> f32 {
  line.chars().map(|ch| scaled.h_advance(scaled.glyph_id(ch))).sum()
}

/// Renders `text` with the font at `font_path` and writes it as PNG to `out`.
pub fn write_summary_image(
  font_path: &Path,
  size: f32,
  text: &str,
  out: &Path,
) -> Result<(), RenderError> {
  let font = load_font(font_path)?;
  let canvas = render_text(&font, size, text)?;
  canvas.save_with_format(out, ImageFormat::Png)?;
  tracing::info!(
    path = %out.display(),
    font = %font_path.display(),
    width = canvas.width(),
    height = canvas.height(),
    "Summary image written"
  );
  Ok(())
}
