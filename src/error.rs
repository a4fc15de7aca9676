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
use std::path::PathBuf;
use thiserror::Error;

/// Errors related to configuration resolution (src/config.rs).
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to resolve configuration: {0}")]
  Extract(#[from] Box<figment::Error>),

  #[error("Config file not found: {0}")]
  FileNotFound(PathBuf),

  #[error("Unknown backend '{name}'. Available: {available:?}")]
  UnknownBackend {
    name: String,
    available: Vec<&'static str>,
  },

  #[error("Invalid value for '{field}': {reason}")]
  Invalid { field: &'static str, reason: String },

  #[error("Refusing to overwrite existing config file {0} (use --force)")]
  AlreadyExists(PathBuf),

  #[error("Failed to serialize default config")]
  Serialize(#[from] toml::ser::Error),

  #[error("Failed to write config file: {path}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Errors related to loading the sample images (src/samples.rs).
#[derive(Error, Debug)]
pub enum SampleError {
  #[error("Failed to read sample image: {path}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Sample image is empty: {0}")]
  Empty(PathBuf),
}

/// Errors raised by a library while preparing or running an operation
/// (src/backend).
#[derive(Error, Debug)]
pub enum BackendError {
  #[error("image: {0}")]
  Image(#[from] image::ImageError),

  #[error("png decode: {0}")]
  PngDecode(#[from] png::DecodingError),

  #[error("png encode: {0}")]
  PngEncode(#[from] png::EncodingError),

  #[error("jpeg decode: {0}")]
  JpegDecode(#[from] jpeg_decoder::Error),

  #[error("jpeg encode: {0}")]
  JpegEncode(#[from] jpeg_encoder::EncodingError),

  #[error("tiny-skia: {0}")]
  Skia(String),

  #[error("Unsupported pixel layout: {0}")]
  UnsupportedLayout(String),

  #[error("Dimensions {width}x{height} exceed what the library accepts")]
  Dimensions { width: u32, height: u32 },
}

/// Errors that end a single measurement (src/harness.rs).
#[derive(Error, Debug)]
pub enum MeasureError {
  #[error(transparent)]
  Operation(#[from] BackendError),

  #[error("Operation panicked: {0}")]
  Panicked(String),

  #[error("Measurement was cancelled")]
  Cancelled,

  #[error("No samples were collected")]
  NoSamples,
}

/// Errors related to writing the markdown and JSON reports (src/report.rs).
#[derive(Error, Debug)]
pub enum ReportError {
  #[error("Failed to create output directory: {path}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to write report file: {path}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to serialize results")]
  Json(#[from] serde_json::Error),
}

/// Errors related to rendering the summary image (src/render.rs).
#[derive(Error, Debug)]
pub enum RenderError {
  #[error("Failed to read font file: {path}")]
  ReadFont {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Not a usable TrueType/OpenType font: {0}")]
  InvalidFont(PathBuf),

  #[error("Nothing to render")]
  EmptyText,

  #[error("Failed to encode summary image")]
  Encode(#[from] image::ImageError),
}
