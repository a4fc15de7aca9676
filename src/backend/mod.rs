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

//! The competing image libraries.
//!
//! | Backend     | Crates                                | Declared cases                        |
//! |-------------|---------------------------------------|---------------------------------------|
//! | `image`     | `image`                               | all                                   |
//! | `tiny-skia` | `tiny-skia`                           | all but `decode_jpeg`, `encode_jpeg`, `set_channel` |
//! | `codecs`    | `png`, `jpeg-decoder`, `jpeg-encoder` | `decode_*`, `encode_*`                |
//!
//! A backend turns the encoded samples into its own image types once, in
//! [`Backend::prepare`], and hands back one [`Operation`] per declared case.
//! Operations only touch data captured at preparation time, so the harness
//! can call them any number of times from a blocking worker thread.

use crate::case::TestCase;
use crate::error::BackendError;
use crate::samples::CaseParams;
use crate::samples::SampleSet;
use std::sync::Arc;

pub mod codecs;
pub mod image_rs;
pub mod skia;

pub use codecs::Codecs;
pub use image_rs::ImageRs;
pub use skia::TinySkia;

/// A zero-argument benchmarked operation.
pub type Operation = Arc<dyn Fn() -> Result<(), BackendError> + Send + Sync>;

/// One competing library.
pub trait Backend: Send + Sync {
  /// Column name in every report.
  fn name(&self) -> &'static str;

  /// Test cases this library defines, in table order.
  fn cases(&self) -> &'static [TestCase];

  /// Decodes the samples into the library's own types and builds the
  /// operations. Must return exactly one operation per entry of [`Backend::cases`].
  fn prepare(
    &self,
    samples: &SampleSet,
    params: &CaseParams,
  ) -> Result<Vec<(TestCase, Operation)>, BackendError>;
}

/// Every backend, in column order.
pub fn registry() -> Vec<Box<dyn Backend>> {
  vec![Box::new(ImageRs), Box::new(TinySkia), Box::new(Codecs)]
}

pub fn names() -> Vec<&'static str> {
  registry().iter().map(|b| b.name()).collect()
}

/// Wraps a closure as an [`Operation`].
pub(crate) fn operation<F>(f: F) -> Operation
where
  F: Fn() -> Result<(), BackendError> + Send + Sync + 'static,
{
  Arc::new(f)
}
