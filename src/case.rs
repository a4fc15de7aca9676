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
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A named image operation benchmarked identically across every library
/// that declares it.
///
/// Declaration order is table order: reports list cases in the order of
/// [`TestCase::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCase {
  Create,
  DecodePng,
  DecodeJpeg,
  EncodePng,
  EncodeJpeg,
  Composite,
  FillStatic,
  FillFunc,
  SetChannel,
  Clone,
  Crop,
}

impl TestCase {
  pub const ALL: [TestCase; 11] = [
    TestCase::Create,
    TestCase::DecodePng,
    TestCase::DecodeJpeg,
    TestCase::EncodePng,
    TestCase::EncodeJpeg,
    TestCase::Composite,
    TestCase::FillStatic,
    TestCase::FillFunc,
    TestCase::SetChannel,
    TestCase::Clone,
    TestCase::Crop,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      TestCase::Create => "create",
      TestCase::DecodePng => "decode_png",
      TestCase::DecodeJpeg => "decode_jpeg",
      TestCase::EncodePng => "encode_png",
      TestCase::EncodeJpeg => "encode_jpeg",
      TestCase::Composite => "composite",
      TestCase::FillStatic => "fill_static",
      TestCase::FillFunc => "fill_func",
      TestCase::SetChannel => "set_channel",
      TestCase::Clone => "clone",
      TestCase::Crop => "crop",
    }
  }
}

impl fmt::Display for TestCase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown test case '{0}'")]
pub struct ParseCaseError(pub String);

impl FromStr for TestCase {
  type Err = ParseCaseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    TestCase::ALL
      .into_iter()
      .find(|case| case.as_str().eq_ignore_ascii_case(wanted))
      .ok_or_else(|| ParseCaseError(s.to_string()))
  }
}
