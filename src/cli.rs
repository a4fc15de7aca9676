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
use crate::case::TestCase;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
  version,
  about = "Throughput comparison of Rust image-processing libraries"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Runs every test case against every library and writes the reports.
  Run(RunArgs),

  /// Lists the test cases and the libraries that declare them.
  List(RunArgs),

  /// Writes the default configuration as TOML.
  InitConfig {
    /// Destination of the config file.
    #[arg(default_value = crate::config::DEFAULT_CONFIG_FILE)]
    path: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
  },
}

/// Flags shared by `run` and `list`.
///
/// Every field is optional: a flag left out falls through to the environment,
/// the config file and finally the built-in defaults. The struct is merged into
/// the configuration as a serialized provider, so `None` fields are skipped.
#[derive(Debug, Default, Clone, Args, Serialize)]
pub struct RunArgs {
  /// Config file (TOML, or JSON when the extension is `.json`).
  /// Defaults to `imgbench.toml` in the working directory when present.
  #[arg(long, short)]
  #[serde(skip)]
  pub config: Option<PathBuf>,

  /// Heading of the console table and the markdown report.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,

  /// PNG sample image.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub png: Option<PathBuf>,

  /// JPEG sample image.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub jpeg: Option<PathBuf>,

  /// Directory for README.md, results.json and results.png.
  #[arg(long, short)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub output_dir: Option<PathBuf>,

  /// Comma separated backend names (e.g. `image,tiny-skia`).
  #[arg(long, value_delimiter = ',')]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub backends: Option<Vec<String>>,

  /// Comma separated test case names (e.g. `decode_png,crop`).
  #[arg(long, value_delimiter = ',')]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cases: Option<Vec<TestCase>>,

  /// Warmup period per measurement, in milliseconds.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub warmup_ms: Option<u64>,

  /// Measurement period per measurement, in milliseconds.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub measure_ms: Option<u64>,

  /// Minimum number of timed invocations per measurement.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_samples: Option<usize>,

  /// Maximum number of timed invocations per measurement.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_samples: Option<usize>,

  /// Pause between measurements, in milliseconds.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cooldown_ms: Option<u64>,

  /// Edge length of the images allocated by the create and fill cases.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub size: Option<u32>,

  /// Font used to render results.png.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub font: Option<PathBuf>,

  /// Font size of results.png, in pixels.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub font_size: Option<f32>,
}
