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
use crate::backend;
use crate::case::TestCase;
use crate::cli::RunArgs;
use crate::error::ConfigError;
use figment::Figment;
use figment::providers::Env;
use figment::providers::Format;
use figment::providers::Json;
use figment::providers::Serialized;
use figment::providers::Toml;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "imgbench.toml";

/// Prefix of the environment variables merged into the configuration.
pub const ENV_PREFIX: &str = "IMGBENCH_";

/// Largest accepted `font_size`, in pixels.
pub const MAX_FONT_SIZE: f32 = 1024.0;

/// Region cut out of the decoded sample by the `crop` case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}

impl Default for CropRegion {
  fn default() -> Self {
    Self {
      x: 16,
      y: 16,
      width: 16,
      height: 16,
    }
  }
}

/// Fully resolved configuration for one benchmark run.
///
/// Built from, lowest priority first: [`Config::default`], the config file,
/// `IMGBENCH_*` environment variables and finally CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Heading used in the console output and the markdown report.
  pub title: String,
  /// PNG sample used by the decode, encode, composite, clone and crop cases.
  pub png: PathBuf,
  /// JPEG sample used by `decode_jpeg`.
  pub jpeg: PathBuf,
  /// Directory receiving `README.md`, `results.json` and `results.png`.
  pub output_dir: PathBuf,
  /// Backends to run, by name. Empty means all of them.
  pub backends: Vec<String>,
  /// Test cases to run. Empty means all of them.
  pub cases: Vec<TestCase>,
  pub warmup_ms: u64,
  pub measure_ms: u64,
  pub min_samples: usize,
  pub max_samples: usize,
  /// Pause between two measurements.
  pub cooldown_ms: u64,
  /// Edge length of the images allocated by `create`, `fill_static` and `fill_func`.
  pub size: u32,
  /// Alpha multiplier applied by `set_channel`.
  pub opacity: f32,
  pub jpeg_quality: u8,
  /// Font for the summary image. When unset, common monospace system fonts are tried.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub font: Option<PathBuf>,
  pub font_size: f32,
  pub crop: CropRegion,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      title: "imgbench".to_string(),
      png: PathBuf::from("samples/image.png"),
      jpeg: PathBuf::from("samples/external.jpg"),
      output_dir: PathBuf::from("bench-results"),
      backends: Vec::new(),
      cases: Vec::new(),
      warmup_ms: 250,
      measure_ms: 3000,
      min_samples: 5,
      max_samples: 1_000_000,
      cooldown_ms: 3000,
      size: 1024,
      opacity: 0.5,
      jpeg_quality: 90,
      font: None,
      font_size: 32.0,
      crop: CropRegion::default(),
    }
  }
}

impl Config {
  /// Resolves the layered configuration for a `run` (or `list`) invocation.
  pub fn load(args: &RunArgs) -> Result<Self, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    match &args.config {
      Some(path) => {
        if !path.exists() {
          return Err(ConfigError::FileNotFound(path.clone()));
        }
        figment = merge_file(figment, path);
      }
      None => {
        let implicit = Path::new(DEFAULT_CONFIG_FILE);
        if implicit.exists() {
          tracing::debug!(path = %implicit.display(), "Using config file from working directory");
          figment = merge_file(figment, implicit);
        }
      }
    }

    let config: Config = figment
      .merge(Env::prefixed(ENV_PREFIX).ignore(&["log_file"]))
      .merge(Serialized::defaults(args))
      .extract()
      .map_err(|e| ConfigError::Extract(Box::new(e)))?;

    config.validate()?;
    Ok(config)
  }

  /// Checks invariants that serde cannot express.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.measure_ms == 0 {
      return Err(invalid("measure_ms", "must be greater than zero"));
    }
    if self.min_samples == 0 {
      return Err(invalid("min_samples", "must be at least 1"));
    }
    if self.max_samples < self.min_samples {
      return Err(invalid(
        "max_samples",
        format!("must be >= min_samples ({})", self.min_samples),
      ));
    }
    if self.size == 0 {
      return Err(invalid("size", "must be greater than zero"));
    }
    if self.crop.width == 0 || self.crop.height == 0 {
      return Err(invalid("crop", "width and height must be greater than zero"));
    }
    if i32::try_from(self.crop.x).is_err() || i32::try_from(self.crop.y).is_err() {
      return Err(invalid("crop", format!("x and y must not exceed {}", i32::MAX)));
    }
    if !(0.0..=1.0).contains(&self.opacity) {
      return Err(invalid("opacity", "must be within 0.0..=1.0"));
    }
    if !(1..=100).contains(&self.jpeg_quality) {
      return Err(invalid("jpeg_quality", "must be within 1..=100"));
    }
    if !(self.font_size > 0.0 && self.font_size <= MAX_FONT_SIZE) {
      return Err(invalid(
        "font_size",
        format!("must be within 0.0 (exclusive) and {MAX_FONT_SIZE}"),
      ));
    }

    let available = backend::names();
    for name in &self.backends {
      if !available.contains(&name.as_str()) {
        return Err(ConfigError::UnknownBackend {
          name: name.clone(),
          available,
        });
      }
    }
    Ok(())
  }

  /// True when `name` survives the `backends` filter.
  pub fn wants_backend(&self, name: &str) -> bool {
    self.backends.is_empty() || self.backends.iter().any(|b| b == name)
  }

  /// True when `case` survives the `cases` filter.
  pub fn wants_case(&self, case: TestCase) -> bool {
    self.cases.is_empty() || self.cases.contains(&case)
  }

  pub fn warmup(&self) -> Duration {
    Duration::from_millis(self.warmup_ms)
  }

  pub fn measure_time(&self) -> Duration {
    Duration::from_millis(self.measure_ms)
  }

  pub fn cooldown(&self) -> Duration {
    Duration::from_millis(self.cooldown_ms)
  }
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
  let is_json = path
    .extension()
    .and_then(|e| e.to_str())
    .is_some_and(|e| e.eq_ignore_ascii_case("json"));

  if is_json {
    figment.merge(Json::file(path))
  } else {
    figment.merge(Toml::file(path))
  }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
  ConfigError::Invalid {
    field,
    reason: reason.into(),
  }
}

/// Writes the default configuration as TOML to `path`.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), ConfigError> {
  if path.exists() && !force {
    return Err(ConfigError::AlreadyExists(path.to_path_buf()));
  }

  let body = toml::to_string_pretty(&Config::default())?;
  fs::write(path, body).map_err(|source| ConfigError::Write {
    path: path.to_path_buf(),
    source,
  })?;

  tracing::info!(path = %path.display(), "Default config written");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  fn args_with_config(path: PathBuf) -> RunArgs {
    RunArgs {
      config: Some(path),
      ..RunArgs::default()
    }
  }

  #[test]
  fn defaults_are_valid() {
    Config::default().validate().unwrap();
  }

  #[test]
  fn toml_file_overrides_defaults_and_cli_overrides_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bench.toml");
    fs::write(
      &path,
      "title = \"from-file\"\ncooldown_ms = 10\ncases = [\"crop\", \"clone\"]\n\n[crop]\nx = 1\ny = 2\nwidth = 3\nheight = 4\n",
    )
    .unwrap();

    let mut args = args_with_config(path);
    args.title = Some("from-cli".to_string());

    let config = Config::load(&args).unwrap();
    assert_eq!(config.title, "from-cli");
    assert_eq!(config.cooldown_ms, 10);
    assert_eq!(config.cases, vec![TestCase::Crop, TestCase::Clone]);
    assert_eq!(
      config.crop,
      CropRegion {
        x: 1,
        y: 2,
        width: 3,
        height: 4
      }
    );
    assert_eq!(config.measure_ms, Config::default().measure_ms);
  }

  #[test]
  fn json_file_is_read_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bench.json");
    fs::write(&path, r#"{"backends": ["image"], "size": 64}"#).unwrap();

    let config = Config::load(&args_with_config(path)).unwrap();
    assert_eq!(config.backends, vec!["image".to_string()]);
    assert_eq!(config.size, 64);
  }

  #[test]
  fn missing_explicit_config_file_is_an_error() {
    let err = Config::load(&args_with_config(PathBuf::from("/nonexistent/imgbench.toml")))
      .unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
  }

  #[test]
  fn unknown_backend_is_rejected() {
    let config = Config {
      backends: vec!["imagemagick".to_string()],
      ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::UnknownBackend { ref name, .. } if name == "imagemagick"));
  }

  #[test]
  fn out_of_range_values_are_rejected() {
    let cases = [
      Config {
        measure_ms: 0,
        ..Config::default()
      },
      Config {
        min_samples: 10,
        max_samples: 5,
        ..Config::default()
      },
      Config {
        opacity: 1.5,
        ..Config::default()
      },
      Config {
        jpeg_quality: 0,
        ..Config::default()
      },
      Config {
        font_size: 0.0,
        ..Config::default()
      },
      Config {
        font_size: MAX_FONT_SIZE * 2.0,
        ..Config::default()
      },
      Config {
        font_size: f32::NAN,
        ..Config::default()
      },
    ];
    for config in cases {
      assert!(config.validate().is_err(), "{config:?} should be invalid");
    }
  }

  #[test]
  fn crop_offsets_must_fit_a_signed_coordinate() {
    let config = Config {
      crop: CropRegion {
        x: u32::MAX - 7,
        y: 0,
        width: 16,
        height: 16,
      },
      ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "crop", .. }));

    let at_limit = Config {
      crop: CropRegion {
        x: i32::MAX as u32,
        y: i32::MAX as u32,
        width: 1,
        height: 1,
      },
      ..Config::default()
    };
    at_limit.validate().unwrap();
  }

  #[test]
  fn filters_default_to_everything() {
    let config = Config::default();
    assert!(config.wants_backend("tiny-skia"));
    assert!(TestCase::ALL.into_iter().all(|c| config.wants_case(c)));

    let config = Config {
      backends: vec!["image".to_string()],
      cases: vec![TestCase::Crop],
      ..Config::default()
    };
    assert!(config.wants_backend("image"));
    assert!(!config.wants_backend("codecs"));
    assert!(config.wants_case(TestCase::Crop));
    assert!(!config.wants_case(TestCase::Clone));
  }

  #[test]
  fn init_config_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("imgbench.toml");

    write_default_config(&path, false).unwrap();
    let written: Config = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, Config::default());

    let err = write_default_config(&path, false).unwrap_err();
    assert!(matches!(err, ConfigError::AlreadyExists(_)));
    write_default_config(&path, true).unwrap();
  }
}
