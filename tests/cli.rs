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
use assert_cmd::cargo;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;
use tempfile::tempdir;

use image::ImageFormat;
use image::Rgb;
use image::RgbImage;
use image::Rgba;
use image::RgbaImage;
use std::fs;
use std::path::Path;

use imgbench::render::resolve_font;
use serde_json::Value;

/// Writes a small PNG and JPEG into `dir`.
fn write_samples(dir: &Path) {
  let png = RgbaImage::from_fn(48, 48, |x, y| Rgba([(x * 5) as u8, (y * 5) as u8, 128, 255]));
  png
    .save_with_format(dir.join("sample.png"), ImageFormat::Png)
    .unwrap();

  let jpeg = RgbImage::from_fn(48, 48, |x, y| Rgb([(y * 5) as u8, 64, (x * 5) as u8]));
  jpeg
    .save_with_format(dir.join("sample.jpg"), ImageFormat::Jpeg)
    .unwrap();
}

/// A `run` command with near-zero timing, isolated from any config file or
/// environment the developer may have.
fn fast_run(temp: &TempDir) -> Command {
  let mut cmd = Command::new(cargo::cargo_bin!("imgbench"));
  cmd
    .current_dir(temp.path())
    .arg("run")
    .arg("--png")
    .arg(temp.path().join("sample.png"))
    .arg("--jpeg")
    .arg(temp.path().join("sample.jpg"))
    .arg("--output-dir")
    .arg(temp.path().join("out"))
    .args(["--warmup-ms", "0"])
    .args(["--measure-ms", "1"])
    .args(["--min-samples", "1"])
    .args(["--cooldown-ms", "0"])
    .args(["--size", "16"])
    .env_remove("IMGBENCH_LOG_FILE")
    .env_remove("RUST_LOG")
    .env("CLICOLOR", "0");
  cmd
}

#[test]
fn test_run_e2e() {
  let temp = tempdir().unwrap();
  write_samples(temp.path());

  let assert = fast_run(&temp)
    .assert()
    .success()
    .stdout(predicate::str::contains("imgbench Benchmark"))
    .stdout(predicate::str::contains("operations per second"))
    .stdout(predicate::str::contains("(index)"))
    .stdout(predicate::str::contains("decode_png"))
    .stdout(predicate::str::contains("tiny-skia"))
    .stderr(predicate::str::contains("running tests, 0% done"));

  let out = temp.path().join("out");

  // The summary image depends on a monospace font being installed.
  if resolve_font(None).is_some() {
    let summary = image::open(out.join("results.png")).unwrap().to_rgba8();
    assert!(summary.width() > 0 && summary.height() > 0);
    assert!(summary.pixels().all(|p| p.0[3] == 255));
  } else {
    assert.stderr(predicate::str::contains("Skipping summary image"));
    assert!(!out.join("results.png").exists());
  }

  let markdown = fs::read_to_string(out.join("README.md")).unwrap();
  assert!(markdown.starts_with("# imgbench benchmark\n\n```\n"));
  assert!(markdown.contains("operations per second  \n"));
  assert!(markdown.ends_with("```\n"));

  let json_str = fs::read_to_string(out.join("results.json")).unwrap();
  let json: Value = serde_json::from_str(&json_str).unwrap();
  let cases = json.as_object().unwrap();
  assert_eq!(cases.len(), 11);
  assert!(cases["decode_png"]["image"].as_f64().unwrap() > 0.0);
  assert!(cases["decode_png"]["tiny-skia"].as_f64().unwrap() > 0.0);
  assert!(cases["decode_png"]["codecs"].as_f64().unwrap() > 0.0);
  assert!(cases["set_channel"]["image"].as_f64().unwrap() > 0.0);
  assert!(cases["set_channel"].get("codecs").is_none());
}

#[test]
fn test_run_filters_backends_and_cases() {
  let temp = tempdir().unwrap();
  write_samples(temp.path());

  fast_run(&temp)
    .args(["--backends", "codecs"])
    .args(["--cases", "decode_png,decode_jpeg,crop"])
    .args(["--title", "Codec"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Codec Benchmark"));

  let json_str = fs::read_to_string(temp.path().join("out/results.json")).unwrap();
  let json: Value = serde_json::from_str(&json_str).unwrap();
  let cases = json.as_object().unwrap();

  // `crop` is not declared by the codec backend, so its row is dropped.
  assert_eq!(cases.len(), 2);
  assert!(cases.contains_key("decode_png"));
  assert!(cases.contains_key("decode_jpeg"));
  // Rows keep table order in the file itself.
  assert!(json_str.find("decode_png").unwrap() < json_str.find("decode_jpeg").unwrap());
  for case in cases.values() {
    let backends: Vec<&str> = case.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(backends, vec!["codecs"]);
  }

  let markdown = fs::read_to_string(temp.path().join("out/README.md")).unwrap();
  assert!(markdown.starts_with("# Codec benchmark\n"));
}

#[test]
fn test_run_missing_sample() {
  let temp = tempdir().unwrap();

  fast_run(&temp)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load sample images"));

  assert!(!temp.path().join("out").exists());
}

#[test]
fn test_run_unknown_backend() {
  let temp = tempdir().unwrap();
  write_samples(temp.path());

  fast_run(&temp)
    .args(["--backends", "skia-gpu"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Unknown backend 'skia-gpu'"));
}

#[test]
fn test_run_unknown_case() {
  let temp = tempdir().unwrap();
  write_samples(temp.path());

  fast_run(&temp)
    .args(["--cases", "resize"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("resize"));
}

#[test]
fn test_run_unreadable_font() {
  let temp = tempdir().unwrap();
  write_samples(temp.path());

  fast_run(&temp)
    .args(["--cases", "clone"])
    .arg("--font")
    .arg(temp.path().join("missing.ttf"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to render summary image"));

  // Tables are written before the image is rendered.
  assert!(temp.path().join("out/results.json").exists());
  assert!(!temp.path().join("out/results.png").exists());
}

#[test]
fn test_run_reads_config_file() {
  let temp = tempdir().unwrap();
  write_samples(temp.path());
  fs::write(
    temp.path().join("imgbench.toml"),
    "title = \"From File\"\ncases = [\"clone\"]\n",
  )
  .unwrap();

  fast_run(&temp)
    .assert()
    .success()
    .stdout(predicate::str::contains("From File Benchmark"));

  let json_str = fs::read_to_string(temp.path().join("out/results.json")).unwrap();
  let json: Value = serde_json::from_str(&json_str).unwrap();
  let names: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
  assert_eq!(names, vec!["clone"]);
}

#[test]
fn test_list() {
  let temp = tempdir().unwrap();

  let mut cmd = Command::new(cargo::cargo_bin!("imgbench"));
  cmd
    .current_dir(temp.path())
    .arg("list")
    .env("CLICOLOR", "0");

  cmd
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "decode_png: image, tiny-skia, codecs",
    ))
    .stdout(predicate::str::contains("set_channel: image\n"))
    .stdout(predicate::str::contains("crop: image, tiny-skia\n"));
}

#[test]
fn test_list_with_backend_filter() {
  let temp = tempdir().unwrap();

  let mut cmd = Command::new(cargo::cargo_bin!("imgbench"));
  cmd
    .current_dir(temp.path())
    .args(["list", "--backends", "codecs"])
    .env("CLICOLOR", "0");

  cmd
    .assert()
    .success()
    .stdout(predicate::str::contains("encode_jpeg: codecs\n"))
    .stdout(predicate::str::contains("crop").not());
}

#[test]
fn test_init_config() {
  let temp = tempdir().unwrap();
  let path = temp.path().join("imgbench.toml");

  let mut cmd = Command::new(cargo::cargo_bin!("imgbench"));
  cmd.arg("init-config").arg(&path).env("CLICOLOR", "0");
  cmd.assert().success();

  let contents = fs::read_to_string(&path).unwrap();
  assert!(contents.contains("cooldown_ms = 3000"));
  assert!(contents.contains("[crop]"));

  // A second call refuses to clobber the file.
  let mut again = Command::new(cargo::cargo_bin!("imgbench"));
  again.arg("init-config").arg(&path).env("CLICOLOR", "0");
  again
    .assert()
    .failure()
    .stderr(predicate::str::contains("use --force"));

  let mut forced = Command::new(cargo::cargo_bin!("imgbench"));
  forced
    .arg("init-config")
    .arg(&path)
    .arg("--force")
    .env("CLICOLOR", "0");
  forced.assert().success();
}
