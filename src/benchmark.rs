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
use crate::config::Config;
use crate::harness;
use crate::harness::Settings;
use crate::render;
use crate::report;
use crate::results::Outcome;
use crate::results::ResultsTable;
use crate::samples::CaseParams;
use crate::samples::SampleSet;
use crate::suite::Suite;
use anyhow::Context;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Instrument;

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
  pub table: ResultsTable,
  pub markdown: PathBuf,
  pub json: PathBuf,
  /// `None` when no font was available.
  pub image: Option<PathBuf>,
}

/// Main benchmark runner.
pub async fn run_benchmarks(config: Config) -> Result<RunSummary> {
  let span = tracing::info_span!(
    "run_benchmarks",
    png = %config.png.display(),
    jpeg = %config.jpeg.display()
  );

  run(&config).instrument(span).await
}

async fn run(config: &Config) -> Result<RunSummary> {
  tracing::info!("--- Starting Benchmark Run ---");

  let samples =
    SampleSet::load(&config.png, &config.jpeg).context("Failed to load sample images")?;

  let backends: Vec<_> = backend::registry()
    .into_iter()
    .filter(|b| config.wants_backend(b.name()))
    .collect();
  let suite = Suite::prepare(&backends, &samples, &CaseParams::from(config), |case| {
    config.wants_case(case)
  });
  if suite.is_empty() {
    anyhow::bail!("Nothing to run: no backend prepared successfully for the selected cases");
  }

  let table = run_suite(&suite, Settings::from(config), config.cooldown()).await;

  let console = report::console_text(&config.title, &table);
  println!("{console}");

  let paths = report::write_reports(&config.output_dir, &config.title, &table)
    .context("Failed to write reports")?;

  let image = match render::resolve_font(config.font.as_deref()) {
    Some(font) => {
      let out = config.output_dir.join(report::IMAGE_FILE);
      render::write_summary_image(&font, config.font_size, &console, &out)
        .context("Failed to render summary image")?;
      Some(out)
    }
    None => {
      tracing::warn!("No monospace system font found and none configured. Skipping summary image.");
      None
    }
  };

  if table.failures() > 0 {
    tracing::warn!(failures = table.failures(), "Some measurements failed");
  }
  tracing::info!("--- Benchmark run complete ---");

  Ok(RunSummary {
    table,
    markdown: paths.markdown,
    json: paths.json,
    image,
  })
}

/// Measures every runner of every case, in table order, pausing `cooldown`
/// between two measurements. A failing runner is recorded and the loop moves on.
pub async fn run_suite(suite: &Suite, settings: Settings, cooldown: Duration) -> ResultsTable {
  let mut table = ResultsTable::new(suite.backends.iter().copied());
  let total = suite.len();
  let mut done = 0usize;

  for entry in &suite.cases {
    let case_span = tracing::info_span!("run_case", case = %entry.case);
    async {
      for runner in &entry.runners {
        if done > 0 && !cooldown.is_zero() {
          tokio::time::sleep(cooldown).await;
        }

        tracing::info!("running tests, {}% done", percent(done, total));
        let outcome = harness::measure_blocking(runner.operation.clone(), settings)
          .instrument(tracing::info_span!("measure", backend = runner.backend))
          .await;

        let outcome = match outcome {
          Ok(measurement) => {
            let rate = measurement.ops_per_sec();
            tracing::info!(
              backend = runner.backend,
              ops_per_sec = rate,
              samples = measurement.samples,
              margin = %format!("±{}%", measurement.margin_percent()),
              "Measured"
            );
            Outcome::Rate(rate)
          }
          Err(e) => {
            tracing::error!(backend = runner.backend, error = %e, "Measurement failed");
            Outcome::Failed(e.to_string())
          }
        };
        table.record(entry.case, runner.backend, outcome);
        done += 1;
      }
    }
    .instrument(case_span)
    .await;
  }

  tracing::info!("running tests, 100% done");
  table
}

fn percent(done: usize, total: usize) -> usize {
  if total == 0 {
    return 100;
  }
  ((done as f64 / total as f64) * 100.0).round() as usize
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::Operation;
  use crate::case::TestCase;
  use crate::error::BackendError;
  use crate::suite::CaseEntry;
  use crate::suite::Runner;
  use std::sync::Arc;
  use std::sync::atomic::AtomicUsize;
  use std::sync::atomic::Ordering;

  fn quick() -> Settings {
    Settings {
      warmup: Duration::ZERO,
      measure_time: Duration::from_millis(2),
      min_samples: 2,
      max_samples: 20,
    }
  }

  fn counting(counter: &Arc<AtomicUsize>) -> Operation {
    let counter = counter.clone();
    Arc::new(move || -> Result<(), BackendError> {
      counter.fetch_add(1, Ordering::Relaxed);
      Ok(())
    })
  }

  fn failing() -> Operation {
    Arc::new(|| -> Result<(), BackendError> { Err(BackendError::Skia("boom".to_string())) })
  }

  fn panicking() -> Operation {
    Arc::new(|| -> Result<(), BackendError> { panic!("library bug") })
  }

  #[tokio::test]
  async fn failures_do_not_block_other_cases() {
    let calls = Arc::new(AtomicUsize::new(0));
    let suite = Suite {
      backends: vec!["good", "bad"],
      cases: vec![
        CaseEntry {
          case: TestCase::DecodePng,
          runners: vec![
            Runner {
              backend: "bad",
              operation: failing(),
            },
            Runner {
              backend: "good",
              operation: counting(&calls),
            },
          ],
        },
        CaseEntry {
          case: TestCase::Clone,
          runners: vec![
            Runner {
              backend: "bad",
              operation: panicking(),
            },
            Runner {
              backend: "good",
              operation: counting(&calls),
            },
          ],
        },
      ],
    };

    let table = run_suite(&suite, quick(), Duration::ZERO).await;

    assert_eq!(table.len(), 4);
    assert_eq!(table.failures(), 2);
    assert!(matches!(
      table.get(TestCase::DecodePng, "bad"),
      Some(Outcome::Failed(_))
    ));
    assert!(matches!(
      table.get(TestCase::Clone, "bad"),
      Some(Outcome::Failed(msg)) if msg.contains("library bug")
    ));
    assert!(table.get(TestCase::Clone, "good").unwrap().rate().unwrap() > 0.0);
    assert!(calls.load(Ordering::Relaxed) >= 2 * 3);
  }

  #[tokio::test]
  async fn columns_follow_the_suite_not_the_run_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let suite = Suite {
      backends: vec!["first", "second"],
      cases: vec![CaseEntry {
        case: TestCase::Crop,
        runners: vec![Runner {
          backend: "second",
          operation: counting(&calls),
        }],
      }],
    };

    let table = run_suite(&suite, quick(), Duration::ZERO).await;
    assert_eq!(table.backends(), ["first".to_string(), "second".to_string()]);
  }

  #[tokio::test(start_paused = true)]
  async fn cooldown_is_only_applied_between_measurements() {
    let calls = Arc::new(AtomicUsize::new(0));
    let runners = |n: usize| {
      (0..n)
        .map(|_| Runner {
          backend: "only",
          operation: counting(&calls),
        })
        .collect::<Vec<_>>()
    };
    let suite = Suite {
      backends: vec!["only"],
      cases: vec![
        CaseEntry {
          case: TestCase::Create,
          runners: runners(1),
        },
        CaseEntry {
          case: TestCase::FillStatic,
          runners: runners(1),
        },
        CaseEntry {
          case: TestCase::FillFunc,
          runners: runners(1),
        },
      ],
    };

    let start = tokio::time::Instant::now();
    run_suite(&suite, quick(), Duration::from_secs(3)).await;
    // Three measurements, two pauses.
    let slept = start.elapsed();
    assert!(slept >= Duration::from_secs(6), "{slept:?}");
    assert!(slept < Duration::from_secs(9), "{slept:?}");
  }

  #[test]
  fn percent_rounds_and_handles_empty_suites() {
    assert_eq!(percent(0, 3), 0);
    assert_eq!(percent(1, 3), 33);
    assert_eq!(percent(2, 3), 67);
    assert_eq!(percent(0, 0), 100);
  }
}
