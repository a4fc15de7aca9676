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

//! Timing of a single operation.
//!
//! Each invocation is timed on its own with [`Instant`]; the statistics are
//! accumulated online so a measurement of a nanosecond-scale operation does
//! not grow a sample buffer.

use crate::backend::Operation;
use crate::config::Config;
use crate::error::BackendError;
use crate::error::MeasureError;
use std::time::Duration;
use std::time::Instant;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// How long and how often an operation is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
  pub warmup: Duration,
  pub measure_time: Duration,
  pub min_samples: usize,
  pub max_samples: usize,
}

impl From<&Config> for Settings {
  fn from(config: &Config) -> Self {
    Self {
      warmup: config.warmup(),
      measure_time: config.measure_time(),
      min_samples: config.min_samples,
      max_samples: config.max_samples,
    }
  }
}

/// Latency statistics of one measurement, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
  pub samples: usize,
  pub mean_ns: f64,
  pub std_dev_ns: f64,
  pub min_ns: u64,
  pub max_ns: u64,
}

impl Measurement {
  /// Builds a measurement from raw latencies. `None` when `samples` is empty.
  pub fn from_samples(samples: &[u64]) -> Option<Self> {
    let mut stats = Accumulator::default();
    for &ns in samples {
      stats.push(ns);
    }
    stats.finish()
  }

  /// Reciprocal of the mean latency, per second, rounded to two decimals.
  pub fn ops_per_sec(&self) -> f64 {
    round2(NANOS_PER_SEC / self.mean_ns)
  }

  /// Half-width of the 95% confidence interval, relative to the mean, in percent.
  pub fn margin_percent(&self) -> f64 {
    if self.samples < 2 {
      return 0.0;
    }
    let std_err = self.std_dev_ns / (self.samples as f64).sqrt();
    round2(1.96 * std_err / self.mean_ns * 100.0)
  }
}

fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

/// Welford's online mean and variance.
#[derive(Debug, Default)]
struct Accumulator {
  count: usize,
  mean: f64,
  m2: f64,
  min: u64,
  max: u64,
}

impl Accumulator {
  fn push(&mut self, ns: u64) {
    let ns = ns.max(1);
    if self.count == 0 {
      self.min = ns;
      self.max = ns;
    } else {
      self.min = self.min.min(ns);
      self.max = self.max.max(ns);
    }
    self.count += 1;
    let value = ns as f64;
    let delta = value - self.mean;
    self.mean += delta / self.count as f64;
    self.m2 += delta * (value - self.mean);
  }

  fn finish(&self) -> Option<Measurement> {
    if self.count == 0 {
      return None;
    }
    let variance = if self.count > 1 {
      self.m2 / (self.count - 1) as f64
    } else {
      0.0
    };
    Some(Measurement {
      samples: self.count,
      mean_ns: self.mean,
      std_dev_ns: variance.sqrt(),
      min_ns: self.min,
      max_ns: self.max,
    })
  }
}

/// Runs `operation` through the warmup period (at least once), then times
/// single invocations until `measure_time` has passed and `min_samples` were
/// taken, or `max_samples` were taken. The first error ends the measurement.
pub fn measure(
  operation: &dyn Fn() -> Result<(), BackendError>,
  settings: &Settings,
) -> Result<Measurement, MeasureError> {
  let warmup_start = Instant::now();
  loop {
    operation()?;
    if warmup_start.elapsed() >= settings.warmup {
      break;
    }
  }

  let mut stats = Accumulator::default();
  let start = Instant::now();
  while stats.count < settings.max_samples
    && (stats.count < settings.min_samples || start.elapsed() < settings.measure_time)
  {
    let t = Instant::now();
    operation()?;
    let elapsed = t.elapsed();
    stats.push(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX));
  }

  let measurement = stats.finish().ok_or(MeasureError::NoSamples)?;
  tracing::debug!(
    samples = measurement.samples,
    mean_ns = measurement.mean_ns,
    margin = %format!("±{}%", measurement.margin_percent()),
    "Measurement complete"
  );
  Ok(measurement)
}

/// Runs [`measure`] on tokio's blocking pool so that a panicking library
/// surfaces as [`MeasureError::Panicked`] instead of unwinding the run.
pub async fn measure_blocking(
  operation: Operation,
  settings: Settings,
) -> Result<Measurement, MeasureError> {
  let span = tracing::Span::current();
  tokio::task::spawn_blocking(move || {
    let _entered = span.enter();
    measure(operation.as_ref(), &settings)
  })
  .await
  .map_err(|e| {
    if e.is_panic() {
      MeasureError::Panicked(panic_message(e.into_panic()))
    } else {
      MeasureError::Cancelled
    }
  })?
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic payload".to_string()
  }
}
