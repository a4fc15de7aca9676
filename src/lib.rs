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

//! # imgbench
//!
//! `imgbench` measures the relative throughput of three Rust image libraries
//! (`image`, `tiny-skia` and the standalone `png`/`jpeg-*` codec crates) over
//! a fixed table of operations: create, decode, encode, fill, composite,
//! set channel, clone and crop. Results are reported as operations per second
//! in a console table, a markdown file, a JSON file and a rendered PNG.
//!
//! This crate contains the main library logic for the `imgbench` CLI.
//!
//! ## Core Modules
//!
//! * [`backend`]: The competing libraries, behind the [`backend::Backend`] trait.
//! * [`case`]: The [`case::TestCase`] table.
//! * [`suite`]: Lays prepared operations out case by case.
//! * [`harness`]: Times one operation and turns latencies into a rate.
//! * [`benchmark`]: Contains the `run_benchmarks` function which drives the whole run.
//! * [`results`]: The accumulated results table and its JSON shape.
//! * [`report`]: Console table, markdown and JSON output.
//! * [`render`]: The summary image.
//! * [`samples`]: Sample images, overlay palette and gradient.
//! * [`cli`]: Defines the `clap`-based command-line interface.
//! * [`config`]: Layered configuration (defaults, file, env, CLI).
//! * [`error`]: Defines the custom error types for the library.
//! * [`logging`]: Provides the `setup_tracing` utility.

pub mod backend;
pub mod benchmark;
pub mod case;
pub mod cli;
pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod render;
pub mod report;
pub mod results;
pub mod samples;
pub mod suite;
