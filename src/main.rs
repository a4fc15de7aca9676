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
use Commands::InitConfig;
use Commands::List;
use Commands::Run;
use anyhow::Result;
use clap::Parser;
use imgbench::backend;
use imgbench::benchmark::run_benchmarks;
use imgbench::case::TestCase;
use imgbench::cli::Cli;
use imgbench::cli::Commands;
use imgbench::config::Config;
use imgbench::config::write_default_config;
use imgbench::logging::setup_tracing;

#[tokio::main]
async fn main() -> Result<()> {
  let _guard = setup_tracing()?;

  let Cli { command } = Cli::parse();
  let main_span = tracing::info_span!("imgbench");
  let _enter = main_span.enter();

  match command {
    Run(run_args) => {
      tracing::info!("Initializing Benchmark Run...");

      let config = Config::load(&run_args)?;
      tracing::debug!(?config, "Resolved configuration");

      let summary = run_benchmarks(config).await?;

      tracing::info!(
        measurements = summary.table.len(),
        failures = summary.table.failures(),
        "Benchmark Run Complete."
      );
    }
    List(run_args) => {
      let config = Config::load(&run_args)?;
      let backends: Vec<_> = backend::registry()
        .into_iter()
        .filter(|b| config.wants_backend(b.name()))
        .collect();

      for case in TestCase::ALL.into_iter().filter(|&c| config.wants_case(c)) {
        let names: Vec<&str> = backends
          .iter()
          .filter(|b| b.cases().contains(&case))
          .map(|b| b.name())
          .collect();
        if !names.is_empty() {
          println!("{case}: {}", names.join(", "));
        }
      }
    }
    InitConfig { path, force } => {
      write_default_config(&path, force)?;
    }
  }

  Ok(())
}
