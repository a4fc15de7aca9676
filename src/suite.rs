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
use crate::backend::Backend;
use crate::backend::Operation;
use crate::case::TestCase;
use crate::samples::CaseParams;
use crate::samples::SampleSet;
use std::collections::HashMap;

/// One library's operation for a test case.
#[derive(Clone)]
pub struct Runner {
  pub backend: &'static str,
  pub operation: Operation,
}

/// A row of the test-case table: the case and every library defining it.
#[derive(Clone)]
pub struct CaseEntry {
  pub case: TestCase,
  pub runners: Vec<Runner>,
}

/// The test-case table, ready to run.
pub struct Suite {
  /// Backends that prepared successfully, in column order.
  pub backends: Vec<&'static str>,
  pub cases: Vec<CaseEntry>,
}

impl Suite {
  /// Prepares every backend and lays their operations out case by case.
  ///
  /// A backend that fails to prepare is logged and left out; the others
  /// still run. Cases rejected by `wants_case`, or declared by no prepared
  /// backend, get no row.
  pub fn prepare(
    backends: &[Box<dyn Backend>],
    samples: &SampleSet,
    params: &CaseParams,
    wants_case: impl Fn(TestCase) -> bool,
  ) -> Self {
    let mut columns = Vec::new();
    let mut by_case: HashMap<TestCase, Vec<Runner>> = HashMap::new();

    for backend in backends {
      let name = backend.name();
      match backend.prepare(samples, params) {
        Ok(ops) => {
          tracing::debug!(backend = name, operations = ops.len(), "Backend prepared");
          columns.push(name);
          for (case, operation) in ops {
            by_case.entry(case).or_default().push(Runner {
              backend: name,
              operation,
            });
          }
        }
        Err(e) => {
          tracing::error!(backend = name, error = %e, "Failed to prepare backend. Skipping.");
        }
      }
    }

    let cases = TestCase::ALL
      .into_iter()
      .filter(|&case| wants_case(case))
      .filter_map(|case| {
        let runners = by_case.remove(&case)?;
        Some(CaseEntry { case, runners })
      })
      .collect();

    Suite {
      backends: columns,
      cases,
    }
  }

  /// Number of measurements a run performs.
  pub fn len(&self) -> usize {
    self.cases.iter().map(|c| c.runners.len()).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
