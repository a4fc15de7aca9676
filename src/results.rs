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
use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;

/// Result of one (case, backend) measurement.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  /// Operations per second.
  Rate(f64),
  /// The operation failed or panicked; the reason is kept for the log.
  Failed(String),
}

impl Outcome {
  pub fn rate(&self) -> Option<f64> {
    match self {
      Outcome::Rate(rate) => Some(*rate),
      Outcome::Failed(_) => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
  pub case: TestCase,
  cells: Vec<(String, Outcome)>,
}

impl Row {
  pub fn get(&self, backend: &str) -> Option<&Outcome> {
    self
      .cells
      .iter()
      .find(|(name, _)| name == backend)
      .map(|(_, outcome)| outcome)
  }
}

/// Accumulates outcomes in table order: rows in the order cases are first
/// recorded, columns in the order given to [`ResultsTable::new`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultsTable {
  backends: Vec<String>,
  rows: Vec<Row>,
}

impl ResultsTable {
  pub fn new<I, S>(backends: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      backends: backends.into_iter().map(Into::into).collect(),
      rows: Vec::new(),
    }
  }

  /// Stores `outcome`, replacing any earlier outcome for the same cell.
  pub fn record(&mut self, case: TestCase, backend: &str, outcome: Outcome) {
    if !self.backends.iter().any(|b| b == backend) {
      self.backends.push(backend.to_string());
    }

    let row = match self.rows.iter().position(|r| r.case == case) {
      Some(i) => &mut self.rows[i],
      None => {
        self.rows.push(Row {
          case,
          cells: Vec::new(),
        });
        let last = self.rows.len() - 1;
        &mut self.rows[last]
      }
    };

    match row.cells.iter_mut().find(|(name, _)| name == backend) {
      Some(cell) => cell.1 = outcome,
      None => row.cells.push((backend.to_string(), outcome)),
    }
  }

  pub fn get(&self, case: TestCase, backend: &str) -> Option<&Outcome> {
    self.rows.iter().find(|r| r.case == case)?.get(backend)
  }

  pub fn backends(&self) -> &[String] {
    &self.backends
  }

  pub fn rows(&self) -> &[Row] {
    &self.rows
  }

  /// Number of recorded outcomes.
  pub fn len(&self) -> usize {
    self.rows.iter().map(|r| r.cells.len()).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  pub fn failures(&self) -> usize {
    self
      .rows
      .iter()
      .flat_map(|r| r.cells.iter())
      .filter(|(_, o)| matches!(o, Outcome::Failed(_)))
      .count()
  }
}

/// `{"case": {"backend": rate | null}}`, both levels in table order.
impl Serialize for ResultsTable {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.rows.len()))?;
    for row in &self.rows {
      map.serialize_entry(row.case.as_str(), &RowCells(self, row))?;
    }
    map.end()
  }
}

struct RowCells<'a>(&'a ResultsTable, &'a Row);

impl Serialize for RowCells<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let RowCells(table, row) = self;
    let mut map = serializer.serialize_map(Some(row.cells.len()))?;
    for backend in &table.backends {
      if let Some(outcome) = row.get(backend) {
        map.serialize_entry(backend, &outcome.rate())?;
      }
    }
    map.end()
  }
}
