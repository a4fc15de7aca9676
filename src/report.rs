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

//! Text renderings of a [`ResultsTable`] and the files they end up in.

use crate::error::ReportError;
use crate::results::Outcome;
use crate::results::ResultsTable;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

pub const MARKDOWN_FILE: &str = "README.md";
pub const JSON_FILE: &str = "results.json";
pub const IMAGE_FILE: &str = "results.png";

const INDEX_HEADER: &str = "(index)";

/// Box-drawn table: one row per case, one column per backend, cells centered.
pub fn render_table(table: &ResultsTable) -> String {
  let mut header = vec![INDEX_HEADER.to_string()];
  header.extend(table.backends().iter().cloned());

  let body: Vec<Vec<String>> = table
    .rows()
    .iter()
    .map(|row| {
      let mut cells = vec![row.case.to_string()];
      cells.extend(
        table
          .backends()
          .iter()
          .map(|backend| format_cell(row.get(backend))),
      );
      cells
    })
    .collect();

  let widths: Vec<usize> = (0..header.len())
    .map(|col| {
      std::iter::once(&header)
        .chain(body.iter())
        .map(|cells| cells[col].chars().count())
        .max()
        .unwrap_or(0)
        + 2
    })
    .collect();

  let mut out = String::new();
  out.push_str(&rule(&widths, '┌', '┬', '┐'));
  out.push_str(&line(&header, &widths));
  out.push_str(&rule(&widths, '├', '┼', '┤'));
  for cells in &body {
    out.push_str(&line(cells, &widths));
  }
  out.push_str(&rule(&widths, '└', '┴', '┘'));
  out
}

fn format_cell(outcome: Option<&Outcome>) -> String {
  match outcome {
    Some(Outcome::Rate(rate)) => rate.to_string(),
    Some(Outcome::Failed(_)) => "failed".to_string(),
    None => String::new(),
  }
}

fn rule(widths: &[usize], left: char, mid: char, right: char) -> String {
  let segments: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
  format!("{left}{}{right}\n", segments.join(&mid.to_string()))
}

fn line(cells: &[String], widths: &[usize]) -> String {
  let padded: Vec<String> = cells
    .iter()
    .zip(widths)
    .map(|(cell, width)| center(cell, *width))
    .collect();
  format!("│{}│\n", padded.join("│"))
}

fn center(text: &str, width: usize) -> String {
  let len = text.chars().count();
  let total = width.saturating_sub(len);
  let left = total / 2;
  let right = total - left;
  format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// The text printed to stdout and rendered into the summary image.
pub fn console_text(title: &str, table: &ResultsTable) -> String {
  format!(
    "{title} Benchmark\noperations per second\n{}",
    render_table(table)
  )
}

/// Markdown report: heading, then the console text minus its first line in a
/// code block, each line ending in a hard break.
pub fn markdown(title: &str, console: &str) -> String {
  let body: Vec<&str> = console.lines().skip(1).collect();
  let mut out = format!("# {title} benchmark\n\n```\n");
  for line in body {
    out.push_str(line);
    out.push_str("  \n");
  }
  out.push_str("```\n");
  out
}

/// Paths of the files written by [`write_reports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
  pub markdown: PathBuf,
  pub json: PathBuf,
}

/// Writes `README.md` and `results.json` into `dir`, creating it if needed.
pub fn write_reports(
  dir: &Path,
  title: &str,
  table: &ResultsTable,
) -> Result<ReportPaths, ReportError> {
  fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
    path: dir.to_path_buf(),
    source,
  })?;

  let console = console_text(title, table);
  let paths = ReportPaths {
    markdown: dir.join(MARKDOWN_FILE),
    json: dir.join(JSON_FILE),
  };

  write_file(&paths.markdown, markdown(title, &console).as_bytes())?;
  write_file(&paths.json, serde_json::to_string(table)?.as_bytes())?;

  tracing::info!(
    markdown = %paths.markdown.display(),
    json = %paths.json.display(),
    "Reports written"
  );
  Ok(paths)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
  fs::write(path, contents).map_err(|source| ReportError::Write {
    path: path.to_path_buf(),
    source,
  })
}
