// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! File-backed numeric sources.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::RuntimeConfig;
use crate::domain::{File, Parameterized};
use crate::error::{Error, Result};
use crate::param::{ParameterDirectory, Slot};

/// Delimited numeric text file, one record per line, no header.
///
/// Leading records can be skipped with the `skip_lines` parameter. The
/// delimiter comes from [`RuntimeConfig`] at read time.
pub struct CsvFile {
    params: ParameterDirectory,
    path: PathBuf,
    skip_lines: Arc<Slot<i32>>,
}

impl CsvFile {
    /// Fails when `path` is not a readable file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::ConstructionFailure(format!(
                "could not open file {}",
                path.display()
            )));
        }

        let mut params = ParameterDirectory::new();
        let skip_lines = params.register("skip_lines", 0_i32);
        Ok(Self {
            params,
            path: path.to_path_buf(),
            skip_lines,
        })
    }
}

impl Parameterized for CsvFile {
    fn name(&self) -> &str {
        "CSVFile"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl File for CsvFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> Result<Vec<Vec<f64>>> {
        let display = self.path.display();
        let delimiter = RuntimeConfig::global().settings().csv_delimiter;
        let skip = usize::try_from(self.skip_lines.get()).unwrap_or(0);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(delimiter)
            .from_path(&self.path)
            .map_err(|e| Error::Collaborator(format!("{}: {}", display, e)))?;

        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (index, record) in reader.records().enumerate().skip(skip) {
            let record = record.map_err(|e| Error::Collaborator(format!("{}: {}", display, e)))?;
            let row = record
                .iter()
                .map(|field| {
                    field.parse::<f64>().map_err(|_| {
                        Error::Collaborator(format!(
                            "{}:{}: '{}' is not a number",
                            display,
                            index + 1,
                            field
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(Error::Collaborator(format!(
                        "{}:{}: expected {} fields, found {}",
                        display,
                        index + 1,
                        first.len(),
                        row.len()
                    )));
                }
            }
            rows.push(row);
        }

        log::debug!("[file] read {} rows from {}", rows.len(), display);
        Ok(rows)
    }
}
