// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Domain object families and the built-in catalogue.
//!
//! Each family is a trait; the boundary only ever sees them through
//! [`DomainObject`](crate::object::DomainObject). Every object exposes its
//! configuration through a [`ParameterDirectory`].

pub mod combination;
pub mod distance;
pub mod evaluation;
pub mod features;
pub mod file;
pub mod kernel;
pub mod labels;
pub mod machine;

use std::path::Path;
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::accessor::AccessorTable;
use crate::error::{Error, Result};
use crate::param::ParameterDirectory;
use crate::types::ValueKind;

pub use combination::{MajorityVote, MeanRule};
pub use distance::{EuclideanDistance, ManhattanMetric};
pub use evaluation::{MeanSquaredError, MulticlassAccuracy};
pub use features::DenseFeatures;
pub use file::CsvFile;
pub use kernel::{GaussianKernel, LinearKernel};
pub use labels::{DenseLabels, LabelKind};
pub use machine::{Knn, NearestCentroid};

/// Common surface of every domain object.
pub trait Parameterized: Send + Sync {
    /// Class name.
    fn name(&self) -> &str;

    fn params(&self) -> &ParameterDirectory;

    /// `Name(param=value, ...)`, parameters in registration order.
    fn describe(&self) -> String {
        let table = AccessorTable::global();
        let fields: Vec<String> = self
            .params()
            .iter()
            .map(|param| match table.read(param) {
                Ok(value) => format!("{}={}", param.name(), value),
                Err(Error::EmptySlot { .. }) => format!("{}=None", param.name()),
                Err(_) => format!("{}=?", param.name()),
            })
            .collect();
        format!("{}({})", self.name(), fields.join(", "))
    }
}

pub trait Machine: Parameterized {
    fn train(&self, features: &dyn Features) -> Result<()>;

    fn apply(&self, features: &dyn Features) -> Result<Arc<dyn Labels>>;

    fn apply_multiclass(&self, features: &dyn Features) -> Result<Arc<dyn Labels>> {
        let labels = self.apply(features)?;
        if labels.label_kind() != LabelKind::Multiclass {
            return Err(Error::Collaborator(format!(
                "{} produced {} labels, not multiclass",
                self.name(),
                labels.name()
            )));
        }
        Ok(labels)
    }
}

pub trait Kernel: Parameterized {
    fn init(&self, lhs: &dyn Features, rhs: &dyn Features) -> Result<()>;

    /// `lhs.num_vectors() x rhs.num_vectors()` matrix of kernel values.
    fn kernel_matrix(&self) -> Result<DMatrix<f64>>;
}

pub trait Distance: Parameterized {
    fn between(&self, a: &[f64], b: &[f64]) -> f64;

    /// Distances between every column of `lhs` and every column of `rhs`.
    fn pairwise(&self, lhs: &DMatrix<f64>, rhs: &DMatrix<f64>) -> DMatrix<f64> {
        DMatrix::from_fn(lhs.ncols(), rhs.ncols(), |i, j| {
            self.between(column(lhs, i), column(rhs, j))
        })
    }
}

/// Feature matrix with one example per column.
pub trait Features: Parameterized {
    fn element_kind(&self) -> ValueKind;

    fn num_features(&self) -> usize;

    fn num_vectors(&self) -> usize;

    /// Copy of the data as `f64`.
    fn dense(&self) -> DMatrix<f64>;
}

pub trait File: Parameterized {
    fn path(&self) -> &Path;

    /// Parsed numeric rows, one per record.
    fn read_rows(&self) -> Result<Vec<Vec<f64>>>;
}

pub trait Labels: Parameterized {
    fn label_kind(&self) -> LabelKind;

    fn values(&self) -> DVector<f64>;

    fn num_labels(&self) -> usize {
        self.values().len()
    }
}

pub trait CombinationRule: Parameterized {
    /// Fold the neighbours' labels into one prediction.
    fn combine(&self, votes: &[f64]) -> f64;
}

pub trait Evaluation: Parameterized {
    fn evaluate(&self, predicted: &dyn Labels, truth: &dyn Labels) -> Result<f64>;
}

/// Column `j` of a column-major matrix as a slice.
pub(crate) fn column(matrix: &DMatrix<f64>, j: usize) -> &[f64] {
    let rows = matrix.nrows();
    &matrix.as_slice()[j * rows..(j + 1) * rows]
}

/// Read an object-valued slot that must be set.
pub(crate) fn required<T>(value: Option<T>, owner: &str, param: &str) -> Result<T> {
    value.ok_or_else(|| Error::EmptySlot {
        location: format!("{}::{}", owner, param),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_slices() {
        let m = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(column(&m, 0), &[1.0, 4.0]);
        assert_eq!(column(&m, 2), &[3.0, 6.0]);
    }

    #[test]
    fn test_describe_renders_params() {
        let kernel = LinearKernel::new();
        assert_eq!(kernel.describe(), "LinearKernel(cache_size=10)");

        let knn = Knn::new();
        let text = knn.describe();
        assert!(text.starts_with("KNN(k=3, seed=0, distance=EuclideanDistance"));
        assert!(text.contains("labels=None"));
    }
}
