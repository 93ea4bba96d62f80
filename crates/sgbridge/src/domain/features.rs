// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dense feature matrices.

use std::sync::Arc;

use nalgebra::DMatrix;

use crate::domain::{Features, Parameterized};
use crate::param::{ParameterDirectory, Slot};
use crate::types::{Element, ValueKind};

/// `num_features x num_vectors` matrix of `T`, one example per column.
///
/// The whole matrix is the `feature_matrix` parameter, so `put_array` on it
/// replaces the data in place.
pub struct DenseFeatures<T: Element> {
    params: ParameterDirectory,
    matrix: Arc<Slot<DMatrix<T>>>,
}

impl<T: Element> DenseFeatures<T> {
    pub fn new(matrix: DMatrix<T>) -> Self {
        let mut params = ParameterDirectory::new();
        let matrix = params.register("feature_matrix", matrix);
        Self { params, matrix }
    }

    /// No examples yet.
    pub fn empty() -> Self {
        Self::new(DMatrix::zeros(0, 0))
    }

    pub fn matrix(&self) -> DMatrix<T> {
        self.matrix.get()
    }
}

impl<T: Element> Parameterized for DenseFeatures<T> {
    fn name(&self) -> &str {
        "DenseFeatures"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl<T: Element> Features for DenseFeatures<T> {
    fn element_kind(&self) -> ValueKind {
        T::KIND
    }

    fn num_features(&self) -> usize {
        self.matrix.read().nrows()
    }

    fn num_vectors(&self) -> usize {
        self.matrix.read().ncols()
    }

    fn dense(&self) -> DMatrix<f64> {
        self.matrix
            .read()
            .map(|x| x.to_f64().unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_dense_copy() {
        let features = DenseFeatures::new(DMatrix::from_row_slice(2, 3, &[1, 2, 3, 4, 5, 6]));
        assert_eq!(features.element_kind(), ValueKind::Int32);
        assert_eq!(features.num_features(), 2);
        assert_eq!(features.num_vectors(), 3);
        assert_eq!(features.dense()[(1, 2)], 6.0);
    }

    #[test]
    fn test_empty() {
        let features = DenseFeatures::<f64>::empty();
        assert_eq!(features.num_vectors(), 0);
        assert_eq!(features.params().names(), vec!["feature_matrix"]);
    }
}
