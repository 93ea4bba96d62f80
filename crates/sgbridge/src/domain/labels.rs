// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Label vectors.

use std::sync::Arc;

use nalgebra::DVector;

use crate::domain::{Labels, Parameterized};
use crate::param::{ParameterDirectory, Slot};

/// What a label vector encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Class indices `0, 1, 2, ...`.
    Multiclass,
    /// Real-valued targets.
    Regression,
}

impl LabelKind {
    /// Multiclass when every value is a non-negative integer.
    pub fn infer(values: &[f64]) -> Self {
        let is_class = |v: &f64| v.is_finite() && *v >= 0.0 && v.fract() == 0.0;
        if values.iter().all(is_class) {
            Self::Multiclass
        } else {
            Self::Regression
        }
    }
}

/// Dense `f64` labels of either kind.
pub struct DenseLabels {
    params: ParameterDirectory,
    kind: LabelKind,
    labels: Arc<Slot<DVector<f64>>>,
}

impl DenseLabels {
    pub fn new(kind: LabelKind, values: DVector<f64>) -> Self {
        let mut params = ParameterDirectory::new();
        let labels = params.register("labels", values);
        Self {
            params,
            kind,
            labels,
        }
    }

    pub fn multiclass(values: DVector<f64>) -> Self {
        Self::new(LabelKind::Multiclass, values)
    }

    pub fn regression(values: DVector<f64>) -> Self {
        Self::new(LabelKind::Regression, values)
    }

    /// Kind picked by [`LabelKind::infer`].
    pub fn from_values(values: Vec<f64>) -> Self {
        let kind = LabelKind::infer(&values);
        Self::new(kind, DVector::from_vec(values))
    }
}

impl Parameterized for DenseLabels {
    fn name(&self) -> &str {
        match self.kind {
            LabelKind::Multiclass => "MulticlassLabels",
            LabelKind::Regression => "RegressionLabels",
        }
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl Labels for DenseLabels {
    fn label_kind(&self) -> LabelKind {
        self.kind
    }

    fn values(&self) -> DVector<f64> {
        self.labels.get()
    }

    fn num_labels(&self) -> usize {
        self.labels.read().len()
    }
}
