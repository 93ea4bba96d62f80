// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Evaluation metrics over label pairs.

use nalgebra::DVector;

use crate::domain::{Evaluation, Labels, Parameterized};
use crate::error::{Error, Result};
use crate::param::ParameterDirectory;

fn aligned(
    metric: &str,
    predicted: &dyn Labels,
    truth: &dyn Labels,
) -> Result<(DVector<f64>, DVector<f64>)> {
    let (predicted, truth) = (predicted.values(), truth.values());
    if predicted.len() != truth.len() {
        return Err(Error::Collaborator(format!(
            "{}: {} predictions for {} ground truth labels",
            metric,
            predicted.len(),
            truth.len()
        )));
    }
    if truth.is_empty() {
        return Err(Error::Collaborator(format!("{}: no labels to evaluate", metric)));
    }
    Ok((predicted, truth))
}

/// Fraction of exactly matching class labels.
#[derive(Default)]
pub struct MulticlassAccuracy {
    params: ParameterDirectory,
}

impl MulticlassAccuracy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Parameterized for MulticlassAccuracy {
    fn name(&self) -> &str {
        "MulticlassAccuracy"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl Evaluation for MulticlassAccuracy {
    fn evaluate(&self, predicted: &dyn Labels, truth: &dyn Labels) -> Result<f64> {
        let (predicted, truth) = aligned(self.name(), predicted, truth)?;
        let hits = predicted.iter().zip(truth.iter()).filter(|(p, t)| p == t).count();
        Ok(hits as f64 / truth.len() as f64)
    }
}

#[derive(Default)]
pub struct MeanSquaredError {
    params: ParameterDirectory,
}

impl MeanSquaredError {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Parameterized for MeanSquaredError {
    fn name(&self) -> &str {
        "MeanSquaredError"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl Evaluation for MeanSquaredError {
    fn evaluate(&self, predicted: &dyn Labels, truth: &dyn Labels) -> Result<f64> {
        let (predicted, truth) = aligned(self.name(), predicted, truth)?;
        Ok((predicted - &truth).norm_squared() / truth.len() as f64)
    }
}
