// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Distances between feature vectors.

use crate::domain::{Distance, Parameterized};
use crate::param::ParameterDirectory;

/// L2 distance.
#[derive(Default)]
pub struct EuclideanDistance {
    params: ParameterDirectory,
}

impl EuclideanDistance {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Parameterized for EuclideanDistance {
    fn name(&self) -> &str {
        "EuclideanDistance"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl Distance for EuclideanDistance {
    fn between(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }
}

/// L1 distance.
#[derive(Default)]
pub struct ManhattanMetric {
    params: ParameterDirectory,
}

impl ManhattanMetric {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Parameterized for ManhattanMetric {
    fn name(&self) -> &str {
        "ManhattanMetric"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl Distance for ManhattanMetric {
    fn between(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
    }
}
