// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Kernels over pairs of feature sets.

use std::sync::Arc;

use nalgebra::DMatrix;
use parking_lot::Mutex;

use crate::config::{DEFAULT_CACHE_SIZE, DEFAULT_LOG_WIDTH};
use crate::domain::{column, required, Distance, EuclideanDistance, Features, Kernel, Parameterized};
use crate::error::{Error, Result};
use crate::param::{ParameterDirectory, Slot};

/// Feature data captured by `init`.
#[derive(Default)]
struct KernelState {
    sides: Option<(DMatrix<f64>, DMatrix<f64>)>,
}

impl KernelState {
    fn init(&mut self, owner: &str, lhs: &dyn Features, rhs: &dyn Features) -> Result<()> {
        if lhs.num_features() != rhs.num_features() {
            return Err(Error::Collaborator(format!(
                "{}: lhs has {} features, rhs has {}",
                owner,
                lhs.num_features(),
                rhs.num_features()
            )));
        }
        self.sides = Some((lhs.dense(), rhs.dense()));
        Ok(())
    }

    fn matrix(&self, owner: &str, k: impl Fn(&[f64], &[f64]) -> f64) -> Result<DMatrix<f64>> {
        let (lhs, rhs) = self
            .sides
            .as_ref()
            .ok_or_else(|| Error::Collaborator(format!("{} has not been initialised", owner)))?;
        Ok(DMatrix::from_fn(lhs.ncols(), rhs.ncols(), |i, j| {
            k(column(lhs, i), column(rhs, j))
        }))
    }
}

/// `k(x, y) = exp(-d(x, y)^2 / width)` with `width = 2 * exp(2 * log_width)`.
pub struct GaussianKernel {
    params: ParameterDirectory,
    log_width: Arc<Slot<f64>>,
    cache_size: Arc<Slot<i32>>,
    distance: Arc<Slot<Option<Arc<dyn Distance>>>>,
    state: Mutex<KernelState>,
}

impl GaussianKernel {
    pub fn new() -> Self {
        let mut params = ParameterDirectory::new();
        let log_width = params.register("log_width", DEFAULT_LOG_WIDTH);
        let cache_size = params.register("cache_size", DEFAULT_CACHE_SIZE);
        let euclidean: Arc<dyn Distance> = Arc::new(EuclideanDistance::new());
        let distance = params.register("distance", Some(euclidean));
        Self {
            params,
            log_width,
            cache_size,
            distance,
            state: Mutex::new(KernelState::default()),
        }
    }

    pub fn width(&self) -> f64 {
        (2.0 * self.log_width.get()).exp() * 2.0
    }

    pub fn cache_size(&self) -> i32 {
        self.cache_size.get()
    }
}

impl Default for GaussianKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Parameterized for GaussianKernel {
    fn name(&self) -> &str {
        "GaussianKernel"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl Kernel for GaussianKernel {
    fn init(&self, lhs: &dyn Features, rhs: &dyn Features) -> Result<()> {
        self.state.lock().init(self.name(), lhs, rhs)
    }

    fn kernel_matrix(&self) -> Result<DMatrix<f64>> {
        let distance = required(self.distance.get(), self.name(), "distance")?;
        let width = self.width();
        self.state.lock().matrix(self.name(), |a, b| {
            let d = distance.between(a, b);
            (-(d * d) / width).exp()
        })
    }
}

/// `k(x, y) = x . y`
pub struct LinearKernel {
    params: ParameterDirectory,
    cache_size: Arc<Slot<i32>>,
    state: Mutex<KernelState>,
}

impl LinearKernel {
    pub fn new() -> Self {
        let mut params = ParameterDirectory::new();
        let cache_size = params.register("cache_size", DEFAULT_CACHE_SIZE);
        Self {
            params,
            cache_size,
            state: Mutex::new(KernelState::default()),
        }
    }

    pub fn cache_size(&self) -> i32 {
        self.cache_size.get()
    }
}

impl Default for LinearKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Parameterized for LinearKernel {
    fn name(&self) -> &str {
        "LinearKernel"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl Kernel for LinearKernel {
    fn init(&self, lhs: &dyn Features, rhs: &dyn Features) -> Result<()> {
        self.state.lock().init(self.name(), lhs, rhs)
    }

    fn kernel_matrix(&self) -> Result<DMatrix<f64>> {
        self.state
            .lock()
            .matrix(self.name(), |a, b| a.iter().zip(b).map(|(x, y)| x * y).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DenseFeatures;

    fn features(rows: usize, cols: usize, data: &[f64]) -> DenseFeatures<f64> {
        DenseFeatures::new(DMatrix::from_row_slice(rows, cols, data))
    }

    #[test]
    fn test_linear_matrix() {
        let kernel = LinearKernel::new();
        let lhs = features(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        let rhs = features(2, 1, &[2.0, 3.0]);
        kernel.init(&lhs, &rhs).unwrap();

        let k = kernel.kernel_matrix().unwrap();
        assert_eq!(k.shape(), (2, 1));
        assert_eq!(k[(0, 0)], 2.0);
        assert_eq!(k[(1, 0)], 3.0);
    }

    #[test]
    fn test_gaussian_diagonal_is_one() {
        let kernel = GaussianKernel::new();
        let x = features(2, 3, &[0.0, 1.0, 5.0, 0.0, 2.0, -1.0]);
        kernel.init(&x, &x).unwrap();

        let k = kernel.kernel_matrix().unwrap();
        for i in 0..3 {
            assert!((k[(i, i)] - 1.0).abs() < 1e-12);
        }
        assert!(k[(0, 2)] < k[(0, 1)]);
    }

    #[test]
    fn test_uninitialised_kernel() {
        let err = LinearKernel::new().kernel_matrix().unwrap_err();
        assert_eq!(err.to_string(), "LinearKernel has not been initialised");
    }

    #[test]
    fn test_init_rejects_feature_mismatch() {
        let kernel = GaussianKernel::new();
        let lhs = features(2, 1, &[0.0, 0.0]);
        let rhs = features(3, 1, &[0.0, 0.0, 0.0]);
        assert!(kernel.init(&lhs, &rhs).is_err());
    }
}
