// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Learning machines.
//!
//! Both machines read their labels from the `labels` parameter at training
//! time and keep a snapshot of the training data. Inference runs one query
//! column per task on the [`RuntimeConfig`] rayon pool.

use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::config::{RuntimeConfig, DEFAULT_NEIGHBOURS};
use crate::domain::{
    column, required, CombinationRule, DenseLabels, Distance, EuclideanDistance, Features,
    LabelKind, Labels, Machine, MajorityVote, Parameterized,
};
use crate::error::{Error, Result};
use crate::param::{ParameterDirectory, Slot};

/// Training data kept by a machine.
struct TrainedModel {
    data: DMatrix<f64>,
    labels: DVector<f64>,
    kind: LabelKind,
}

fn snapshot(owner: &str, features: &dyn Features, labels: &dyn Labels) -> Result<TrainedModel> {
    let data = features.dense();
    if data.ncols() == 0 {
        return Err(Error::Collaborator(format!("{}: no training vectors", owner)));
    }
    let values = labels.values();
    if values.len() != data.ncols() {
        return Err(Error::Collaborator(format!(
            "{}: number of labels ({}) does not match number of training vectors ({})",
            owner,
            values.len(),
            data.ncols()
        )));
    }
    Ok(TrainedModel {
        data,
        labels: values,
        kind: labels.label_kind(),
    })
}

fn trained(owner: &str, model: &Mutex<Option<Arc<TrainedModel>>>) -> Result<Arc<TrainedModel>> {
    model
        .lock()
        .clone()
        .ok_or_else(|| Error::Collaborator(format!("{} has not been trained", owner)))
}

fn check_dimensions(owner: &str, model: &TrainedModel, queries: &DMatrix<f64>) -> Result<()> {
    if queries.nrows() != model.data.nrows() {
        return Err(Error::Collaborator(format!(
            "{}: trained on {} features, got {}",
            owner,
            model.data.nrows(),
            queries.nrows()
        )));
    }
    Ok(())
}

/// Run `predict` on every column of `queries` on the shared worker pool.
fn predict_columns<F>(queries: &DMatrix<f64>, predict: F) -> Result<Vec<f64>>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    let pool = RuntimeConfig::global().thread_pool()?;
    Ok(pool.install(|| {
        (0..queries.ncols())
            .into_par_iter()
            .map(|j| predict(column(queries, j)))
            .collect()
    }))
}

/// k-nearest-neighbour classifier/regressor.
///
/// The `seed` rotates the order in which equidistant neighbours are ranked,
/// so ties resolve reproducibly for a given seed.
pub struct Knn {
    params: ParameterDirectory,
    k: Arc<Slot<i32>>,
    seed: Arc<Slot<i64>>,
    distance: Arc<Slot<Option<Arc<dyn Distance>>>>,
    labels: Arc<Slot<Option<Arc<dyn Labels>>>>,
    combination_rule: Arc<Slot<Option<Arc<dyn CombinationRule>>>>,
    model: Mutex<Option<Arc<TrainedModel>>>,
}

impl Knn {
    pub fn new() -> Self {
        let mut params = ParameterDirectory::new();
        let k = params.register("k", DEFAULT_NEIGHBOURS);
        let seed = params.register("seed", 0_i64);
        let euclidean: Arc<dyn Distance> = Arc::new(EuclideanDistance::new());
        let distance = params.register("distance", Some(euclidean));
        let labels = params.register::<Option<Arc<dyn Labels>>>("labels", None);
        let vote: Arc<dyn CombinationRule> = Arc::new(MajorityVote::new());
        let combination_rule = params.register("combination_rule", Some(vote));
        Self {
            params,
            k,
            seed,
            distance,
            labels,
            combination_rule,
            model: Mutex::new(None),
        }
    }

    fn neighbours(&self) -> Result<usize> {
        let k = self.k.get();
        usize::try_from(k)
            .ok()
            .filter(|k| *k > 0)
            .ok_or_else(|| Error::Collaborator(format!("KNN: k must be positive, got {}", k)))
    }
}

impl Default for Knn {
    fn default() -> Self {
        Self::new()
    }
}

impl Parameterized for Knn {
    fn name(&self) -> &str {
        "KNN"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl Machine for Knn {
    fn train(&self, features: &dyn Features) -> Result<()> {
        let labels = required(self.labels.get(), self.name(), "labels")?;
        self.neighbours()?;
        let model = snapshot(self.name(), features, &*labels)?;
        log::debug!(
            "[machine] KNN trained on {} vectors of {} features",
            model.data.ncols(),
            model.data.nrows()
        );
        *self.model.lock() = Some(Arc::new(model));
        Ok(())
    }

    fn apply(&self, features: &dyn Features) -> Result<Arc<dyn Labels>> {
        let model = trained(self.name(), &self.model)?;
        let queries = features.dense();
        check_dimensions(self.name(), &model, &queries)?;

        let k = self.neighbours()?.min(model.data.ncols());
        let distance = required(self.distance.get(), self.name(), "distance")?;
        let rule = required(self.combination_rule.get(), self.name(), "combination_rule")?;
        let n = model.data.ncols();
        let offset = usize::try_from(self.seed.get().rem_euclid(n as i64)).unwrap_or(0);

        let predictions = predict_columns(&queries, |query| {
            let mut ranked: Vec<(f64, usize)> = (0..n)
                .map(|j| (distance.between(query, column(&model.data, j)), j))
                .collect();
            ranked.sort_by(|a, b| {
                a.0.total_cmp(&b.0)
                    .then_with(|| ((a.1 + n - offset) % n).cmp(&((b.1 + n - offset) % n)))
            });
            let votes: Vec<f64> = ranked.iter().take(k).map(|&(_, j)| model.labels[j]).collect();
            rule.combine(&votes)
        })?;

        let labels = match model.kind {
            LabelKind::Multiclass => DenseLabels::from_values(predictions),
            LabelKind::Regression => DenseLabels::regression(DVector::from_vec(predictions)),
        };
        Ok(Arc::new(labels))
    }
}

/// Assigns each example the class of the closest per-class mean.
pub struct NearestCentroid {
    params: ParameterDirectory,
    distance: Arc<Slot<Option<Arc<dyn Distance>>>>,
    labels: Arc<Slot<Option<Arc<dyn Labels>>>>,
    centroids: Mutex<Option<Arc<TrainedModel>>>,
}

impl NearestCentroid {
    pub fn new() -> Self {
        let mut params = ParameterDirectory::new();
        let euclidean: Arc<dyn Distance> = Arc::new(EuclideanDistance::new());
        let distance = params.register("distance", Some(euclidean));
        let labels = params.register::<Option<Arc<dyn Labels>>>("labels", None);
        Self {
            params,
            distance,
            labels,
            centroids: Mutex::new(None),
        }
    }
}

impl Default for NearestCentroid {
    fn default() -> Self {
        Self::new()
    }
}

impl Parameterized for NearestCentroid {
    fn name(&self) -> &str {
        "NearestCentroid"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl Machine for NearestCentroid {
    fn train(&self, features: &dyn Features) -> Result<()> {
        let labels = required(self.labels.get(), self.name(), "labels")?;
        if labels.label_kind() != LabelKind::Multiclass {
            return Err(Error::Collaborator(format!(
                "{} requires multiclass labels, got {}",
                self.name(),
                labels.name()
            )));
        }
        let model = snapshot(self.name(), features, &*labels)?;

        let mut classes: Vec<f64> = model.labels.iter().copied().collect();
        classes.sort_by(f64::total_cmp);
        classes.dedup();

        let dims = model.data.nrows();
        let mut means = DMatrix::<f64>::zeros(dims, classes.len());
        for (c, class) in classes.iter().enumerate() {
            let members: Vec<usize> = (0..model.data.ncols())
                .filter(|&j| model.labels[j] == *class)
                .collect();
            let count = members.len() as f64;
            for r in 0..dims {
                let sum: f64 = members.iter().map(|&j| model.data[(r, j)]).sum();
                means[(r, c)] = sum / count;
            }
        }

        log::debug!("[machine] NearestCentroid trained {} classes", classes.len());
        *self.centroids.lock() = Some(Arc::new(TrainedModel {
            data: means,
            labels: DVector::from_vec(classes),
            kind: LabelKind::Multiclass,
        }));
        Ok(())
    }

    fn apply(&self, features: &dyn Features) -> Result<Arc<dyn Labels>> {
        let model = trained(self.name(), &self.centroids)?;
        let queries = features.dense();
        check_dimensions(self.name(), &model, &queries)?;
        let distance = required(self.distance.get(), self.name(), "distance")?;

        let predictions = predict_columns(&queries, |query| {
            let mut best = (f64::INFINITY, f64::NAN);
            for (c, class) in model.labels.iter().enumerate() {
                let d = distance.between(query, column(&model.data, c));
                if d < best.0 {
                    best = (d, *class);
                }
            }
            best.1
        })?;

        Ok(Arc::new(DenseLabels::multiclass(DVector::from_vec(predictions))))
    }
}
