// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Factories for every object family.
//!
//! Each factory either returns a complete [`DomainObject`] or an error;
//! nothing half-built escapes.

use std::path::Path;
use std::sync::Arc;

use nalgebra::DMatrix;

use crate::domain::{
    CombinationRule, CsvFile, DenseFeatures, DenseLabels, Distance, EuclideanDistance,
    Evaluation, Features, File, GaussianKernel, Kernel, Knn, Labels, LinearKernel, Machine,
    MajorityVote, ManhattanMetric, MeanRule, MeanSquaredError, MulticlassAccuracy,
    NearestCentroid,
};
use crate::error::{Error, Result};
use crate::object::DomainObject;
use crate::types::{ObjectFamily, ValueKind};
use crate::value::NumericMatrix;

pub const MACHINES: &[&str] = &["KNN", "NearestCentroid"];
pub const KERNELS: &[&str] = &["GaussianKernel", "LinearKernel"];
pub const DISTANCES: &[&str] = &["EuclideanDistance", "ManhattanMetric"];
pub const FEATURES: &[&str] = &["DenseFeatures"];
pub const FILES: &[&str] = &["CSVFile"];
pub const COMBINATION_RULES: &[&str] = &["MajorityVote", "MeanRule"];
pub const EVALUATIONS: &[&str] = &["MulticlassAccuracy", "MeanSquaredError"];

fn unknown(family: ObjectFamily, name: &str) -> Error {
    Error::ConstructionFailure(format!("No {} class named '{}'", family, name))
}

pub fn create_machine(name: &str) -> Result<DomainObject> {
    log::debug!("[factory] create_machine({})", name);
    let machine: Arc<dyn Machine> = match name {
        "KNN" => Arc::new(Knn::new()),
        "NearestCentroid" => Arc::new(NearestCentroid::new()),
        _ => return Err(unknown(ObjectFamily::Machine, name)),
    };
    Ok(DomainObject::from(machine))
}

pub fn create_kernel(name: &str) -> Result<DomainObject> {
    log::debug!("[factory] create_kernel({})", name);
    let kernel: Arc<dyn Kernel> = match name {
        "GaussianKernel" => Arc::new(GaussianKernel::new()),
        "LinearKernel" => Arc::new(LinearKernel::new()),
        _ => return Err(unknown(ObjectFamily::Kernel, name)),
    };
    Ok(DomainObject::from(kernel))
}

pub fn create_distance(name: &str) -> Result<DomainObject> {
    log::debug!("[factory] create_distance({})", name);
    let distance: Arc<dyn Distance> = match name {
        "EuclideanDistance" => Arc::new(EuclideanDistance::new()),
        "ManhattanMetric" => Arc::new(ManhattanMetric::new()),
        _ => return Err(unknown(ObjectFamily::Distance, name)),
    };
    Ok(DomainObject::from(distance))
}

/// Empty `float64` features, filled later through `feature_matrix`.
pub fn create_features(name: &str) -> Result<DomainObject> {
    log::debug!("[factory] create_features({})", name);
    let features: Arc<dyn Features> = match name {
        "DenseFeatures" => Arc::new(DenseFeatures::<f64>::empty()),
        _ => return Err(unknown(ObjectFamily::Features, name)),
    };
    Ok(DomainObject::from(features))
}

fn dense_features(matrix: NumericMatrix) -> Arc<dyn Features> {
    match matrix {
        NumericMatrix::Int32(m) => Arc::new(DenseFeatures::new(m)),
        NumericMatrix::Int64(m) => Arc::new(DenseFeatures::new(m)),
        NumericMatrix::Float32(m) => Arc::new(DenseFeatures::new(m)),
        NumericMatrix::Float64(m) => Arc::new(DenseFeatures::new(m)),
    }
}

/// `rows x cols` features (one example per column) copied from row-major
/// element bytes of `kind`.
pub fn create_features_from_data(
    bytes: &[u8],
    rows: usize,
    cols: usize,
    kind: ValueKind,
) -> Result<DomainObject> {
    log::debug!("[factory] create_features_from_data({}x{} {})", rows, cols, kind);
    if kind == ValueKind::Object {
        return Err(Error::UnsupportedOperation(
            "cannot create a Features object from object handles".to_string(),
        ));
    }
    let matrix = NumericMatrix::from_row_major(kind, bytes, rows, cols)?;
    Ok(DomainObject::from(dense_features(matrix)))
}

/// Typed variant of [`create_features_from_data`].
pub fn create_features_from_matrix<T: crate::types::Element>(matrix: DMatrix<T>) -> DomainObject {
    let features: Arc<dyn Features> = Arc::new(DenseFeatures::new(matrix));
    DomainObject::from(features)
}

/// `float64` features from a file with one example per record.
pub fn create_features_from_file(file: &DomainObject) -> Result<DomainObject> {
    let file = file.expect_file("self")?;
    log::debug!("[factory] create_features_from_file({})", file.path().display());
    let rows = file.read_rows()?;
    let num_vectors = rows.len();
    let num_features = rows.first().map_or(0, Vec::len);
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    // Records become columns
    let matrix = DMatrix::from_column_slice(num_features, num_vectors, &flat);
    let features: Arc<dyn Features> = Arc::new(DenseFeatures::new(matrix));
    Ok(DomainObject::from(features))
}

/// Labels cannot be built from a class name; use
/// [`create_labels_from_file`] or a machine's output.
pub fn create_labels(name: &str) -> Result<DomainObject> {
    log::debug!("[factory] create_labels({}) rejected", name);
    Err(Error::ConstructionFailure(
        "Cannot generate a Labels instance from class name".to_string(),
    ))
}

/// Every value in the file, in record order. Multiclass when all values are
/// non-negative integers, regression otherwise.
pub fn create_labels_from_file(file: &DomainObject) -> Result<DomainObject> {
    let file = file.expect_file("self")?;
    log::debug!("[factory] create_labels_from_file({})", file.path().display());
    let values: Vec<f64> = file.read_rows()?.into_iter().flatten().collect();
    let labels: Arc<dyn Labels> = Arc::new(DenseLabels::from_values(values));
    Ok(DomainObject::from(labels))
}

/// File object by class name; `path` is opened for reading.
pub fn create_file(name: &str, path: impl AsRef<Path>) -> Result<DomainObject> {
    log::debug!("[factory] create_file({}, {})", name, path.as_ref().display());
    let file: Arc<dyn File> = match name {
        "CSVFile" => Arc::new(CsvFile::open(path)?),
        _ => return Err(unknown(ObjectFamily::File, name)),
    };
    Ok(DomainObject::from(file))
}

/// Shorthand for `create_file("CSVFile", path)`.
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<DomainObject> {
    create_file("CSVFile", path)
}

pub fn create_combination_rule(name: &str) -> Result<DomainObject> {
    log::debug!("[factory] create_combination_rule({})", name);
    let rule: Arc<dyn CombinationRule> = match name {
        "MajorityVote" => Arc::new(MajorityVote::new()),
        "MeanRule" => Arc::new(MeanRule::new()),
        _ => return Err(unknown(ObjectFamily::CombinationRule, name)),
    };
    Ok(DomainObject::from(rule))
}

pub fn create_evaluation(name: &str) -> Result<DomainObject> {
    log::debug!("[factory] create_evaluation({})", name);
    let evaluation: Arc<dyn Evaluation> = match name {
        "MulticlassAccuracy" => Arc::new(MulticlassAccuracy::new()),
        "MeanSquaredError" => Arc::new(MeanSquaredError::new()),
        _ => return Err(unknown(ObjectFamily::Evaluation, name)),
    };
    Ok(DomainObject::from(evaluation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_builds() {
        for name in MACHINES {
            assert_eq!(create_machine(name).unwrap().name(), *name);
        }
        for name in KERNELS {
            assert_eq!(create_kernel(name).unwrap().name(), *name);
        }
        for name in DISTANCES {
            assert_eq!(create_distance(name).unwrap().name(), *name);
        }
        for name in FEATURES {
            assert_eq!(create_features(name).unwrap().name(), *name);
        }
        for name in COMBINATION_RULES {
            assert_eq!(create_combination_rule(name).unwrap().name(), *name);
        }
        for name in EVALUATIONS {
            assert_eq!(create_evaluation(name).unwrap().name(), *name);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = create_kernel("PolyKernel").unwrap_err();
        assert_eq!(
            err.to_string(),
            "No Kernel class named 'PolyKernel'"
        );
    }

    #[test]
    fn test_labels_need_data() {
        assert!(matches!(
            create_labels("MulticlassLabels"),
            Err(Error::ConstructionFailure(_))
        ));
    }

    #[test]
    fn test_features_from_data_keeps_kind() {
        let bytes: Vec<u8> = bytemuck::cast_slice(&[1_i64, 2, 3, 4, 5, 6]).to_vec();
        let obj = create_features_from_data(&bytes, 2, 3, ValueKind::Int64).unwrap();
        let features = obj.as_features().unwrap();
        assert_eq!(features.element_kind(), ValueKind::Int64);
        assert_eq!(features.num_features(), 2);
        assert_eq!(features.num_vectors(), 3);
    }

    #[test]
    fn test_features_from_object_kind_rejected() {
        let err = create_features_from_data(&[], 1, 1, ValueKind::Object).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation(_)));
    }

    #[test]
    fn test_file_factories_check_family() {
        let knn = create_machine("KNN").unwrap();
        let err = create_features_from_file(&knn).unwrap_err();
        assert_eq!(err.to_string(), "Expected self to be of type File, got Machine");
    }
}
