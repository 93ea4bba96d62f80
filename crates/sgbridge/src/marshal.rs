// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parameter marshalling entry points.
//!
//! `get`, `put` and `put_array` resolve a named parameter on a wrapped
//! object and run the registered accessor for its storage type. Errors
//! carry the `Object::parameter` location.
//!
//! # Example
//!
//! ```rust
//! use sgbridge::{factory, marshal, BoundaryValue};
//!
//! let knn = factory::create_machine("KNN").unwrap();
//!
//! // int32 storage accepts an in-range int64
//! marshal::put(&knn, "k", BoundaryValue::Int64(5)).unwrap();
//! let (desc, value) = marshal::get(&knn, "k").unwrap();
//! assert_eq!(desc.name, "int32");
//! assert_eq!(value, BoundaryValue::Int32(5));
//! ```

use nalgebra::DMatrix;

use crate::accessor::AccessorTable;
use crate::error::{Error, Result};
use crate::object::DomainObject;
use crate::types::{Element, TypeDescriptor, ValueKind};
use crate::value::{BoundaryValue, NumericMatrix};

/// Copy the current value of `name` out of `obj`.
pub fn get(obj: &DomainObject, name: &str) -> Result<(TypeDescriptor, BoundaryValue)> {
    log::trace!("[marshal] get {}::{}", obj.name(), name);
    let param = obj.parameter(name)?;
    let value = AccessorTable::global()
        .read(param)
        .map_err(|e| e.at(obj.name(), name))?;
    Ok((param.descriptor(), value))
}

/// Validate `value` against the storage of `name` and store it.
///
/// Object values are stored by sharing: the slot and the caller's wrapper
/// refer to the same object afterwards.
pub fn put(obj: &DomainObject, name: &str, value: BoundaryValue) -> Result<()> {
    log::trace!("[marshal] put {}::{} <- {}", obj.name(), name, value.type_name());
    let param = obj.parameter(name)?;
    AccessorTable::global().write(param, value).map_err(|e| {
        if e.is_type_mismatch() {
            log::warn!("[marshal] rejected write to {}::{}: {}", obj.name(), name, e);
        }
        e.at(obj.name(), name)
    })
}

/// Bulk write of a row-major `rows x cols` matrix of `kind` elements.
///
/// `rows == 0` selects the vector form, which is not implemented and
/// always fails. Object kinds are rejected before the buffer is touched.
pub fn put_array(
    obj: &DomainObject,
    name: &str,
    bytes: &[u8],
    rows: usize,
    cols: usize,
    kind: ValueKind,
) -> Result<()> {
    log::trace!("[marshal] put_array {}::{} <- {}x{} {}", obj.name(), name, rows, cols, kind);
    if rows == 0 {
        return Err(Error::UnsupportedOperation(
            "vector form of put_array is not implemented".to_string(),
        ));
    }
    if kind.element_size().is_none() {
        return Err(Error::UnsupportedOperation(format!(
            "cannot build a matrix of {} elements",
            kind
        )));
    }
    // Resolve before decoding so an unknown name never allocates
    obj.parameter(name)?;
    let matrix = NumericMatrix::from_row_major(kind, bytes, rows, cols)?;
    put(obj, name, BoundaryValue::Matrix(matrix))
}

/// Typed matrix write for Rust callers.
pub fn put_matrix<T: Element>(obj: &DomainObject, name: &str, matrix: DMatrix<T>) -> Result<()> {
    put(obj, name, BoundaryValue::from(matrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;

    #[test]
    fn test_errors_carry_location() {
        let kernel = factory::create_kernel("GaussianKernel").unwrap();
        let err = put(&kernel, "log_width", BoundaryValue::Int32(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type mismatch for GaussianKernel::log_width: expected float64, got int32"
        );
    }

    #[test]
    fn test_empty_object_slot() {
        let knn = factory::create_machine("KNN").unwrap();
        let err = get(&knn, "labels").unwrap_err();
        assert_eq!(
            err,
            Error::EmptySlot {
                location: "KNN::labels".to_string()
            }
        );
    }

    #[test]
    fn test_put_array_vector_form() {
        let features = factory::create_features("DenseFeatures").unwrap();
        // Checked before the name and the kind
        let err = put_array(&features, "missing", &[], 0, 4, ValueKind::Object).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation(_)));
    }

    #[test]
    fn test_put_matrix_replaces_features() {
        let features = factory::create_features("DenseFeatures").unwrap();
        put_matrix(&features, "feature_matrix", DMatrix::from_element(3, 2, 1.0_f64)).unwrap();
        let inner = features.as_features().unwrap();
        assert_eq!(inner.num_features(), 3);
        assert_eq!(inner.num_vectors(), 2);
    }
}
