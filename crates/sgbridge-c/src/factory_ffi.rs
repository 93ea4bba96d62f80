// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object factories.
//!
//! Every factory returns an [`SgObjectResult`]; on success the payload is a
//! new handle owned by the caller.

use std::os::raw::{c_char, c_void};

use sgbridge::{factory, DomainObject, ValueKind};

use crate::logging::ensure_logger;
use crate::{c_str, element_bytes, guarded, object_ref, Failure, SgObject, SgObjectResult, SgType};

/// Shared body of the by-name factories.
unsafe fn create_named(
    entry: &str,
    name: *const c_char,
    create: fn(&str) -> sgbridge::Result<DomainObject>,
) -> SgObjectResult {
    ensure_logger();
    SgObjectResult::from(guarded(entry, || {
        let name = c_str(name, "name")?;
        create(name).map_err(Failure::from)
    }))
}

/// Create a machine by class name.
///
/// # Safety
/// `name` must be a valid null-terminated C string.
///
/// # Returns
/// `SG_CONSTRUCTION_FAILURE` for an unknown class name.
#[no_mangle]
pub unsafe extern "C" fn sg_machine_create(name: *const c_char) -> SgObjectResult {
    create_named("sg_machine_create", name, factory::create_machine)
}

/// Create a kernel by class name.
///
/// # Safety
/// `name` must be a valid null-terminated C string.
///
/// # Returns
/// `SG_CONSTRUCTION_FAILURE` for an unknown class name.
#[no_mangle]
pub unsafe extern "C" fn sg_kernel_create(name: *const c_char) -> SgObjectResult {
    create_named("sg_kernel_create", name, factory::create_kernel)
}

/// Create a distance by class name.
///
/// # Safety
/// `name` must be a valid null-terminated C string.
///
/// # Returns
/// `SG_CONSTRUCTION_FAILURE` for an unknown class name.
#[no_mangle]
pub unsafe extern "C" fn sg_distance_create(name: *const c_char) -> SgObjectResult {
    create_named("sg_distance_create", name, factory::create_distance)
}

/// Create a features object by class name.
///
/// # Safety
/// `name` must be a valid null-terminated C string.
///
/// # Returns
/// `SG_CONSTRUCTION_FAILURE` for an unknown class name.
#[no_mangle]
pub unsafe extern "C" fn sg_features_create(name: *const c_char) -> SgObjectResult {
    create_named("sg_features_create", name, factory::create_features)
}

/// Create a combination rule by class name.
///
/// # Safety
/// `name` must be a valid null-terminated C string.
///
/// # Returns
/// `SG_CONSTRUCTION_FAILURE` for an unknown class name.
#[no_mangle]
pub unsafe extern "C" fn sg_combination_rule_create(name: *const c_char) -> SgObjectResult {
    create_named("sg_combination_rule_create", name, factory::create_combination_rule)
}

/// Create an evaluation by class name.
///
/// # Safety
/// `name` must be a valid null-terminated C string.
///
/// # Returns
/// `SG_CONSTRUCTION_FAILURE` for an unknown class name.
#[no_mangle]
pub unsafe extern "C" fn sg_evaluation_create(name: *const c_char) -> SgObjectResult {
    create_named("sg_evaluation_create", name, factory::create_evaluation)
}

/// Always fails: labels come from files or from `sg_machine_apply`.
///
/// # Safety
/// `name` must be a valid null-terminated C string.
///
/// # Returns
/// `SG_CONSTRUCTION_FAILURE`.
#[no_mangle]
pub unsafe extern "C" fn sg_labels_create(name: *const c_char) -> SgObjectResult {
    create_named("sg_labels_create", name, factory::create_labels)
}

/// Create features from a row-major `rows x cols` buffer of `kind`
/// (an `SgType` value) elements.
///
/// Each column of the resulting matrix is one example.
///
/// # Safety
/// `data` must point to at least `rows * cols` elements of `kind`.
///
/// # Returns
/// `SG_UNSUPPORTED` for `SG_TYPE_OBJECT` or a `kind` outside `SgType`.
#[no_mangle]
pub unsafe extern "C" fn sg_features_from_data(
    data: *const c_void,
    rows: u32,
    cols: u32,
    kind: u32,
) -> SgObjectResult {
    ensure_logger();
    SgObjectResult::from(guarded("sg_features_from_data", || {
        let kind = ValueKind::from(SgType::try_from(kind)?);
        let bytes = element_bytes(data, rows, cols, kind)?;
        factory::create_features_from_data(bytes, rows as usize, cols as usize, kind)
            .map_err(Failure::from)
    }))
}

/// Load `float64` features from a file object, one example per record.
///
/// # Safety
/// `file` must be a valid handle.
///
/// # Returns
/// `SG_INVARIANT_VIOLATION` if `file` is not a file object.
#[no_mangle]
pub unsafe extern "C" fn sg_features_from_file(file: *const SgObject) -> SgObjectResult {
    ensure_logger();
    SgObjectResult::from(guarded("sg_features_from_file", || {
        factory::create_features_from_file(object_ref(file, "file")?).map_err(Failure::from)
    }))
}

/// Load labels from a file object.
///
/// # Safety
/// `file` must be a valid handle.
#[no_mangle]
pub unsafe extern "C" fn sg_labels_from_file(file: *const SgObject) -> SgObjectResult {
    ensure_logger();
    SgObjectResult::from(guarded("sg_labels_from_file", || {
        factory::create_labels_from_file(object_ref(file, "file")?).map_err(Failure::from)
    }))
}

/// Open `path` as a file object of class `name` (`CSVFile`).
///
/// # Safety
/// `name` and `path` must be valid null-terminated C strings.
#[no_mangle]
pub unsafe extern "C" fn sg_file_create(
    name: *const c_char,
    path: *const c_char,
) -> SgObjectResult {
    ensure_logger();
    SgObjectResult::from(guarded("sg_file_create", || {
        let name = c_str(name, "name")?;
        let path = c_str(path, "path")?;
        factory::create_file(name, path).map_err(Failure::from)
    }))
}

/// Open `path` as a `CSVFile`.
///
/// # Safety
/// `path` must be a valid null-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn sg_csv_file_read(path: *const c_char) -> SgObjectResult {
    ensure_logger();
    SgObjectResult::from(guarded("sg_csv_file_read", || {
        factory::read_csv_file(c_str(path, "path")?).map_err(Failure::from)
    }))
}
