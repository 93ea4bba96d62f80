// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Family-specific operations: train, apply, kernel init, evaluate.

use sgbridge::ops;

use crate::{guarded, object_ref, Failure, SgFloat64Result, SgObject, SgObjectResult, SgResult};

/// Train `machine` on `features` using its `labels` parameter.
///
/// # Safety
/// `machine` and `features` must be valid handles.
///
/// # Returns
/// `SG_INVARIANT_VIOLATION` if either handle has the wrong family,
/// `SG_OPERATION_FAILED` if training fails.
#[no_mangle]
pub unsafe extern "C" fn sg_machine_train(
    machine: *const SgObject,
    features: *const SgObject,
) -> SgResult {
    SgResult::from(guarded("sg_machine_train", || {
        let machine = object_ref(machine, "machine")?;
        let features = object_ref(features, "features")?;
        ops::train_machine(machine, features).map_err(Failure::from)
    }))
}

/// Predict labels for `features`.
///
/// # Safety
/// `machine` and `features` must be valid handles.
#[no_mangle]
pub unsafe extern "C" fn sg_machine_apply(
    machine: *const SgObject,
    features: *const SgObject,
) -> SgObjectResult {
    SgObjectResult::from(guarded("sg_machine_apply", || {
        let machine = object_ref(machine, "machine")?;
        let features = object_ref(features, "features")?;
        ops::apply_machine(machine, features).map_err(Failure::from)
    }))
}

/// Predict multiclass labels for `features`.
///
/// # Safety
/// `machine` and `features` must be valid handles.
///
/// # Returns
/// `SG_OPERATION_FAILED` if the machine was trained on regression labels.
#[no_mangle]
pub unsafe extern "C" fn sg_machine_apply_multiclass(
    machine: *const SgObject,
    features: *const SgObject,
) -> SgObjectResult {
    SgObjectResult::from(guarded("sg_machine_apply_multiclass", || {
        let machine = object_ref(machine, "machine")?;
        let features = object_ref(features, "features")?;
        ops::apply_multiclass_machine(machine, features).map_err(Failure::from)
    }))
}

/// Initialise `kernel` on a pair of feature objects.
///
/// # Safety
/// `kernel`, `lhs` and `rhs` must be valid handles.
#[no_mangle]
pub unsafe extern "C" fn sg_kernel_init(
    kernel: *const SgObject,
    lhs: *const SgObject,
    rhs: *const SgObject,
) -> SgResult {
    SgResult::from(guarded("sg_kernel_init", || {
        let kernel = object_ref(kernel, "kernel")?;
        let lhs = object_ref(lhs, "lhs")?;
        let rhs = object_ref(rhs, "rhs")?;
        ops::init_kernel(kernel, lhs, rhs).map_err(Failure::from)
    }))
}

/// Score `y_pred` against `y_true`.
///
/// # Safety
/// `evaluation`, `y_pred` and `y_true` must be valid handles.
#[no_mangle]
pub unsafe extern "C" fn sg_evaluation_evaluate(
    evaluation: *const SgObject,
    y_pred: *const SgObject,
    y_true: *const SgObject,
) -> SgFloat64Result {
    SgFloat64Result::from(guarded("sg_evaluation_evaluate", || {
        let evaluation = object_ref(evaluation, "evaluation")?;
        let y_pred = object_ref(y_pred, "y_pred")?;
        let y_true = object_ref(y_true, "y_true")?;
        ops::evaluate_labels(evaluation, y_pred, y_true).map_err(Failure::from)
    }))
}
