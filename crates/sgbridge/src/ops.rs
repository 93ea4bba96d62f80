// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Family-specific operations on wrapped objects.
//!
//! Every operation narrows its handles first; a handle of the wrong family
//! is reported as [`Error::InvariantViolation`](crate::Error) before any
//! collaborator runs.

use crate::error::Result;
use crate::object::DomainObject;

pub fn train_machine(machine: &DomainObject, features: &DomainObject) -> Result<()> {
    let machine = machine.expect_machine("machine")?;
    let features = features.expect_features("features")?;
    log::debug!("[ops] train {} on {}", machine.name(), features.name());
    machine.train(&**features)
}

pub fn apply_machine(machine: &DomainObject, features: &DomainObject) -> Result<DomainObject> {
    let machine = machine.expect_machine("machine")?;
    let features = features.expect_features("features")?;
    log::debug!("[ops] apply {} to {}", machine.name(), features.name());
    machine.apply(&**features).map(DomainObject::from)
}

pub fn apply_multiclass_machine(
    machine: &DomainObject,
    features: &DomainObject,
) -> Result<DomainObject> {
    let machine = machine.expect_machine("machine")?;
    let features = features.expect_features("features")?;
    log::debug!("[ops] apply_multiclass {} to {}", machine.name(), features.name());
    machine.apply_multiclass(&**features).map(DomainObject::from)
}

pub fn init_kernel(kernel: &DomainObject, lhs: &DomainObject, rhs: &DomainObject) -> Result<()> {
    let kernel = kernel.expect_kernel("self")?;
    let lhs = lhs.expect_features("lhs")?;
    let rhs = rhs.expect_features("rhs")?;
    log::debug!("[ops] init {}", kernel.name());
    kernel.init(&**lhs, &**rhs)
}

pub fn evaluate_labels(
    evaluation: &DomainObject,
    predicted: &DomainObject,
    truth: &DomainObject,
) -> Result<f64> {
    let evaluation = evaluation.expect_evaluation("self")?;
    let predicted = predicted.expect_labels("y_pred")?;
    let truth = truth.expect_labels("y_true")?;
    evaluation.evaluate(&**predicted, &**truth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{factory, Error};

    #[test]
    fn test_wrong_family_messages() {
        let kernel = factory::create_kernel("LinearKernel").unwrap();
        let features = factory::create_features("DenseFeatures").unwrap();

        let err = train_machine(&kernel, &features).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected machine to be of type Machine, got Kernel"
        );

        let err = init_kernel(&kernel, &kernel, &features).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
        assert!(err.to_string().starts_with("Expected lhs"));
    }
}
