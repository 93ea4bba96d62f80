// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Polymorphic object wrapper.
//!
//! A [`DomainObject`] is the single handle type callers hold. It wraps
//! exactly one shared object of one of the eight families; every
//! cross-cutting operation is a single match over [`ObjectRef`].

use std::fmt;
use std::sync::Arc;

use crate::accessor::AccessorTable;
use crate::domain::{
    CombinationRule, Distance, Evaluation, Features, File, Kernel, Labels, Machine,
};
use crate::error::{Error, Result};
use crate::param::{Parameter, ParameterDirectory};
use crate::types::ObjectFamily;

/// Shared reference to one domain object, tagged by family.
#[derive(Clone)]
pub enum ObjectRef {
    Kernel(Arc<dyn Kernel>),
    Machine(Arc<dyn Machine>),
    Distance(Arc<dyn Distance>),
    Features(Arc<dyn Features>),
    File(Arc<dyn File>),
    CombinationRule(Arc<dyn CombinationRule>),
    Labels(Arc<dyn Labels>),
    Evaluation(Arc<dyn Evaluation>),
}

/// Evaluate `$body` with `$inner` bound to the active variant's `Arc`.
macro_rules! with_inner {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            ObjectRef::Kernel($inner) => $body,
            ObjectRef::Machine($inner) => $body,
            ObjectRef::Distance($inner) => $body,
            ObjectRef::Features($inner) => $body,
            ObjectRef::File($inner) => $body,
            ObjectRef::CombinationRule($inner) => $body,
            ObjectRef::Labels($inner) => $body,
            ObjectRef::Evaluation($inner) => $body,
        }
    };
}

impl ObjectRef {
    pub fn family(&self) -> ObjectFamily {
        match self {
            Self::Kernel(_) => ObjectFamily::Kernel,
            Self::Machine(_) => ObjectFamily::Machine,
            Self::Distance(_) => ObjectFamily::Distance,
            Self::Features(_) => ObjectFamily::Features,
            Self::File(_) => ObjectFamily::File,
            Self::CombinationRule(_) => ObjectFamily::CombinationRule,
            Self::Labels(_) => ObjectFamily::Labels,
            Self::Evaluation(_) => ObjectFamily::Evaluation,
        }
    }
}

macro_rules! narrowing {
    ($($as_fn:ident, $expect_fn:ident => $variant:ident: $trait:ident;)*) => {
        $(
            pub fn $as_fn(&self) -> Option<&Arc<dyn $trait>> {
                match &self.inner {
                    ObjectRef::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            /// Narrow to this family or fail naming `role` and the actual family.
            pub fn $expect_fn(&self, role: &str) -> Result<&Arc<dyn $trait>> {
                self.$as_fn().ok_or_else(|| {
                    Error::InvariantViolation(format!(
                        "Expected {} to be of type {}, got {}",
                        role,
                        ObjectFamily::$variant,
                        self.family()
                    ))
                })
            }
        )*
    };
}

/// Opaque handle standing in for any domain object.
///
/// Cloning adds one share of the underlying object; dropping releases one.
#[derive(Clone)]
pub struct DomainObject {
    inner: ObjectRef,
}

impl DomainObject {
    /// Wrap a shared object. The accessor table is built here on first use.
    pub fn new(inner: ObjectRef) -> Self {
        AccessorTable::global();
        Self { inner }
    }

    /// Active variant.
    pub fn family(&self) -> ObjectFamily {
        self.inner.family()
    }

    /// Class name of the wrapped object.
    pub fn name(&self) -> &str {
        with_inner!(&self.inner, o => o.name())
    }

    /// `Name(param=value, ...)` rendering.
    pub fn describe(&self) -> String {
        with_inner!(&self.inner, o => o.describe())
    }

    pub fn parameters(&self) -> &ParameterDirectory {
        with_inner!(&self.inner, o => o.params())
    }

    /// Look `name` up in the wrapped object's directory.
    pub fn parameter(&self, name: &str) -> Result<&Parameter> {
        self.parameters()
            .get(name)
            .ok_or_else(|| Error::ParameterNotFound {
                object: self.name().to_string(),
                parameter: name.to_string(),
            })
    }

    pub fn inner(&self) -> &ObjectRef {
        &self.inner
    }

    pub fn into_inner(self) -> ObjectRef {
        self.inner
    }

    narrowing! {
        as_kernel, expect_kernel => Kernel: Kernel;
        as_machine, expect_machine => Machine: Machine;
        as_distance, expect_distance => Distance: Distance;
        as_features, expect_features => Features: Features;
        as_file, expect_file => File: File;
        as_combination_rule, expect_combination_rule => CombinationRule: CombinationRule;
        as_labels, expect_labels => Labels: Labels;
        as_evaluation, expect_evaluation => Evaluation: Evaluation;
    }

    fn data_ptr(&self) -> *const () {
        with_inner!(&self.inner, o => Arc::as_ptr(o).cast::<()>())
    }

    /// True when both handles refer to the same object.
    pub fn shares_with(&self, other: &DomainObject) -> bool {
        self.data_ptr() == other.data_ptr()
    }

    /// Number of live shares of the wrapped object.
    pub fn strong_count(&self) -> usize {
        with_inner!(&self.inner, o => Arc::strong_count(o))
    }
}

macro_rules! from_arc {
    ($($variant:ident: $trait:ident),*) => {
        $(
            impl From<Arc<dyn $trait>> for DomainObject {
                fn from(inner: Arc<dyn $trait>) -> Self {
                    Self::new(ObjectRef::$variant(inner))
                }
            }
        )*
    };
}

from_arc!(
    Kernel: Kernel,
    Machine: Machine,
    Distance: Distance,
    Features: Features,
    File: File,
    CombinationRule: CombinationRule,
    Labels: Labels,
    Evaluation: Evaluation
);

impl PartialEq for DomainObject {
    fn eq(&self, other: &Self) -> bool {
        self.shares_with(other)
    }
}

impl fmt::Debug for DomainObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainObject")
            .field("family", &self.family())
            .field("name", &self.name())
            .finish()
    }
}

impl fmt::Display for DomainObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;

    #[test]
    fn test_family_and_name() {
        let knn = factory::create_machine("KNN").unwrap();
        assert_eq!(knn.family(), ObjectFamily::Machine);
        assert_eq!(knn.name(), "KNN");
        assert!(knn.as_machine().is_some());
        assert!(knn.as_kernel().is_none());
    }

    #[test]
    fn test_expect_wrong_family() {
        let kernel = factory::create_kernel("LinearKernel").unwrap();
        let Err(err) = kernel.expect_machine("machine") else {
            panic!("a kernel narrowed to a machine");
        };
        assert_eq!(
            err.to_string(),
            "Expected machine to be of type Machine, got Kernel"
        );
    }

    #[test]
    fn test_parameter_not_found() {
        let dist = factory::create_distance("EuclideanDistance").unwrap();
        let err = dist.parameter("width").unwrap_err();
        assert_eq!(err.to_string(), "Could not find parameter EuclideanDistance::width");
    }

    #[test]
    fn test_clone_shares_object() {
        let rule = factory::create_combination_rule("MajorityVote").unwrap();
        let copy = rule.clone();
        assert!(rule.shares_with(&copy));
        assert_eq!(rule.strong_count(), 2);
        drop(copy);
        assert_eq!(rule.strong_count(), 1);

        let other = factory::create_combination_rule("MajorityVote").unwrap();
        assert!(!rule.shares_with(&other));
    }
}
