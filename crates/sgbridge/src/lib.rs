// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # sgbridge - type-erased parameter access for machine-learning objects
//!
//! Lets callers that cannot see Rust generics build, inspect and mutate a
//! closed set of polymorphic domain objects (machines, kernels, distances,
//! features, labels, files, combination rules, evaluations) through one
//! opaque handle type and a small set of typed values.
//!
//! ## Quick Start
//!
//! ```rust
//! use sgbridge::{factory, marshal, ops, BoundaryValue, ValueKind};
//!
//! fn main() -> sgbridge::Result<()> {
//!     // Two examples per class, one feature each
//!     let data: [f64; 4] = [0.0, 1.0, 10.0, 11.0];
//!     let features = factory::create_features_from_data(
//!         bytemuck::cast_slice(&data), 1, 4, ValueKind::Float64)?;
//!
//!     let knn = factory::create_machine("KNN")?;
//!     marshal::put(&knn, "k", BoundaryValue::Int32(1))?;
//!
//!     let distance = factory::create_distance("ManhattanMetric")?;
//!     marshal::put(&knn, "distance", BoundaryValue::Object(distance))?;
//!     # let labels_file = tempfile::NamedTempFile::new().unwrap();
//!     # std::fs::write(labels_file.path(), "0\n0\n1\n1\n").unwrap();
//!     # let path = labels_file.path();
//!     let labels = factory::create_labels_from_file(&factory::read_csv_file(path)?)?;
//!     marshal::put(&knn, "labels", BoundaryValue::Object(labels))?;
//!
//!     ops::train_machine(&knn, &features)?;
//!     let predicted = ops::apply_multiclass_machine(&knn, &features)?;
//!     println!("{}", predicted);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! caller -> marshal (get / put / put_array)
//!             -> DomainObject (tagged union, parameter lookup)
//!                 -> AccessorTable (built once, read/write per storage type)
//!                     -> Slot<T> (typed storage owned by the domain object)
//! ```
//!
//! ## Modules Overview
//!
//! - [`types`] - value kinds, shapes, storage descriptors
//! - [`accessor`] - process-wide accessor table and write validation
//! - [`object`] - the polymorphic [`DomainObject`] wrapper
//! - [`marshal`] - `get`, `put`, `put_array`
//! - [`factory`] / [`ops`] - construction and family-specific operations
//! - [`domain`] - family traits and the built-in catalogue
//! - [`config`] - defaults and [`config::RuntimeConfig`]

/// Accessor registration table (storage type -> read/write).
pub mod accessor;
/// Catalogue defaults and runtime settings.
pub mod config;
/// Domain object families and built-in implementations.
pub mod domain;
mod error;
/// Factories for every object family.
pub mod factory;
/// Parameter marshalling entry points.
pub mod marshal;
/// Polymorphic object wrapper.
pub mod object;
/// Family-specific operations (train, apply, init, evaluate).
pub mod ops;
/// Parameter slots and directories.
pub mod param;
/// Type tags.
pub mod types;
/// Values crossing the boundary.
pub mod value;

pub use accessor::AccessorTable;
pub use error::{Error, Result};
pub use object::{DomainObject, ObjectRef};
pub use param::{ParamType, Parameter, ParameterDirectory};
pub use types::{Element, ObjectFamily, Shape, StorageKey, TypeDescriptor, ValueKind};
pub use value::{BoundaryValue, NumericMatrix, NumericVector};

/// sgbridge version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests;
