// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-level tests over a probe object carrying every storage type.

use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::domain::{Distance, Kernel, Labels, Parameterized};
use crate::param::{ParameterDirectory, Slot};
use crate::{factory, marshal, BoundaryValue, DomainObject, Error, Shape, ValueKind};

/// Distance with one parameter of each storage type.
struct Probe {
    params: ParameterDirectory,
    count: Arc<Slot<i32>>,
    total: Arc<Slot<i64>>,
    ratio: Arc<Slot<f32>>,
    weight: Arc<Slot<f64>>,
}

impl Probe {
    fn new() -> Self {
        let mut params = ParameterDirectory::new();
        let count = params.register("count", 1_i32);
        let total = params.register("total", 2_i64);
        let ratio = params.register("ratio", 0.5_f32);
        let weight = params.register("weight", 0.25_f64);
        params.register("offsets", DVector::<i64>::zeros(2));
        params.register("grid", DMatrix::<i32>::zeros(1, 1));
        params.register::<Option<Arc<dyn Kernel>>>("kernel", None);
        params.register::<Option<Arc<dyn Labels>>>("labels", None);
        Self {
            params,
            count,
            total,
            ratio,
            weight,
        }
    }
}

impl Parameterized for Probe {
    fn name(&self) -> &str {
        "Probe"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl Distance for Probe {
    fn between(&self, _a: &[f64], _b: &[f64]) -> f64 {
        0.0
    }
}

fn probe() -> (Arc<Probe>, DomainObject) {
    let probe = Arc::new(Probe::new());
    let obj = DomainObject::from(Arc::clone(&probe) as Arc<dyn Distance>);
    (probe, obj)
}

#[test]
fn test_get_reports_storage_descriptor() {
    let (_, obj) = probe();

    let cases = [
        ("count", "int32", ValueKind::Int32, Shape::Scalar),
        ("total", "int64", ValueKind::Int64, Shape::Scalar),
        ("ratio", "float32", ValueKind::Float32, Shape::Scalar),
        ("weight", "float64", ValueKind::Float64, Shape::Scalar),
        ("offsets", "Vector<int64>", ValueKind::Int64, Shape::Vector),
        ("grid", "Matrix<int32>", ValueKind::Int32, Shape::Matrix),
    ];
    for (name, type_name, kind, shape) in cases {
        let (desc, value) = marshal::get(&obj, name).unwrap();
        assert_eq!(desc.name, type_name, "{}", name);
        assert_eq!(desc.kind(), kind, "{}", name);
        assert_eq!(desc.shape(), shape, "{}", name);
        assert_eq!(value.kind(), kind, "{}", name);
    }

    let desc = obj.parameter("kernel").unwrap().descriptor();
    assert_eq!(desc.kind(), ValueKind::Object);
    assert_eq!(desc.name, "Kernel");
}

#[test]
fn test_scalar_put_get_randomised() {
    let (probe, obj) = probe();
    let mut rng = fastrand::Rng::with_seed(7);

    for _ in 0..32 {
        let count = rng.i32(..);
        let total = rng.i64(..);
        let ratio = rng.f32();
        let weight = rng.f64() * 1e6;

        marshal::put(&obj, "count", BoundaryValue::Int32(count)).unwrap();
        marshal::put(&obj, "total", BoundaryValue::Int64(total)).unwrap();
        marshal::put(&obj, "ratio", BoundaryValue::Float32(ratio)).unwrap();
        marshal::put(&obj, "weight", BoundaryValue::Float64(weight)).unwrap();

        assert_eq!(marshal::get(&obj, "count").unwrap().1, BoundaryValue::Int32(count));
        assert_eq!(marshal::get(&obj, "total").unwrap().1, BoundaryValue::Int64(total));
        assert_eq!(marshal::get(&obj, "ratio").unwrap().1, BoundaryValue::Float32(ratio));
        assert_eq!(marshal::get(&obj, "weight").unwrap().1, BoundaryValue::Float64(weight));
    }

    // The owner sees the same storage
    marshal::put(&obj, "count", BoundaryValue::Int32(11)).unwrap();
    assert_eq!(probe.count.get(), 11);
}

#[test]
fn test_integer_promotion_rules() {
    let (probe, obj) = probe();

    marshal::put(&obj, "total", BoundaryValue::Int32(-9)).unwrap();
    assert_eq!(probe.total.get(), -9);

    marshal::put(&obj, "count", BoundaryValue::Int64(1 << 20)).unwrap();
    assert_eq!(probe.count.get(), 1 << 20);

    let err = marshal::put(&obj, "count", BoundaryValue::Int64(1 << 40)).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(probe.count.get(), 1 << 20);
}

#[test]
fn test_float_storage_is_exact() {
    let (probe, obj) = probe();

    for value in [
        BoundaryValue::Int32(1),
        BoundaryValue::Int64(1),
        BoundaryValue::Float32(1.0),
        BoundaryValue::from(DMatrix::from_element(1, 1, 1.0_f64)),
    ] {
        let err = marshal::put(&obj, "weight", value).unwrap_err();
        assert!(err.is_type_mismatch(), "{}", err);
    }
    assert_eq!(probe.weight.get(), 0.25);

    let err = marshal::put(&obj, "ratio", BoundaryValue::Float64(0.5)).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(probe.ratio.get(), 0.5);
}

#[test]
fn test_vector_storage() {
    let (_, obj) = probe();

    let offsets = DVector::from_vec(vec![3_i64, -4, 5]);
    marshal::put(&obj, "offsets", BoundaryValue::from(offsets.clone())).unwrap();
    let (_, value) = marshal::get(&obj, "offsets").unwrap();
    assert_eq!(value, BoundaryValue::from(offsets));

    let err = marshal::put(
        &obj,
        "offsets",
        BoundaryValue::from(DVector::from_vec(vec![1_i32])),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Type mismatch for Probe::offsets: expected Vector<int64>, got Vector<int32>"
    );
}

#[test]
fn test_object_slot_family_checked() {
    let (_, obj) = probe();
    let linear = factory::create_kernel("LinearKernel").unwrap();
    let euclid = factory::create_distance("EuclideanDistance").unwrap();

    let err = marshal::put(&obj, "kernel", BoundaryValue::Object(euclid)).unwrap_err();
    assert_eq!(
        err,
        Error::TypeMismatch {
            location: "Probe::kernel".to_string(),
            expected: "Kernel".to_string(),
            got: "Distance".to_string(),
        }
    );
    assert!(matches!(
        marshal::get(&obj, "kernel"),
        Err(Error::EmptySlot { .. })
    ));

    marshal::put(&obj, "kernel", BoundaryValue::Object(linear.clone())).unwrap();
    let (_, value) = marshal::get(&obj, "kernel").unwrap();
    let stored = value.as_object().unwrap();
    assert!(stored.shares_with(&linear));
    // caller handle + slot + returned wrapper
    assert_eq!(linear.strong_count(), 3);
}

#[test]
fn test_scalar_into_object_slot_rejected() {
    let (_, obj) = probe();
    let err = marshal::put(&obj, "labels", BoundaryValue::Float64(1.0)).unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn test_describe_lists_parameters() {
    let (_, obj) = probe();
    assert_eq!(
        obj.to_string(),
        "Probe(count=1, total=2, ratio=0.5, weight=0.25, offsets=[0, 0], grid=[[0]], kernel=None, labels=None)"
    );
}
