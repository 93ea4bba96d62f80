// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::undocumented_unsafe_blocks)] // Every block calls the C API under test

//! The C API exercised through its `extern "C"` functions.

use std::ffi::{CStr, CString};
use std::io::Write;
use std::os::raw::{c_char, c_void};
use std::ptr;

use sgbridge_c::*;

fn cstr(s: &str) -> CString {
    CString::new(s).unwrap()
}

/// Copy and release a library-owned string.
unsafe fn take_string(s: *mut c_char) -> String {
    assert!(!s.is_null());
    let owned = CStr::from_ptr(s).to_string_lossy().into_owned();
    sg_string_free(s);
    owned
}

unsafe fn expect_object(result: SgObjectResult) -> *mut SgObject {
    if result.code != SgReturnCode::SgOk {
        panic!("{:?}: {}", result.code, take_string(result.payload.error));
    }
    result.payload.object
}

unsafe fn expect_ok(result: SgResult) {
    if result.code != SgReturnCode::SgOk {
        panic!("{:?}: {}", result.code, take_string(result.error));
    }
    assert!(result.error.is_null());
}

/// Code and message of a failed result.
unsafe fn expect_err(result: SgResult) -> (SgReturnCode, String) {
    assert_ne!(result.code, SgReturnCode::SgOk);
    (result.code, take_string(result.error))
}

unsafe fn create(factory: unsafe extern "C" fn(*const c_char) -> SgObjectResult, name: &str) -> *mut SgObject {
    let name = cstr(name);
    expect_object(factory(name.as_ptr()))
}

unsafe fn put_i32(obj: *mut SgObject, name: &str, value: i32) -> SgResult {
    let name = cstr(name);
    sg_object_put(
        obj,
        name.as_ptr(),
        ptr::addr_of!(value).cast::<c_void>(),
        SgType::SgTypeInt32 as u32,
    )
}

unsafe fn put_object(obj: *mut SgObject, name: &str, value: *mut SgObject) -> SgResult {
    let name = cstr(name);
    sg_object_put(obj, name.as_ptr(), value.cast::<c_void>(), SgType::SgTypeObject as u32)
}

unsafe fn get(obj: *mut SgObject, name: &str) -> SgValueResult {
    let name = cstr(name);
    sg_object_get(obj, name.as_ptr())
}

fn csv_fixture(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_version() {
    let version = unsafe { CStr::from_ptr(sg_version()) };
    assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_class_name() {
    unsafe {
        let name = cstr("Perceptron");
        let result = sg_machine_create(name.as_ptr());
        assert_eq!(result.code, SgReturnCode::SgConstructionFailure);
        let msg = take_string(result.payload.error);
        assert!(msg.contains("No Machine class named 'Perceptron'"), "{}", msg);

        let name = cstr("MulticlassLabels");
        let result = sg_labels_create(name.as_ptr());
        assert_eq!(result.code, SgReturnCode::SgConstructionFailure);
        sg_string_free(result.payload.error);
    }
}

#[test]
fn test_null_arguments() {
    unsafe {
        let result = sg_kernel_create(ptr::null());
        assert_eq!(result.code, SgReturnCode::SgInvalidArgument);
        sg_string_free(result.payload.error);

        let result = sg_object_get(ptr::null(), ptr::null());
        assert_eq!(result.code, SgReturnCode::SgInvalidArgument);
        sg_string_free(result.payload.error);

        let mut family = SgFamily::SgFamilyKernel;
        assert_eq!(
            sg_object_family(ptr::null(), &mut family),
            SgReturnCode::SgInvalidArgument
        );
        assert!(sg_object_clone(ptr::null()).is_null());
        assert_eq!(
            sg_logging_init_with_filter(ptr::null()),
            SgReturnCode::SgInvalidArgument
        );
        // No-ops
        sg_object_destroy(ptr::null_mut());
        sg_value_destroy(ptr::null_mut());
        sg_string_free(ptr::null_mut());
    }
}

#[test]
fn test_scalar_put_get() {
    unsafe {
        let knn = create(sg_machine_create, "KNN");
        expect_ok(put_i32(knn, "k", 5));

        let value = get(knn, "k");
        assert_eq!(value.code, SgReturnCode::SgOk);
        let value = value.payload.value;

        let mut kind = SgType::SgTypeObject;
        let mut shape = SgShape::SgShapeMatrix;
        assert_eq!(sg_value_kind(value, &mut kind), SgReturnCode::SgOk);
        assert_eq!(sg_value_shape(value, &mut shape), SgReturnCode::SgOk);
        assert_eq!(kind, SgType::SgTypeInt32);
        assert_eq!(shape, SgShape::SgShapeScalar);
        assert_eq!(CStr::from_ptr(sg_value_type_name(value)).to_str().unwrap(), "int32");

        let mut k = 0_i32;
        assert_eq!(sg_value_get_int32(value, &mut k), SgReturnCode::SgOk);
        assert_eq!(k, 5);
        let mut wrong = 0.0_f64;
        assert_eq!(sg_value_get_float64(value, &mut wrong), SgReturnCode::SgTypeMismatch);

        sg_value_destroy(value);
        sg_object_destroy(knn);
    }
}

#[test]
fn test_int32_into_int64_parameter() {
    unsafe {
        let knn = create(sg_machine_create, "KNN");
        expect_ok(put_i32(knn, "seed", 17));

        let value = get(knn, "seed").payload.value;
        let mut seed = 0_i64;
        assert_eq!(sg_value_get_int64(value, &mut seed), SgReturnCode::SgOk);
        assert_eq!(seed, 17);

        sg_value_destroy(value);
        sg_object_destroy(knn);
    }
}

#[test]
fn test_type_mismatch_message() {
    unsafe {
        let knn = create(sg_machine_create, "KNN");
        let name = cstr("k");
        let ratio = 2.5_f32;
        let result = sg_object_put(
            knn,
            name.as_ptr(),
            ptr::addr_of!(ratio).cast::<c_void>(),
            SgType::SgTypeFloat32 as u32,
        );
        let (code, msg) = expect_err(result);
        assert_eq!(code, SgReturnCode::SgTypeMismatch);
        assert_eq!(msg, "Type mismatch for KNN::k: expected int32, got float32");

        let (code, msg) = expect_err(put_i32(knn, "neighbours", 1));
        assert_eq!(code, SgReturnCode::SgParameterNotFound);
        assert_eq!(msg, "Could not find parameter KNN::neighbours");

        sg_object_destroy(knn);
    }
}

#[test]
fn test_put_array_and_copy_back() {
    unsafe {
        let features = create(sg_features_create, "DenseFeatures");
        let name = cstr("feature_matrix");
        let values = [1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0];

        // Vector form is rejected before the buffer is read
        let (code, _) = expect_err(sg_object_put_array(
            features,
            name.as_ptr(),
            ptr::null(),
            0,
            6,
            SgType::SgTypeFloat64 as u32,
        ));
        assert_eq!(code, SgReturnCode::SgUnsupported);

        let (code, _) = expect_err(sg_object_put_array(
            features,
            name.as_ptr(),
            values.as_ptr().cast::<c_void>(),
            2,
            3,
            SgType::SgTypeObject as u32,
        ));
        assert_eq!(code, SgReturnCode::SgUnsupported);

        expect_ok(sg_object_put_array(
            features,
            name.as_ptr(),
            values.as_ptr().cast::<c_void>(),
            2,
            3,
            SgType::SgTypeFloat64 as u32,
        ));

        let value = get(features, "feature_matrix").payload.value;
        let (mut rows, mut cols) = (0_u32, 0_u32);
        assert_eq!(sg_value_dims(value, &mut rows, &mut cols), SgReturnCode::SgOk);
        assert_eq!((rows, cols), (2, 3));

        let mut len = 0_usize;
        assert_eq!(
            sg_value_copy_array(value, ptr::null_mut(), 0, &mut len),
            SgReturnCode::SgOk
        );
        assert_eq!(len, 48);

        let mut out = [0.0_f64; 6];
        assert_eq!(
            sg_value_copy_array(value, out.as_mut_ptr().cast::<c_void>(), 16, &mut len),
            SgReturnCode::SgInvalidArgument
        );
        assert_eq!(
            sg_value_copy_array(value, out.as_mut_ptr().cast::<c_void>(), 48, &mut len),
            SgReturnCode::SgOk
        );
        assert_eq!(out, values);
        assert_eq!(
            CStr::from_ptr(sg_value_type_name(value)).to_str().unwrap(),
            "Matrix<float64>"
        );

        sg_value_destroy(value);
        sg_object_destroy(features);
    }
}

#[test]
fn test_unknown_element_kind_rejected() {
    unsafe {
        let knn = create(sg_machine_create, "KNN");
        let name = cstr("k");
        let k = 2_i32;
        let (code, msg) = expect_err(sg_object_put(
            knn,
            name.as_ptr(),
            ptr::addr_of!(k).cast::<c_void>(),
            99,
        ));
        assert_eq!(code, SgReturnCode::SgUnsupported);
        assert_eq!(msg, "Unsupported operation: Cannot handle element type 99");

        let features = create(sg_features_create, "DenseFeatures");
        let matrix = cstr("feature_matrix");
        let values = [1.0_f64, 2.0];
        let (code, _) = expect_err(sg_object_put_array(
            features,
            matrix.as_ptr(),
            values.as_ptr().cast::<c_void>(),
            1,
            2,
            99,
        ));
        assert_eq!(code, SgReturnCode::SgUnsupported);

        let result = sg_features_from_data(values.as_ptr().cast::<c_void>(), 1, 2, 99);
        assert_eq!(result.code, SgReturnCode::SgUnsupported);
        sg_string_free(result.payload.error);

        // The rejected write left the default in place
        let value = get(knn, "k").payload.value;
        let mut current = 0_i32;
        assert_eq!(sg_value_get_int32(value, &mut current), SgReturnCode::SgOk);
        assert_eq!(current, 3);

        sg_value_destroy(value);
        sg_object_destroy(features);
        sg_object_destroy(knn);
    }
}

#[test]
fn test_object_parameters() {
    unsafe {
        let knn = create(sg_machine_create, "KNN");
        let manhattan = create(sg_distance_create, "ManhattanMetric");
        let mean = create(sg_combination_rule_create, "MeanRule");

        let result = get(knn, "labels");
        assert_eq!(result.code, SgReturnCode::SgEmptySlot);
        assert_eq!(take_string(result.payload.error), "Parameter KNN::labels holds no object");

        let (code, msg) = expect_err(put_object(knn, "distance", mean));
        assert_eq!(code, SgReturnCode::SgTypeMismatch);
        assert_eq!(msg, "Type mismatch for KNN::distance: expected Distance, got CombinationRule");

        expect_ok(put_object(knn, "distance", manhattan));
        // The parameter shares the object; the caller's handle stays usable
        sg_object_destroy(manhattan);

        let value = get(knn, "distance").payload.value;
        let mut kind = SgType::SgTypeInt32;
        assert_eq!(sg_value_kind(value, &mut kind), SgReturnCode::SgOk);
        assert_eq!(kind, SgType::SgTypeObject);
        assert_eq!(take_string(sg_value_to_string(value)), "ManhattanMetric");

        let distance = sg_value_take_object(value);
        sg_value_destroy(value);
        assert!(!distance.is_null());
        let mut family = SgFamily::SgFamilyKernel;
        assert_eq!(sg_object_family(distance, &mut family), SgReturnCode::SgOk);
        assert_eq!(family, SgFamily::SgFamilyDistance);
        assert_eq!(take_string(sg_object_name(distance)), "ManhattanMetric");

        sg_object_destroy(distance);
        sg_object_destroy(mean);
        sg_object_destroy(knn);
    }
}

#[test]
fn test_clone_and_describe() {
    unsafe {
        let kernel = create(sg_kernel_create, "LinearKernel");
        let clone = sg_object_clone(kernel);
        sg_object_destroy(kernel);

        expect_ok(put_i32(clone, "cache_size", 32));
        assert_eq!(take_string(sg_object_to_string(clone)), "LinearKernel(cache_size=32)");
        sg_object_destroy(clone);
    }
}

#[test]
fn test_train_apply_evaluate_from_files() {
    let data = csv_fixture("0.0,0.1\n0.2,0.0\n5.0,5.1\n5.2,4.9\n");
    let truth = csv_fixture("0\n0\n1\n1\n");
    let data_path = cstr(data.path().to_str().unwrap());
    let truth_path = cstr(truth.path().to_str().unwrap());

    unsafe {
        sg_set_num_threads(2);

        let data_file = expect_object(sg_csv_file_read(data_path.as_ptr()));
        let class = cstr("CSVFile");
        let truth_file = expect_object(sg_file_create(class.as_ptr(), truth_path.as_ptr()));

        let features = expect_object(sg_features_from_file(data_file));
        let labels = expect_object(sg_labels_from_file(truth_file));

        let knn = create(sg_machine_create, "KNN");
        expect_ok(put_i32(knn, "k", 1));
        expect_ok(put_object(knn, "labels", labels));
        expect_ok(sg_machine_train(knn, features));

        let predicted = expect_object(sg_machine_apply_multiclass(knn, features));
        let accuracy = create(sg_evaluation_create, "MulticlassAccuracy");
        let score = sg_evaluation_evaluate(accuracy, predicted, labels);
        assert_eq!(score.code, SgReturnCode::SgOk);
        assert_eq!(score.payload.value, 1.0);

        let regression = expect_object(sg_machine_apply(knn, features));
        let mse = create(sg_evaluation_create, "MeanSquaredError");
        let score = sg_evaluation_evaluate(mse, regression, labels);
        assert_eq!(score.code, SgReturnCode::SgOk);
        assert_eq!(score.payload.value, 0.0);

        for obj in [
            mse, regression, accuracy, predicted, knn, labels, features, truth_file, data_file,
        ] {
            sg_object_destroy(obj);
        }
    }
}

#[test]
fn test_wrong_family_is_invariant_violation() {
    unsafe {
        let kernel = create(sg_kernel_create, "GaussianKernel");
        let values = [1.0_f64, 2.0, 3.0, 4.0];
        let features = expect_object(sg_features_from_data(
            values.as_ptr().cast::<c_void>(),
            2,
            2,
            SgType::SgTypeFloat64 as u32,
        ));

        let (code, msg) = expect_err(sg_machine_train(kernel, features));
        assert_eq!(code, SgReturnCode::SgInvariantViolation);
        assert!(msg.contains("Expected machine to be of type Machine"), "{}", msg);

        // Untrained machine reports a collaborator failure
        let knn = create(sg_machine_create, "KNN");
        let result = sg_machine_apply(knn, features);
        assert_eq!(result.code, SgReturnCode::SgOperationFailed);
        sg_string_free(result.payload.error);

        expect_ok(sg_kernel_init(kernel, features, features));

        sg_object_destroy(knn);
        sg_object_destroy(features);
        sg_object_destroy(kernel);
    }
}
