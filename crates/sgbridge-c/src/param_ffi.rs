// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parameter get/put and the `SgValue` container returned by `sg_object_get`.

use std::ffi::CString;
use std::os::raw::{c_char, c_void};
use std::ptr;

use sgbridge::{marshal, BoundaryValue, DomainObject, TypeDescriptor, ValueKind};

use crate::{
    c_str, element_bytes, guarded, into_c_string, into_handle, object_ref, Failure, FfiResult,
    SgObject, SgResult, SgReturnCode, SgShape, SgType,
};

/// Opaque value read from a parameter.
#[repr(C)]
pub struct SgValue {
    _private: [u8; 0],
}

/// Value plus its storage descriptor, behind an `SgValue` pointer.
struct ValueBox {
    descriptor: TypeDescriptor,
    value: BoundaryValue,
    type_name: CString,
}

impl ValueBox {
    fn new(descriptor: TypeDescriptor, value: BoundaryValue) -> Self {
        // Descriptor names never contain NUL
        let type_name = CString::new(descriptor.name).unwrap_or_default();
        Self {
            descriptor,
            value,
            type_name,
        }
    }

    /// Element bytes in row-major order, None for object values.
    fn bytes(&self) -> Option<Vec<u8>> {
        let bytes = match &self.value {
            BoundaryValue::Int32(v) => v.to_ne_bytes().to_vec(),
            BoundaryValue::Int64(v) => v.to_ne_bytes().to_vec(),
            BoundaryValue::Float32(v) => v.to_ne_bytes().to_vec(),
            BoundaryValue::Float64(v) => v.to_ne_bytes().to_vec(),
            BoundaryValue::Vector(v) => v.to_bytes(),
            BoundaryValue::Matrix(m) => m.to_row_major_bytes(),
            BoundaryValue::Object(_) => return None,
        };
        Some(bytes)
    }
}

unsafe fn value_ref<'a>(value: *const SgValue) -> Option<&'a ValueBox> {
    if value.is_null() {
        None
    } else {
        Some(&*value.cast::<ValueBox>())
    }
}

/// Payload of [`SgValueResult`]: `value` when `code == SG_OK`, else `error`.
#[repr(C)]
#[derive(Clone, Copy)]
pub union SgValuePayload {
    pub value: *mut SgValue,
    pub error: *mut c_char,
}

/// Outcome of `sg_object_get`.
#[repr(C)]
pub struct SgValueResult {
    pub code: SgReturnCode,
    pub payload: SgValuePayload,
}

impl From<FfiResult<ValueBox>> for SgValueResult {
    fn from(result: FfiResult<ValueBox>) -> Self {
        match result {
            Ok(boxed) => SgValueResult {
                code: SgReturnCode::SgOk,
                payload: SgValuePayload {
                    value: Box::into_raw(Box::new(boxed)).cast::<SgValue>(),
                },
            },
            Err(failure) => SgValueResult {
                code: failure.code(),
                payload: SgValuePayload {
                    error: failure.into_message(),
                },
            },
        }
    }
}

// =============================================================================
// Get / Put
// =============================================================================

/// Read parameter `name` of `obj`.
///
/// # Safety
/// - `obj` must be a valid handle.
/// - `name` must be a valid null-terminated C string.
///
/// # Returns
/// A caller-owned `SgValue` (release with `sg_value_destroy`);
/// `SG_PARAMETER_NOT_FOUND` for unknown names, `SG_EMPTY_SLOT` for an
/// object parameter that holds nothing.
#[no_mangle]
pub unsafe extern "C" fn sg_object_get(obj: *const SgObject, name: *const c_char) -> SgValueResult {
    SgValueResult::from(guarded("sg_object_get", || {
        let obj = object_ref(obj, "obj")?;
        let name = c_str(name, "name")?;
        let (descriptor, value) = marshal::get(obj, name)?;
        Ok(ValueBox::new(descriptor, value))
    }))
}

/// Decode one scalar or object handle from `value` as `kind`.
unsafe fn decode_value(value: *const c_void, kind: SgType) -> FfiResult<BoundaryValue> {
    if value.is_null() {
        return Err(Failure::InvalidArgument("value is NULL".to_string()));
    }
    let decoded = match kind {
        SgType::SgTypeInt32 => BoundaryValue::Int32(ptr::read_unaligned(value.cast::<i32>())),
        SgType::SgTypeInt64 => BoundaryValue::Int64(ptr::read_unaligned(value.cast::<i64>())),
        SgType::SgTypeFloat32 => BoundaryValue::Float32(ptr::read_unaligned(value.cast::<f32>())),
        SgType::SgTypeFloat64 => BoundaryValue::Float64(ptr::read_unaligned(value.cast::<f64>())),
        SgType::SgTypeObject => {
            let handle = &*value.cast::<DomainObject>();
            BoundaryValue::Object(handle.clone())
        }
    };
    Ok(decoded)
}

/// Write parameter `name` of `obj`.
///
/// `kind` is an `SgType` value. `value` points to one element of `kind`. For `SG_TYPE_OBJECT`, `value`
/// is the `SgObject*` itself; the parameter then shares the object and the
/// caller keeps its handle.
///
/// # Safety
/// - `obj` must be a valid handle; `name` a valid C string.
/// - `value` must point to a readable element of `kind`, or be a valid
///   handle when `kind` is `SG_TYPE_OBJECT`.
///
/// # Returns
/// `SG_TYPE_MISMATCH` if `kind` does not fit the parameter; the stored
/// value is left unchanged. `SG_UNSUPPORTED` if `kind` is not an `SgType`.
#[no_mangle]
pub unsafe extern "C" fn sg_object_put(
    obj: *const SgObject,
    name: *const c_char,
    value: *const c_void,
    kind: u32,
) -> SgResult {
    SgResult::from(guarded("sg_object_put", || {
        let obj = object_ref(obj, "obj")?;
        let name = c_str(name, "name")?;
        let kind = SgType::try_from(kind)?;
        let value = decode_value(value, kind)?;
        marshal::put(obj, name, value).map_err(Failure::from)
    }))
}

/// Write a row-major `rows x cols` matrix into parameter `name`.
///
/// # Safety
/// - `obj` must be a valid handle; `name` a valid C string.
/// - `data` must point to at least `rows * cols` elements of `kind`.
///
/// # Returns
/// `SG_UNSUPPORTED` when `rows == 0` (vector form), or when `kind` is
/// `SG_TYPE_OBJECT` or not an `SgType` at all.
#[no_mangle]
pub unsafe extern "C" fn sg_object_put_array(
    obj: *const SgObject,
    name: *const c_char,
    data: *const c_void,
    rows: u32,
    cols: u32,
    kind: u32,
) -> SgResult {
    SgResult::from(guarded("sg_object_put_array", || {
        let obj = object_ref(obj, "obj")?;
        let name = c_str(name, "name")?;
        let kind = ValueKind::from(SgType::try_from(kind)?);
        let bytes = element_bytes(data, rows, cols, kind)?;
        marshal::put_array(obj, name, bytes, rows as usize, cols as usize, kind)
            .map_err(Failure::from)
    }))
}

// =============================================================================
// SgValue Accessors
// =============================================================================

/// Element kind of the value.
///
/// # Safety
/// `value` must be valid; `out_kind` must be writable.
#[no_mangle]
pub unsafe extern "C" fn sg_value_kind(value: *const SgValue, out_kind: *mut SgType) -> SgReturnCode {
    let Some(value) = value_ref(value) else {
        return SgReturnCode::SgInvalidArgument;
    };
    if out_kind.is_null() {
        return SgReturnCode::SgInvalidArgument;
    }
    *out_kind = value.descriptor.kind().into();
    SgReturnCode::SgOk
}

/// Container shape of the value.
///
/// # Safety
/// `value` must be valid; `out_shape` must be writable.
#[no_mangle]
pub unsafe extern "C" fn sg_value_shape(
    value: *const SgValue,
    out_shape: *mut SgShape,
) -> SgReturnCode {
    let Some(value) = value_ref(value) else {
        return SgReturnCode::SgInvalidArgument;
    };
    if out_shape.is_null() {
        return SgReturnCode::SgInvalidArgument;
    }
    *out_shape = value.descriptor.shape().into();
    SgReturnCode::SgOk
}

/// Storage type name (`int32`, `Matrix<float64>`, `Distance`, ...).
///
/// # Safety
/// `value` must be valid or NULL.
///
/// # Returns
/// Borrowed string, valid until `sg_value_destroy`; NULL if `value` is NULL.
#[no_mangle]
pub unsafe extern "C" fn sg_value_type_name(value: *const SgValue) -> *const c_char {
    value_ref(value).map_or(ptr::null(), |v| v.type_name.as_ptr())
}

/// Shared body of the scalar getters.
unsafe fn get_scalar<T>(
    value: *const SgValue,
    out_value: *mut T,
    extract: fn(&BoundaryValue) -> Option<T>,
) -> SgReturnCode {
    let Some(value) = value_ref(value) else {
        return SgReturnCode::SgInvalidArgument;
    };
    if out_value.is_null() {
        return SgReturnCode::SgInvalidArgument;
    }
    match extract(&value.value) {
        Some(v) => {
            *out_value = v;
            SgReturnCode::SgOk
        }
        None => SgReturnCode::SgTypeMismatch,
    }
}

/// Read an `int32` value.
///
/// # Safety
/// `value` must be valid; `out_value` must be writable.
///
/// # Returns
/// `SG_TYPE_MISMATCH` if the value holds another type.
#[no_mangle]
pub unsafe extern "C" fn sg_value_get_int32(value: *const SgValue, out_value: *mut i32) -> SgReturnCode {
    get_scalar(value, out_value, |v| match *v {
        BoundaryValue::Int32(x) => Some(x),
        _ => None,
    })
}

/// Read an `int64` value.
///
/// # Safety
/// `value` must be valid; `out_value` must be writable.
///
/// # Returns
/// `SG_TYPE_MISMATCH` if the value holds another type.
#[no_mangle]
pub unsafe extern "C" fn sg_value_get_int64(value: *const SgValue, out_value: *mut i64) -> SgReturnCode {
    get_scalar(value, out_value, |v| match *v {
        BoundaryValue::Int64(x) => Some(x),
        _ => None,
    })
}

/// Read a `float32` value.
///
/// # Safety
/// `value` must be valid; `out_value` must be writable.
///
/// # Returns
/// `SG_TYPE_MISMATCH` if the value holds another type.
#[no_mangle]
pub unsafe extern "C" fn sg_value_get_float32(value: *const SgValue, out_value: *mut f32) -> SgReturnCode {
    get_scalar(value, out_value, |v| match *v {
        BoundaryValue::Float32(x) => Some(x),
        _ => None,
    })
}

/// Read a `float64` value.
///
/// # Safety
/// `value` must be valid; `out_value` must be writable.
///
/// # Returns
/// `SG_TYPE_MISMATCH` if the value holds another type.
#[no_mangle]
pub unsafe extern "C" fn sg_value_get_float64(value: *const SgValue, out_value: *mut f64) -> SgReturnCode {
    get_scalar(value, out_value, |v| match *v {
        BoundaryValue::Float64(x) => Some(x),
        _ => None,
    })
}

/// Dimensions of a vector (`len x 1`) or matrix value.
///
/// # Safety
/// `value` must be valid; `out_rows` and `out_cols` must be writable.
///
/// # Returns
/// `SG_TYPE_MISMATCH` for scalar and object values.
#[no_mangle]
pub unsafe extern "C" fn sg_value_dims(
    value: *const SgValue,
    out_rows: *mut u32,
    out_cols: *mut u32,
) -> SgReturnCode {
    let Some(value) = value_ref(value) else {
        return SgReturnCode::SgInvalidArgument;
    };
    if out_rows.is_null() || out_cols.is_null() {
        return SgReturnCode::SgInvalidArgument;
    }
    let (rows, cols) = match &value.value {
        BoundaryValue::Vector(v) => (v.len(), 1),
        BoundaryValue::Matrix(m) => (m.nrows(), m.ncols()),
        _ => return SgReturnCode::SgTypeMismatch,
    };
    let (Ok(rows), Ok(cols)) = (u32::try_from(rows), u32::try_from(cols)) else {
        return SgReturnCode::SgUnsupported;
    };
    *out_rows = rows;
    *out_cols = cols;
    SgReturnCode::SgOk
}

/// Copy the value's elements (row-major for matrices) into `out`.
///
/// Pass `out = NULL` to query the required size in `out_len`.
///
/// # Safety
/// - `value` must be valid; `out_len` must be writable.
/// - `out` must be NULL or point to `capacity` writable bytes.
///
/// # Returns
/// `SG_INVALID_ARGUMENT` if `capacity` is too small (the required size is
/// still written to `out_len`), `SG_TYPE_MISMATCH` for object values.
#[no_mangle]
pub unsafe extern "C" fn sg_value_copy_array(
    value: *const SgValue,
    out: *mut c_void,
    capacity: usize,
    out_len: *mut usize,
) -> SgReturnCode {
    let Some(value) = value_ref(value) else {
        return SgReturnCode::SgInvalidArgument;
    };
    if out_len.is_null() {
        return SgReturnCode::SgInvalidArgument;
    }
    let Some(bytes) = value.bytes() else {
        return SgReturnCode::SgTypeMismatch;
    };
    *out_len = bytes.len();
    if out.is_null() {
        return SgReturnCode::SgOk;
    }
    if capacity < bytes.len() {
        return SgReturnCode::SgInvalidArgument;
    }
    ptr::copy_nonoverlapping(bytes.as_ptr(), out.cast::<u8>(), bytes.len());
    SgReturnCode::SgOk
}

/// New handle to the object held by an object-valued `SgValue`.
///
/// The value stays valid and must still be released.
///
/// # Safety
/// `value` must be valid or NULL.
///
/// # Returns
/// Caller-owned handle, or NULL if the value is not an object.
#[no_mangle]
pub unsafe extern "C" fn sg_value_take_object(value: *const SgValue) -> *mut SgObject {
    match value_ref(value).and_then(|v| v.value.as_object()) {
        Some(obj) => into_handle(obj.clone()),
        None => ptr::null_mut(),
    }
}

/// Human-readable rendering of the value (`3`, `[[1, 2], [3, 4]]`, ...).
///
/// # Safety
/// `value` must be valid or NULL.
///
/// # Returns
/// Caller-owned string (release with `sg_string_free`), or NULL.
#[no_mangle]
pub unsafe extern "C" fn sg_value_to_string(value: *const SgValue) -> *mut c_char {
    value_ref(value).map_or(ptr::null_mut(), |v| into_c_string(v.value.to_string()))
}

/// Release a value returned by `sg_object_get`.
///
/// # Safety
/// `value` must come from `sg_object_get` and not have been released, or be NULL.
#[no_mangle]
pub unsafe extern "C" fn sg_value_destroy(value: *mut SgValue) {
    if !value.is_null() {
        drop(Box::from_raw(value.cast::<ValueBox>()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_value_box_type_name_is_c_string() {
        let boxed = ValueBox::new(
            TypeDescriptor::scalar(ValueKind::Int32, "int32"),
            BoundaryValue::Int32(7),
        );
        assert_eq!(boxed.type_name.as_c_str(), CStr::from_bytes_with_nul(b"int32\0").unwrap());
        assert_eq!(boxed.bytes().unwrap(), 7_i32.to_ne_bytes().to_vec());
    }
}
