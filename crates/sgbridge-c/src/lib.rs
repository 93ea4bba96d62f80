// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # sgbridge C FFI Bindings
//!
//! C-compatible bindings over the `sgbridge` object/parameter boundary.
//!
//! Every object crosses as an opaque [`SgObject`] handle. Fallible calls
//! return a tagged result struct (`SgResult`, `SgObjectResult`,
//! `SgFloat64Result`, `SgValueResult`) whose `code` must be checked before
//! the payload union is read. On failure the payload holds a message owned
//! by the caller, released with [`sg_string_free`].
//!
//! # Safety
//!
//! All public functions are `unsafe` and require the caller to uphold the
//! invariants documented in each function's safety comment.

mod factory_ffi;
mod logging;
mod ops_ffi;
mod param_ffi;

pub use factory_ffi::*;
pub use logging::*;
pub use ops_ffi::*;
pub use param_ffi::*;

use std::any::Any;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::slice;

use sgbridge::{DomainObject, Error, ObjectFamily, Shape, ValueKind};

/// Opaque handle to a domain object (machine, kernel, labels, ...).
///
/// Each handle owns one share of the underlying object; cloning a handle
/// never copies the object.
#[repr(C)]
pub struct SgObject {
    _private: [u8; 0],
}

/// Return codes for sgbridge C API.
///
/// # Error Code Categories
///
/// - **0-9**: Generic errors
/// - **10-19**: Object lifecycle errors
/// - **30-39**: Marshalling errors
/// - **40-49**: Capability errors
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SgReturnCode {
    // === Generic errors (0-9) ===
    /// Operation completed successfully
    SgOk = 0,
    /// Null pointer or non-UTF-8 string argument
    SgInvalidArgument = 1,
    /// Parameter name not present on the object
    SgParameterNotFound = 2,
    /// A train/apply/init/evaluate/read collaborator failed
    SgOperationFailed = 3,

    // === Object lifecycle errors (10-19) ===
    /// Factory could not build the requested object
    SgConstructionFailure = 10,
    /// Handle of the wrong family passed to a family-specific operation
    SgInvariantViolation = 11,
    /// Object-valued parameter holds no object
    SgEmptySlot = 12,

    // === Marshalling errors (30-39) ===
    /// Value kind or object family incompatible with the parameter
    SgTypeMismatch = 30,

    // === Capability errors (40-49) ===
    /// Requested operation or element kind is not supported
    SgUnsupported = 41,
}

/// Scalar or element kind of a value crossing the boundary.
///
/// Entry points that take a kind from C accept it as a raw `uint32_t` and
/// reject values outside this enum with `SG_UNSUPPORTED`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SgType {
    SgTypeInt32 = 0,
    SgTypeInt64 = 1,
    SgTypeFloat32 = 2,
    SgTypeFloat64 = 3,
    /// Pointer to an `SgObject` handle
    SgTypeObject = 4,
}

/// Container shape of a value.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SgShape {
    SgShapeScalar = 0,
    SgShapeVector = 1,
    SgShapeMatrix = 2,
}

/// Object family reported by [`sg_object_family`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SgFamily {
    SgFamilyKernel = 0,
    SgFamilyMachine = 1,
    SgFamilyDistance = 2,
    SgFamilyFeatures = 3,
    SgFamilyFile = 4,
    SgFamilyCombinationRule = 5,
    SgFamilyLabels = 6,
    SgFamilyEvaluation = 7,
}

impl TryFrom<u32> for SgType {
    type Error = Error;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(SgType::SgTypeInt32),
            1 => Ok(SgType::SgTypeInt64),
            2 => Ok(SgType::SgTypeFloat32),
            3 => Ok(SgType::SgTypeFloat64),
            4 => Ok(SgType::SgTypeObject),
            _ => Err(Error::UnsupportedOperation(format!(
                "Cannot handle element type {}",
                raw
            ))),
        }
    }
}

impl From<SgType> for ValueKind {
    fn from(kind: SgType) -> Self {
        match kind {
            SgType::SgTypeInt32 => ValueKind::Int32,
            SgType::SgTypeInt64 => ValueKind::Int64,
            SgType::SgTypeFloat32 => ValueKind::Float32,
            SgType::SgTypeFloat64 => ValueKind::Float64,
            SgType::SgTypeObject => ValueKind::Object,
        }
    }
}

impl From<ValueKind> for SgType {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Int32 => SgType::SgTypeInt32,
            ValueKind::Int64 => SgType::SgTypeInt64,
            ValueKind::Float32 => SgType::SgTypeFloat32,
            ValueKind::Float64 => SgType::SgTypeFloat64,
            ValueKind::Object => SgType::SgTypeObject,
        }
    }
}

impl From<Shape> for SgShape {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Scalar => SgShape::SgShapeScalar,
            Shape::Vector => SgShape::SgShapeVector,
            Shape::Matrix => SgShape::SgShapeMatrix,
        }
    }
}

impl From<ObjectFamily> for SgFamily {
    fn from(family: ObjectFamily) -> Self {
        match family {
            ObjectFamily::Kernel => SgFamily::SgFamilyKernel,
            ObjectFamily::Machine => SgFamily::SgFamilyMachine,
            ObjectFamily::Distance => SgFamily::SgFamilyDistance,
            ObjectFamily::Features => SgFamily::SgFamilyFeatures,
            ObjectFamily::File => SgFamily::SgFamilyFile,
            ObjectFamily::CombinationRule => SgFamily::SgFamilyCombinationRule,
            ObjectFamily::Labels => SgFamily::SgFamilyLabels,
            ObjectFamily::Evaluation => SgFamily::SgFamilyEvaluation,
        }
    }
}

impl From<&Error> for SgReturnCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::TypeMismatch { .. } => SgReturnCode::SgTypeMismatch,
            Error::ParameterNotFound { .. } => SgReturnCode::SgParameterNotFound,
            Error::EmptySlot { .. } => SgReturnCode::SgEmptySlot,
            Error::UnsupportedOperation(_) => SgReturnCode::SgUnsupported,
            Error::ConstructionFailure(_) => SgReturnCode::SgConstructionFailure,
            Error::InvariantViolation(_) => SgReturnCode::SgInvariantViolation,
            Error::Collaborator(_) => SgReturnCode::SgOperationFailed,
        }
    }
}

// =============================================================================
// Result Encoding
// =============================================================================

/// Failure observed at the C edge: a bad argument or a core error.
#[derive(Debug)]
pub(crate) enum Failure {
    InvalidArgument(String),
    Bridge(Error),
}

impl Failure {
    fn code(&self) -> SgReturnCode {
        match self {
            Failure::InvalidArgument(_) => SgReturnCode::SgInvalidArgument,
            Failure::Bridge(err) => SgReturnCode::from(err),
        }
    }

    fn into_message(self) -> *mut c_char {
        let msg = match self {
            Failure::InvalidArgument(msg) => format!("Invalid argument: {}", msg),
            Failure::Bridge(err) => err.to_string(),
        };
        into_c_string(msg)
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure::Bridge(err)
    }
}

pub(crate) type FfiResult<T> = std::result::Result<T, Failure>;

/// Outcome of an operation with no payload. `error` is NULL on success.
#[repr(C)]
pub struct SgResult {
    pub code: SgReturnCode,
    pub error: *mut c_char,
}

/// Payload of [`SgObjectResult`]: `object` when `code == SG_OK`, else `error`.
#[repr(C)]
#[derive(Clone, Copy)]
pub union SgObjectPayload {
    pub object: *mut SgObject,
    pub error: *mut c_char,
}

/// Outcome of an operation producing an object handle.
#[repr(C)]
pub struct SgObjectResult {
    pub code: SgReturnCode,
    pub payload: SgObjectPayload,
}

/// Payload of [`SgFloat64Result`]: `value` when `code == SG_OK`, else `error`.
#[repr(C)]
#[derive(Clone, Copy)]
pub union SgFloat64Payload {
    pub value: f64,
    pub error: *mut c_char,
}

/// Outcome of an operation producing a `float64`.
#[repr(C)]
pub struct SgFloat64Result {
    pub code: SgReturnCode,
    pub payload: SgFloat64Payload,
}

impl From<FfiResult<()>> for SgResult {
    fn from(result: FfiResult<()>) -> Self {
        match result {
            Ok(()) => SgResult {
                code: SgReturnCode::SgOk,
                error: ptr::null_mut(),
            },
            Err(failure) => SgResult {
                code: failure.code(),
                error: failure.into_message(),
            },
        }
    }
}

impl From<FfiResult<DomainObject>> for SgObjectResult {
    fn from(result: FfiResult<DomainObject>) -> Self {
        match result {
            Ok(obj) => SgObjectResult {
                code: SgReturnCode::SgOk,
                payload: SgObjectPayload {
                    object: into_handle(obj),
                },
            },
            Err(failure) => SgObjectResult {
                code: failure.code(),
                payload: SgObjectPayload {
                    error: failure.into_message(),
                },
            },
        }
    }
}

impl From<FfiResult<f64>> for SgFloat64Result {
    fn from(result: FfiResult<f64>) -> Self {
        match result {
            Ok(value) => SgFloat64Result {
                code: SgReturnCode::SgOk,
                payload: SgFloat64Payload { value },
            },
            Err(failure) => SgFloat64Result {
                code: failure.code(),
                payload: SgFloat64Payload {
                    error: failure.into_message(),
                },
            },
        }
    }
}

// =============================================================================
// Boundary Helpers
// =============================================================================

/// Run `f`, turning a panic into an `SG_OPERATION_FAILED` result.
pub(crate) fn guarded<T>(entry: &str, f: impl FnOnce() -> FfiResult<T>) -> FfiResult<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            log::debug!("[ffi] {} panicked: {}", entry, msg);
            Err(Failure::Bridge(Error::Collaborator(format!(
                "{} panicked: {}",
                entry, msg
            ))))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Borrow the object behind a handle.
pub(crate) unsafe fn object_ref<'a>(
    handle: *const SgObject,
    role: &str,
) -> FfiResult<&'a DomainObject> {
    if handle.is_null() {
        return Err(Failure::InvalidArgument(format!("{} is NULL", role)));
    }
    Ok(&*handle.cast::<DomainObject>())
}

/// Borrow a NUL-terminated UTF-8 string.
pub(crate) unsafe fn c_str<'a>(s: *const c_char, role: &str) -> FfiResult<&'a str> {
    if s.is_null() {
        return Err(Failure::InvalidArgument(format!("{} is NULL", role)));
    }
    CStr::from_ptr(s)
        .to_str()
        .map_err(|_| Failure::InvalidArgument(format!("{} is not valid UTF-8", role)))
}

/// Borrow `rows * cols` elements of `kind` as raw bytes.
///
/// Empty when the element count is zero or the kind has no byte layout; the
/// core reports those cases itself.
pub(crate) unsafe fn element_bytes<'a>(
    data: *const c_void,
    rows: u32,
    cols: u32,
    kind: ValueKind,
) -> FfiResult<&'a [u8]> {
    let Some(size) = kind.element_size() else {
        return Ok(&[]);
    };
    let len = (rows as usize)
        .checked_mul(cols as usize)
        .and_then(|n| n.checked_mul(size))
        .ok_or_else(|| Failure::InvalidArgument(format!("{}x{} {} overflows", rows, cols, kind)))?;
    if len == 0 {
        return Ok(&[]);
    }
    if data.is_null() {
        return Err(Failure::InvalidArgument("data is NULL".to_string()));
    }
    Ok(slice::from_raw_parts(data.cast::<u8>(), len))
}

pub(crate) fn into_handle(obj: DomainObject) -> *mut SgObject {
    Box::into_raw(Box::new(obj)).cast::<SgObject>()
}

/// Caller-owned copy of `s`; interior NULs are replaced.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') {
        s.replace('\0', " ")
    } else {
        s
    };
    CString::new(s).map_or(ptr::null_mut(), CString::into_raw)
}

// =============================================================================
// Handle Lifecycle
// =============================================================================

/// Release a handle. The object is freed when its last handle is released.
///
/// # Safety
/// - `obj` must be a handle returned by this library, or NULL.
/// - Releasing the same handle twice is undefined behaviour.
#[no_mangle]
pub unsafe extern "C" fn sg_object_destroy(obj: *mut SgObject) {
    if !obj.is_null() {
        drop(Box::from_raw(obj.cast::<DomainObject>()));
    }
}

/// Create a second handle to the same object.
///
/// # Safety
/// `obj` must be a valid handle or NULL.
///
/// # Returns
/// New handle (release with `sg_object_destroy`), or NULL if `obj` is NULL.
#[no_mangle]
pub unsafe extern "C" fn sg_object_clone(obj: *const SgObject) -> *mut SgObject {
    match object_ref(obj, "obj") {
        Ok(obj) => into_handle(obj.clone()),
        Err(_) => ptr::null_mut(),
    }
}

/// Human-readable representation, e.g. `KNN(k=3, seed=0, ...)`.
///
/// # Safety
/// `obj` must be a valid handle or NULL.
///
/// # Returns
/// Caller-owned string (release with `sg_string_free`), or NULL.
#[no_mangle]
pub unsafe extern "C" fn sg_object_to_string(obj: *const SgObject) -> *mut c_char {
    let described = guarded("sg_object_to_string", || Ok(object_ref(obj, "obj")?.describe()));
    described.map_or(ptr::null_mut(), into_c_string)
}

/// Class name of the object (`KNN`, `GaussianKernel`, ...).
///
/// # Safety
/// `obj` must be a valid handle or NULL.
///
/// # Returns
/// Caller-owned string (release with `sg_string_free`), or NULL.
#[no_mangle]
pub unsafe extern "C" fn sg_object_name(obj: *const SgObject) -> *mut c_char {
    match object_ref(obj, "obj") {
        Ok(obj) => into_c_string(obj.name().to_string()),
        Err(_) => ptr::null_mut(),
    }
}

/// Write the object's family to `out_family`.
///
/// # Safety
/// `obj` must be a valid handle; `out_family` must be writable.
#[no_mangle]
pub unsafe extern "C" fn sg_object_family(
    obj: *const SgObject,
    out_family: *mut SgFamily,
) -> SgReturnCode {
    if out_family.is_null() {
        return SgReturnCode::SgInvalidArgument;
    }
    let Ok(obj) = object_ref(obj, "obj") else {
        return SgReturnCode::SgInvalidArgument;
    };
    *out_family = obj.family().into();
    SgReturnCode::SgOk
}

/// Release a string returned by this library (names, representations and
/// error messages).
///
/// # Safety
/// `s` must come from this library and not have been freed, or be NULL.
#[no_mangle]
pub unsafe extern "C" fn sg_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

// =============================================================================
// Runtime
// =============================================================================

/// Get sgbridge library version string
///
/// # Safety
/// The returned pointer is valid for the lifetime of the process (static storage).
#[no_mangle]
pub unsafe extern "C" fn sg_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr().cast::<c_char>()
}

/// Set the number of worker threads used by machine inference.
///
/// Values below 1 are clamped to 1.
///
/// # Safety
/// Safe to call from any thread.
#[no_mangle]
pub unsafe extern "C" fn sg_set_num_threads(num_threads: u32) {
    sgbridge::config::set_num_threads(num_threads as usize);
}
