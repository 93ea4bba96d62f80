// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::undocumented_unsafe_blocks)] // Every block calls the C API under test

//! Explicit logger installation after a factory already installed one.
//!
//! The logger is process-global, so this binary holds a single test.

use std::ffi::CString;
use std::ptr;

use sgbridge_c::*;

#[test]
fn test_init_after_factory_is_refused() {
    unsafe {
        let name = CString::new("KNN").unwrap();
        let result = sg_machine_create(name.as_ptr());
        assert_eq!(result.code, SgReturnCode::SgOk);

        assert_eq!(
            sg_logging_init(SgLogLevel::SgLogDebug),
            SgReturnCode::SgOperationFailed
        );
        // Argument checks still come first
        assert_eq!(
            sg_logging_init_with_filter(ptr::null()),
            SgReturnCode::SgInvalidArgument
        );

        sg_object_destroy(result.payload.object);
    }
}
