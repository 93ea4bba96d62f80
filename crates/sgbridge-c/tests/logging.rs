// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::undocumented_unsafe_blocks)] // Every block calls the C API under test

//! Explicit logger installation ahead of any factory.
//!
//! The logger is process-global, so this binary holds a single test.

use std::ffi::CString;

use sgbridge_c::*;

#[test]
fn test_explicit_init_then_factory() {
    unsafe {
        assert_eq!(sg_logging_init(SgLogLevel::SgLogDebug), SgReturnCode::SgOk);

        // Later requests are refused, whatever their form
        assert_eq!(
            sg_logging_init(SgLogLevel::SgLogTrace),
            SgReturnCode::SgOperationFailed
        );
        assert_eq!(
            sg_logging_init_env(SgLogLevel::SgLogInfo),
            SgReturnCode::SgOperationFailed
        );
        let filter = CString::new("sgbridge=trace").unwrap();
        assert_eq!(
            sg_logging_init_with_filter(filter.as_ptr()),
            SgReturnCode::SgOperationFailed
        );

        // Factories keep working on top of the caller's logger
        let name = CString::new("GaussianKernel").unwrap();
        let result = sg_kernel_create(name.as_ptr());
        assert_eq!(result.code, SgReturnCode::SgOk);
        sg_object_destroy(result.payload.object);
    }
}
