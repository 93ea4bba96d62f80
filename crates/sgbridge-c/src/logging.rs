// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Logger installation for the C API.
//!
//! A process holds one logger. It is installed either explicitly through one
//! of the `sg_logging_init*` functions or implicitly by the first factory
//! call. Whichever comes first wins; later explicit requests return
//! `SG_OPERATION_FAILED` and say so through the installed logger.
//!
//! Level-based initializers scope their filter to the `sgbridge` and
//! `sgbridge_c` targets so host crates sharing the process stay quiet.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::sync::OnceLock;

use env_logger::{Builder, Env};
use log::LevelFilter;

use super::SgReturnCode;

/// Level used by the implicit logger when `RUST_LOG` is unset.
const IMPLICIT_LEVEL: LevelFilter = LevelFilter::Warn;

/// Log level for sgbridge logging
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SgLogLevel {
    SgLogOff = 0,
    SgLogError = 1,
    SgLogWarn = 2,
    SgLogInfo = 3,
    SgLogDebug = 4,
    SgLogTrace = 5,
}

impl From<SgLogLevel> for LevelFilter {
    fn from(level: SgLogLevel) -> Self {
        match level {
            SgLogLevel::SgLogOff => LevelFilter::Off,
            SgLogLevel::SgLogError => LevelFilter::Error,
            SgLogLevel::SgLogWarn => LevelFilter::Warn,
            SgLogLevel::SgLogInfo => LevelFilter::Info,
            SgLogLevel::SgLogDebug => LevelFilter::Debug,
            SgLogLevel::SgLogTrace => LevelFilter::Trace,
        }
    }
}

/// Who put the process logger in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Installer {
    /// First factory call, `RUST_LOG`-driven.
    Factory,
    /// `sg_logging_init*` from the caller.
    Caller(&'static str),
    /// Some other logger was already registered with `log`.
    Host,
}

static INSTALLED: OnceLock<Installer> = OnceLock::new();

/// Filter directives enabling `level` for this library's targets only.
fn library_directives(level: LevelFilter) -> String {
    format!("sgbridge={level},sgbridge_c={level}")
}

/// Single installation path shared by the explicit and implicit initializers.
fn install(mut builder: Builder, installer: Installer) -> SgReturnCode {
    let mut code = SgReturnCode::SgOperationFailed;
    let winner = *INSTALLED.get_or_init(|| match builder.format_timestamp_millis().try_init() {
        Ok(()) => {
            code = SgReturnCode::SgOk;
            installer
        }
        Err(_) => Installer::Host,
    });

    if code == SgReturnCode::SgOk {
        log::debug!("[sgbridge-c] logger installed by {:?}", installer);
    } else if let Installer::Caller(entry) = installer {
        log::warn!(
            "[sgbridge-c] {} ignored: logger already installed by {:?}",
            entry,
            winner
        );
    }
    code
}

/// Install the implicit logger unless one is already in place.
pub(crate) fn ensure_logger() {
    if INSTALLED.get().is_some() {
        return;
    }
    let env = Env::default().default_filter_or(library_directives(IMPLICIT_LEVEL));
    let _ = install(Builder::from_env(env), Installer::Factory);
}

/// Initialize sgbridge logging with console output at `level`.
///
/// Only `sgbridge` and `sgbridge_c` targets are enabled. Call before the
/// first factory; factories otherwise install a `RUST_LOG`-driven logger.
///
/// # Safety
/// Must be called from a single thread during initialization.
///
/// # Returns
/// `SG_OK` on success, `SG_OPERATION_FAILED` if a logger is already installed
///
/// # Example (C)
/// ```c
/// sg_logging_init(SG_LOG_DEBUG);
/// ```
#[no_mangle]
pub unsafe extern "C" fn sg_logging_init(level: SgLogLevel) -> SgReturnCode {
    let mut builder = Builder::new();
    builder.parse_filters(&library_directives(level.into()));
    install(builder, Installer::Caller("sg_logging_init"))
}

/// Initialize sgbridge logging, letting `RUST_LOG` override `default_level`.
///
/// # Safety
/// Must be called from a single thread during initialization.
///
/// # Returns
/// `SG_OK` on success, `SG_OPERATION_FAILED` if a logger is already installed
#[no_mangle]
pub unsafe extern "C" fn sg_logging_init_env(default_level: SgLogLevel) -> SgReturnCode {
    let env = Env::default().default_filter_or(library_directives(default_level.into()));
    install(Builder::from_env(env), Installer::Caller("sg_logging_init_env"))
}

/// Initialize sgbridge logging with a filter string such as
/// `"sgbridge=trace,warn"`.
///
/// # Safety
/// - `filter` must be a valid null-terminated C string or NULL.
///
/// # Returns
/// `SG_INVALID_ARGUMENT` for NULL or non-UTF-8 input, `SG_OPERATION_FAILED`
/// if a logger is already installed
#[no_mangle]
pub unsafe extern "C" fn sg_logging_init_with_filter(filter: *const c_char) -> SgReturnCode {
    if filter.is_null() {
        return SgReturnCode::SgInvalidArgument;
    }

    let Ok(filter_str) = CStr::from_ptr(filter).to_str() else {
        return SgReturnCode::SgInvalidArgument;
    };

    let mut builder = Builder::new();
    builder.parse_filters(filter_str);
    install(builder, Installer::Caller("sg_logging_init_with_filter"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_directives() {
        assert_eq!(
            library_directives(SgLogLevel::SgLogDebug.into()),
            "sgbridge=DEBUG,sgbridge_c=DEBUG"
        );
        assert_eq!(
            library_directives(SgLogLevel::SgLogOff.into()),
            "sgbridge=OFF,sgbridge_c=OFF"
        );
    }
}
