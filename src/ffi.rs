//! C-ABI Foreign Function Interface for ods2csv.
//!
//! # Memory Management
//!
//! Strings returned by this library must be freed using `ods2csv_free_string`.
//!
//! # Error Handling
//!
//! Functions that can fail return a null pointer or `-1` on error. Use
//! `ods2csv_last_error` to retrieve the error message.
//!
//! # Example (C)
//!
//! ```c
//! #include <stdio.h>
//! #include "ods2csv.h"
//!
//! int main() {
//!     if (ods2csv_convert_file("prices.ods", "prices.csv") != 0) {
//!         fprintf(stderr, "Error: %s\n", ods2csv_last_error());
//!         return 1;
//!     }
//!     return 0;
//! }
//! ```

use std::cell::RefCell;
use std::ffi::{c_char, c_int, CStr, CString};
use std::panic::catch_unwind;
use std::ptr;

use crate::error::Error;

// Thread-local storage for the last error message.
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message.
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message.
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Message for a null argument, in the library's error wording.
fn null_argument(name: &str) -> String {
    Error::InvalidArgument(format!("{} == null", name)).to_string()
}

/// Borrow a C string argument as UTF-8.
///
/// # Safety
///
/// `s` must be non-null and point to a valid null-terminated string.
unsafe fn path_arg<'a>(s: *const c_char) -> Result<&'a str, String> {
    CStr::from_ptr(s).to_str().map_err(|e| e.to_string())
}

/// Get the version of the library.
///
/// # Safety
///
/// Returns a static string that must not be freed.
#[no_mangle]
pub extern "C" fn ods2csv_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

/// Get the last error message.
///
/// # Safety
///
/// Returns a pointer to a thread-local error string. The pointer is valid until
/// the next call to any ods2csv function on the same thread.
#[no_mangle]
pub extern "C" fn ods2csv_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(ptr::null())
    })
}

/// Convert the ODS file at `input_path` into a CSV file at `output_path`.
///
/// # Safety
///
/// - `input_path` and `output_path` must be valid null-terminated UTF-8 strings.
/// - Returns 0 on success and -1 on error. Use `ods2csv_last_error` to get the
///   error message.
#[no_mangle]
pub unsafe extern "C" fn ods2csv_convert_file(
    input_path: *const c_char,
    output_path: *const c_char,
) -> c_int {
    clear_last_error();

    if input_path.is_null() {
        set_last_error(&null_argument("input_path"));
        return -1;
    }
    if output_path.is_null() {
        set_last_error(&null_argument("output_path"));
        return -1;
    }

    let result = catch_unwind(|| {
        let input = path_arg(input_path)?;
        let output = path_arg(output_path)?;
        crate::convert_file(input, output).map_err(|e| e.to_string())
    });

    match result {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            set_last_error(&e);
            -1
        }
        Err(_) => {
            set_last_error("panic occurred during conversion");
            -1
        }
    }
}

/// Convert an in-memory ODS document to CSV text.
///
/// # Safety
///
/// - `data` must be a valid pointer to a byte buffer of at least `len` bytes.
/// - Returns null on error. Use `ods2csv_last_error` to get the error message.
/// - The returned string must be freed with `ods2csv_free_string`.
#[no_mangle]
pub unsafe extern "C" fn ods2csv_convert_bytes(data: *const u8, len: usize) -> *mut c_char {
    clear_last_error();

    if data.is_null() {
        set_last_error(&null_argument("data"));
        return ptr::null_mut();
    }

    let result = catch_unwind(|| {
        let bytes = std::slice::from_raw_parts(data, len);
        crate::convert_bytes(bytes).map_err(|e| e.to_string())
    });

    match result {
        Ok(Ok(csv)) => match CString::new(csv) {
            Ok(s) => s.into_raw(),
            Err(_) => {
                set_last_error("output contains null byte");
                ptr::null_mut()
            }
        },
        Ok(Err(e)) => {
            set_last_error(&e);
            ptr::null_mut()
        }
        Err(_) => {
            set_last_error("panic occurred during conversion");
            ptr::null_mut()
        }
    }
}

/// Free a string allocated by this library.
///
/// # Safety
///
/// - `s` must be a pointer returned by an ods2csv function, or null.
/// - After calling this function, the pointer is invalid and must not be used.
#[no_mangle]
pub unsafe extern "C" fn ods2csv_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}
