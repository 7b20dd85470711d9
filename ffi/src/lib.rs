//! C-ABI wrapper around `keylink-core`.
//!
//! # Overview
//! Exposes the executor-less traversal builder through `extern "C"`
//! functions so any language with a C FFI can walk an API path and classify
//! calls without linking to an async runtime. Verb invocations come back as
//! plain request data; the host performs the HTTP round-trip.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Builders are immutable: `keylink_builder_segment` returns a new handle
//!   and leaves its input usable.
//! - A single `FfiCallResult` envelope with `FfiCallTag` + `void* data`
//!   conveys requests, descended builders and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `keylink_*_free` / `keylink_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use keylink_core::builder::Call;
use keylink_core::PathBuilder;
use serde_json::Value;

use types::*;

// ---------------------------------------------------------------------------
// Builder lifecycle
// ---------------------------------------------------------------------------

/// Create a root builder with no segments.
///
/// The caller must free the returned pointer with `keylink_builder_free`.
#[unsafe(no_mangle)]
pub extern "C" fn keylink_builder_new() -> *mut FfiPathBuilder {
    catch_unwind(|| FfiPathBuilder::boxed(PathBuilder::new())).unwrap_or(std::ptr::null_mut())
}

/// Free a builder. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn keylink_builder_free(builder: *mut FfiPathBuilder) {
    if !builder.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(builder) });
        });
    }
}

/// Append `name` as a new segment, returning a new builder.
///
/// Returns null if either argument is null or `name` is not valid UTF-8.
/// `builder` is left untouched and must still be freed by the caller.
#[unsafe(no_mangle)]
pub extern "C" fn keylink_builder_segment(
    builder: *const FfiPathBuilder,
    name: *const c_char,
) -> *mut FfiPathBuilder {
    catch_unwind(|| {
        if builder.is_null() || name.is_null() {
            return std::ptr::null_mut();
        }
        let builder = unsafe { &*builder };
        let name = match unsafe { CStr::from_ptr(name) }.to_str() {
            Ok(n) => n,
            Err(_) => return std::ptr::null_mut(),
        };
        FfiPathBuilder::boxed(builder.inner.segment(name))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Raw `/`-joined segments of `builder`, or null if `builder` is null.
///
/// The caller must free the returned string with `keylink_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn keylink_builder_path(builder: *const FfiPathBuilder) -> *mut c_char {
    catch_unwind(|| {
        if builder.is_null() {
            return std::ptr::null_mut();
        }
        let builder = unsafe { &*builder };
        c_string(builder.inner.joined())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Call
// ---------------------------------------------------------------------------

/// Parse the JSON argument list. Null means "called with no arguments".
fn parse_args(args_json: *const c_char) -> Result<Vec<Value>, String> {
    if args_json.is_null() {
        return Ok(Vec::new());
    }
    let text = unsafe { CStr::from_ptr(args_json) }
        .to_str()
        .map_err(|e| e.to_string())?;
    match serde_json::from_str::<Value>(text).map_err(|e| e.to_string())? {
        Value::Array(args) => Ok(args),
        other => Err(format!("got {other}")),
    }
}

/// Call `builder` with a JSON array of positional arguments.
///
/// `args_json` may be null for a zero-argument call. The result carries
/// either a request (`tag = Request`), a new builder (`tag = Descend`) or an
/// error. The caller must free it with `keylink_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn keylink_builder_call(
    builder: *const FfiPathBuilder,
    args_json: *const c_char,
) -> *mut FfiCallResult {
    catch_unwind(|| {
        if builder.is_null() {
            return FfiCallResult::null_arg("builder");
        }
        let builder = unsafe { &*builder };
        let args = match parse_args(args_json) {
            Ok(args) => args,
            Err(detail) => return FfiCallResult::invalid_args(&detail),
        };
        match builder.inner.call(args) {
            Ok(Call::Request(req)) => FfiCallResult::ok_request(req),
            Ok(Call::Descend(next)) => match next.segments().last() {
                Some(inserted) if inserted.contains('\0') => FfiCallResult::nul_segment(inserted),
                _ => FfiCallResult::ok_descend(next),
            },
            Err(e) => FfiCallResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiCallResult::panic("panic in keylink_builder_call"))
}

/// Take ownership of the builder inside a `Descend` result.
///
/// Returns null if `result` is null or does not carry a builder. After this
/// call the result no longer owns the builder; free it with
/// `keylink_builder_free`.
#[unsafe(no_mangle)]
pub extern "C" fn keylink_result_take_builder(result: *mut FfiCallResult) -> *mut FfiPathBuilder {
    if result.is_null() {
        return std::ptr::null_mut();
    }
    let result = unsafe { &mut *result };
    if result.tag != FfiCallTag::Descend || result.data.is_null() {
        return std::ptr::null_mut();
    }
    let builder = result.data as *mut FfiPathBuilder;
    result.data = std::ptr::null_mut();
    result.tag = FfiCallTag::None;
    builder
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiCallResult`. Safe to call with null. Uses `tag` to determine
/// what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn keylink_free_result(result: *mut FfiCallResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.error_path);
        if !result.data.is_null() {
            match result.tag {
                FfiCallTag::Request => {
                    let req = unsafe { Box::from_raw(result.data as *mut FfiHttpRequest) };
                    free_c_string(req.path);
                    free_c_string(req.body);
                    free_c_string(req.config);
                }
                FfiCallTag::Descend => {
                    drop(unsafe { Box::from_raw(result.data as *mut FfiPathBuilder) });
                }
                FfiCallTag::None => {}
            }
        }
    });
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn keylink_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
