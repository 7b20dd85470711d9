//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, JSON text instead of
//! `serde_json::Value`, and tagged enums with explicit discriminants.
//! Conversion functions live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use keylink_core::error::ApiError;
use keylink_core::http::HttpMethod;
use keylink_core::PathBuilder;

/// Opaque handle to a `PathBuilder`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiPathBuilder {
    pub(crate) inner: PathBuilder,
}

impl FfiPathBuilder {
    pub(crate) fn boxed(inner: PathBuilder) -> *mut Self {
        Box::into_raw(Box::new(FfiPathBuilder { inner }))
    }
}

/// Build a C string, or null if `s` has an interior NUL.
///
/// Segments are screened for NUL on the way in, so paths and JSON text
/// handed out here never take the null branch.
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s).map_or(std::ptr::null_mut(), CString::into_raw)
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Delete = 1,
    Post = 2,
    Put = 3,
    Patch = 4,
    Head = 5,
    Options = 6,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Delete => FfiHttpMethod::Delete,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Patch => FfiHttpMethod::Patch,
            HttpMethod::Head => FfiHttpMethod::Head,
            HttpMethod::Options => FfiHttpMethod::Options,
        }
    }
}

/// A verb invocation described as C-compatible plain data.
///
/// `body` and `config` are JSON text, or null when the call did not supply
/// them. The C caller executes the request itself.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub body: *mut c_char,
    pub config: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: keylink_core::HttpRequest) -> *mut Self {
        let json_or_null = |value: Option<serde_json::Value>| match value {
            Some(v) => c_string(v.to_string()),
            None => std::ptr::null_mut(),
        };
        let ffi_req = Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: c_string(req.path),
            body: json_or_null(req.body),
            config: json_or_null(req.config),
        });
        Box::into_raw(ffi_req)
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiCallResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidPathCall = 1,
    InvalidArgs = 2,
    Panic = 3,
    NullArg = 4,
}

/// Tag that tells `keylink_free_result` what `FfiCallResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiCallTag {
    None = 0,
    Request = 1,
    Descend = 2,
}

/// Result envelope for `keylink_builder_call`.
///
/// On success `error_code` is `Ok` and `data` points to an `FfiHttpRequest`
/// (`tag = Request`) or a new `FfiPathBuilder` (`tag = Descend`).
/// On failure `error_message` is a human-readable C string and `data` is
/// null. For `InvalidPathCall`, `error_path` holds the raw joined path.
#[repr(C)]
pub struct FfiCallResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub error_path: *mut c_char,
    pub tag: FfiCallTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiCallResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        error_path: *mut c_char,
        tag: FfiCallTag,
        data: *mut std::ffi::c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiCallResult {
            error_code,
            error_message,
            error_path,
            tag,
            data,
        }))
    }

    pub(crate) fn ok_request(req: keylink_core::HttpRequest) -> *mut Self {
        let data = FfiHttpRequest::from_core(req) as *mut std::ffi::c_void;
        Self::ok(FfiCallTag::Request, data)
    }

    pub(crate) fn ok_descend(builder: PathBuilder) -> *mut Self {
        let data = FfiPathBuilder::boxed(builder) as *mut std::ffi::c_void;
        Self::ok(FfiCallTag::Descend, data)
    }

    fn ok(tag: FfiCallTag, data: *mut std::ffi::c_void) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), std::ptr::null_mut(), tag, data)
    }

    fn failed(error_code: FfiErrorCode, message: String) -> *mut Self {
        let message = c_string(message);
        let none = std::ptr::null_mut();
        Self::boxed(error_code, message, none, FfiCallTag::None, std::ptr::null_mut())
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let message = c_string(err.to_string());
        let (error_code, error_path) = match err {
            ApiError::InvalidPathCall { path } => (FfiErrorCode::InvalidPathCall, c_string(path)),
            _ => (FfiErrorCode::InvalidArgs, std::ptr::null_mut()),
        };
        Self::boxed(error_code, message, error_path, FfiCallTag::None, std::ptr::null_mut())
    }

    /// Build an error result for arguments that are not a JSON array.
    pub(crate) fn invalid_args(detail: &str) -> *mut Self {
        Self::failed(
            FfiErrorCode::InvalidArgs,
            format!("arguments must be a JSON array: {detail}"),
        )
    }

    /// Build an error result for an inserted segment containing NUL.
    pub(crate) fn nul_segment(segment: &str) -> *mut Self {
        Self::failed(
            FfiErrorCode::InvalidArgs,
            format!("path segment contains NUL: {}", segment.escape_default()),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failed(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failed(FfiErrorCode::Panic, msg.to_string())
    }
}
