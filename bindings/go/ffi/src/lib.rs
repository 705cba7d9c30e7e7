//! C-FFI layer for the BL parser, used by Go (cgo) and other FFI consumers.
//!
//! No parsing logic here; every call delegates to `bl-core`.
//!
//! # Memory Contract
//!
//! All functions that return `*mut c_char` allocate via `CString`.
//! The caller MUST free the returned string by calling `bl_free_string()`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Result from a BL FFI call.
/// If `error` is null, the call succeeded and `result` contains the output.
/// If `error` is non-null, the call failed and `error` contains the message.
/// The caller MUST free both `result` and `error` with `bl_free_string()`.
#[repr(C)]
pub struct BlResult {
    pub result: *mut c_char,
    pub error: *mut c_char,
}

impl BlResult {
    fn ok(value: String) -> Self {
        BlResult {
            result: into_c_string(value),
            error: std::ptr::null_mut(),
        }
    }

    fn err(msg: String) -> Self {
        BlResult {
            result: std::ptr::null_mut(),
            error: into_c_string(msg),
        }
    }
}

/// Interior NUL bytes cannot cross the C boundary; they are stripped.
fn into_c_string(s: String) -> *mut c_char {
    let bytes: Vec<u8> = s.into_bytes().into_iter().filter(|&b| b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// Convert a C string pointer to a Rust &str.
/// Returns None if the pointer is null or not valid UTF-8.
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

unsafe fn parse_input(text: *const c_char) -> Result<bl_core::Program, BlResult> {
    let text = cstr_to_str(text).ok_or_else(|| BlResult::err("null or invalid UTF-8 input".into()))?;
    bl_core::parse(text).map_err(|e| BlResult::err(e.to_string()))
}

/// Parse BL program text and return a JSON string of the syntax tree.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `bl_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn bl_parse_program(text: *const c_char) -> BlResult {
    let program = match parse_input(text) {
        Ok(p) => p,
        Err(result) => return result,
    };

    match serde_json::to_string_pretty(&program) {
        Ok(json) => BlResult::ok(json),
        Err(e) => BlResult::err(format!("Serialization error: {}", e)),
    }
}

/// Reformat BL program text in canonical layout.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `bl_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn bl_format(text: *const c_char) -> BlResult {
    match parse_input(text) {
        Ok(program) => BlResult::ok(bl_core::print_program(&program)),
        Err(result) => result,
    }
}

/// Compute the SHA-256 of a program's canonical form.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `bl_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn bl_program_hash(text: *const c_char) -> BlResult {
    match parse_input(text) {
        Ok(program) => BlResult::ok(bl_core::program_hash(&program)),
        Err(result) => result,
    }
}

/// Check BL program text.
/// Returns JSON: { "valid": bool, "error": null | {...} }; `error` on the
/// result itself is set only for null or non-UTF-8 input.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `bl_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn bl_check(text: *const c_char) -> BlResult {
    let text = match cstr_to_str(text) {
        Some(s) => s,
        None => return BlResult::err("null or invalid UTF-8 input".into()),
    };

    let output = match bl_core::parse(text) {
        Ok(_) => serde_json::json!({ "valid": true, "error": null }),
        Err(e) => serde_json::json!({ "valid": false, "error": e.to_json() }),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => BlResult::ok(json),
        Err(e) => BlResult::err(format!("Serialization error: {}", e)),
    }
}

/// Free a string previously returned by a BL FFI function.
///
/// # Safety
/// `ptr` must be a pointer previously returned by a BL FFI function,
/// or null (in which case this is a no-op).
#[no_mangle]
pub unsafe extern "C" fn bl_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take(ptr: *mut c_char) -> Option<String> {
        if ptr.is_null() {
            return None;
        }
        let s = CStr::from_ptr(ptr).to_string_lossy().into_owned();
        bl_free_string(ptr);
        Some(s)
    }

    #[test]
    fn test_format_round_trip() {
        let input = CString::new("PROGRAM p IS BEGIN move END p").unwrap();
        unsafe {
            let r = bl_format(input.as_ptr());
            assert!(r.error.is_null());
            assert_eq!(take(r.result).unwrap(), "PROGRAM p IS\n\nBEGIN\n  move\nEND p\n");
        }
    }

    #[test]
    fn test_parse_error_is_reported() {
        let input = CString::new("PROGRAM p IS BEGIN END q").unwrap();
        unsafe {
            let r = bl_parse_program(input.as_ptr());
            assert!(r.result.is_null());
            assert!(take(r.error).unwrap().contains("name mismatch"));
        }
    }

    #[test]
    fn test_check_json() {
        let input = CString::new("PROGRAM p IS BEGIN IF wall THEN END IF END p").unwrap();
        unsafe {
            let r = bl_check(input.as_ptr());
            let json: serde_json::Value = serde_json::from_str(&take(r.result).unwrap()).unwrap();
            assert_eq!(json["valid"], false);
            assert_eq!(json["error"]["kind"], "invalid_condition");
        }
    }

    #[test]
    fn test_null_input() {
        unsafe {
            let r = bl_program_hash(std::ptr::null());
            assert!(r.result.is_null());
            assert!(take(r.error).unwrap().contains("null"));
            bl_free_string(std::ptr::null_mut());
        }
    }
}
