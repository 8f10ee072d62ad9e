//! Minimal migration driver used by keystone-migrate's tests.
//!
//! Behaviour is selected by the `target` of the run config:
//! - `"fail"`: `{"error": ...}` response
//! - `"garbage"`: a response that is not JSON
//! - `"silent"`: a null response
//! - anything else: success, one migration per location

use std::ffi::{CStr, CString, c_char, c_int};

fn respond(body: String) -> *mut c_char {
    CString::new(body)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

/// # Safety
/// `config_json` must be a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keystone_driver_migrate(config_json: *const c_char) -> *mut c_char {
    let request = unsafe { CStr::from_ptr(config_json) }.to_string_lossy();
    if request.contains(r#""target":"fail""#) {
        return respond(r#"{"error": "Validate failed: Migrations have failed validation"}"#.to_string());
    }
    if request.contains(r#""target":"garbage""#) {
        return respond("<html>500</html>".to_string());
    }
    if request.contains(r#""target":"silent""#) {
        return std::ptr::null_mut();
    }

    let locations = request.matches("filesystem:").count() + request.matches("classpath:").count();
    respond(format!(
        r#"{{"ok": {{"migrationsExecuted": {locations}, "warnings": ["served by test driver"]}}}}"#
    ))
}

/// # Safety
/// `response` must come from `keystone_driver_migrate` and be freed once.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keystone_driver_free(response: *mut c_char) {
    if !response.is_null() {
        drop(unsafe { CString::from_raw(response) });
    }
}

/// # Safety
/// `prefix` must be a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn keystone_driver_accepts(prefix: *const c_char) -> c_int {
    let prefix = unsafe { CStr::from_ptr(prefix) }.to_string_lossy();
    c_int::from(prefix == "h2" || prefix == "hsqldb")
}
