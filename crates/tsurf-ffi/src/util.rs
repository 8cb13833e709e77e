//! Pointer and string plumbing for the C boundary
//!
//! Every `*mut c_char` or boxed slice handed to the host is owned by the
//! host until it comes back through one of the `tsurf_*_free` functions.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::{ptr, slice};

/// Owned C string; interior NULs are replaced by `fallback`
pub(crate) fn into_c_string(s: &str, fallback: &'static str) -> *mut c_char {
    CString::new(s)
        .or_else(|_| CString::new(fallback))
        .unwrap_or_default()
        .into_raw()
}

/// Borrow a NUL-terminated UTF-8 string from the host.
///
/// # Safety
/// `ptr` must be null or point to a valid NUL-terminated string that
/// outlives the returned reference.
pub(crate) unsafe fn borrow_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("null {} pointer", what));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| format!("invalid UTF-8 in {}", what))
}

/// Like [`borrow_str`], but null means "not given"
///
/// # Safety
/// Same as [`borrow_str`].
pub(crate) unsafe fn borrow_opt_str<'a>(
    ptr: *const c_char,
    what: &str,
) -> Result<Option<&'a str>, String> {
    if ptr.is_null() {
        Ok(None)
    } else {
        unsafe { borrow_str(ptr, what) }.map(Some)
    }
}

/// Copy a host array of C strings.
///
/// # Safety
/// `arr` must be null (with `len == 0`) or point to `len` valid string pointers.
pub(crate) unsafe fn string_array(arr: *const *const c_char, len: usize) -> Result<Vec<String>, String> {
    if arr.is_null() || len == 0 {
        return Ok(Vec::new());
    }

    let items = unsafe { slice::from_raw_parts(arr, len) };
    items
        .iter()
        .enumerate()
        .map(|(i, &p)| unsafe { borrow_str(p, "file") }
            .map(str::to_string)
            .map_err(|e| format!("{} at index {}", e, i)))
        .collect()
}

/// Hand a vector to the host as pointer + length; empty becomes null
pub(crate) fn vec_into_raw<T>(vec: Vec<T>) -> (*mut T, usize) {
    let len = vec.len();
    if len == 0 {
        (ptr::null_mut(), 0)
    } else {
        (Box::into_raw(vec.into_boxed_slice()) as *mut T, len)
    }
}

/// Take back a slice produced by [`vec_into_raw`].
///
/// # Safety
/// `ptr` and `len` must come from a single `vec_into_raw` call.
pub(crate) unsafe fn vec_from_raw<T>(ptr: *mut T, len: usize) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(ptr, len)) }.into_vec()
}

/// # Safety
/// `ptr` must be null or come from `CString::into_raw`.
pub(crate) unsafe fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            drop(CString::from_raw(ptr));
        }
    }
}
