//! C-compatible FFI interface
//!
//! # Memory Ownership Rules
//!
//! - `tsurf_finder_new()` allocates on the Rust heap, caller owns the pointer
//! - `tsurf_finder_free()` must be called to deallocate it
//! - Result structs and everything they point to are owned by the caller
//!   after return and go back through the matching `*_free` function

use std::os::raw::c_char;
use std::ptr;
use std::time::Instant;

use tracing::debug;
use tsurf_core::{Backend, CacheKey, FinderConfig, SearchScope};

use crate::finder::{FoundTag, ThreadSafeFinder};
use crate::util::{
    borrow_opt_str, borrow_str, free_c_string, into_c_string, string_array, vec_from_raw,
    vec_into_raw,
};

// Safety limits
const MAX_QUERY_LENGTH: usize = 1000;
const MAX_TAGS_TEXT_LENGTH: usize = 256 * 1024 * 1024;

/// Backend codes accepted by `tsurf_search`
pub const TSURF_BACKEND_NATIVE: i32 = 0;
pub const TSURF_BACKEND_REFERENCE: i32 = 1;

/// C-compatible single search result
///
/// `matched == false` pairs with `score == -1` and no positions.
#[repr(C)]
pub struct TsurfMatchC {
    pub success: bool,
    pub error_msg: *mut c_char,
    pub matched: bool,
    pub score: f64,
    pub positions: *mut usize,
    pub positions_len: usize,
}

/// C-compatible ranked tag
#[repr(C)]
pub struct TsurfTagMatchC {
    pub name: *mut c_char,
    pub file: *mut c_char,
    pub excmd: *mut c_char,
    /// Null when the tag has no kind
    pub kind: *mut c_char,
    /// 0 when the tag has no line number
    pub line: usize,
    pub score: f64,
    pub positions: *mut usize,
    pub positions_len: usize,
}

/// C-compatible result for `tsurf_finder_find`
#[repr(C)]
pub struct TsurfFindResultC {
    pub success: bool,
    pub error_msg: *mut c_char,
    pub matches: *mut TsurfTagMatchC,
    pub matches_len: usize,
    pub search_time_us: u64,
}

/// C-compatible result for `tsurf_finder_load_tags`
#[repr(C)]
pub struct TsurfLoadResultC {
    pub success: bool,
    pub error_msg: *mut c_char,
    pub tag_count: usize,
}

impl TsurfMatchC {
    fn error(msg: &str) -> Self {
        Self {
            success: false,
            error_msg: into_c_string(msg, "search failed"),
            matched: false,
            score: tsurf_core::NO_MATCH,
            positions: ptr::null_mut(),
            positions_len: 0,
        }
    }
}

impl TsurfFindResultC {
    fn error(msg: &str) -> Self {
        Self {
            success: false,
            error_msg: into_c_string(msg, "find failed"),
            matches: ptr::null_mut(),
            matches_len: 0,
            search_time_us: 0,
        }
    }
}

impl TsurfLoadResultC {
    fn error(msg: &str) -> Self {
        Self {
            success: false,
            error_msg: into_c_string(msg, "load failed"),
            tag_count: 0,
        }
    }
}

// ============================================================================
// One-shot search
// ============================================================================

#[no_mangle]
pub extern "C" fn tsurf_init_logger() {
    crate::init_logger();
}

/// Search `candidate` for `query`.
///
/// `backend` is `TSURF_BACKEND_NATIVE` or `TSURF_BACKEND_REFERENCE`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn tsurf_search(
    query: *const c_char,
    candidate: *const c_char,
    smart_case: bool,
    backend: i32,
) -> TsurfMatchC {
    let query = match unsafe { borrow_str(query, "query") } {
        Ok(s) => s,
        Err(e) => return TsurfMatchC::error(&e),
    };
    if query.len() > MAX_QUERY_LENGTH {
        return TsurfMatchC::error("query exceeds maximum length");
    }
    let candidate = match unsafe { borrow_str(candidate, "candidate") } {
        Ok(s) => s,
        Err(e) => return TsurfMatchC::error(&e),
    };

    let backend = match backend {
        TSURF_BACKEND_NATIVE => Backend::Native,
        TSURF_BACKEND_REFERENCE => Backend::Reference,
        other => return TsurfMatchC::error(&format!("unknown backend code {}", other)),
    };

    let m = backend.search(query, candidate, smart_case);
    let matched = m.is_match();
    let (positions, positions_len) = vec_into_raw(m.positions);

    TsurfMatchC {
        success: true,
        error_msg: ptr::null_mut(),
        matched,
        score: m.score,
        positions,
        positions_len,
    }
}

#[no_mangle]
pub extern "C" fn tsurf_match_free(result: TsurfMatchC) {
    unsafe {
        free_c_string(result.error_msg);
        drop(vec_from_raw(result.positions, result.positions_len));
    }
}

// ============================================================================
// Finder lifecycle
// ============================================================================

/// Create a finder. `config_json` may be null for defaults.
///
/// Returns null when the configuration is invalid.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn tsurf_finder_new(config_json: *const c_char) -> *mut ThreadSafeFinder {
    crate::init_logger();

    let config = match unsafe { borrow_opt_str(config_json, "config") } {
        Ok(None) => FinderConfig::default(),
        Ok(Some(json)) => match FinderConfig::from_json(json) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting finder configuration");
                return ptr::null_mut();
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "rejecting finder configuration");
            return ptr::null_mut();
        }
    };

    debug!(backend = config.backend.name(), smart = config.smart_matching, "created finder");
    Box::into_raw(Box::new(ThreadSafeFinder::new(config)))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn tsurf_finder_free(finder: *mut ThreadSafeFinder) {
    if !finder.is_null() {
        unsafe {
            drop(Box::from_raw(finder));
        }
    }
}

// ============================================================================
// Tag cache
// ============================================================================

fn cache_key(scope: i32, files: *const *const c_char, files_len: usize) -> Result<CacheKey, String> {
    let scope = SearchScope::from_code(scope).ok_or_else(|| format!("unknown scope code {}", scope))?;
    let files = unsafe { string_array(files, files_len) }?;
    Ok(CacheKey::new(scope, &files))
}

/// Parse ctags output produced by the host and cache it for `scope` + `files`.
///
/// `filetype` may be null; it selects the kinds map and exclusions.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn tsurf_finder_load_tags(
    finder: *const ThreadSafeFinder,
    tags_text: *const c_char,
    filetype: *const c_char,
    scope: i32,
    files: *const *const c_char,
    files_len: usize,
) -> TsurfLoadResultC {
    if finder.is_null() {
        return TsurfLoadResultC::error("null finder pointer");
    }
    let finder = unsafe { &*finder };

    let text = match unsafe { borrow_str(tags_text, "tags text") } {
        Ok(s) => s,
        Err(e) => return TsurfLoadResultC::error(&e),
    };
    if text.len() > MAX_TAGS_TEXT_LENGTH {
        return TsurfLoadResultC::error("tags text exceeds maximum length");
    }

    let filetype = match unsafe { borrow_opt_str(filetype, "filetype") } {
        Ok(ft) => ft,
        Err(e) => return TsurfLoadResultC::error(&e),
    };

    let key = match cache_key(scope, files, files_len) {
        Ok(k) => k,
        Err(e) => return TsurfLoadResultC::error(&e),
    };

    TsurfLoadResultC {
        success: true,
        error_msg: ptr::null_mut(),
        tag_count: finder.load_tags(text, filetype, key),
    }
}

#[no_mangle]
pub extern "C" fn tsurf_load_result_free(result: TsurfLoadResultC) {
    unsafe { free_c_string(result.error_msg) };
}

/// True when tags for exactly this scope and file list are cached
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn tsurf_finder_has_tags(
    finder: *const ThreadSafeFinder,
    scope: i32,
    files: *const *const c_char,
    files_len: usize,
) -> bool {
    if finder.is_null() {
        return false;
    }
    let finder = unsafe { &*finder };
    cache_key(scope, files, files_len).is_ok_and(|key| finder.has_tags(key))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn tsurf_finder_invalidate(finder: *const ThreadSafeFinder) {
    if !finder.is_null() {
        unsafe { &*finder }.invalidate();
    }
}

// ============================================================================
// Ranking
// ============================================================================

fn borrow_query<'a>(query: *const c_char) -> Result<&'a str, String> {
    let query = unsafe { borrow_str(query, "query") }?;
    if query.len() > MAX_QUERY_LENGTH {
        return Err("query exceeds maximum length".to_string());
    }
    Ok(query)
}

fn find_result(found: Vec<FoundTag>, start: Instant) -> TsurfFindResultC {
    let search_time_us = start.elapsed().as_micros() as u64;

    let c_matches: Vec<TsurfTagMatchC> = found
        .into_iter()
        .map(|m| {
            let (positions, positions_len) = vec_into_raw(m.positions);
            TsurfTagMatchC {
                name: into_c_string(&m.name, ""),
                file: into_c_string(&m.file, ""),
                excmd: into_c_string(&m.excmd, ""),
                kind: m
                    .kind
                    .as_deref()
                    .map_or(ptr::null_mut(), |k| into_c_string(k, "")),
                line: m.line.unwrap_or(0),
                score: m.score,
                positions,
                positions_len,
            }
        })
        .collect();

    let (matches, matches_len) = vec_into_raw(c_matches);
    TsurfFindResultC {
        success: true,
        error_msg: ptr::null_mut(),
        matches,
        matches_len,
        search_time_us,
    }
}

/// Rank the most recently loaded tags against `query`.
///
/// Does not check which scope those tags belong to; hosts that switch
/// scope should use `tsurf_finder_find_scoped` or check
/// `tsurf_finder_has_tags` first.
///
/// `cursor_line` of 0 means unknown; `max_results` of 0 uses the configured cap.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn tsurf_finder_find(
    finder: *const ThreadSafeFinder,
    query: *const c_char,
    cursor_line: usize,
    max_results: usize,
) -> TsurfFindResultC {
    if finder.is_null() {
        return TsurfFindResultC::error("null finder pointer");
    }
    let finder = unsafe { &*finder };

    let query = match borrow_query(query) {
        Ok(s) => s,
        Err(e) => return TsurfFindResultC::error(&e),
    };

    let cursor_line = (cursor_line > 0).then_some(cursor_line);
    let max_results = (max_results > 0).then_some(max_results);

    let start = Instant::now();
    find_result(finder.find(query, cursor_line, max_results), start)
}

/// Like `tsurf_finder_find`, but fails unless the cached tags were loaded
/// for exactly this `scope` and file list.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn tsurf_finder_find_scoped(
    finder: *const ThreadSafeFinder,
    scope: i32,
    files: *const *const c_char,
    files_len: usize,
    query: *const c_char,
    cursor_line: usize,
    max_results: usize,
) -> TsurfFindResultC {
    if finder.is_null() {
        return TsurfFindResultC::error("null finder pointer");
    }
    let finder = unsafe { &*finder };

    let query = match borrow_query(query) {
        Ok(s) => s,
        Err(e) => return TsurfFindResultC::error(&e),
    };
    let key = match cache_key(scope, files, files_len) {
        Ok(k) => k,
        Err(e) => return TsurfFindResultC::error(&e),
    };

    let cursor_line = (cursor_line > 0).then_some(cursor_line);
    let max_results = (max_results > 0).then_some(max_results);

    let start = Instant::now();
    match finder.find_in(key, query, cursor_line, max_results) {
        Some(found) => find_result(found, start),
        None => TsurfFindResultC::error("no tags loaded for this scope"),
    }
}

#[no_mangle]
pub extern "C" fn tsurf_find_result_free(result: TsurfFindResultC) {
    unsafe {
        free_c_string(result.error_msg);
        for m in vec_from_raw(result.matches, result.matches_len) {
            free_c_string(m.name);
            free_c_string(m.file);
            free_c_string(m.excmd);
            free_c_string(m.kind);
            drop(vec_from_raw(m.positions, m.positions_len));
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn tsurf_string_free(s: *mut c_char) {
    unsafe { free_c_string(s) };
}

#[no_mangle]
pub extern "C" fn tsurf_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};
    use std::slice;

    const TAGS: &str = "Finder\tfinder.py\t/^class Finder:$/;\"\tc\tline:18\n\
                        find_tags\tfinder.py\t/^def find_tags(/;\"\tm\tline:58\n\
                        close\tfinder.py\t/^def close(/;\"\tm\tline:40\n";

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[test]
    fn test_search_ffi() {
        let q = c("sul");
        let h = c("superLong_identifier");
        for backend in [TSURF_BACKEND_NATIVE, TSURF_BACKEND_REFERENCE] {
            let r = tsurf_search(q.as_ptr(), h.as_ptr(), false, backend);
            assert!(r.success);
            assert!(r.matched);
            let positions = unsafe { slice::from_raw_parts(r.positions, r.positions_len) };
            assert_eq!(positions, &[0, 1, 5]);
            tsurf_match_free(r);
        }
    }

    #[test]
    fn test_search_no_match_ffi() {
        let q = c("amA");
        let h = c("androidManifest");
        let r = tsurf_search(q.as_ptr(), h.as_ptr(), true, TSURF_BACKEND_NATIVE);
        assert!(r.success);
        assert!(!r.matched);
        assert_eq!(r.score, -1.0);
        assert!(r.positions.is_null());
        tsurf_match_free(r);
    }

    #[test]
    fn test_search_rejects_null_and_bad_backend() {
        let h = c("x");
        let r = tsurf_search(ptr::null(), h.as_ptr(), false, TSURF_BACKEND_NATIVE);
        assert!(!r.success);
        tsurf_match_free(r);

        let r = tsurf_search(h.as_ptr(), h.as_ptr(), false, 9);
        assert!(!r.success);
        let msg = unsafe { CStr::from_ptr(r.error_msg) }.to_str().unwrap();
        assert_eq!(msg, "unknown backend code 9");
        tsurf_match_free(r);
    }

    #[test]
    fn test_query_length_limit() {
        let long = c(&"a".repeat(MAX_QUERY_LENGTH + 1));
        let h = c("alpha");
        let r = tsurf_search(long.as_ptr(), h.as_ptr(), false, TSURF_BACKEND_NATIVE);
        assert!(!r.success);
        let msg = unsafe { CStr::from_ptr(r.error_msg) }.to_str().unwrap();
        assert_eq!(msg, "query exceeds maximum length");
        tsurf_match_free(r);

        let finder = tsurf_finder_new(ptr::null());
        let result = tsurf_finder_find(finder, long.as_ptr(), 0, 0);
        assert!(!result.success);
        tsurf_find_result_free(result);
        tsurf_finder_free(finder);
    }

    #[test]
    fn test_find_scoped_requires_matching_key() {
        let finder = tsurf_finder_new(ptr::null());
        let text = c(TAGS);
        let file = c("finder.py");
        let files = [file.as_ptr()];
        let load = tsurf_finder_load_tags(finder, text.as_ptr(), ptr::null(), 0, files.as_ptr(), 1);
        tsurf_load_result_free(load);

        let q = c("fin");
        let result = tsurf_finder_find_scoped(finder, 0, files.as_ptr(), 1, q.as_ptr(), 0, 0);
        assert!(result.success);
        assert_eq!(result.matches_len, 2);
        tsurf_find_result_free(result);

        let result = tsurf_finder_find_scoped(finder, 2, files.as_ptr(), 1, q.as_ptr(), 0, 0);
        assert!(!result.success);
        let msg = unsafe { CStr::from_ptr(result.error_msg) }.to_str().unwrap();
        assert_eq!(msg, "no tags loaded for this scope");
        tsurf_find_result_free(result);
        tsurf_finder_free(finder);
    }

    #[test]
    fn test_finder_lifecycle() {
        let finder = tsurf_finder_new(ptr::null());
        assert!(!finder.is_null());
        tsurf_finder_free(finder);

        let bad = c("{\"max_results\": \"ten\"}");
        assert!(tsurf_finder_new(bad.as_ptr()).is_null());
    }

    #[test]
    fn test_finder_load_and_find() {
        let finder = tsurf_finder_new(ptr::null());
        let text = c(TAGS);
        let file = c("finder.py");
        let files = [file.as_ptr()];

        assert!(!tsurf_finder_has_tags(finder, 0, files.as_ptr(), 1));
        let load = tsurf_finder_load_tags(finder, text.as_ptr(), ptr::null(), 0, files.as_ptr(), 1);
        assert!(load.success);
        assert_eq!(load.tag_count, 3);
        tsurf_load_result_free(load);
        assert!(tsurf_finder_has_tags(finder, 0, files.as_ptr(), 1));
        assert!(!tsurf_finder_has_tags(finder, 2, files.as_ptr(), 1));

        let q = c("fin");
        let result = tsurf_finder_find(finder, q.as_ptr(), 0, 0);
        assert!(result.success);
        assert_eq!(result.matches_len, 2);
        let first = unsafe { &*result.matches };
        assert_eq!(unsafe { CStr::from_ptr(first.name) }.to_str().unwrap(), "Finder");
        assert_eq!(first.line, 18);
        tsurf_find_result_free(result);

        let empty = c("");
        let result = tsurf_finder_find(finder, empty.as_ptr(), 41, 1);
        assert_eq!(result.matches_len, 1);
        let first = unsafe { &*result.matches };
        assert_eq!(unsafe { CStr::from_ptr(first.name) }.to_str().unwrap(), "close");
        tsurf_find_result_free(result);

        tsurf_finder_invalidate(finder);
        assert!(!tsurf_finder_has_tags(finder, 0, files.as_ptr(), 1));
        tsurf_finder_free(finder);
    }

    #[test]
    fn test_null_finder_handling() {
        let q = c("x");
        let result = tsurf_finder_find(ptr::null(), q.as_ptr(), 0, 0);
        assert!(!result.success);
        tsurf_find_result_free(result);

        let load = tsurf_finder_load_tags(ptr::null(), q.as_ptr(), ptr::null(), 0, ptr::null(), 0);
        assert!(!load.success);
        tsurf_load_result_free(load);
    }

    #[test]
    fn test_bad_scope_code() {
        let finder = tsurf_finder_new(ptr::null());
        let text = c(TAGS);
        let load = tsurf_finder_load_tags(finder, text.as_ptr(), ptr::null(), 5, ptr::null(), 0);
        assert!(!load.success);
        tsurf_load_result_free(load);
        tsurf_finder_free(finder);
    }
}
