//! jar-ffi
//!
//! C ABI over the jar store and ring chart builder for the mobile UI layer.
//! Every call returns a status code; on failure a heap-allocated message is
//! written to `out_error` and must be released with [`jar_string_free`].

use std::{
    ffi::{CStr, CString},
    os::raw::{c_char, c_double, c_int},
    ptr,
    sync::{Mutex, OnceLock},
};

use jar_core::{
    api_create_store, api_edit_percent, api_jar_summary, api_ring_chart, ArcGeometryRenderer,
    CoreError, JarStateStore, SyncService,
};
use jar_domain::{ApiResponse, ArcSegment, Balance, ChartGeometry, JarInfo, RoundingPolicy};

pub const JAR_FFI_OK: c_int = 0;
pub const JAR_FFI_NULL_ARGUMENT: c_int = 1;
pub const JAR_FFI_INVALID_ARGUMENT: c_int = 2;
pub const JAR_FFI_OPERATION_FAILED: c_int = 3;

/// Semantic version of the FFI surface. Bumps when ABI/contract changes.
pub const FFI_VERSION: &str = "0.1.0";

/// Opaque store handle. Calls are serialised through an internal lock, so a
/// handle may be shared across UI threads.
pub struct JarStoreHandle {
    inner: Mutex<JarStateStore>,
}

impl JarStoreHandle {
    fn new(store: JarStateStore) -> *mut Self {
        Box::into_raw(Box::new(Self {
            inner: Mutex::new(store),
        }))
    }
}

/// One jar as seen by the UI.
#[repr(C)]
pub struct FfiJar {
    pub id: c_int,
    pub percent: c_int,
    pub amount: u64,
}

/// Allocation totals.
#[repr(C)]
pub struct FfiJarTotals {
    pub total_balance: u64,
    pub total_percent: c_int,
    pub allocated_amount: u64,
    pub has_unsaved_edits: c_int,
}

/// Returns the FFI interface semantic version as a C string.
#[no_mangle]
pub extern "C" fn jar_ffi_version() -> *const c_char {
    static FFI: OnceLock<CString> = OnceLock::new();
    FFI.get_or_init(|| CString::new(FFI_VERSION).unwrap_or_default())
        .as_ptr()
}

/// Creates a store with the default allocation. `policy_code` 1 selects
/// largest-remainder rounding; anything else keeps per-jar rounding.
#[no_mangle]
pub extern "C" fn jar_store_create(policy_code: c_int) -> *mut JarStoreHandle {
    let policy = match policy_code {
        1 => RoundingPolicy::LargestRemainder,
        _ => RoundingPolicy::PerJar,
    };
    JarStoreHandle::new(api_create_store(policy))
}

/// # Safety
/// `handle` must come from [`jar_store_create`] and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn jar_store_free(handle: *mut JarStoreHandle) {
    if handle.is_null() {
        return;
    }
    drop(Box::from_raw(handle));
}

/// # Safety
/// `handle` must be a live store handle; `out_error` may be null.
#[no_mangle]
pub unsafe extern "C" fn jar_store_set_total_balance(
    handle: *const JarStoreHandle,
    total_balance: i64,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let total = match u64::try_from(total_balance) {
        Ok(total) => total,
        Err(_) => {
            write_core_error(out_error, CoreError::NegativeBalance(total_balance));
            return JAR_FFI_INVALID_ARGUMENT;
        }
    };
    with_store(handle, out_error, |store| {
        store.set_total_balance(total);
        Ok(())
    })
}

/// Applies a slider edit; the stored (clamped) value lands in `out_percent`.
///
/// # Safety
/// `handle` must be a live store handle; output pointers may be null.
#[no_mangle]
pub unsafe extern "C" fn jar_store_edit_percent(
    handle: *const JarStoreHandle,
    index: c_int,
    raw_value: c_double,
    out_percent: *mut c_int,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let index = match jar_index(index, out_error) {
        Some(index) => index,
        None => return JAR_FFI_INVALID_ARGUMENT,
    };
    with_store(handle, out_error, |store| {
        let percent = api_edit_percent(store, index, raw_value)?;
        write_int(out_percent, c_int::from(percent));
        Ok(())
    })
}

/// Text-box variant of [`jar_store_edit_percent`].
///
/// # Safety
/// `handle` must be a live store handle and `text` a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn jar_store_edit_percent_text(
    handle: *const JarStoreHandle,
    index: c_int,
    text: *const c_char,
    out_percent: *mut c_int,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let index = match jar_index(index, out_error) {
        Some(index) => index,
        None => return JAR_FFI_INVALID_ARGUMENT,
    };
    let text = match c_string_argument(text) {
        Ok(text) => text,
        Err(err) => {
            write_core_error(out_error, err);
            return JAR_FFI_INVALID_ARGUMENT;
        }
    };
    with_store(handle, out_error, |store| {
        let percent = store.edit_percent_text(index, &text)?;
        write_int(out_percent, c_int::from(percent));
        Ok(())
    })
}

/// Commits pending edits and reports the resulting totals.
///
/// # Safety
/// `handle` must be a live store handle; output pointers may be null.
#[no_mangle]
pub unsafe extern "C" fn jar_store_commit(
    handle: *const JarStoreHandle,
    out_totals: *mut FfiJarTotals,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    with_store(handle, out_error, |store| {
        store.commit_edits();
        write_totals(out_totals, store);
        Ok(())
    })
}

/// # Safety
/// `handle` must be a live store handle.
#[no_mangle]
pub unsafe extern "C" fn jar_store_revert(
    handle: *const JarStoreHandle,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    with_store(handle, out_error, |store| {
        store.revert_edits();
        Ok(())
    })
}

/// Applies a `jar-division` response body (`{"code":1000,"result":{...}}`).
///
/// # Safety
/// `handle` must be a live store handle and `json` a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn jar_store_apply_profile_json(
    handle: *const JarStoreHandle,
    json: *const c_char,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let response: ApiResponse<JarInfo> = match parse_json_argument(json) {
        Ok(response) => response,
        Err(err) => {
            write_core_error(out_error, err);
            return JAR_FFI_INVALID_ARGUMENT;
        }
    };
    with_store(handle, out_error, |store| {
        SyncService::apply_jar_info(store, response)
    })
}

/// Applies a `balance` response body.
///
/// # Safety
/// `handle` must be a live store handle and `json` a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn jar_store_apply_balance_json(
    handle: *const JarStoreHandle,
    json: *const c_char,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let response: ApiResponse<Balance> = match parse_json_argument(json) {
        Ok(response) => response,
        Err(err) => {
            write_core_error(out_error, err);
            return JAR_FFI_INVALID_ARGUMENT;
        }
    };
    with_store(handle, out_error, |store| {
        SyncService::apply_balance(store, response)
    })
}

/// Number of jars, or -1 for a null handle.
///
/// # Safety
/// `handle` must be null or a live store handle.
#[no_mangle]
pub unsafe extern "C" fn jar_store_jar_count(handle: *const JarStoreHandle) -> c_int {
    if handle.is_null() {
        return -1;
    }
    let store = lock(&*handle);
    store.jars().len() as c_int
}

/// # Safety
/// `handle` must be a live store handle and `out_jar` writable.
#[no_mangle]
pub unsafe extern "C" fn jar_store_get_jar(
    handle: *const JarStoreHandle,
    index: c_int,
    out_jar: *mut FfiJar,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    if out_jar.is_null() {
        write_error(out_error, "output jar is null");
        return JAR_FFI_NULL_ARGUMENT;
    }
    let index = match jar_index(index, out_error) {
        Some(index) => index,
        None => return JAR_FFI_INVALID_ARGUMENT,
    };
    with_store(handle, out_error, |store| {
        let len = store.jars().len();
        let jar = store
            .jars()
            .get(index)
            .ok_or(CoreError::JarIndexOutOfRange { index, len })?;
        (*out_jar).id = c_int::from(jar.id());
        (*out_jar).percent = c_int::from(jar.percent);
        (*out_jar).amount = jar.amount;
        Ok(())
    })
}

/// # Safety
/// `handle` must be a live store handle; `out_totals` may be null.
#[no_mangle]
pub unsafe extern "C" fn jar_store_get_totals(
    handle: *const JarStoreHandle,
    out_totals: *mut FfiJarTotals,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    with_store(handle, out_error, |store| {
        write_totals(out_totals, store);
        Ok(())
    })
}

/// Writes the profile-update request body as JSON. Fails unless the
/// allocation totals exactly 100%.
///
/// # Safety
/// `handle` must be a live store handle; `out_json` receives an owned string.
#[no_mangle]
pub unsafe extern "C" fn jar_store_update_request_json(
    handle: *const JarStoreHandle,
    out_json: *mut *mut c_char,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    with_store(handle, out_error, |store| {
        let request = store.update_request()?;
        let json = serde_json::to_string(&request)
            .map_err(|err| CoreError::InvalidOperation(err.to_string()))?;
        write_string(out_json, json);
        Ok(())
    })
}

/// Ring chart for the store's current percentages, as JSON.
///
/// # Safety
/// `handle` must be a live store handle; `out_json` receives an owned string.
#[no_mangle]
pub unsafe extern "C" fn jar_store_chart_json(
    handle: *const JarStoreHandle,
    size: c_double,
    stroke_width: c_double,
    gap_degree: c_double,
    out_json: *mut *mut c_char,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let geometry = ChartGeometry::new(size, stroke_width, gap_degree);
    with_store(handle, out_error, |store| {
        let chart = api_ring_chart(store, &[], geometry);
        let json = serde_json::to_string(&chart)
            .map_err(|err| CoreError::InvalidOperation(err.to_string()))?;
        write_string(out_json, json);
        Ok(())
    })
}

/// Builds a ring chart from a JSON array of `{"percent":..,"color":..}`.
///
/// # Safety
/// `segments_json` must be a NUL-terminated string; `out_json` receives an
/// owned string.
#[no_mangle]
pub unsafe extern "C" fn jar_chart_build_json(
    segments_json: *const c_char,
    size: c_double,
    stroke_width: c_double,
    gap_degree: c_double,
    out_json: *mut *mut c_char,
    out_error: *mut *mut c_char,
) -> c_int {
    clear_error(out_error);
    let segments: Vec<ArcSegment> = match parse_json_argument(segments_json) {
        Ok(segments) => segments,
        Err(err) => {
            write_core_error(out_error, err);
            return JAR_FFI_INVALID_ARGUMENT;
        }
    };
    let chart = ArcGeometryRenderer::build_arc_paths(
        &segments,
        ChartGeometry::new(size, stroke_width, gap_degree),
    );
    match serde_json::to_string(&chart) {
        Ok(json) => {
            write_string(out_json, json);
            JAR_FFI_OK
        }
        Err(err) => {
            write_error(out_error, &err.to_string());
            JAR_FFI_OPERATION_FAILED
        }
    }
}

/// Releases a string previously returned by this library.
///
/// # Safety
/// `value` must be null or a pointer handed out by this library, freed once.
#[no_mangle]
pub unsafe extern "C" fn jar_string_free(value: *mut c_char) {
    if value.is_null() {
        return;
    }
    drop(CString::from_raw(value));
}

unsafe fn with_store(
    handle: *const JarStoreHandle,
    out_error: *mut *mut c_char,
    f: impl FnOnce(&mut JarStateStore) -> Result<(), CoreError>,
) -> c_int {
    if handle.is_null() {
        write_error(out_error, "store handle is null");
        return JAR_FFI_NULL_ARGUMENT;
    }
    let mut store = lock(&*handle);
    match f(&mut store) {
        Ok(()) => JAR_FFI_OK,
        Err(err) => {
            write_core_error(out_error, err);
            JAR_FFI_OPERATION_FAILED
        }
    }
}

fn lock(handle: &JarStoreHandle) -> std::sync::MutexGuard<'_, JarStateStore> {
    handle
        .inner
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

unsafe fn write_totals(out_totals: *mut FfiJarTotals, store: &JarStateStore) {
    if out_totals.is_null() {
        return;
    }
    let summary = api_jar_summary(store);
    (*out_totals).total_balance = summary.total_balance;
    (*out_totals).total_percent = summary.total_percent as c_int;
    (*out_totals).allocated_amount = summary.allocated_amount;
    (*out_totals).has_unsaved_edits = c_int::from(summary.has_unsaved_edits);
}

unsafe fn jar_index(index: c_int, out_error: *mut *mut c_char) -> Option<usize> {
    match usize::try_from(index) {
        Ok(index) => Some(index),
        Err(_) => {
            write_error(out_error, &format!("jar index {index} is negative"));
            None
        }
    }
}

fn clear_error(out_error: *mut *mut c_char) {
    if out_error.is_null() {
        return;
    }
    unsafe {
        *out_error = ptr::null_mut();
    }
}

unsafe fn write_error(out_error: *mut *mut c_char, message: &str) {
    if out_error.is_null() {
        return;
    }
    if let Ok(cstring) = CString::new(message) {
        *out_error = cstring.into_raw();
    }
}

unsafe fn write_core_error(out_error: *mut *mut c_char, err: CoreError) {
    write_error(out_error, &err.to_string());
}

unsafe fn write_string(target: *mut *mut c_char, value: String) {
    if target.is_null() {
        return;
    }
    if let Ok(cstring) = CString::new(value) {
        *target = cstring.into_raw();
    }
}

unsafe fn write_int(target: *mut c_int, value: c_int) {
    if !target.is_null() {
        *target = value;
    }
}

unsafe fn c_string_argument(ptr: *const c_char) -> Result<String, CoreError> {
    if ptr.is_null() {
        return Err(CoreError::InvalidOperation(
            "null string pointer received".into(),
        ));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(|s| s.to_string())
        .map_err(|err| CoreError::InvalidOperation(err.to_string()))
}

unsafe fn parse_json_argument<T: serde::de::DeserializeOwned>(
    ptr: *const c_char,
) -> Result<T, CoreError> {
    let raw = c_string_argument(ptr)?;
    serde_json::from_str(&raw).map_err(|err| CoreError::Validation(format!("invalid JSON: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let value = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        unsafe { jar_string_free(ptr) };
        value
    }

    #[test]
    fn edit_commit_and_read_back() {
        let handle = jar_store_create(0);
        let mut error: *mut c_char = ptr::null_mut();
        let mut percent: c_int = -1;

        let code = unsafe { jar_store_edit_percent(handle, 0, 90.0, &mut percent, &mut error) };
        assert_eq!(code, JAR_FFI_OK);
        assert_eq!(percent, 55);

        let five = CString::new("5").unwrap();
        let code =
            unsafe { jar_store_edit_percent_text(handle, 5, five.as_ptr(), &mut percent, &mut error) };
        assert_eq!(code, JAR_FFI_OK);
        assert_eq!(percent, 5);

        let mut totals = FfiJarTotals {
            total_balance: 0,
            total_percent: 0,
            allocated_amount: 0,
            has_unsaved_edits: 1,
        };
        let code = unsafe { jar_store_commit(handle, &mut totals, &mut error) };
        assert_eq!(code, JAR_FFI_OK);
        assert_eq!(totals.total_percent, 90);
        assert_eq!(totals.has_unsaved_edits, 0);

        let mut jar = FfiJar {
            id: 0,
            percent: 0,
            amount: 0,
        };
        let code = unsafe { jar_store_get_jar(handle, 5, &mut jar, &mut error) };
        assert_eq!(code, JAR_FFI_OK);
        assert_eq!(jar.id, 6);
        assert_eq!(jar.amount, 50_000);

        unsafe { jar_store_free(handle) };
    }

    #[test]
    fn errors_are_reported_through_out_error() {
        let handle = jar_store_create(0);
        let mut error: *mut c_char = ptr::null_mut();

        let code = unsafe { jar_store_set_total_balance(handle, -1, &mut error) };
        assert_eq!(code, JAR_FFI_INVALID_ARGUMENT);
        assert!(take_string(error).contains("negative"));

        let mut jar = FfiJar {
            id: 0,
            percent: 0,
            amount: 0,
        };
        let code = unsafe { jar_store_get_jar(handle, 9, &mut jar, &mut error) };
        assert_eq!(code, JAR_FFI_OPERATION_FAILED);
        assert!(take_string(error).contains("out of range"));

        let code =
            unsafe { jar_store_edit_percent(ptr::null(), 0, 1.0, ptr::null_mut(), &mut error) };
        assert_eq!(code, JAR_FFI_NULL_ARGUMENT);
        assert!(take_string(error).contains("null"));

        unsafe { jar_store_free(handle) };
    }

    #[test]
    fn profile_json_and_update_request_round_trip() {
        let handle = jar_store_create(0);
        let mut error: *mut c_char = ptr::null_mut();
        let profile = CString::new(
            r#"{"code":1000,"result":{"necessitiesPercentage":40,"educationPercentage":20,
            "savingsPercentage":10,"entertainmentPercentage":10,"givingPercentage":10,
            "investmentPercentage":10}}"#,
        )
        .unwrap();

        let code = unsafe { jar_store_apply_profile_json(handle, profile.as_ptr(), &mut error) };
        assert_eq!(code, JAR_FFI_OK);

        let mut json: *mut c_char = ptr::null_mut();
        let code = unsafe { jar_store_update_request_json(handle, &mut json, &mut error) };
        assert_eq!(code, JAR_FFI_OK);
        let body = take_string(json);
        assert!(body.contains("\"necessitiesPercentage\":40"));
        assert!(body.contains("\"educationPercentage\":20"));

        unsafe { jar_store_free(handle) };
    }

    #[test]
    fn malformed_json_is_rejected() {
        let handle = jar_store_create(0);
        let mut error: *mut c_char = ptr::null_mut();
        let bad = CString::new("{not json").unwrap();

        let code = unsafe { jar_store_apply_balance_json(handle, bad.as_ptr(), &mut error) };
        assert_eq!(code, JAR_FFI_INVALID_ARGUMENT);
        assert!(take_string(error).contains("invalid JSON"));
        assert_eq!(unsafe { jar_store_jar_count(handle) }, 6);

        unsafe { jar_store_free(handle) };
    }

    #[test]
    fn chart_json_from_segments() {
        let segments = CString::new(
            r##"[{"percent":50,"color":"#1A75FF"},{"percent":0,"color":"#FF8C00"},{"percent":50,"color":"#4CAF50"}]"##,
        )
        .unwrap();
        let mut json: *mut c_char = ptr::null_mut();
        let mut error: *mut c_char = ptr::null_mut();

        let code = unsafe {
            jar_chart_build_json(segments.as_ptr(), 120.0, 24.0, 0.0, &mut json, &mut error)
        };
        assert_eq!(code, JAR_FFI_OK);
        let chart: serde_json::Value = serde_json::from_str(&take_string(json)).unwrap();
        let arcs = chart["arcs"].as_array().unwrap();
        assert_eq!(arcs.len(), 2);
        assert_eq!(arcs[1]["segment_index"], 2);
    }

    #[test]
    fn version_is_exposed() {
        let version = unsafe { CStr::from_ptr(jar_ffi_version()) };
        assert_eq!(version.to_str().unwrap(), FFI_VERSION);
    }
}
