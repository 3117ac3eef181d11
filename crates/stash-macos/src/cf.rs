use std::ffi::c_void;

use core_foundation::base::TCFType;
use core_foundation::boolean::{CFBoolean, CFBooleanRef};
use core_foundation::dictionary::{CFDictionaryGetValue, CFDictionaryRef};
use core_foundation::number::{CFNumber, CFNumberRef};
use core_foundation::string::{CFString, CFStringRef};
use stash_core::rect::Rect;

/// Raw value for `key`, or null.
///
/// # Safety
/// `dict` must be a valid `CFDictionary` with `CFString` keys.
unsafe fn value(dict: CFDictionaryRef, key: &str) -> *const c_void {
    let key = CFString::new(key);
    unsafe { CFDictionaryGetValue(dict, key.as_CFTypeRef()) }
}

/// # Safety
/// See [`value`]. The value, if present, must be a `CFString`.
pub unsafe fn get_string(dict: CFDictionaryRef, key: &str) -> Option<String> {
    let value = unsafe { value(dict, key) };
    if value.is_null() {
        return None;
    }
    let s: CFString = unsafe { TCFType::wrap_under_get_rule(value as CFStringRef) };
    Some(s.to_string())
}

/// # Safety
/// See [`value`]. The value, if present, must be a `CFNumber`.
pub unsafe fn get_i64(dict: CFDictionaryRef, key: &str) -> Option<i64> {
    let value = unsafe { value(dict, key) };
    if value.is_null() {
        return None;
    }
    let n: CFNumber = unsafe { TCFType::wrap_under_get_rule(value as CFNumberRef) };
    n.to_i64()
}

/// # Safety
/// See [`value`]. The value, if present, must be a `CFBoolean`.
pub unsafe fn get_bool(dict: CFDictionaryRef, key: &str) -> Option<bool> {
    let value = unsafe { value(dict, key) };
    if value.is_null() {
        return None;
    }
    let b: CFBoolean = unsafe { TCFType::wrap_under_get_rule(value as CFBooleanRef) };
    Some(b.into())
}

/// Reads a `CGRect` dictionary (`X`, `Y`, `Width`, `Height`).
///
/// # Safety
/// See [`value`]. The value, if present, must be a bounds dictionary.
pub unsafe fn get_rect(dict: CFDictionaryRef, key: &str) -> Option<Rect> {
    let bounds = unsafe { value(dict, key) } as CFDictionaryRef;
    if bounds.is_null() {
        return None;
    }
    let field = |name: &str| -> Option<f64> {
        let value = unsafe { value(bounds, name) };
        if value.is_null() {
            return None;
        }
        let n: CFNumber = unsafe { TCFType::wrap_under_get_rule(value as CFNumberRef) };
        n.to_f64()
    };
    Some(Rect::new(
        field("X")?,
        field("Y")?,
        field("Width")?,
        field("Height")?,
    ))
}
