use core_foundation::dictionary::CFDictionaryRef;
use core_graphics::window::{
    CGWindowID, CGWindowListOption, copy_window_info, kCGNullWindowID,
    kCGWindowListExcludeDesktopElements, kCGWindowListOptionIncludingWindow,
    kCGWindowListOptionOnScreenOnly,
};
use objc2_app_kit::NSRunningApplication;
use stash_core::error::PlatformError;
use stash_core::platform::{WindowId, WindowInfo};

use crate::cf;

/// Every on-screen window, front to back.
///
/// Bundle identifiers are left empty; the caller fills them in.
pub fn on_screen_windows() -> Result<Vec<WindowInfo>, PlatformError> {
    list(
        kCGWindowListOptionOnScreenOnly | kCGWindowListExcludeDesktopElements,
        kCGNullWindowID,
    )
}

/// A single window, on screen or not.
pub fn window(id: WindowId) -> Result<Option<WindowInfo>, PlatformError> {
    let windows = list(kCGWindowListOptionIncludingWindow, id as CGWindowID)?;
    Ok(windows.into_iter().find(|w| w.id == id))
}

fn list(option: CGWindowListOption, relative_to: CGWindowID) -> Result<Vec<WindowInfo>, PlatformError> {
    let array = copy_window_info(option, relative_to).ok_or(PlatformError::WindowListUnavailable)?;
    let windows = array
        .get_all_values()
        .into_iter()
        .filter(|entry| !entry.is_null())
        // SAFETY: entries of a window info array are CFDictionaries with
        // the documented kCGWindow* keys and value types.
        .filter_map(|entry| unsafe { parse(entry as CFDictionaryRef) })
        .collect();
    Ok(windows)
}

/// # Safety
/// `dict` must be a window info dictionary.
unsafe fn parse(dict: CFDictionaryRef) -> Option<WindowInfo> {
    unsafe {
        Some(WindowInfo {
            id: u32::try_from(cf::get_i64(dict, "kCGWindowNumber")?).ok()?,
            owner_pid: i32::try_from(cf::get_i64(dict, "kCGWindowOwnerPID")?).ok()?,
            owner_name: cf::get_string(dict, "kCGWindowOwnerName"),
            bundle_id: None,
            title: cf::get_string(dict, "kCGWindowName"),
            layer: i32::try_from(cf::get_i64(dict, "kCGWindowLayer")?).ok()?,
            frame: cf::get_rect(dict, "kCGWindowBounds")?,
            is_on_screen: cf::get_bool(dict, "kCGWindowIsOnscreen").unwrap_or(false),
        })
    }
}

/// Bundle identifier of a running process.
pub fn bundle_id(pid: i32) -> Option<String> {
    // SAFETY: plain AppKit lookup; returns nil for unknown pids.
    let app = unsafe { NSRunningApplication::runningApplicationWithProcessIdentifier(pid) }?;
    unsafe { app.bundleIdentifier() }.map(|id| id.to_string())
}
