#![cfg(target_os = "macos")]

/// CoreFoundation dictionary accessors for window list entries.
mod cf;

/// Window pixel capture.
pub mod capture;

/// Cursor control and display geometry.
pub mod cursor;

/// Synthetic mouse events.
pub mod events;

/// Global hotkey capture.
pub mod hotkeys;

/// AppKit event pump for the daemon loop.
pub mod run_loop;

/// `NSStatusItem`-backed control items.
pub mod status_item;

/// On-screen window enumeration.
pub mod window_list;

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use image::RgbaImage;
use stash_core::error::{CaptureError, EventError, PlatformError};
use stash_core::platform::{
    CursorControl, EventInjector, MouseEvent, WindowCapture, WindowId, WindowInfo, WindowSource,
};
use stash_core::rect::{Point, Rect};

pub use hotkeys::HotkeyTap;
pub use objc2_foundation::MainThreadMarker;
pub use run_loop::{ControlClick, EventPump};
pub use status_item::StatusItems;

/// The live macOS window server, as the item manager sees it.
///
/// Bundle identifiers are looked up once per process and cached; a pid
/// is never reused while its windows are still listed.
#[derive(Default)]
pub struct MacPlatform {
    bundle_ids: RefCell<HashMap<i32, Option<String>>>,
}

impl MacPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_bundle_ids(&self, mut windows: Vec<WindowInfo>) -> Vec<WindowInfo> {
        let mut cache = self.bundle_ids.borrow_mut();
        for window in &mut windows {
            window.bundle_id = cache
                .entry(window.owner_pid)
                .or_insert_with(|| window_list::bundle_id(window.owner_pid))
                .clone();
        }
        windows
    }
}

impl WindowSource for MacPlatform {
    async fn settle(&self, delay: Duration) {
        run_loop::settle(delay).await;
    }

    async fn on_screen_windows(&self) -> Result<Vec<WindowInfo>, PlatformError> {
        let windows = window_list::on_screen_windows()?;
        Ok(self.with_bundle_ids(windows))
    }

    async fn window(&self, id: WindowId) -> Result<Option<WindowInfo>, PlatformError> {
        let window = window_list::window(id)?;
        Ok(window.and_then(|w| self.with_bundle_ids(vec![w]).pop()))
    }
}

impl WindowCapture for MacPlatform {
    async fn capture(&self, id: WindowId, timeout: Duration) -> Result<RgbaImage, CaptureError> {
        capture::capture_window(id, timeout).await
    }
}

impl EventInjector for MacPlatform {
    fn post(&self, event: MouseEvent) -> Result<(), EventError> {
        events::post(event)
    }
}

impl CursorControl for MacPlatform {
    fn cursor_location(&self) -> Option<Point> {
        cursor::location()
    }

    fn screen_containing(&self, point: Point) -> Option<Rect> {
        cursor::display_containing(point)
    }

    fn hide_cursor(&self) {
        cursor::hide();
    }

    fn show_cursor(&self) {
        cursor::show();
    }

    fn warp_cursor(&self, point: Point) {
        cursor::warp(point);
    }
}
