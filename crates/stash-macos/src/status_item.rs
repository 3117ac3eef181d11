use objc2::rc::Retained;
use objc2_app_kit::{NSStatusBar, NSStatusBarButton, NSStatusItem};
use objc2_foundation::{MainThreadMarker, NSString};
use stash_core::platform::{
    ControlAppearance, ControlGlyph, ControlLength, StatusItemBackend, StatusItemFactory, WindowId,
};
use stash_core::rect::Rect;

use crate::window_list;

/// Creates control items in the system status bar.
///
/// Status items are main-thread objects, so the factory (and every item
/// it creates) is tied to the main thread.
pub struct StatusItems {
    mtm: MainThreadMarker,
}

impl StatusItems {
    pub fn new(mtm: MainThreadMarker) -> Self {
        Self { mtm }
    }
}

impl StatusItemFactory for StatusItems {
    fn create(&self, autosave_name: &str) -> Option<Box<dyn StatusItemBackend>> {
        let item = unsafe {
            let status_bar = NSStatusBar::systemStatusBar();
            let item = status_bar.statusItemWithLength(ControlLength::STANDARD_POINTS);
            item.setAutosaveName(Some(&NSString::from_str(autosave_name)));
            item
        };
        let item = StatusItem {
            item,
            mtm: self.mtm,
        };
        if item.button().is_none() {
            tracing::warn!("Status item {autosave_name} has no button");
            return None;
        }
        tracing::debug!("Created status item {autosave_name}");
        Some(Box::new(item))
    }
}

struct StatusItem {
    item: Retained<NSStatusItem>,
    mtm: MainThreadMarker,
}

impl StatusItem {
    fn button(&self) -> Option<Retained<NSStatusBarButton>> {
        unsafe { self.item.button(self.mtm) }
    }
}

impl StatusItemBackend for StatusItem {
    fn window_frame(&self) -> Option<Rect> {
        // Read back through the window list so the frame shares the
        // coordinate space of every other window the engine sees.
        let id = self.window_id()?;
        window_list::window(id).ok().flatten().map(|w| w.frame)
    }

    fn window_id(&self) -> Option<WindowId> {
        let window = self.button()?.window()?;
        u32::try_from(window.windowNumber()).ok().filter(|&n| n > 0)
    }

    fn apply(&mut self, appearance: &ControlAppearance) {
        unsafe {
            self.item.setVisible(appearance.visible);
            self.item.setLength(appearance.length.points());
        }
        if let Some(button) = self.button() {
            unsafe { button.setTitle(&NSString::from_str(title(appearance.glyph))) };
        }
    }
}

impl Drop for StatusItem {
    fn drop(&mut self) {
        unsafe { NSStatusBar::systemStatusBar().removeStatusItem(&self.item) };
    }
}

fn title(glyph: Option<ControlGlyph>) -> &'static str {
    match glyph {
        Some(ControlGlyph::ChevronCollapse) => "›",
        Some(ControlGlyph::ChevronExpand) => "‹",
        Some(ControlGlyph::Divider) => "│",
        None => "",
    }
}
