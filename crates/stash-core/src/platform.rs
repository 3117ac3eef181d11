//! Collaborator contracts the engine consumes.
//!
//! Each platform crate (e.g. `stash-macos`) provides the implementations.
//! Everything here is a snapshot: no call returns historical data, and
//! any answer may be stale by the time the caller acts on it.

use std::future::Future;
use std::time::Duration;

use bitflags::bitflags;
use image::RgbaImage;

use crate::error::{CaptureError, EventError, PlatformError};
use crate::rect::{Point, Rect};

/// Window server identifier of an on-screen window.
pub type WindowId = u32;

/// Window layer of the menu bar itself.
pub const MAIN_MENU_LAYER: i32 = 24;

/// Window layer of status items (ours and every other process's).
pub const STATUS_ITEM_LAYER: i32 = 25;

/// Owner name of the window server process.
pub const WINDOW_SERVER_OWNER: &str = "Window Server";

/// Title of the window server's menu bar window.
pub const MENU_BAR_TITLE: &str = "Menubar";

/// One entry of the on-screen window list.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowInfo {
    pub id: WindowId,
    pub owner_pid: i32,
    pub owner_name: Option<String>,
    pub bundle_id: Option<String>,
    pub title: Option<String>,
    pub layer: i32,
    pub frame: Rect,
    pub is_on_screen: bool,
}

impl WindowInfo {
    /// Returns whether this is the window server's menu bar window.
    pub fn is_menu_bar(&self) -> bool {
        self.layer == MAIN_MENU_LAYER
            && self.owner_name.as_deref() == Some(WINDOW_SERVER_OWNER)
            && self.title.as_deref() == Some(MENU_BAR_TITLE)
    }

    /// Returns whether this window sits on the status item layer.
    pub fn is_status_item(&self) -> bool {
        self.layer == STATUS_ITEM_LAYER
    }
}

/// Enumerates windows currently on screen.
pub trait WindowSource {
    /// Returns the current on-screen window list, front to back.
    fn on_screen_windows(&self) -> impl Future<Output = Result<Vec<WindowInfo>, PlatformError>>;

    /// Looks up a single window by id. `None` if it no longer exists.
    fn window(&self, id: WindowId) -> impl Future<Output = Result<Option<WindowInfo>, PlatformError>>;

    /// Process id of the running engine, used to skip our own windows.
    fn own_pid(&self) -> i32 {
        std::process::id() as i32
    }

    /// Gives status item changes made on this thread time to reach the
    /// window server before the next listing. The default only waits.
    fn settle(&self, delay: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(delay)
    }
}

/// Captures the pixels of individual windows.
pub trait WindowCapture {
    /// Captures one window. Implementations should give up after `timeout`;
    /// callers additionally bound the call with their own timer.
    fn capture(
        &self,
        id: WindowId,
        timeout: Duration,
    ) -> impl Future<Output = Result<RgbaImage, CaptureError>>;
}

/// Kind of a synthetic mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Down,
    Dragged,
    Up,
}

impl MouseEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Down => "mouse-down",
            Self::Dragged => "mouse-dragged",
            Self::Up => "mouse-up",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

bitflags! {
    /// Modifier keys held while an event is delivered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModifierFlags: u32 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const OPTION = 1 << 2;
        const COMMAND = 1 << 3;
    }
}

/// A synthetic mouse event destined for the global HID stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub location: Point,
    pub button: MouseButton,
    pub modifiers: ModifierFlags,
}

/// Posts synthetic hardware events.
pub trait EventInjector {
    fn post(&self, event: MouseEvent) -> Result<(), EventError>;
}

/// Controls the system cursor.
pub trait CursorControl {
    /// Current cursor location, if it can be read.
    fn cursor_location(&self) -> Option<Point>;

    /// Bounds of the display containing `point`.
    fn screen_containing(&self, point: Point) -> Option<Rect>;

    fn hide_cursor(&self);

    fn show_cursor(&self);

    fn warp_cursor(&self, point: Point);
}

/// Everything the item manager needs from the host system.
pub trait Platform: WindowSource + WindowCapture + EventInjector + CursorControl {}

impl<T> Platform for T where T: WindowSource + WindowCapture + EventInjector + CursorControl {}

/// Glyph drawn inside a control item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlGlyph {
    /// Items are shown; clicking collapses them.
    ChevronCollapse,
    /// Items are hidden; clicking expands them.
    ChevronExpand,
    Divider,
}

/// Width of a control item in the menu bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlLength {
    /// Zero width.
    Collapsed,
    /// Regular marker width.
    Standard,
    /// Wide enough to push everything to its left off screen.
    Expanded,
}

impl ControlLength {
    pub const STANDARD_POINTS: f64 = 14.0;
    pub const EXPANDED_POINTS: f64 = 10_000.0;

    pub fn points(self) -> f64 {
        match self {
            Self::Collapsed => 0.0,
            Self::Standard => Self::STANDARD_POINTS,
            Self::Expanded => Self::EXPANDED_POINTS,
        }
    }
}

/// How a control item's backing status item should look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlAppearance {
    pub length: ControlLength,
    pub glyph: Option<ControlGlyph>,
    pub visible: bool,
}

/// A status item owned by this process.
pub trait StatusItemBackend {
    /// On-screen frame of the status item's window.
    fn window_frame(&self) -> Option<Rect>;

    /// Window server id of the status item's window.
    fn window_id(&self) -> Option<WindowId>;

    /// Re-renders the status item.
    fn apply(&mut self, appearance: &ControlAppearance);
}

/// Creates status items for control items.
pub trait StatusItemFactory {
    /// Creates a status item persisted under `autosave_name`.
    ///
    /// Returns `None` when the system refuses to create one; the control
    /// item then stays inert.
    fn create(&self, autosave_name: &str) -> Option<Box<dyn StatusItemBackend>>;
}
