pub mod classify;
pub mod config;
pub mod control_item;
pub mod debounce;
pub mod error;
pub mod hotkey;
pub mod item;
pub mod item_manager;
pub mod log;
pub mod menu_bar;
pub mod observe;
pub mod platform;
pub mod rect;
pub mod section;

#[cfg(test)]
mod testing;

pub use classify::{ClassifiedItems, SectionMarkers};
pub use config::Config;
pub use control_item::{ControlItem, ControlItemState, HideState};
pub use error::{CaptureError, ConfigError, EventError, ItemError, PlatformError};
pub use hotkey::{Hotkey, HotkeyRegistry, Modifier};
pub use item::MenuBarItem;
pub use item_manager::MenuBarItemManager;
pub use menu_bar::{ControlItemChanges, MenuBarManager};
pub use platform::{Platform, StatusItemBackend, StatusItemFactory, WindowId, WindowInfo};
pub use rect::{Point, Rect};
pub use section::{MenuBarSection, SectionName};
