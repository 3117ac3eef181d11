use std::sync::Arc;

use image::RgbaImage;

use crate::platform::{WindowId, WindowInfo};
use crate::rect::Rect;

const CONTROL_CENTER: &str = "com.apple.controlcenter";
const SYSTEM_UI_SERVER: &str = "com.apple.systemuiserver";
const SIRI: &str = "com.apple.Siri";

/// Status items that ignore synthetic drags: (bundle id, window title).
/// A `None` title matches every item of that bundle.
const IMMOVABLE: &[(&str, Option<&str>)] = &[
    (CONTROL_CENTER, Some("Clock")),
    (CONTROL_CENTER, Some("BentoBox")),
    (SIRI, None),
];

/// Friendlier names for system items whose window titles are internal
/// identifiers: (bundle id, window title, display name).
const DISPLAY_NAMES: &[(&str, &str, &str)] = &[
    (CONTROL_CENTER, "BentoBox", "Control Center"),
    (CONTROL_CENTER, "FocusModes", "Focus"),
    (CONTROL_CENTER, "NowPlaying", "Now Playing"),
    (CONTROL_CENTER, "ScreenMirroring", "Screen Mirroring"),
    (CONTROL_CENTER, "UserSwitcher", "Fast User Switching"),
    (CONTROL_CENTER, "WiFi", "Wi-Fi"),
    (SYSTEM_UI_SERVER, "TimeMachine.TMMenuExtraHost", "Time Machine"),
    (SYSTEM_UI_SERVER, "TimeMachineMenuExtra.TMMenuExtraHost", "Time Machine"),
];

/// A status item belonging to another process, as seen in one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuBarItem {
    window: WindowInfo,
    display_name: String,
    accepts_mouse_events: bool,
    image: Option<Arc<RgbaImage>>,
}

impl MenuBarItem {
    pub fn new(window: WindowInfo, image: Option<RgbaImage>) -> Self {
        let display_name = display_name(&window);
        let accepts_mouse_events = accepts_mouse_events(&window);
        Self {
            window,
            display_name,
            accepts_mouse_events,
            image: image.map(Arc::new),
        }
    }

    pub fn window_id(&self) -> WindowId {
        self.window.id
    }

    pub fn window(&self) -> &WindowInfo {
        &self.window
    }

    pub fn frame(&self) -> Rect {
        self.window.frame
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// False for system items that must never be dragged.
    pub fn accepts_mouse_events(&self) -> bool {
        self.accepts_mouse_events
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_deref()
    }
}

fn display_name(window: &WindowInfo) -> String {
    let bundle = window.bundle_id.as_deref();
    let title = window.title.as_deref();

    if let (Some(bundle), Some(title)) = (bundle, title)
        && let Some((_, _, name)) = DISPLAY_NAMES
            .iter()
            .find(|(b, t, _)| *b == bundle && *t == title)
    {
        return (*name).to_string();
    }

    if bundle == Some(SIRI) {
        return "Siri".to_string();
    }

    // System hosts carry many items; the title says which one this is.
    if matches!(bundle, Some(CONTROL_CENTER | SYSTEM_UI_SERVER))
        && let Some(title) = title.filter(|t| !t.is_empty())
    {
        return title.to_string();
    }

    window
        .owner_name
        .clone()
        .filter(|n| !n.is_empty())
        .or_else(|| title.filter(|t| !t.is_empty()).map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string())
}

fn accepts_mouse_events(window: &WindowInfo) -> bool {
    let Some(bundle) = window.bundle_id.as_deref() else {
        return true;
    };
    !IMMOVABLE.iter().any(|(b, title)| {
        *b == bundle && title.is_none_or(|t| window.title.as_deref() == Some(t))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::STATUS_ITEM_LAYER;

    fn window(bundle: Option<&str>, owner: Option<&str>, title: Option<&str>) -> WindowInfo {
        WindowInfo {
            id: 1,
            owner_pid: 100,
            owner_name: owner.map(str::to_string),
            bundle_id: bundle.map(str::to_string),
            title: title.map(str::to_string),
            layer: STATUS_ITEM_LAYER,
            frame: Rect::new(0.0, 0.0, 30.0, 24.0),
            is_on_screen: true,
        }
    }

    #[test]
    fn third_party_item_uses_owner_name() {
        let item = MenuBarItem::new(
            window(Some("com.example.Weather"), Some("Weather"), Some("Item-0")),
            None,
        );
        assert_eq!(item.display_name(), "Weather");
        assert!(item.accepts_mouse_events());
    }

    #[test]
    fn control_center_items_get_friendly_names() {
        let item = MenuBarItem::new(
            window(Some(CONTROL_CENTER), Some("Control Center"), Some("BentoBox")),
            None,
        );
        assert_eq!(item.display_name(), "Control Center");

        let wifi = MenuBarItem::new(
            window(Some(CONTROL_CENTER), Some("Control Center"), Some("WiFi")),
            None,
        );
        assert_eq!(wifi.display_name(), "Wi-Fi");

        let battery = MenuBarItem::new(
            window(Some(CONTROL_CENTER), Some("Control Center"), Some("Battery")),
            None,
        );
        assert_eq!(battery.display_name(), "Battery");
    }

    #[test]
    fn system_items_refuse_mouse_events() {
        let clock = MenuBarItem::new(
            window(Some(CONTROL_CENTER), Some("Control Center"), Some("Clock")),
            None,
        );
        let siri = MenuBarItem::new(window(Some(SIRI), Some("Siri"), Some("Item-0")), None);
        let bento = MenuBarItem::new(
            window(Some(CONTROL_CENTER), Some("Control Center"), Some("BentoBox")),
            None,
        );
        let wifi = MenuBarItem::new(
            window(Some(CONTROL_CENTER), Some("Control Center"), Some("WiFi")),
            None,
        );

        assert!(!clock.accepts_mouse_events());
        assert!(!siri.accepts_mouse_events());
        assert!(!bento.accepts_mouse_events());
        assert!(wifi.accepts_mouse_events());
        assert_eq!(siri.display_name(), "Siri");
    }

    #[test]
    fn missing_metadata_falls_back_to_title_then_unknown() {
        let titled = MenuBarItem::new(window(None, None, Some("Helper")), None);
        let bare = MenuBarItem::new(window(None, Some(""), None), None);

        assert_eq!(titled.display_name(), "Helper");
        assert_eq!(bare.display_name(), "Unknown");
    }
}
