use std::time::Duration;

use stash_core::config::{self, Config};
use stash_core::section::{SectionName, SectionRecord};
use stash_core::{MenuBarItemManager, MenuBarManager};
use stash_macos::{
    ControlClick, EventPump, HotkeyTap, MacPlatform, MainThreadMarker, StatusItems,
};

/// How long freshly created status items get to appear on screen.
const SETTLE_TIME: Duration = Duration::from_millis(300);
const SETTLE_STEP: Duration = Duration::from_millis(20);

/// The live engine: sections, observed items, and the AppKit plumbing
/// that feeds them.
pub struct Session {
    pub menu_bar: MenuBarManager,
    pub items: MenuBarItemManager<MacPlatform>,
    events: EventPump,
    hotkeys: Option<HotkeyTap>,
    /// Section state as last written to disk.
    saved: Vec<SectionRecord>,
}

impl Session {
    /// Creates the control items, restoring saved section state.
    pub fn start(config: &Config) -> Result<Self, String> {
        let mtm = MainThreadMarker::new().ok_or("Stash must run on the main thread")?;
        let events = EventPump::new(mtm);
        let factory = StatusItems::new(mtm);

        let mut menu_bar = match config::load_sections() {
            Ok(Some(data)) => MenuBarManager::restore(&data, &factory, &config.sections),
            Ok(None) => MenuBarManager::new(&factory, &config.sections),
            Err(e) => {
                tracing::warn!("Could not read saved sections: {e}");
                MenuBarManager::new(&factory, &config.sections)
            }
        };
        menu_bar.apply_hotkeys(&config.hotkeys);

        let hotkeys = if menu_bar.hotkeys().bindings().is_empty() {
            None
        } else {
            match HotkeyTap::install() {
                Ok(tap) => Some(tap),
                Err(e) => {
                    tracing::warn!("Hotkeys disabled: {e}");
                    None
                }
            }
        };

        let mut items = MenuBarItemManager::new(
            MacPlatform::new(),
            config.polling.clone(),
            config.drag.clone(),
        );
        items.reclassify(menu_bar.is_always_hidden_enabled());

        let saved = menu_bar.records();
        Ok(Self {
            menu_bar,
            items,
            events,
            hotkeys,
            saved,
        })
    }

    /// Keeps AppKit running briefly so new status items get windows.
    pub async fn settle(&mut self) {
        let until = tokio::time::Instant::now() + SETTLE_TIME;
        while tokio::time::Instant::now() < until {
            self.pump();
            tokio::time::sleep(SETTLE_STEP).await;
        }
        self.menu_bar.refresh_positions();
    }

    /// Dispatches pending AppKit events, then acts on control item clicks
    /// and hotkey presses.
    pub fn pump(&mut self) {
        let windows = self.menu_bar.control_item_window_ids();
        for click in self.events.pump(&windows) {
            self.handle_click(click);
        }

        let pressed = self
            .hotkeys
            .as_ref()
            .map(HotkeyTap::drain)
            .unwrap_or_default();
        for hotkey in pressed {
            if let Some(name) = self.menu_bar.handle_hotkey(&hotkey) {
                tracing::info!("{hotkey} toggled {name}");
            }
        }
    }

    fn handle_click(&mut self, click: ControlClick) {
        let name = if click.option && self.menu_bar.is_always_hidden_enabled() {
            SectionName::AlwaysHidden
        } else {
            SectionName::Hidden
        };
        self.menu_bar.toggle(name);
        if !self.menu_bar.section(name).is_hidden() {
            self.menu_bar.prevent_show_on_hover();
        }
        tracing::debug!("Control item {} clicked; toggled {name}", click.window);
    }

    /// Writes section state if it changed since the last save.
    pub fn save(&mut self) {
        let records = self.menu_bar.records();
        if records == self.saved {
            return;
        }
        let result = self
            .menu_bar
            .encode()
            .map_err(stash_core::ConfigError::from)
            .and_then(|data| config::save_sections(&data));
        match result {
            Ok(()) => {
                tracing::debug!("Saved section state");
                self.saved = records;
            }
            Err(e) => tracing::warn!("Could not save sections: {e}"),
        }
    }

    /// Saves, then reveals every section so nothing stays off screen
    /// once the control items are gone.
    pub fn shutdown(mut self) {
        self.save();
        self.menu_bar.show_all();
        self.pump();
    }
}
