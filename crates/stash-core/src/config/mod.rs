mod loader;
pub mod template;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::hotkey::Modifier;
use crate::log::LogConfig;
use crate::section::SectionName;

pub use loader::{
    config_dir, config_path, load, load_sections, save_sections, sections_path, try_load,
};

/// Top-level configuration for Stash.
///
/// Loaded from `~/.config/stash/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Menu bar observation timing.
    pub polling: PollingConfig,
    /// Synthetic drag timing.
    pub drag: DragConfig,
    /// Section behaviour.
    pub sections: SectionsConfig,
    /// Section hotkeys.
    pub hotkeys: Vec<SectionHotkey>,
    /// File logging.
    pub logging: LogConfig,
}

/// How often and how carefully the menu bar is observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Milliseconds between two polls of the status item windows.
    pub interval_ms: u64,
    /// Milliseconds to wait after revealing all sections before
    /// enumerating windows, so the menu bar can reflow.
    pub settle_ms: u64,
    /// Milliseconds allowed for capturing one item image.
    pub capture_timeout_ms: u64,
}

/// Timing of synthetic drags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Milliseconds to wait after each posted mouse event.
    pub event_delay_ms: u64,
}

/// Section behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionsConfig {
    /// Whether the always-hidden section has a marker in the menu bar.
    pub always_hidden_enabled: bool,
    /// Hide the hidden section again after it has been shown.
    pub auto_rehide: bool,
    /// Seconds before an automatic rehide.
    pub rehide_interval_secs: u64,
}

/// A hotkey that toggles a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionHotkey {
    /// The section to toggle.
    pub section: SectionName,
    /// Key name (e.g. "H", "Space", "F1").
    pub key: String,
    /// Modifier keys (e.g. ["command", "shift"]).
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            settle_ms: 10,
            capture_timeout_ms: 100,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self { event_delay_ms: 20 }
    }
}

impl DragConfig {
    pub fn event_delay(&self) -> Duration {
        Duration::from_millis(self.event_delay_ms)
    }
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            always_hidden_enabled: true,
            auto_rehide: false,
            rehide_interval_secs: 15,
        }
    }
}

impl Config {
    /// Clamps timing values to safe ranges.
    ///
    /// A zero poll interval would spin, and very long capture timeouts
    /// would stall every poll behind one unresponsive window.
    pub fn validate(&mut self) {
        self.polling.interval_ms = self.polling.interval_ms.clamp(500, 60_000);
        self.polling.settle_ms = self.polling.settle_ms.min(500);
        self.polling.capture_timeout_ms = self.polling.capture_timeout_ms.clamp(10, 2000);
        self.drag.event_delay_ms = self.drag.event_delay_ms.min(500);
        self.sections.rehide_interval_secs = self.sections.rehide_interval_secs.clamp(1, 3600);
        self.hotkeys.retain(|h| {
            let keep = !h.key.trim().is_empty();
            if !keep {
                tracing::warn!("Ignoring hotkey for {} with an empty key", h.section);
            }
            keep
        });
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
