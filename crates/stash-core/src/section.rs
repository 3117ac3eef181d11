use std::fmt;

use serde::{Deserialize, Serialize};

use crate::control_item::{ControlItem, ControlItemRecord, HideState};
use crate::hotkey::Hotkey;
use crate::platform::StatusItemFactory;

/// Identity of one of the three menu bar sections.
///
/// The order of the variants is the on-screen nesting order from the
/// trailing end of the menu bar: Visible contains Hidden, which contains
/// AlwaysHidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    Visible,
    Hidden,
    AlwaysHidden,
}

impl SectionName {
    pub const ALL: [SectionName; 3] = [Self::Visible, Self::Hidden, Self::AlwaysHidden];

    /// Slot of this section in the manager's section list.
    pub fn index(self) -> usize {
        match self {
            Self::Visible => 0,
            Self::Hidden => 1,
            Self::AlwaysHidden => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::AlwaysHidden => "always_hidden",
        }
    }

    /// Status item autosave name of a freshly created control item.
    pub fn autosave_name(self) -> &'static str {
        match self {
            Self::Visible => "Stash.Visible",
            Self::Hidden => "Stash.Hidden",
            Self::AlwaysHidden => "Stash.AlwaysHidden",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Visible => "Visible",
            Self::Hidden => "Hidden",
            Self::AlwaysHidden => "Always Hidden",
        })
    }
}

/// Persisted form of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub name: SectionName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey: Option<Hotkey>,
    pub control_item: ControlItemRecord,
}

impl SectionRecord {
    /// Record of a section as it is created on first launch.
    pub fn fresh(name: SectionName) -> Self {
        let state = match name {
            SectionName::AlwaysHidden => HideState::HideItems,
            SectionName::Visible | SectionName::Hidden => HideState::ShowItems,
        };
        Self {
            name,
            hotkey: None,
            control_item: ControlItemRecord {
                autosave_name: name.autosave_name().to_string(),
                position: None,
                is_visible: true,
                state,
                expands_on_hide: name != SectionName::Visible,
            },
        }
    }
}

/// One of the three sections, owning its control item.
#[derive(Debug)]
pub struct MenuBarSection {
    name: SectionName,
    hotkey: Option<Hotkey>,
    control_item: ControlItem,
}

/// A section with its control item detached, used while reordering.
#[derive(Debug)]
pub(crate) struct SectionHead {
    name: SectionName,
    hotkey: Option<Hotkey>,
}

impl MenuBarSection {
    pub fn new(record: SectionRecord, factory: &dyn StatusItemFactory) -> Self {
        Self {
            name: record.name,
            hotkey: record.hotkey,
            control_item: ControlItem::new(record.control_item, factory),
        }
    }

    pub fn name(&self) -> SectionName {
        self.name
    }

    pub fn hotkey(&self) -> Option<&Hotkey> {
        self.hotkey.as_ref()
    }

    pub(crate) fn set_hotkey(&mut self, hotkey: Option<Hotkey>) {
        self.hotkey = hotkey.map(|h| h.normalized());
    }

    pub fn control_item(&self) -> &ControlItem {
        &self.control_item
    }

    pub fn control_item_mut(&mut self) -> &mut ControlItem {
        &mut self.control_item
    }

    /// A section is enabled while its marker is in the menu bar.
    pub fn is_enabled(&self) -> bool {
        self.control_item.is_visible()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.control_item.set_visible(enabled);
    }

    pub fn is_hidden(&self) -> bool {
        self.control_item.state() == HideState::HideItems
    }

    pub fn record(&self) -> SectionRecord {
        SectionRecord {
            name: self.name,
            hotkey: self.hotkey.clone(),
            control_item: self.control_item.record(),
        }
    }

    pub(crate) fn into_parts(self) -> (SectionHead, ControlItem) {
        (
            SectionHead {
                name: self.name,
                hotkey: self.hotkey,
            },
            self.control_item,
        )
    }

    pub(crate) fn from_parts(head: SectionHead, control_item: ControlItem) -> Self {
        Self {
            name: head.name,
            hotkey: head.hotkey,
            control_item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_records_start_with_always_hidden_collapsed() {
        assert_eq!(
            SectionRecord::fresh(SectionName::Visible).control_item.state,
            HideState::ShowItems
        );
        assert_eq!(
            SectionRecord::fresh(SectionName::Hidden).control_item.state,
            HideState::ShowItems
        );
        assert_eq!(
            SectionRecord::fresh(SectionName::AlwaysHidden).control_item.state,
            HideState::HideItems
        );
    }

    #[test]
    fn only_inner_sections_expand_on_hide() {
        assert!(!SectionRecord::fresh(SectionName::Visible).control_item.expands_on_hide);
        assert!(SectionRecord::fresh(SectionName::Hidden).control_item.expands_on_hide);
        assert!(SectionRecord::fresh(SectionName::AlwaysHidden).control_item.expands_on_hide);
    }

    #[test]
    fn names_follow_nesting_order() {
        assert!(SectionName::Visible < SectionName::Hidden);
        assert!(SectionName::Hidden < SectionName::AlwaysHidden);
        for (i, name) in SectionName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
        }
    }

    #[test]
    fn record_serializes_with_snake_case_names() {
        let json = serde_json::to_string(&SectionRecord::fresh(SectionName::AlwaysHidden)).unwrap();
        assert!(json.contains("\"always_hidden\""));
        assert!(json.contains("\"hide_items\""));
    }
}
