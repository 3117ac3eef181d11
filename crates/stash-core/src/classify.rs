use crate::item::MenuBarItem;
use crate::rect::Rect;
use crate::section::SectionName;

/// Frames of the markers that divide the menu bar into sections.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SectionMarkers {
    pub hidden: Option<Rect>,
    pub always_hidden: Option<Rect>,
}

/// Items split by the section they currently sit in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedItems {
    pub visible: Vec<MenuBarItem>,
    pub hidden: Vec<MenuBarItem>,
    pub always_hidden: Vec<MenuBarItem>,
}

impl ClassifiedItems {
    pub fn get(&self, section: SectionName) -> &[MenuBarItem] {
        match section {
            SectionName::Visible => &self.visible,
            SectionName::Hidden => &self.hidden,
            SectionName::AlwaysHidden => &self.always_hidden,
        }
    }

    pub fn len(&self) -> usize {
        self.visible.len() + self.hidden.len() + self.always_hidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decides which section an item at `frame` belongs to.
///
/// Leading edges are compared throughout: an item whose leading edge is
/// at or after the hidden marker's is visible; one at or before the
/// always-hidden marker's is always-hidden; anything else is hidden.
/// Without a hidden marker there is nothing to hide behind, so every item
/// is visible.
pub fn section_for(frame: &Rect, markers: &SectionMarkers, always_hidden_enabled: bool) -> SectionName {
    let Some(hidden) = markers.hidden else {
        return SectionName::Visible;
    };
    if frame.min_x() >= hidden.min_x() {
        return SectionName::Visible;
    }
    if always_hidden_enabled
        && let Some(always_hidden) = markers.always_hidden
        && frame.min_x() <= always_hidden.min_x()
    {
        return SectionName::AlwaysHidden;
    }
    SectionName::Hidden
}

/// Splits `items` into sections, preserving their order.
pub fn classify(
    items: &[MenuBarItem],
    markers: &SectionMarkers,
    always_hidden_enabled: bool,
) -> ClassifiedItems {
    let mut classified = ClassifiedItems::default();
    for item in items {
        let bucket = match section_for(&item.frame(), markers, always_hidden_enabled) {
            SectionName::Visible => &mut classified.visible,
            SectionName::Hidden => &mut classified.hidden,
            SectionName::AlwaysHidden => &mut classified.always_hidden,
        };
        bucket.push(item.clone());
    }
    classified
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
