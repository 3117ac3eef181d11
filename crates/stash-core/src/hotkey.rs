use std::fmt;

use serde::{Deserialize, Serialize};

use crate::section::SectionName;

/// Keyboard modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Command,
    Option,
    Control,
    Shift,
}

impl Modifier {
    fn symbol(self) -> &'static str {
        match self {
            Self::Control => "⌃",
            Self::Option => "⌥",
            Self::Shift => "⇧",
            Self::Command => "⌘",
        }
    }
}

/// A key plus modifier combination.
///
/// Modifiers are kept sorted and deduplicated so two hotkeys that press
/// the same keys compare equal regardless of how they were written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hotkey {
    /// Key name (e.g. "H", "Space", "F1").
    pub key: String,
    pub modifiers: Vec<Modifier>,
}

impl Hotkey {
    pub fn new(key: impl Into<String>, modifiers: &[Modifier]) -> Self {
        let mut modifiers = modifiers.to_vec();
        modifiers.sort();
        modifiers.dedup();
        Self {
            key: key.into().to_ascii_uppercase(),
            modifiers,
        }
    }

    /// Returns the hotkey with its key and modifiers canonicalized.
    pub fn normalized(&self) -> Self {
        Self::new(self.key.clone(), &self.modifiers)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Menu-style order: ⌃⌥⇧⌘
        for m in [
            Modifier::Control,
            Modifier::Option,
            Modifier::Shift,
            Modifier::Command,
        ] {
            if self.modifiers.contains(&m) {
                f.write_str(m.symbol())?;
            }
        }
        f.write_str(&self.key)
    }
}

/// Lookup table from hotkeys to the sections they toggle.
///
/// Built from the sections' own hotkeys and owned by the menu bar
/// manager. A hotkey bound to several sections resolves to the first one
/// registered.
#[derive(Debug, Default, Clone)]
pub struct HotkeyRegistry {
    bindings: Vec<(Hotkey, SectionName)>,
}

impl HotkeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hotkey: &Hotkey, section: SectionName) {
        let hotkey = hotkey.normalized();
        if self.bindings.iter().any(|(h, _)| *h == hotkey) {
            tracing::warn!("Hotkey {hotkey} is already bound; ignoring binding for {section}");
            return;
        }
        self.bindings.push((hotkey, section));
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn lookup(&self, hotkey: &Hotkey) -> Option<SectionName> {
        let hotkey = hotkey.normalized();
        self.bindings
            .iter()
            .find(|(h, _)| *h == hotkey)
            .map(|(_, s)| *s)
    }

    pub fn bindings(&self) -> &[(Hotkey, SectionName)] {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_order_does_not_matter() {
        let a = Hotkey::new("h", &[Modifier::Shift, Modifier::Command]);
        let b = Hotkey::new("H", &[Modifier::Command, Modifier::Shift, Modifier::Shift]);

        assert_eq!(a, b);
    }

    #[test]
    fn display_uses_menu_symbol_order() {
        let hotkey = Hotkey::new("H", &[Modifier::Command, Modifier::Option]);
        assert_eq!(hotkey.to_string(), "⌥⌘H");
    }

    #[test]
    fn registry_resolves_registered_hotkey() {
        let mut registry = HotkeyRegistry::new();
        registry.register(
            &Hotkey::new("H", &[Modifier::Command, Modifier::Shift]),
            SectionName::Hidden,
        );

        let pressed = Hotkey {
            key: "h".into(),
            modifiers: vec![Modifier::Shift, Modifier::Command],
        };
        assert_eq!(registry.lookup(&pressed), Some(SectionName::Hidden));
        assert_eq!(registry.lookup(&Hotkey::new("H", &[])), None);
    }

    #[test]
    fn duplicate_binding_keeps_first() {
        let mut registry = HotkeyRegistry::new();
        let hotkey = Hotkey::new("A", &[Modifier::Control]);

        registry.register(&hotkey, SectionName::Hidden);
        registry.register(&hotkey, SectionName::AlwaysHidden);

        assert_eq!(registry.lookup(&hotkey), Some(SectionName::Hidden));
        assert_eq!(registry.bindings().len(), 1);
    }

    #[test]
    fn clear_drops_every_binding() {
        let mut registry = HotkeyRegistry::new();
        let hotkey = Hotkey::new("A", &[Modifier::Control]);
        registry.register(&hotkey, SectionName::AlwaysHidden);

        registry.clear();

        assert_eq!(registry.lookup(&hotkey), None);
        assert!(registry.bindings().is_empty());
    }
}
