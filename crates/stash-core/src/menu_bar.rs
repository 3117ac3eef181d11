//! The section set: three sections, their show/hide cascade, and the
//! reconciliation of control item order with on-screen positions.

use std::cmp::Ordering;
use std::time::Duration;

use futures::future::select_all;
use tokio::time::Instant;

use crate::config::{SectionHotkey, SectionsConfig};
use crate::control_item::{ControlItem, ControlItemState, HideState};
use crate::hotkey::{Hotkey, HotkeyRegistry};
use crate::observe::Subscription;
use crate::platform::{StatusItemFactory, WindowId};
use crate::section::{MenuBarSection, SectionName, SectionRecord};

/// Owns the three menu bar sections.
///
/// The section list always holds exactly one section per
/// [`SectionName`], in canonical order, so a section's slot is its
/// name's index. Any input that would break that is replaced by a fresh
/// canonical set.
#[derive(Debug)]
pub struct MenuBarManager {
    sections: Vec<MenuBarSection>,
    hotkeys: HotkeyRegistry,
    show_on_hover_prevented: bool,
    auto_rehide: Option<Duration>,
    rehide_deadline: Option<Instant>,
}

impl MenuBarManager {
    /// Creates the canonical section set.
    pub fn new(factory: &dyn StatusItemFactory, config: &SectionsConfig) -> Self {
        Self::from_records(Vec::new(), factory, config)
    }

    /// Rebuilds sections from persisted records.
    ///
    /// Records that do not describe exactly the three canonical sections
    /// are discarded in favour of a fresh set.
    pub fn from_records(
        records: Vec<SectionRecord>,
        factory: &dyn StatusItemFactory,
        config: &SectionsConfig,
    ) -> Self {
        let records = if is_canonical(&records) {
            let mut records = records;
            cascade_states(&mut records);
            records
        } else {
            if !records.is_empty() {
                tracing::warn!(
                    "Persisted sections are malformed ({} entries); reinitializing",
                    records.len()
                );
            }
            SectionName::ALL.map(SectionRecord::fresh).to_vec()
        };

        let sections = records
            .into_iter()
            .map(|record| MenuBarSection::new(record, factory))
            .collect();

        let mut manager = Self {
            sections,
            hotkeys: HotkeyRegistry::new(),
            show_on_hover_prevented: false,
            auto_rehide: None,
            rehide_deadline: None,
        };
        manager.apply_config(config);
        manager.rebuild_hotkeys();
        manager.reorder_control_items();
        manager
    }

    /// Decodes persisted section state.
    ///
    /// Undecodable data is logged and treated as an empty list, which
    /// then heals to the canonical set.
    pub fn restore(data: &[u8], factory: &dyn StatusItemFactory, config: &SectionsConfig) -> Self {
        let records = match serde_json::from_slice::<Vec<SectionRecord>>(data) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Could not decode persisted sections: {e}");
                Vec::new()
            }
        };
        Self::from_records(records, factory, config)
    }

    /// Encodes the sections for persistence.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(&self.records())
    }

    pub fn records(&self) -> Vec<SectionRecord> {
        self.sections.iter().map(MenuBarSection::record).collect()
    }

    /// Applies the settings-owned parts of section state.
    pub fn apply_config(&mut self, config: &SectionsConfig) {
        self.section_mut(SectionName::AlwaysHidden)
            .set_enabled(config.always_hidden_enabled);
        self.auto_rehide = config
            .auto_rehide
            .then(|| Duration::from_secs(config.rehide_interval_secs));
        if self.auto_rehide.is_none() {
            self.rehide_deadline = None;
        }
    }

    pub fn sections(&self) -> &[MenuBarSection] {
        &self.sections
    }

    /// Looks up a section by name.
    pub fn section(&self, name: SectionName) -> &MenuBarSection {
        &self.sections[name.index()]
    }

    pub fn section_mut(&mut self, name: SectionName) -> &mut MenuBarSection {
        &mut self.sections[name.index()]
    }

    pub fn is_always_hidden_enabled(&self) -> bool {
        self.section(SectionName::AlwaysHidden).is_enabled()
    }

    // -- show / hide cascade --

    /// Shows a section and every section containing it.
    pub fn show(&mut self, name: SectionName) {
        match name {
            SectionName::Visible | SectionName::Hidden => {
                self.set_state(SectionName::Visible, HideState::ShowItems);
                self.set_state(SectionName::Hidden, HideState::ShowItems);
            }
            SectionName::AlwaysHidden => {
                self.show(SectionName::Hidden);
                self.set_state(SectionName::AlwaysHidden, HideState::ShowItems);
            }
        }
        if let Some(interval) = self.auto_rehide {
            self.rehide_deadline = Some(Instant::now() + interval);
        }
    }

    /// Hides a section and every section nested inside it.
    pub fn hide(&mut self, name: SectionName) {
        match name {
            SectionName::Visible | SectionName::Hidden => {
                self.set_state(SectionName::Visible, HideState::HideItems);
                self.set_state(SectionName::Hidden, HideState::HideItems);
                self.hide(SectionName::AlwaysHidden);
            }
            SectionName::AlwaysHidden => {
                self.set_state(SectionName::AlwaysHidden, HideState::HideItems);
            }
        }
        if std::mem::take(&mut self.show_on_hover_prevented) {
            tracing::trace!("Show on hover re-armed");
        }
        self.rehide_deadline = None;
    }

    pub fn toggle(&mut self, name: SectionName) {
        if self.section(name).is_hidden() {
            self.show(name);
        } else {
            self.hide(name);
        }
    }

    fn set_state(&mut self, name: SectionName, state: HideState) {
        self.section_mut(name).control_item_mut().set_state(state);
    }

    /// Current state of every section, in canonical order.
    pub fn states(&self) -> [HideState; 3] {
        SectionName::ALL.map(|name| self.section(name).control_item().state())
    }

    /// Puts back states captured with [`states`](Self::states).
    pub fn restore_states(&mut self, states: [HideState; 3]) {
        for (name, state) in SectionName::ALL.into_iter().zip(states) {
            self.set_state(name, state);
        }
    }

    /// Reveals every section without cascading or arming auto-rehide.
    pub fn show_all(&mut self) {
        for name in SectionName::ALL {
            self.set_state(name, HideState::ShowItems);
        }
    }

    // -- show on hover --

    /// Suppresses show-on-hover until the next hide.
    pub fn prevent_show_on_hover(&mut self) {
        self.show_on_hover_prevented = true;
    }

    // -- auto rehide --

    pub fn rehide_deadline(&self) -> Option<Instant> {
        self.rehide_deadline
    }

    /// Hides the Hidden section once the rehide deadline has passed.
    ///
    /// Returns whether a rehide happened.
    pub fn rehide_if_due(&mut self, now: Instant) -> bool {
        match self.rehide_deadline {
            Some(deadline) if now >= deadline => {
                tracing::debug!("Auto-rehiding sections");
                self.hide(SectionName::Hidden);
                true
            }
            _ => false,
        }
    }

    // -- hotkeys --

    pub fn set_hotkey(&mut self, name: SectionName, hotkey: Option<Hotkey>) {
        self.section_mut(name).set_hotkey(hotkey);
        self.rebuild_hotkeys();
    }

    /// Binds hotkeys from configuration, replacing per-section hotkeys
    /// for the sections they name.
    pub fn apply_hotkeys(&mut self, bindings: &[SectionHotkey]) {
        for binding in bindings {
            let hotkey = Hotkey::new(binding.key.clone(), &binding.modifiers);
            self.section_mut(binding.section).set_hotkey(Some(hotkey));
        }
        self.rebuild_hotkeys();
    }

    /// Toggles the section bound to `hotkey`. Returns the section toggled.
    pub fn handle_hotkey(&mut self, hotkey: &Hotkey) -> Option<SectionName> {
        let name = self.hotkeys.lookup(hotkey)?;
        if !self.section(name).is_enabled() {
            tracing::debug!("Ignoring hotkey {hotkey} for disabled section {name}");
            return None;
        }
        self.toggle(name);
        Some(name)
    }

    pub fn hotkeys(&self) -> &HotkeyRegistry {
        &self.hotkeys
    }

    fn rebuild_hotkeys(&mut self) {
        self.hotkeys.clear();
        for section in &self.sections {
            if let Some(hotkey) = section.hotkey() {
                self.hotkeys.register(hotkey, section.name());
            }
        }
    }

    // -- ordering --

    /// Window ids of every control item that has a live status item.
    pub fn control_item_window_ids(&self) -> Vec<WindowId> {
        self.sections
            .iter()
            .filter_map(|s| s.control_item().window_id())
            .collect()
    }

    /// Re-reads every control item's on-screen position.
    ///
    /// Returns whether any position changed.
    pub fn refresh_positions(&mut self) -> bool {
        let mut changed = false;
        for section in &mut self.sections {
            changed |= section.control_item_mut().refresh_position();
        }
        changed
    }

    /// Reassigns control items to sections in on-screen order.
    ///
    /// Returns whether any section received a different control item.
    pub fn reorder_control_items(&mut self) -> bool {
        let before: Vec<String> = self
            .sections
            .iter()
            .map(|s| s.control_item().autosave_name().to_string())
            .collect();

        let (heads, mut items): (Vec<_>, Vec<_>) = std::mem::take(&mut self.sections)
            .into_iter()
            .map(MenuBarSection::into_parts)
            .unzip();

        items.sort_by(compare_control_items);
        for (rank, item) in items.iter_mut().enumerate() {
            item.set_rank(rank);
        }

        self.sections = heads
            .into_iter()
            .zip(items)
            .map(|(head, item)| MenuBarSection::from_parts(head, item))
            .collect();

        let changed = self
            .sections
            .iter()
            .zip(&before)
            .any(|(s, name)| s.control_item().autosave_name() != name);
        if changed {
            tracing::info!(
                "Control items reordered: {}",
                self.sections
                    .iter()
                    .map(|s| format!("{}={}", s.name(), s.control_item().autosave_name()))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        changed
    }

    /// Subscribes to changes of every control item.
    pub fn subscribe(&self) -> ControlItemChanges {
        ControlItemChanges {
            subscriptions: self
                .sections
                .iter()
                .map(|s| s.control_item().subscribe())
                .collect(),
        }
    }
}

/// Order of control items from the trailing end of the menu bar.
///
/// Invisible items go last. Two hidden items put the one that expands on
/// hide after the one that does not, since an expanded marker's frame no
/// longer says where it sits. Everything else sorts by position, with an
/// unresolved position counting as the trailing end.
fn compare_control_items(lhs: &ControlItem, rhs: &ControlItem) -> Ordering {
    let (l, r) = (lhs.snapshot(), rhs.snapshot());
    match (l.is_visible, r.is_visible) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => return Ordering::Equal,
        (true, true) => {}
    }
    if l.state == HideState::HideItems && r.state == HideState::HideItems {
        let by_expansion = lhs.expands_on_hide().cmp(&rhs.expands_on_hide());
        if by_expansion != Ordering::Equal {
            return by_expansion;
        }
    }
    compare_positions(&l, &r)
}

fn compare_positions(l: &ControlItemState, r: &ControlItemState) -> Ordering {
    match (l.position, r.position) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.total_cmp(&a),
    }
}

/// Makes restored states obey the show/hide cascade: Hidden follows
/// Visible, and AlwaysHidden is hidden whenever Hidden is.
fn cascade_states(records: &mut [SectionRecord]) {
    let [visible, hidden, always_hidden] = records else {
        return;
    };
    let before = (hidden.control_item.state, always_hidden.control_item.state);
    hidden.control_item.state = visible.control_item.state;
    if hidden.control_item.state == HideState::HideItems {
        always_hidden.control_item.state = HideState::HideItems;
    }
    if before != (hidden.control_item.state, always_hidden.control_item.state) {
        tracing::warn!("Persisted section states were inconsistent; repaired");
    }
}

fn is_canonical(records: &[SectionRecord]) -> bool {
    records.len() == SectionName::ALL.len()
        && records
            .iter()
            .zip(SectionName::ALL)
            .all(|(record, name)| record.name == name)
}

/// Change notifications from all control items of a section set.
pub struct ControlItemChanges {
    subscriptions: Vec<Subscription<ControlItemState>>,
}

impl ControlItemChanges {
    /// Waits until any control item changes.
    ///
    /// Returns `false` once the control items have been dropped (after a
    /// reinitialization); subscribe again to follow the new ones.
    pub async fn changed(&mut self) -> bool {
        if self.subscriptions.is_empty() {
            return false;
        }
        let waits = self
            .subscriptions
            .iter_mut()
            .map(|s| Box::pin(s.changed()));
        let (alive, _, _) = select_all(waits).await;
        alive
    }
}

#[cfg(test)]
#[path = "tests/menu_bar_tests.rs"]
mod tests;
