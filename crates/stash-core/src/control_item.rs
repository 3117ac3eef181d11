use std::fmt;

use serde::{Deserialize, Serialize};

use crate::observe::{Published, Subscription};
use crate::platform::{
    ControlAppearance, ControlGlyph, ControlLength, StatusItemBackend, StatusItemFactory, WindowId,
};
use crate::rect::Rect;

/// Whether the icons governed by a control item are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HideState {
    ShowItems,
    HideItems,
}

/// Observable part of a control item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlItemState {
    /// Leading-edge X of the marker. `None` means anchored at the
    /// trailing end of the menu bar.
    pub position: Option<f64>,
    pub is_visible: bool,
    pub state: HideState,
}

/// Persisted form of a control item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlItemRecord {
    pub autosave_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    pub is_visible: bool,
    pub state: HideState,
    pub expands_on_hide: bool,
}

/// An invisible marker this process places in the menu bar.
///
/// Every mutation is published to subscribers and re-renders the backing
/// status item. A control item whose status item could not be created is
/// inert: its frame and window id are simply unavailable.
pub struct ControlItem {
    autosave_name: String,
    expands_on_hide: bool,
    /// Rank in the sorted control item order; drives the glyph.
    rank: usize,
    published: Published<ControlItemState>,
    backend: Option<Box<dyn StatusItemBackend>>,
}

impl ControlItem {
    /// Creates a control item backed by a status item from `factory`.
    pub fn new(record: ControlItemRecord, factory: &dyn StatusItemFactory) -> Self {
        let backend = factory.create(&record.autosave_name);
        if backend.is_none() {
            tracing::warn!(
                "Could not create status item for {}; control item is inert",
                record.autosave_name
            );
        }
        let mut item = Self::from_parts(record, backend);
        item.render();
        item
    }

    /// Creates a control item with no backing status item.
    pub fn inert(record: ControlItemRecord) -> Self {
        Self::from_parts(record, None)
    }

    fn from_parts(record: ControlItemRecord, backend: Option<Box<dyn StatusItemBackend>>) -> Self {
        Self {
            autosave_name: record.autosave_name,
            expands_on_hide: record.expands_on_hide,
            rank: 0,
            published: Published::new(ControlItemState {
                position: record.position,
                is_visible: record.is_visible,
                state: record.state,
            }),
            backend,
        }
    }

    pub fn record(&self) -> ControlItemRecord {
        let state = self.published.get();
        ControlItemRecord {
            autosave_name: self.autosave_name.clone(),
            position: state.position,
            is_visible: state.is_visible,
            state: state.state,
            expands_on_hide: self.expands_on_hide,
        }
    }

    pub fn autosave_name(&self) -> &str {
        &self.autosave_name
    }

    pub fn expands_on_hide(&self) -> bool {
        self.expands_on_hide
    }

    pub fn snapshot(&self) -> ControlItemState {
        self.published.get()
    }

    pub fn position(&self) -> Option<f64> {
        self.published.with(|s| s.position)
    }

    pub fn is_visible(&self) -> bool {
        self.published.with(|s| s.is_visible)
    }

    pub fn state(&self) -> HideState {
        self.published.with(|s| s.state)
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn is_inert(&self) -> bool {
        self.backend.is_none()
    }

    /// On-screen frame of the marker window.
    pub fn window_frame(&self) -> Option<Rect> {
        self.backend.as_ref().and_then(|b| b.window_frame())
    }

    pub fn window_id(&self) -> Option<WindowId> {
        self.backend.as_ref().and_then(|b| b.window_id())
    }

    pub fn set_position(&mut self, position: Option<f64>) {
        self.update(|s| s.position = position);
    }

    pub fn set_visible(&mut self, is_visible: bool) {
        self.update(|s| s.is_visible = is_visible);
    }

    pub fn set_state(&mut self, state: HideState) {
        self.update(|s| s.state = state);
    }

    /// Moves the item to a new rank in the sorted order.
    pub fn set_rank(&mut self, rank: usize) {
        if self.rank != rank {
            self.rank = rank;
            self.render();
        }
    }

    /// Reads the marker's live frame and adopts its leading edge as the
    /// position. Returns whether the position changed.
    pub fn refresh_position(&mut self) -> bool {
        let Some(frame) = self.window_frame() else {
            return false;
        };
        let changed = self.published.modify(|s| {
            if s.position == Some(frame.min_x()) {
                return false;
            }
            s.position = Some(frame.min_x());
            true
        });
        if changed {
            tracing::debug!("{} moved to x={}", self.autosave_name, frame.min_x());
        }
        changed
    }

    pub fn subscribe(&self) -> Subscription<ControlItemState> {
        self.published.subscribe()
    }

    pub fn appearance(&self) -> ControlAppearance {
        appearance(self.rank, &self.snapshot(), self.expands_on_hide)
    }

    fn update(&mut self, f: impl FnOnce(&mut ControlItemState)) {
        let changed = self.published.modify(|s| {
            let before = *s;
            f(s);
            *s != before
        });
        if changed {
            self.render();
        }
    }

    fn render(&mut self) {
        let appearance = self.appearance();
        if let Some(backend) = self.backend.as_mut() {
            backend.apply(&appearance);
        }
    }
}

impl fmt::Debug for ControlItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlItem")
            .field("autosave_name", &self.autosave_name)
            .field("expands_on_hide", &self.expands_on_hide)
            .field("rank", &self.rank)
            .field("state", &self.snapshot())
            .field("inert", &self.is_inert())
            .finish()
    }
}

/// Computes how a control item at `rank` should render.
pub fn appearance(rank: usize, state: &ControlItemState, expands_on_hide: bool) -> ControlAppearance {
    if !state.is_visible {
        return ControlAppearance {
            length: ControlLength::Collapsed,
            glyph: None,
            visible: false,
        };
    }
    if state.state == HideState::HideItems && expands_on_hide {
        return ControlAppearance {
            length: ControlLength::Expanded,
            glyph: None,
            visible: true,
        };
    }
    let glyph = match (rank, state.state) {
        (0, HideState::ShowItems) => ControlGlyph::ChevronCollapse,
        (0, HideState::HideItems) => ControlGlyph::ChevronExpand,
        _ => ControlGlyph::Divider,
    };
    ControlAppearance {
        length: ControlLength::Standard,
        glyph: Some(glyph),
        visible: true,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn record(state: HideState, expands_on_hide: bool) -> ControlItemRecord {
        ControlItemRecord {
            autosave_name: "Test".into(),
            position: None,
            is_visible: true,
            state,
            expands_on_hide,
        }
    }

    struct RecordingBackend {
        applied: Rc<RefCell<Vec<ControlAppearance>>>,
        frame: Option<Rect>,
    }

    impl StatusItemBackend for RecordingBackend {
        fn window_frame(&self) -> Option<Rect> {
            self.frame
        }

        fn window_id(&self) -> Option<WindowId> {
            Some(7)
        }

        fn apply(&mut self, appearance: &ControlAppearance) {
            self.applied.borrow_mut().push(*appearance);
        }
    }

    struct Factory {
        applied: Rc<RefCell<Vec<ControlAppearance>>>,
        frame: Option<Rect>,
    }

    impl StatusItemFactory for Factory {
        fn create(&self, _autosave_name: &str) -> Option<Box<dyn StatusItemBackend>> {
            Some(Box::new(RecordingBackend {
                applied: self.applied.clone(),
                frame: self.frame,
            }))
        }
    }

    struct FailingFactory;

    impl StatusItemFactory for FailingFactory {
        fn create(&self, _autosave_name: &str) -> Option<Box<dyn StatusItemBackend>> {
            None
        }
    }

    #[test]
    fn hidden_expanding_item_expands() {
        let a = appearance(1, &record_state(HideState::HideItems), true);
        assert_eq!(a.length, ControlLength::Expanded);
        assert_eq!(a.glyph, None);
    }

    #[test]
    fn leading_rank_shows_chevron() {
        let shown = appearance(0, &record_state(HideState::ShowItems), false);
        let hidden = appearance(0, &record_state(HideState::HideItems), false);

        assert_eq!(shown.glyph, Some(ControlGlyph::ChevronCollapse));
        assert_eq!(hidden.glyph, Some(ControlGlyph::ChevronExpand));
        let trailing = appearance(2, &record_state(HideState::ShowItems), true);
        assert_eq!(trailing.glyph, Some(ControlGlyph::Divider));
    }

    #[test]
    fn invisible_item_collapses() {
        let mut state = record_state(HideState::HideItems);
        state.is_visible = false;

        let a = appearance(1, &state, true);
        assert_eq!(a.length, ControlLength::Collapsed);
        assert!(!a.visible);
    }

    fn record_state(state: HideState) -> ControlItemState {
        ControlItemState {
            position: None,
            is_visible: true,
            state,
        }
    }

    #[test]
    fn mutations_rerender_backend() {
        let applied = Rc::new(RefCell::new(Vec::new()));
        let factory = Factory {
            applied: applied.clone(),
            frame: None,
        };
        let mut item = ControlItem::new(record(HideState::ShowItems, true), &factory);
        assert_eq!(applied.borrow().len(), 1);

        item.set_state(HideState::HideItems);
        let last = applied.borrow().last().map(|a| a.length);
        assert_eq!(last, Some(ControlLength::Expanded));

        // Writing the same state again is not a mutation.
        item.set_state(HideState::HideItems);
        assert_eq!(applied.borrow().len(), 2);
    }

    #[test]
    fn mutations_notify_subscribers() {
        let mut item = ControlItem::inert(record(HideState::ShowItems, false));
        let mut sub = item.subscribe();

        item.set_position(Some(420.0));

        assert!(sub.has_changed());
        assert_eq!(sub.latest().position, Some(420.0));
    }

    #[test]
    fn failed_status_item_leaves_item_inert() {
        let item = ControlItem::new(record(HideState::ShowItems, false), &FailingFactory);

        assert!(item.is_inert());
        assert_eq!(item.window_frame(), None);
        assert_eq!(item.window_id(), None);
    }

    #[test]
    fn refresh_position_adopts_frame_edge() {
        let factory = Factory {
            applied: Rc::new(RefCell::new(Vec::new())),
            frame: Some(Rect::new(812.0, 0.0, 14.0, 24.0)),
        };
        let mut item = ControlItem::new(record(HideState::ShowItems, false), &factory);

        assert!(item.refresh_position());
        assert_eq!(item.position(), Some(812.0));
        assert!(!item.refresh_position());
    }

    #[test]
    fn record_round_trips_state() {
        let mut item = ControlItem::inert(record(HideState::ShowItems, true));
        item.set_position(Some(10.5));
        item.set_state(HideState::HideItems);

        let rec = item.record();
        assert_eq!(rec.position, Some(10.5));
        assert_eq!(rec.state, HideState::HideItems);
        assert!(rec.expands_on_hide);
    }
}
