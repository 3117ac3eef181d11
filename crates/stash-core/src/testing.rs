//! In-memory platform doubles shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use image::RgbaImage;

use crate::error::{CaptureError, EventError, PlatformError};
use crate::platform::{
    ControlAppearance, CursorControl, EventInjector, MAIN_MENU_LAYER, MENU_BAR_TITLE, MouseEvent,
    MouseEventKind, STATUS_ITEM_LAYER, StatusItemBackend, StatusItemFactory, WINDOW_SERVER_OWNER,
    WindowCapture, WindowId, WindowInfo, WindowSource,
};
use crate::rect::{Point, Rect};

pub const OWN_PID: i32 = 1;
pub const MENU_BAR_HEIGHT: f64 = 24.0;

pub fn menu_bar_window() -> WindowInfo {
    WindowInfo {
        id: 1,
        owner_pid: 90,
        owner_name: Some(WINDOW_SERVER_OWNER.into()),
        bundle_id: None,
        title: Some(MENU_BAR_TITLE.into()),
        layer: MAIN_MENU_LAYER,
        frame: Rect::new(0.0, 0.0, 1512.0, MENU_BAR_HEIGHT),
        is_on_screen: true,
    }
}

/// A third-party status item window.
pub fn status_window(id: WindowId, bundle: &str, title: &str, x: f64, width: f64) -> WindowInfo {
    WindowInfo {
        id,
        owner_pid: 1000 + id as i32,
        owner_name: bundle.rsplit('.').next().map(str::to_string),
        bundle_id: Some(bundle.into()),
        title: Some(title.into()),
        layer: STATUS_ITEM_LAYER,
        frame: Rect::new(x, 0.0, width, MENU_BAR_HEIGHT),
        is_on_screen: true,
    }
}

/// The window of one of our own markers.
pub fn marker_window(id: WindowId, x: f64) -> WindowInfo {
    WindowInfo {
        id,
        owner_pid: OWN_PID,
        owner_name: Some("Stash".into()),
        bundle_id: None,
        title: None,
        layer: STATUS_ITEM_LAYER,
        frame: Rect::new(x, 0.0, 14.0, MENU_BAR_HEIGHT),
        is_on_screen: true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorCall {
    Hide,
    Show,
    Warp(Point),
}

/// Scriptable window server.
pub struct MockPlatform {
    pub windows: RefCell<Vec<WindowInfo>>,
    pub captures: Cell<usize>,
    /// Windows whose capture never completes.
    pub stalled: RefCell<Vec<WindowId>>,
    /// Every event the engine tried to post, including failed ones.
    pub events: RefCell<Vec<MouseEvent>>,
    pub failing_event: Cell<Option<MouseEventKind>>,
    /// Windows listed off screen until the next settle.
    pub pending_reveal: RefCell<Vec<WindowId>>,
    pub settles: RefCell<Vec<Duration>>,
    pub cursor: Cell<Option<Point>>,
    pub cursor_calls: RefCell<Vec<CursorCall>>,
    pub screen: Rect,
}

impl MockPlatform {
    pub fn new(windows: Vec<WindowInfo>) -> Self {
        Self {
            windows: RefCell::new(windows),
            captures: Cell::new(0),
            stalled: RefCell::new(Vec::new()),
            events: RefCell::new(Vec::new()),
            failing_event: Cell::new(None),
            pending_reveal: RefCell::new(Vec::new()),
            settles: RefCell::new(Vec::new()),
            cursor: Cell::new(Some(Point::new(700.0, 400.0))),
            cursor_calls: RefCell::new(Vec::new()),
            screen: Rect::new(0.0, 0.0, 1512.0, 982.0),
        }
    }

    pub fn event_kinds(&self) -> Vec<MouseEventKind> {
        self.events.borrow().iter().map(|e| e.kind).collect()
    }

    pub fn move_window(&self, id: WindowId, x: f64) {
        if let Some(w) = self.windows.borrow_mut().iter_mut().find(|w| w.id == id) {
            w.frame.x = x;
        }
    }
}

impl WindowSource for MockPlatform {
    async fn on_screen_windows(&self) -> Result<Vec<WindowInfo>, PlatformError> {
        Ok(self.windows.borrow().clone())
    }

    async fn window(&self, id: WindowId) -> Result<Option<WindowInfo>, PlatformError> {
        Ok(self.windows.borrow().iter().find(|w| w.id == id).cloned())
    }

    fn own_pid(&self) -> i32 {
        OWN_PID
    }

    async fn settle(&self, delay: Duration) {
        self.settles.borrow_mut().push(delay);
        tokio::time::sleep(delay).await;
        let revealed = self.pending_reveal.take();
        for window in self.windows.borrow_mut().iter_mut() {
            if revealed.contains(&window.id) {
                window.is_on_screen = true;
            }
        }
    }
}

impl WindowCapture for MockPlatform {
    async fn capture(&self, id: WindowId, _timeout: Duration) -> Result<RgbaImage, CaptureError> {
        self.captures.set(self.captures.get() + 1);
        let stalled = self.stalled.borrow().contains(&id);
        if stalled {
            std::future::pending::<()>().await;
        }
        Ok(RgbaImage::new(2, 2))
    }
}

impl EventInjector for MockPlatform {
    fn post(&self, event: MouseEvent) -> Result<(), EventError> {
        self.events.borrow_mut().push(event);
        if self.failing_event.get() == Some(event.kind) {
            return Err(EventError::Post(event.kind.as_str()));
        }
        Ok(())
    }
}

impl CursorControl for MockPlatform {
    fn cursor_location(&self) -> Option<Point> {
        self.cursor.get()
    }

    fn screen_containing(&self, point: Point) -> Option<Rect> {
        self.screen.contains(point).then_some(self.screen)
    }

    fn hide_cursor(&self) {
        self.cursor_calls.borrow_mut().push(CursorCall::Hide);
    }

    fn show_cursor(&self) {
        self.cursor_calls.borrow_mut().push(CursorCall::Show);
    }

    fn warp_cursor(&self, point: Point) {
        self.cursor_calls.borrow_mut().push(CursorCall::Warp(point));
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockStatusItem {
    pub id: WindowId,
    pub frame: Option<Rect>,
    pub appearance: Option<ControlAppearance>,
}

/// Status item factory whose items can be positioned from the test.
pub struct MockStatusItems {
    items: Rc<RefCell<HashMap<String, MockStatusItem>>>,
    next_id: Cell<WindowId>,
}

impl MockStatusItems {
    pub fn new() -> Self {
        Self {
            items: Rc::default(),
            next_id: Cell::new(9000),
        }
    }

    pub fn get(&self, autosave_name: &str) -> Option<MockStatusItem> {
        self.items.borrow().get(autosave_name).cloned()
    }

    pub fn window_id(&self, autosave_name: &str) -> Option<WindowId> {
        self.get(autosave_name).map(|i| i.id)
    }

    pub fn set_frame(&self, autosave_name: &str, frame: Option<Rect>) {
        if let Some(item) = self.items.borrow_mut().get_mut(autosave_name) {
            item.frame = frame;
        }
    }
}

impl StatusItemFactory for MockStatusItems {
    fn create(&self, autosave_name: &str) -> Option<Box<dyn StatusItemBackend>> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.items.borrow_mut().insert(
            autosave_name.to_string(),
            MockStatusItem {
                id,
                ..Default::default()
            },
        );
        Some(Box::new(MockBackend {
            autosave_name: autosave_name.to_string(),
            items: Rc::clone(&self.items),
        }))
    }
}

struct MockBackend {
    autosave_name: String,
    items: Rc<RefCell<HashMap<String, MockStatusItem>>>,
}

impl StatusItemBackend for MockBackend {
    fn window_frame(&self) -> Option<Rect> {
        self.items.borrow().get(&self.autosave_name).and_then(|i| i.frame)
    }

    fn window_id(&self) -> Option<WindowId> {
        self.items.borrow().get(&self.autosave_name).map(|i| i.id)
    }

    fn apply(&mut self, appearance: &ControlAppearance) {
        if let Some(item) = self.items.borrow_mut().get_mut(&self.autosave_name) {
            item.appearance = Some(*appearance);
        }
    }
}
