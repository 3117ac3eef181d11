//! Observation, classification and relocation of other processes'
//! status items.
//!
//! The engine never owns the items it manages. Every poll rebuilds the
//! picture from the live window list, and every move is a best-effort
//! synthetic drag whose outcome only the next poll can confirm.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use futures::future::join_all;
use image::RgbaImage;
use tokio::time::{Interval, MissedTickBehavior};

use crate::classify::{self, ClassifiedItems, SectionMarkers};
use crate::config::{DragConfig, PollingConfig};
use crate::error::{CaptureError, ItemError};
use crate::item::MenuBarItem;
use crate::menu_bar::MenuBarManager;
use crate::observe::{Published, Subscription};
use crate::platform::{
    CursorControl, ModifierFlags, MouseButton, MouseEvent, MouseEventKind, Platform, WindowCapture,
    WindowId, WindowInfo,
};
use crate::rect::Point;
use crate::section::SectionName;

/// Items closer than this to the requested X are already in place.
const POSITION_TOLERANCE: f64 = 0.5;

/// Watches the menu bar and moves items within it.
pub struct MenuBarItemManager<P> {
    platform: P,
    polling: PollingConfig,
    drag: DragConfig,
    items: Published<Vec<MenuBarItem>>,
    classified: Published<ClassifiedItems>,
    markers: SectionMarkers,
    always_hidden_enabled: bool,
    /// Change detector of the last window set that was captured.
    fingerprint: Option<u64>,
    timer: Option<Interval>,
}

impl<P: Platform> MenuBarItemManager<P> {
    pub fn new(platform: P, polling: PollingConfig, drag: DragConfig) -> Self {
        Self {
            platform,
            polling,
            drag,
            items: Published::default(),
            classified: Published::default(),
            markers: SectionMarkers::default(),
            always_hidden_enabled: true,
            fingerprint: None,
            timer: None,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    // -- published snapshots --

    /// All captured items, left to right.
    pub fn items(&self) -> Vec<MenuBarItem> {
        self.items.get()
    }

    pub fn visible_items(&self) -> Vec<MenuBarItem> {
        self.classified.with(|c| c.visible.clone())
    }

    pub fn hidden_items(&self) -> Vec<MenuBarItem> {
        self.classified.with(|c| c.hidden.clone())
    }

    pub fn always_hidden_items(&self) -> Vec<MenuBarItem> {
        self.classified.with(|c| c.always_hidden.clone())
    }

    pub fn classified(&self) -> ClassifiedItems {
        self.classified.get()
    }

    /// Finds a captured item by window id.
    pub fn item(&self, id: WindowId) -> Option<MenuBarItem> {
        self.items
            .with(|items| items.iter().find(|i| i.window_id() == id).cloned())
    }

    pub fn markers(&self) -> SectionMarkers {
        self.markers
    }

    pub fn subscribe_items(&self) -> Subscription<Vec<MenuBarItem>> {
        self.items.subscribe()
    }

    pub fn subscribe_classified(&self) -> Subscription<ClassifiedItems> {
        self.classified.subscribe()
    }

    // -- observation --

    /// Starts the poll timer. The first tick fires immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_observing(&mut self) {
        let mut timer = tokio::time::interval(self.polling.interval());
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.timer = Some(timer);
        tracing::debug!("Observing menu bar every {:?}", self.polling.interval());
    }

    /// Stops the poll timer. A poll already running completes normally.
    pub fn stop_observing(&mut self) {
        if self.timer.take().is_some() {
            tracing::debug!("Stopped observing menu bar");
        }
    }

    pub fn is_observing(&self) -> bool {
        self.timer.is_some()
    }

    /// Waits for the next poll tick; never resolves while not observing.
    ///
    /// Ticks missed while a poll was running are skipped rather than
    /// queued, so polls never pile up behind a slow one.
    pub async fn next_tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending().await,
        }
    }

    /// Forces the next poll to recapture even if the window set looks
    /// unchanged.
    pub fn invalidate(&mut self) {
        self.fingerprint = None;
    }

    /// Recomputes the section buckets, e.g. after the always-hidden
    /// section was enabled or disabled.
    pub fn reclassify(&mut self, always_hidden_enabled: bool) {
        self.always_hidden_enabled = always_hidden_enabled;
        let classified = self
            .items
            .with(|items| classify::classify(items, &self.markers, always_hidden_enabled));
        self.classified.set(classified);
    }

    /// Runs one poll cycle.
    ///
    /// Every section is revealed for the duration of the poll (hidden
    /// items have no capturable window) and put back afterwards, whether
    /// or not the poll succeeded. Returns whether the item list was
    /// recaptured.
    pub async fn update_items(&mut self, menu_bar: &mut MenuBarManager) -> Result<bool, ItemError> {
        let saved = menu_bar.states();
        menu_bar.show_all();
        let result = self.poll(menu_bar).await;
        menu_bar.restore_states(saved);
        if let Err(e) = &result {
            tracing::warn!("Menu bar poll failed: {e}");
        }
        result
    }

    async fn poll(&mut self, menu_bar: &mut MenuBarManager) -> Result<bool, ItemError> {
        self.platform.settle(self.polling.settle_delay()).await;
        menu_bar.refresh_positions();

        let windows = self.status_windows().await?;
        let fingerprint = fingerprint(&windows);
        if self.fingerprint == Some(fingerprint) {
            tracing::trace!("Menu bar unchanged ({} windows)", windows.len());
            return Ok(false);
        }

        let own_pid = self.platform.own_pid();
        let own_windows = menu_bar.control_item_window_ids();
        let candidates: Vec<WindowInfo> = windows
            .iter()
            .filter(|w| w.is_on_screen && w.owner_pid != own_pid && !own_windows.contains(&w.id))
            .cloned()
            .collect();

        let timeout = self.polling.capture_timeout();
        let platform = &self.platform;
        let captures = join_all(candidates.into_iter().map(|window| async move {
            let image = capture(platform, window.id, timeout).await;
            (window, image)
        }))
        .await;

        let mut items: Vec<MenuBarItem> = captures
            .into_iter()
            .filter_map(|(window, image)| match image {
                Ok(image) => Some(MenuBarItem::new(window, Some(image))),
                Err(e) => {
                    tracing::warn!("Skipping status item: {e}");
                    None
                }
            })
            .collect();
        items.sort_by(|a, b| a.frame().min_x().total_cmp(&b.frame().min_x()));

        self.markers = SectionMarkers {
            hidden: marker_frame(menu_bar, SectionName::Hidden, &windows),
            always_hidden: marker_frame(menu_bar, SectionName::AlwaysHidden, &windows),
        };
        if self.markers.hidden.is_none() {
            tracing::debug!("Hidden marker not found; treating all items as visible");
        }

        tracing::debug!("Captured {} of {} status items", items.len(), windows.len());
        self.items.modify(|current| {
            *current = items;
            true
        });
        self.fingerprint = Some(fingerprint);
        self.reclassify(menu_bar.is_always_hidden_enabled());
        Ok(true)
    }

    /// Status item windows in the menu bar band, left to right.
    async fn status_windows(&self) -> Result<Vec<WindowInfo>, ItemError> {
        let windows = self.platform.on_screen_windows().await?;
        let menu_bar = windows
            .iter()
            .find(|w| w.is_menu_bar())
            .map(|w| w.frame)
            .ok_or(ItemError::NoMenuBarWindow)?;

        let mut status: Vec<WindowInfo> = windows
            .into_iter()
            .filter(|w| w.is_status_item() && w.frame.same_vertical_extent(&menu_bar))
            .collect();
        status.sort_by(|a, b| a.frame.min_x().total_cmp(&b.frame.min_x()));
        Ok(status)
    }

    // -- movement --

    /// Drags `item` so that its leading edge lands at `to_x`.
    ///
    /// The cursor is hidden and parked on the item for the duration and
    /// restored afterwards, however the move ends. Nothing confirms the
    /// final position; the next poll will show where the item went.
    pub async fn move_item(&self, item: &MenuBarItem, to_x: f64) -> Result<(), ItemError> {
        if !item.accepts_mouse_events() {
            return Err(ItemError::MacOSProhibited(item.display_name().to_string()));
        }

        let origin = self.platform.cursor_location().ok_or(ItemError::NoScreen)?;
        self.platform
            .screen_containing(origin)
            .ok_or(ItemError::NoScreen)?;

        let current = self
            .platform
            .window(item.window_id())
            .await?
            .ok_or(ItemError::NoCurrentWindow(item.window_id()))?;

        let frame = current.frame;
        if (frame.min_x() - to_x).abs() < POSITION_TOLERANCE {
            tracing::debug!("{} is already at x={to_x}", item.display_name());
            return Ok(());
        }

        let start = frame.center();
        let end = Point::new(to_x + (start.x - frame.min_x()), frame.mid_y());
        tracing::info!(
            "Moving {} from x={} to x={to_x}",
            item.display_name(),
            frame.min_x()
        );

        let _cursor = CursorGuard::acquire(&self.platform, origin, start);
        self.drag(start, end).await
    }

    async fn drag(&self, start: Point, end: Point) -> Result<(), ItemError> {
        let delay = self.drag.event_delay();

        self.post(MouseEventKind::Down, start)?;
        tokio::time::sleep(delay).await;

        // The button is down now; release it whatever happens next.
        let dragged = self.post(MouseEventKind::Dragged, end);
        tokio::time::sleep(delay).await;
        let up = self.post(MouseEventKind::Up, end);
        tokio::time::sleep(delay).await;

        dragged.and(up)
    }

    fn post(&self, kind: MouseEventKind, location: Point) -> Result<(), ItemError> {
        self.platform.post(MouseEvent {
            kind,
            location,
            button: MouseButton::Left,
            modifiers: ModifierFlags::COMMAND,
        })?;
        Ok(())
    }
}

/// Captures one window, giving up after `timeout`.
async fn capture<C: WindowCapture>(
    platform: &C,
    id: WindowId,
    timeout: Duration,
) -> Result<RgbaImage, CaptureError> {
    match tokio::time::timeout(timeout, platform.capture(id, timeout)).await {
        Ok(result) => result,
        Err(_) => Err(CaptureError::Timeout(id)),
    }
}

/// Frame of a section's marker, preferring the freshly listed window.
fn marker_frame(
    menu_bar: &MenuBarManager,
    name: SectionName,
    windows: &[WindowInfo],
) -> Option<crate::rect::Rect> {
    let control_item = menu_bar.section(name).control_item();
    if !control_item.is_visible() {
        return None;
    }
    control_item
        .window_id()
        .and_then(|id| windows.iter().find(|w| w.id == id))
        .map(|w| w.frame)
        .or_else(|| control_item.window_frame())
}

/// Cheap change detector over a window set.
fn fingerprint(windows: &[WindowInfo]) -> u64 {
    let mut hasher = DefaultHasher::new();
    windows.len().hash(&mut hasher);
    for w in windows {
        w.id.hash(&mut hasher);
        w.is_on_screen.hash(&mut hasher);
        w.frame.x.to_bits().hash(&mut hasher);
        w.frame.width.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

/// Hides the cursor and parks it while a drag runs.
///
/// Dropping the guard warps the cursor back to where the user left it and
/// shows it again.
struct CursorGuard<'a, C: CursorControl> {
    cursor: &'a C,
    origin: Point,
}

impl<'a, C: CursorControl> CursorGuard<'a, C> {
    fn acquire(cursor: &'a C, origin: Point, park_at: Point) -> Self {
        cursor.hide_cursor();
        cursor.warp_cursor(park_at);
        Self { cursor, origin }
    }
}

impl<C: CursorControl> Drop for CursorGuard<'_, C> {
    fn drop(&mut self) {
        self.cursor.warp_cursor(self.origin);
        self.cursor.show_cursor();
    }
}

#[cfg(test)]
#[path = "tests/item_manager_tests.rs"]
mod tests;
