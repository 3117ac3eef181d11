use core_graphics::display::CGDisplay;
use core_graphics::event::CGEvent;
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::{CGPoint, CGRect};
use stash_core::rect::{Point, Rect};

/// Current cursor location in global display coordinates.
pub fn location() -> Option<Point> {
    let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState).ok()?;
    let event = CGEvent::new(source).ok()?;
    let p = event.location();
    Some(Point::new(p.x, p.y))
}

/// Bounds of the active display that contains `point`.
pub fn display_containing(point: Point) -> Option<Rect> {
    let displays = CGDisplay::active_displays().ok()?;
    displays
        .into_iter()
        .map(|id| to_rect(CGDisplay::new(id).bounds()))
        .find(|bounds| bounds.contains(point))
}

pub fn hide() {
    if let Err(e) = CGDisplay::main().hide_cursor() {
        tracing::warn!("Could not hide cursor: error {e}");
    }
}

pub fn show() {
    if let Err(e) = CGDisplay::main().show_cursor() {
        tracing::warn!("Could not show cursor: error {e}");
    }
}

pub fn warp(point: Point) {
    if let Err(e) = CGDisplay::warp_mouse_cursor_position(CGPoint::new(point.x, point.y)) {
        tracing::warn!("Could not move cursor to ({}, {}): error {e}", point.x, point.y);
    }
}

fn to_rect(r: CGRect) -> Rect {
    Rect::new(r.origin.x, r.origin.y, r.size.width, r.size.height)
}
