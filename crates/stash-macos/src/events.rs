use core_graphics::event::{CGEvent, CGEventFlags, CGEventTapLocation, CGEventType, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use stash_core::error::EventError;
use stash_core::platform::{ModifierFlags, MouseButton, MouseEvent, MouseEventKind};

/// Posts a mouse event into the HID event stream.
pub fn post(event: MouseEvent) -> Result<(), EventError> {
    let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
        .map_err(|()| EventError::Source)?;
    let location = CGPoint::new(event.location.x, event.location.y);
    let cg_event = CGEvent::new_mouse_event(
        source,
        event_type(event.kind, event.button),
        location,
        mouse_button(event.button),
    )
    .map_err(|()| EventError::Create(event.kind.as_str()))?;

    cg_event.set_flags(flags(event.modifiers));
    cg_event.post(CGEventTapLocation::HID);
    tracing::trace!(
        "Posted {} at ({}, {})",
        event.kind.as_str(),
        event.location.x,
        event.location.y
    );
    Ok(())
}

fn event_type(kind: MouseEventKind, button: MouseButton) -> CGEventType {
    match (kind, button) {
        (MouseEventKind::Down, MouseButton::Left) => CGEventType::LeftMouseDown,
        (MouseEventKind::Dragged, MouseButton::Left) => CGEventType::LeftMouseDragged,
        (MouseEventKind::Up, MouseButton::Left) => CGEventType::LeftMouseUp,
        (MouseEventKind::Down, MouseButton::Right) => CGEventType::RightMouseDown,
        (MouseEventKind::Dragged, MouseButton::Right) => CGEventType::RightMouseDragged,
        (MouseEventKind::Up, MouseButton::Right) => CGEventType::RightMouseUp,
    }
}

fn mouse_button(button: MouseButton) -> CGMouseButton {
    match button {
        MouseButton::Left => CGMouseButton::Left,
        MouseButton::Right => CGMouseButton::Right,
    }
}

fn flags(modifiers: ModifierFlags) -> CGEventFlags {
    let mut flags = CGEventFlags::CGEventFlagNull;
    for (modifier, flag) in [
        (ModifierFlags::SHIFT, CGEventFlags::CGEventFlagShift),
        (ModifierFlags::CONTROL, CGEventFlags::CGEventFlagControl),
        (ModifierFlags::OPTION, CGEventFlags::CGEventFlagAlternate),
        (ModifierFlags::COMMAND, CGEventFlags::CGEventFlagCommand),
    ] {
        if modifiers.contains(modifier) {
            flags |= flag;
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_drag_sets_only_command_flag() {
        let f = flags(ModifierFlags::COMMAND);

        assert!(f.contains(CGEventFlags::CGEventFlagCommand));
        assert!(!f.contains(CGEventFlags::CGEventFlagShift));
    }

    #[test]
    fn drag_maps_to_left_dragged() {
        assert_eq!(
            event_type(MouseEventKind::Dragged, MouseButton::Left) as u32,
            CGEventType::LeftMouseDragged as u32
        );
    }
}
