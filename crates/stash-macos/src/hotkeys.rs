use std::cell::RefCell;
use std::rc::Rc;

use core_foundation::runloop::{CFRunLoop, CFRunLoopSource, kCFRunLoopCommonModes};
use core_graphics::event::{
    CGEventFlags, CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement,
    CGEventType, EventField,
};
use stash_core::hotkey::{Hotkey, Modifier};

/// Listens for key presses system-wide and queues the ones that carry a
/// modifier.
///
/// The tap is serviced by the main run loop, so presses are delivered
/// while the event pump runs. Installing it needs the Input Monitoring
/// permission.
pub struct HotkeyTap {
    _tap: CGEventTap<'static>,
    _source: CFRunLoopSource,
    pressed: Rc<RefCell<Vec<Hotkey>>>,
}

impl HotkeyTap {
    pub fn install() -> Result<Self, String> {
        let pressed = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::clone(&pressed);

        let tap = CGEventTap::new(
            CGEventTapLocation::Session,
            CGEventTapPlacement::TailAppendEventTap,
            CGEventTapOptions::ListenOnly,
            vec![CGEventType::KeyDown],
            move |_proxy, _kind, event| {
                let code = event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE);
                if let Some(hotkey) = hotkey(code, event.get_flags()) {
                    queue.borrow_mut().push(hotkey);
                }
                None
            },
        )
        .map_err(|()| "could not create keyboard event tap (is Input Monitoring allowed?)")?;

        let source = tap
            .mach_port
            .create_runloop_source(0)
            .map_err(|()| "could not attach keyboard event tap")?;
        // SAFETY: kCFRunLoopCommonModes is an immutable CoreFoundation constant.
        CFRunLoop::get_current().add_source(&source, unsafe { kCFRunLoopCommonModes });
        tap.enable();

        tracing::debug!("Keyboard event tap installed");
        Ok(Self {
            _tap: tap,
            _source: source,
            pressed,
        })
    }

    /// Takes every hotkey pressed since the last call.
    pub fn drain(&self) -> Vec<Hotkey> {
        std::mem::take(&mut *self.pressed.borrow_mut())
    }
}

/// Turns a key press into a hotkey. Presses without a modifier are
/// ordinary typing and are ignored.
fn hotkey(code: i64, flags: CGEventFlags) -> Option<Hotkey> {
    let modifiers: Vec<Modifier> = [
        (CGEventFlags::CGEventFlagCommand, Modifier::Command),
        (CGEventFlags::CGEventFlagAlternate, Modifier::Option),
        (CGEventFlags::CGEventFlagControl, Modifier::Control),
        (CGEventFlags::CGEventFlagShift, Modifier::Shift),
    ]
    .into_iter()
    .filter(|(flag, _)| flags.contains(*flag))
    .map(|(_, m)| m)
    .collect();

    let only_shift = modifiers == [Modifier::Shift];
    if modifiers.is_empty() || only_shift {
        return None;
    }
    Some(Hotkey::new(key_name(code)?, &modifiers))
}

/// Name of an ANSI virtual key code.
fn key_name(code: i64) -> Option<&'static str> {
    Some(match code {
        0x00 => "A",
        0x0B => "B",
        0x08 => "C",
        0x02 => "D",
        0x0E => "E",
        0x03 => "F",
        0x05 => "G",
        0x04 => "H",
        0x22 => "I",
        0x26 => "J",
        0x28 => "K",
        0x25 => "L",
        0x2E => "M",
        0x2D => "N",
        0x1F => "O",
        0x23 => "P",
        0x0C => "Q",
        0x0F => "R",
        0x01 => "S",
        0x11 => "T",
        0x20 => "U",
        0x09 => "V",
        0x0D => "W",
        0x07 => "X",
        0x10 => "Y",
        0x06 => "Z",
        0x1D => "0",
        0x12 => "1",
        0x13 => "2",
        0x14 => "3",
        0x15 => "4",
        0x17 => "5",
        0x16 => "6",
        0x1A => "7",
        0x1C => "8",
        0x19 => "9",
        0x31 => "SPACE",
        0x7A => "F1",
        0x78 => "F2",
        0x63 => "F3",
        0x76 => "F4",
        0x60 => "F5",
        0x61 => "F6",
        0x62 => "F7",
        0x64 => "F8",
        0x65 => "F9",
        0x6D => "F10",
        0x67 => "F11",
        0x6F => "F12",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_h_is_a_hotkey() {
        let flags = CGEventFlags::CGEventFlagCommand | CGEventFlags::CGEventFlagShift;

        let hotkey = hotkey(0x04, flags);

        assert_eq!(
            hotkey,
            Some(Hotkey::new("h", &[Modifier::Shift, Modifier::Command]))
        );
    }

    #[test]
    fn plain_and_shifted_typing_is_ignored() {
        assert_eq!(hotkey(0x04, CGEventFlags::CGEventFlagNull), None);
        assert_eq!(hotkey(0x04, CGEventFlags::CGEventFlagShift), None);
    }

    #[test]
    fn unknown_key_codes_are_ignored() {
        assert_eq!(hotkey(0x7F, CGEventFlags::CGEventFlagCommand), None);
    }
}
