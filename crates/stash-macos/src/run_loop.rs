use objc2_app_kit::{
    NSApplication, NSApplicationActivationPolicy, NSEventMask, NSEventModifierFlags, NSEventType,
};
use std::time::Duration;

use objc2_foundation::{MainThreadMarker, NSDate, NSDefaultRunLoopMode, NSRunLoop};
use stash_core::platform::WindowId;
use tokio::time::Instant;

/// Longest stretch the run loop is left alone while settling.
const SETTLE_STEP: Duration = Duration::from_millis(5);

/// A left click on one of our own status item windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlClick {
    pub window: WindowId,
    /// Option was held, which reveals the always-hidden section.
    pub option: bool,
}

/// Drains AppKit's event queue from inside the async daemon loop.
///
/// The daemon never hands the main thread to `NSApplication::run`;
/// instead it calls [`pump`](Self::pump) on a short timer so status items
/// stay responsive.
pub struct EventPump {
    mtm: MainThreadMarker,
}

impl EventPump {
    /// Sets the process up as a menu bar accessory (no Dock icon).
    pub fn new(mtm: MainThreadMarker) -> Self {
        let app = NSApplication::sharedApplication(mtm);
        app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);
        unsafe { app.finishLaunching() };
        Self { mtm }
    }

    /// Dispatches every pending event and reports clicks on
    /// `control_windows`.
    pub fn pump(&self, control_windows: &[WindowId]) -> Vec<ControlClick> {
        let app = NSApplication::sharedApplication(self.mtm);
        let mut clicks = Vec::new();
        loop {
            let event = unsafe {
                app.nextEventMatchingMask_untilDate_inMode_dequeue(
                    NSEventMask::Any,
                    None,
                    NSDefaultRunLoopMode,
                    true,
                )
            };
            let Some(event) = event else {
                break;
            };

            if unsafe { event.r#type() } == NSEventType::LeftMouseDown
                && let Some(window) = unsafe { event.window(self.mtm) }
                && let Ok(id) = u32::try_from(window.windowNumber())
                && control_windows.contains(&id)
            {
                let option = unsafe { event.modifierFlags() }.contains(NSEventModifierFlags::Option);
                clicks.push(ControlClick { window: id, option });
            }

            app.sendEvent(&event);
        }
        clicks
    }
}

/// Keeps the current run loop turning for `delay`.
///
/// Status item length changes are only committed to the window server
/// when the run loop turns. Input events are left queued for the next
/// [`EventPump::pump`].
pub async fn settle(delay: Duration) {
    let until = Instant::now() + delay;
    loop {
        turn();
        let now = Instant::now();
        if now >= until {
            break;
        }
        tokio::time::sleep((until - now).min(SETTLE_STEP)).await;
    }
}

/// Runs one non-blocking pass of the current run loop.
fn turn() {
    let run_loop = NSRunLoop::currentRunLoop();
    let past = NSDate::distantPast();
    unsafe { run_loop.runMode_beforeDate(NSDefaultRunLoopMode, &past) };
}
