#[cfg(target_os = "macos")]
use std::time::Duration;

#[cfg(target_os = "macos")]
use stash_core::config::{self, Config};
#[cfg(target_os = "macos")]
use stash_core::debounce::{self, Debouncer};
#[cfg(target_os = "macos")]
use tokio::time::{Instant, MissedTickBehavior};

#[cfg(target_os = "macos")]
use super::session::Session;

/// AppKit event pump cadence.
#[cfg(target_os = "macos")]
const PUMP_INTERVAL: Duration = Duration::from_millis(50);

/// Quiet period after a control item change before markers are
/// reassigned to sections.
#[cfg(target_os = "macos")]
const REORDER_DELAY: Duration = Duration::from_millis(100);

/// Quiet period after a control item change before state is saved.
#[cfg(target_os = "macos")]
const SAVE_DELAY: Duration = Duration::from_millis(500);

/// Runs the menu bar manager until Ctrl+C.
#[cfg(target_os = "macos")]
pub fn execute() {
    let config = config::load();
    let _log = stash_core::log::init(&config.logging);
    super::block_on(daemon(config));
}

#[cfg(not(target_os = "macos"))]
pub fn execute() {
    super::unsupported();
}

#[cfg(target_os = "macos")]
async fn daemon(config: Config) -> Result<(), String> {
    let mut session = Session::start(&config)?;
    session.settle().await;
    session.items.start_observing();

    let mut changes = session.menu_bar.subscribe();
    let mut reorder = Debouncer::new(REORDER_DELAY);
    let mut save = Debouncer::new(SAVE_DELAY);
    let mut pump = tokio::time::interval(PUMP_INTERVAL);
    pump.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("Stash is running. Press Ctrl+C to stop.");
    tracing::info!(
        "Stash started (poll every {:?}, always-hidden {})",
        config.polling.interval(),
        if session.menu_bar.is_always_hidden_enabled() { "on" } else { "off" }
    );

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,

            () = session.items.next_tick() => {
                let polled = session.items.update_items(&mut session.menu_bar).await;
                if polled.is_ok() && session.menu_bar.reorder_control_items() {
                    session.items.invalidate();
                }
            }

            alive = changes.changed() => {
                if alive {
                    let now = Instant::now();
                    reorder.mark(now);
                    save.mark(now);
                } else {
                    changes = session.menu_bar.subscribe();
                }
            }

            () = debounce::sleep_until(reorder.deadline()) => {
                if reorder.take_due(Instant::now()) && session.menu_bar.reorder_control_items() {
                    session.items.invalidate();
                }
            }

            () = debounce::sleep_until(save.deadline()) => {
                if save.take_due(Instant::now()) {
                    session.save();
                }
            }

            () = debounce::sleep_until(session.menu_bar.rehide_deadline()) => {
                session.menu_bar.rehide_if_due(Instant::now());
            }

            _ = pump.tick() => session.pump(),
        }
    }

    tracing::info!("Stopping Stash");
    session.items.stop_observing();
    session.shutdown();
    println!("Stash stopped.");
    Ok(())
}
