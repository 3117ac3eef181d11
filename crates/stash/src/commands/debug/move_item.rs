use clap::Args;

/// Arguments for the `debug move` subcommand.
#[derive(Args)]
pub struct MoveArgs {
    /// Window id of the item (see `stash debug list`)
    #[arg(long)]
    id: u32,
    /// Target X position of the item's leading edge, in points
    #[arg(long, allow_negative_numbers = true)]
    x: f64,
}

#[cfg(target_os = "macos")]
pub fn execute(args: &MoveArgs) {
    use std::time::Duration;

    use stash_core::config;

    use crate::commands::session::Session;

    let config = config::load();
    let _log = stash_core::log::init(&config.logging);
    let (id, to_x) = (args.id, args.x);

    crate::commands::block_on(async move {
        let mut session = Session::start(&config)?;
        session.settle().await;
        session
            .items
            .update_items(&mut session.menu_bar)
            .await
            .map_err(|e| e.to_string())?;

        let item = session
            .items
            .item(id)
            .ok_or_else(|| format!("no menu bar item with window id {id}"))?;

        println!(
            "Moving {} (window {id}) from x={:.1} to x={to_x:.1}",
            item.display_name(),
            item.frame().x
        );
        session
            .items
            .move_item(&item, to_x)
            .await
            .map_err(|e| format!("failed to move item: {e}"))?;

        // Give the menu bar a moment to lay itself out again.
        tokio::time::sleep(Duration::from_millis(200)).await;
        session.items.invalidate();
        session
            .items
            .update_items(&mut session.menu_bar)
            .await
            .map_err(|e| e.to_string())?;

        match session.items.item(id) {
            Some(moved) => println!("Done. {} is now at x={:.1}", moved.display_name(), moved.frame().x),
            None => println!("Done. The item is no longer on screen."),
        }
        Ok(())
    });
}

#[cfg(not(target_os = "macos"))]
pub fn execute(_args: &MoveArgs) {
    crate::commands::unsupported();
}
