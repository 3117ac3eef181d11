#[cfg(target_os = "macos")]
use comfy_table::presets::UTF8_FULL;
#[cfg(target_os = "macos")]
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

#[cfg(target_os = "macos")]
use stash_core::{ClassifiedItems, SectionName, config};

#[cfg(target_os = "macos")]
use crate::commands::session::Session;

#[cfg(target_os = "macos")]
pub fn execute() {
    let config = config::load();
    let _log = stash_core::log::init(&config.logging);

    crate::commands::block_on(async move {
        let mut session = Session::start(&config)?;
        session.settle().await;
        session
            .items
            .update_items(&mut session.menu_bar)
            .await
            .map_err(|e| e.to_string())?;
        print_items(&session.items.classified());
        Ok(())
    });
}

#[cfg(not(target_os = "macos"))]
pub fn execute() {
    crate::commands::unsupported();
}

#[cfg(target_os = "macos")]
fn print_items(items: &ClassifiedItems) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Window"),
            Cell::new("Item"),
            Cell::new("Section"),
            Cell::new("X").set_alignment(CellAlignment::Right),
            Cell::new("Width").set_alignment(CellAlignment::Right),
            Cell::new("Movable"),
        ]);

    for section in SectionName::ALL {
        for item in items.get(section) {
            let frame = item.frame();
            table.add_row(vec![
                Cell::new(item.window_id()),
                Cell::new(item.display_name()),
                Cell::new(section),
                Cell::new(format!("{:.1}", frame.x)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.1}", frame.width)).set_alignment(CellAlignment::Right),
                Cell::new(if item.accepts_mouse_events() { "yes" } else { "no" }),
            ]);
        }
    }

    println!("{table}");
    println!("\n{} items found", items.len());
}
