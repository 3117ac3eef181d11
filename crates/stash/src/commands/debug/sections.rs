use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use stash_core::HideState;
use stash_core::config;
use stash_core::section::SectionRecord;

/// Prints the section state saved by `stash run`.
pub fn execute() {
    let Some(path) = config::sections_path() else {
        eprintln!("Error: could not determine home directory.");
        std::process::exit(1);
    };

    let data = match config::load_sections() {
        Ok(Some(data)) => data,
        Ok(None) => {
            println!("No saved sections at {}", path.display());
            return;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let records: Vec<SectionRecord> = match serde_json::from_slice(&data) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: {} is not valid section state: {e}", path.display());
            std::process::exit(1);
        }
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Section"),
            Cell::new("Control item"),
            Cell::new("State"),
            Cell::new("Position").set_alignment(CellAlignment::Right),
            Cell::new("Enabled"),
            Cell::new("Hotkey"),
        ]);

    for record in &records {
        let item = &record.control_item;
        let state = match item.state {
            HideState::ShowItems => "shown",
            HideState::HideItems => "hidden",
        };
        let position = item
            .position
            .map(|p| format!("{p:.1}"))
            .unwrap_or_else(|| "-".into());
        let hotkey = record
            .hotkey
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".into());

        table.add_row(vec![
            Cell::new(record.name),
            Cell::new(&item.autosave_name),
            Cell::new(state),
            Cell::new(position).set_alignment(CellAlignment::Right),
            Cell::new(if item.is_visible { "yes" } else { "no" }),
            Cell::new(hotkey),
        ]);
    }

    println!("{table}");
    println!("\n{} sections saved in {}", records.len(), path.display());
}
