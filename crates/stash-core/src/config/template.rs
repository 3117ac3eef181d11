/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `stash init` to create a starter config file that
/// users can immediately edit.
pub fn generate_config() -> String {
    r##"# Stash configuration
# Location: ~/.config/stash/config.toml

[polling]
# Milliseconds between two scans of the menu bar items.
interval_ms = 5000
# Milliseconds to let the menu bar reflow after revealing all sections.
settle_ms = 10
# Milliseconds allowed for capturing a single item image.
capture_timeout_ms = 100

[drag]
# Milliseconds to wait after each synthetic mouse event when moving an item.
event_delay_ms = 20

[sections]
# Show a second marker whose items stay hidden until revealed explicitly.
always_hidden_enabled = true
# Hide the hidden section again some time after it was shown.
auto_rehide = false
# Seconds before an automatic rehide.
rehide_interval_secs = 15

# Hotkeys that toggle a section. Sections: "visible", "hidden", "always_hidden".
# Modifiers: "command", "option", "control", "shift".
# [[hotkeys]]
# section = "hidden"
# key = "H"
# modifiers = ["command", "shift"]

[logging]
# Enable file logging to ~/.config/stash/logs/stash.log.
enabled = false
# Minimum log level: "trace", "debug", "info", "warn", or "error".
level = "info"
# Maximum log file size in MB before rotation.
max_file_mb = 10
"##
    .to_string()
}
