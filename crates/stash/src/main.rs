mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stash",
    version,
    about = "A menu bar organizer for macOS"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Run the menu bar manager in the foreground
    Run,
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
}

#[derive(Subcommand)]
enum DebugCommands {
    /// List menu bar items and the section each one sits in
    List,
    /// Drag a menu bar item to a new position
    Move(commands::debug::move_item::MoveArgs),
    /// Show the saved section state
    Sections,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Run => commands::run::execute(),
        Commands::Debug { command } => match command {
            DebugCommands::List => commands::debug::list::execute(),
            DebugCommands::Move(args) => commands::debug::move_item::execute(&args),
            DebugCommands::Sections => commands::debug::sections::execute(),
        },
    }
}
