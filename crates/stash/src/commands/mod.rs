pub mod debug;
pub mod init;
pub mod run;

#[cfg(target_os = "macos")]
mod session;

/// Runs `task` on a single-threaded runtime, exiting on error.
///
/// Status items and the AppKit event queue belong to the main thread, so
/// everything runs on the thread that called `main`.
#[cfg(target_os = "macos")]
fn block_on(task: impl std::future::Future<Output = Result<(), String>>) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: could not start the async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(task) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(target_os = "macos"))]
fn unsupported() -> ! {
    eprintln!("Error: Stash manages the macOS menu bar and only runs on macOS.");
    std::process::exit(1);
}
