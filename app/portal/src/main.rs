//! termappchooser - xdg-desktop-portal backend for AppChooser and OpenURI.
//!
//! Without arguments the binary serves the portal on the session bus; see
//! `termappchooser --help` for the inspection commands.

#[cfg(not(target_os = "linux"))]
compile_error!("This application only supports Linux.");

fn main() {
    if let Err(err) = termappchooser_lib::cli::run() {
        eprintln!("termappchooser: {err}");
        std::process::exit(1);
    }
}
