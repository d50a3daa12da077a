//! Platform glue
//!
//! The browser build wires sessions to a canvas, the keyboard and `<audio>`
//! elements. Native builds run headless from `main.rs` and need nothing here
//! beyond logging setup.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Install the native logger. `verbose` lowers the default level to debug;
/// `RUST_LOG` still takes precedence.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(verbose: bool) {
    use env_logger::{Builder, Env};
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    // Already initialised (tests, repeated runs) is fine
    let _ = Builder::from_env(env).try_init();
}
