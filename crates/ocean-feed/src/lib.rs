/*
[INPUT]:  Public API exports for ocean-feed crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod cli;
pub mod watch;

pub use cli::{Cli, Command, PairArgs};
pub use watch::{WatchOptions, watch_feed};
