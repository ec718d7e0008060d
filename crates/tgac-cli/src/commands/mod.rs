//! Command implementations for tgac-cli

pub mod locals;
pub mod scan;
pub mod watch;

pub use locals::run_locals;
pub use scan::run_scan;
pub use watch::run_watch;
