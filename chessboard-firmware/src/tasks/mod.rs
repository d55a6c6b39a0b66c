//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! `channels`.

pub mod bus;
pub mod console;
pub mod scan;

pub use bus::bus_task;
pub use console::console_task;
pub use scan::{scan_task, ScanPipeline};
