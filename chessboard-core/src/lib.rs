//! Board-agnostic core logic for the chessboard firmware
//!
//! This crate contains the acquisition and exposition pipeline, none of
//! which depends on a specific chip:
//!
//! - Bitboard model and square naming
//! - Sampler trait and scan-order bit assignment
//! - Stability filter (board-level debouncing)
//! - Orientation transform (rotation and flip)
//! - Shared snapshot and change publisher
//! - Register file server for the bus target
//! - Simulated board for bench testing without sensors
//! - Configuration types and the `board.toml` parser
//!
//! ```text
//! Sampler ─▶ StabilityFilter ─▶ Orientation ─▶ ChangePublisher
//!                                                   │
//!                                            SharedSnapshot
//!                                                   │
//!                      bus master ◀── RegisterFile ─┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod bitboard;
pub mod config;
pub mod debounce;
pub mod orientation;
pub mod pipeline;
pub mod registers;
pub mod simulated;
pub mod snapshot;
pub mod traits;

pub use bitboard::{Bitboard, BoardDiff, Square};
pub use config::{BoardConfig, SensorConfig};
pub use debounce::{FilterPolicy, StabilityFilter};
pub use orientation::{Orientation, Rotation};
pub use pipeline::Pipeline;
pub use registers::{PointerMode, RegisterFile};
pub use simulated::{parse_toggle_command, SimulatedBoard};
pub use snapshot::{ChangePublisher, SharedSnapshot, Snapshot};
pub use traits::{BoardSampler, ScanBuilder};
