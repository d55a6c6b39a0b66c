//! Scan task
//!
//! Runs the acquisition pipeline back to back. Each pass samples the
//! sensor, feeds the stability filter, and publishes a new snapshot when
//! the committed board changes.

use defmt::*;
use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Instant;

use chessboard_core::Pipeline;

use crate::channels::BOARD_UPDATE;
use crate::sensors::BoardSensor;

/// The pipeline as wired in the firmware
pub type ScanPipeline = Pipeline<'static, BoardSensor, CriticalSectionRawMutex>;

/// Scan task - polls the sensor continuously
#[embassy_executor::task]
pub async fn scan_task(mut pipeline: ScanPipeline) {
    info!("Scan task started");

    loop {
        // Wrapping millisecond clock; the filter only looks at differences
        let now_ms = Instant::now().as_millis() as u32;

        if let Some(board) = pipeline.poll(now_ms) {
            info!(
                "Board changed: {} pieces\n{}",
                board.count(),
                Display2Format(&board)
            );
            BOARD_UPDATE.signal(board);
        }

        // Let the console task in between passes
        yield_now().await;
    }
}
