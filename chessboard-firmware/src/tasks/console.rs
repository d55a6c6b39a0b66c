//! Serial console task
//!
//! Prints the board at boot and every published board after it on UART0
//! and, with the simulated sensor,
//! takes toggle commands: a square name such as `e2` followed by a newline
//! flips that square on the simulated board.

use core::fmt::Write as _;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};
use heapless::String;

use chessboard_core::{parse_toggle_command, Bitboard};

use crate::channels::{BOARD_UPDATE, SIMULATED, SNAPSHOT};

/// Longest accepted command line
const LINE_LEN: usize = 16;

/// Room for one rendered board
const RENDER_LEN: usize = 256;

/// Console task - board printout and simulated-board input
#[embassy_executor::task]
pub async fn console_task(mut tx: BufferedUartTx, mut rx: BufferedUartRx, simulated: bool) {
    info!("Console task started");
    print_board(&mut tx, SNAPSHOT.load().board).await;

    let mut line: String<LINE_LEN> = String::new();
    let mut overflow = false;
    let mut byte = [0u8; 1];

    loop {
        match select(rx.read(&mut byte), BOARD_UPDATE.wait()).await {
            Either::First(Ok(n)) if n > 0 => match byte[0] {
                b'\r' | b'\n' => {
                    if !overflow && !line.is_empty() {
                        handle_line(&line, simulated);
                    }
                    line.clear();
                    overflow = false;
                }
                c => {
                    if line.push(c as char).is_err() {
                        overflow = true;
                    }
                }
            },
            Either::First(Ok(_)) => {}
            Either::First(Err(e)) => {
                warn!("UART read error: {:?}", e);
            }
            Either::Second(board) => {
                print_board(&mut tx, board).await;
            }
        }
    }
}

fn handle_line(line: &str, simulated: bool) {
    let Some(square) = parse_toggle_command(line) else {
        warn!("Unknown command: {}", line);
        return;
    };

    if !simulated {
        warn!("Toggle {} ignored: a real sensor is fitted", Display2Format(&square));
        return;
    }

    let occupied = SIMULATED.toggle(square);
    info!(
        "Toggled {}: {}",
        Display2Format(&square),
        if occupied { "occupied" } else { "empty" }
    );
}

async fn print_board(tx: &mut BufferedUartTx, board: Bitboard) {
    let mut out: String<RENDER_LEN> = String::new();
    if write!(out, "{}\r\n\r\n", board).is_err() {
        warn!("Board render truncated");
    }
    if let Err(e) = tx.write_all(out.as_bytes()).await {
        warn!("UART write error: {:?}", e);
    }
}
