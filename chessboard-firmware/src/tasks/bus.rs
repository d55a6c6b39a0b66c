//! I2C target task
//!
//! Serves the register file to the bus master. A write selects a register
//! (the first data byte is the register address, any further bytes are
//! ignored); each byte the master then reads is one data request.

use defmt::*;
use embassy_rp::i2c_slave::{Command, Error, I2cSlave, ReadStatus};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use chessboard_core::RegisterFile;
use chessboard_protocol::TargetEvent;

/// Longest write we buffer; only the first byte is used
const WRITE_BUF_SIZE: usize = 8;

/// Bus task - answers register reads from the controller
#[embassy_executor::task]
pub async fn bus_task(
    mut device: I2cSlave<'static, I2C0>,
    mut regs: RegisterFile<'static, CriticalSectionRawMutex>,
) {
    info!("Bus task started");

    let mut buf = [0u8; WRITE_BUF_SIZE];

    loop {
        match device.listen(&mut buf).await {
            Ok(Command::Write(len)) => {
                select_register(&mut regs, &buf[..len]);
            }
            Ok(Command::WriteRead(len)) => {
                select_register(&mut regs, &buf[..len]);
                respond(&mut device, &mut regs).await;
            }
            Ok(Command::Read) => {
                respond(&mut device, &mut regs).await;
            }
            Ok(Command::GeneralCall(_)) => {
                trace!("General call ignored");
            }
            Err(Error::PartialWrite(len)) => {
                // The buffer still holds the leading bytes, register first
                debug!("Long write ({} bytes) truncated", len);
                select_register(&mut regs, &buf);
            }
            Err(e) => {
                warn!("I2C listen error: {:?}", e);
            }
        }
    }
}

/// Turn a master write into an address select
fn select_register(regs: &mut RegisterFile<'static, CriticalSectionRawMutex>, data: &[u8]) {
    regs.write(data);
    trace!("Select register {=u8:#x}", regs.pointer());
}

/// Answer a read, one data request per byte the master clocks out
async fn respond(
    device: &mut I2cSlave<'static, I2C0>,
    regs: &mut RegisterFile<'static, CriticalSectionRawMutex>,
) {
    loop {
        let byte = regs.handle(TargetEvent::DataRequest).unwrap_or(0);
        match device.respond_to_read(&[byte]).await {
            Ok(ReadStatus::NeedMoreBytes) => continue,
            Ok(ReadStatus::Done) => break,
            Ok(ReadStatus::LeftoverBytes(_)) => {
                // The master stopped before this byte went out
                regs.unread(byte);
                break;
            }
            Err(e) => {
                warn!("I2C respond error: {:?}", e);
                break;
            }
        }
    }
}
