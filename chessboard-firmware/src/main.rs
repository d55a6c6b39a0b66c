//! Chessboard - Occupancy Sensing Firmware
//!
//! Main firmware binary for RP2040-based sensor boards. Scans an 8x8
//! board, debounces and orients the reading, and serves it to a
//! controller as an I2C register file.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::i2c::InterruptHandler as I2cInterruptHandler;
use embassy_rp::i2c_slave::{Config as I2cSlaveConfig, I2cSlave};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use chessboard_core::config::parse_config;
use chessboard_core::{
    BoardConfig, ChangePublisher, Pipeline, RegisterFile, SensorConfig, StabilityFilter,
};
use chessboard_hal_rp2040::pins;

use crate::channels::{SIMULATED, SNAPSHOT};
use crate::sensors::{BoardSensor, SensorResources};

/// Embedded board configuration (compiled into firmware)
/// Edit board.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../board.toml");

mod channels;
mod sensors;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

// Runs the bus task above thread mode so a controller read preempts a scan
static EXECUTOR_BUS: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_BUS.on_interrupt()
}

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Chessboard firmware starting...");

    let p = embassy_rp::init(Default::default());
    let (bank, analog, fixed) = pins::split(p);
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Config: sensor={}, address={=u8:#x}, pointer={}, orientation={}, flip_stage={}, filter={}",
        config.sensor.name(),
        config.bus.address,
        config.bus.pointer_mode,
        config.orientation,
        config.flip_stage,
        config.filter_policy()
    );

    // Serial console (115200 baud default)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 64]);
    let uart = Uart::new_blocking(fixed.uart0, fixed.tx, fixed.rx, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for the console");

    // Sensor, falling back to the simulated board if the wiring is unusable
    let resources = SensorResources {
        pins: bank,
        analog,
        adc: Some(fixed.adc),
    };
    let (config, sensor) = match sensors::build(&config, resources, &SIMULATED) {
        Ok(sensor) => (config, sensor),
        Err(e) => {
            error!("Failed to set up {} sensor: {:?}", config.sensor.name(), e);
            error!("Falling back to the simulated board");
            let config = BoardConfig {
                sensor: SensorConfig::Simulated,
                ..config
            };
            (config, BoardSensor::Simulated(&SIMULATED))
        }
    };
    info!("Sensor initialized");
    info!("Initial board\n{}", Display2Format(&SNAPSHOT.load().board));

    let pipeline = Pipeline::new(
        sensor,
        StabilityFilter::new(config.filter_policy()),
        config.transform_orientation(),
        ChangePublisher::new(&SNAPSHOT),
    );

    // I2C target on GPIO20 (SDA) / GPIO21 (SCL)
    let mut i2c_config = I2cSlaveConfig::default();
    i2c_config.addr = u16::from(config.bus.address);
    let device = I2cSlave::new(fixed.i2c0, fixed.scl, fixed.sda, Irqs, i2c_config);
    let regs = RegisterFile::new(&SNAPSHOT, config.bus.pointer_mode);
    info!("I2C target listening at {=u8:#x}", config.bus.address);

    // Spawn tasks
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let bus_spawner = EXECUTOR_BUS.start(interrupt::SWI_IRQ_1);
    bus_spawner.spawn(tasks::bus_task(device, regs)).unwrap();

    spawner.spawn(tasks::scan_task(pipeline)).unwrap();
    spawner
        .spawn(tasks::console_task(tx, rx, config.is_simulated()))
        .unwrap();

    info!("All tasks spawned, firmware running");
}

/// Parse the embedded board.toml
///
/// build.rs runs this same parser on board.toml and fails the build on an
/// error, so the fallback is not reached for a file that built.
fn load_config() -> BoardConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using the reference configuration");
            BoardConfig::default()
        }
    }
}
