//! Sensor construction from the board configuration
//!
//! The sensor topology is chosen once at startup. [`BoardSensor`] wraps the
//! three scanners and the simulated board behind one concrete type so the
//! scan task is not generic over the wiring.

use embassy_rp::adc::{Adc, Config as AdcConfig};
use embassy_rp::peripherals::ADC;
use embassy_rp::Peri;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;
use static_cell::StaticCell;

use chessboard_core::config::{
    ColumnConfig, HallConfig, MatrixConfig, PinConfig, ShiftRegisterConfig,
};
use chessboard_core::{Bitboard, BoardConfig, BoardSampler, SensorConfig, SimulatedBoard};
use chessboard_drivers::sensor::ShiftRegisterPins;
use chessboard_drivers::{ColumnSense, HallScanner, MatrixScanner, ShiftRegisterScanner};
use chessboard_hal_rp2040::{
    AdcInput, AnalogBank, GpioInput, GpioOutput, OpenDrain, PinBank, PinError, SharedAdc,
};

static ADC_CELL: StaticCell<SharedAdc> = StaticCell::new();

/// The configured sensor
pub enum BoardSensor {
    ShiftRegister(ShiftRegisterScanner<GpioOutput, GpioInput, Delay>),
    Matrix(MatrixScanner<OpenDrain, GpioInput, AdcInput, Delay>),
    Hall(HallScanner<GpioOutput, AdcInput, Delay>),
    Simulated(&'static SimulatedBoard<CriticalSectionRawMutex>),
}

impl BoardSampler for BoardSensor {
    fn sample(&mut self) -> Bitboard {
        match self {
            BoardSensor::ShiftRegister(scanner) => scanner.sample(),
            BoardSensor::Matrix(scanner) => scanner.sample(),
            BoardSensor::Hall(scanner) => scanner.sample(),
            BoardSensor::Simulated(board) => board.sample(),
        }
    }
}

/// Hardware the sensor builder draws from
pub struct SensorResources {
    pub pins: PinBank,
    pub analog: AnalogBank,
    pub adc: Option<Peri<'static, ADC>>,
}

impl SensorResources {
    /// Bring up the ADC; only one sensor is built, so this runs at most once
    fn adc(&mut self) -> Result<&'static SharedAdc, PinError> {
        let adc = self.adc.take().ok_or(PinError::AlreadyTaken)?;
        Ok(ADC_CELL.init(SharedAdc::new(Adc::new_blocking(
            adc,
            AdcConfig::default(),
        ))))
    }
}

/// Build the sensor named by `config`
///
/// Fails if a configured pin is reserved, out of range, used twice, or
/// not ADC-capable where an analog input is needed.
pub fn build(
    config: &BoardConfig,
    mut res: SensorResources,
    simulated: &'static SimulatedBoard<CriticalSectionRawMutex>,
) -> Result<BoardSensor, PinError> {
    let flip = config.scan_flip();
    match &config.sensor {
        SensorConfig::ShiftRegister(sr) => shift_register(sr, &mut res, flip),
        SensorConfig::Matrix(matrix) => matrix_scanner(matrix, &mut res, flip),
        SensorConfig::Hall(hall) => hall_scanner(hall, &mut res, flip),
        SensorConfig::Simulated => Ok(BoardSensor::Simulated(simulated)),
    }
}

fn shift_register(
    config: &ShiftRegisterConfig,
    res: &mut SensorResources,
    flip: bool,
) -> Result<BoardSensor, PinError> {
    let mut output = |pin: PinConfig| {
        res.pins.take(pin.pin).map(|p| GpioOutput::new(p, pin))
    };
    let row_data = output(config.row_data)?;
    let row_clock = output(config.row_clock)?;
    let row_latch = output(config.row_latch)?;
    let col_load = output(config.col_load)?;
    let col_clock = output(config.col_clock)?;
    let col_data = GpioInput::new(res.pins.take(config.col_data.pin)?, config.col_data);

    let pins = ShiftRegisterPins {
        row_data,
        row_clock,
        row_latch,
        col_load,
        col_clock,
        col_data,
    };
    Ok(BoardSensor::ShiftRegister(ShiftRegisterScanner::new(
        pins,
        config.bit_order,
        Delay,
        flip,
    )))
}

fn matrix_scanner(
    config: &MatrixConfig,
    res: &mut SensorResources,
    flip: bool,
) -> Result<BoardSensor, PinError> {
    let [r0, r1, r2, r3, r4, r5, r6, r7] = config
        .rows
        .map(|row| res.pins.take(row.pin).map(OpenDrain::new));
    let rows = [r0?, r1?, r2?, r3?, r4?, r5?, r6?, r7?];

    let needs_adc = config
        .columns
        .iter()
        .any(|c| matches!(c, ColumnConfig::Analog { .. }));
    let adc = if needs_adc { Some(res.adc()?) } else { None };

    let [c0, c1, c2, c3, c4, c5, c6, c7] = config.columns.map(|column| match (column, adc) {
        (ColumnConfig::Digital(pin), _) => res
            .pins
            .take(pin.pin)
            .map(|p| ColumnSense::PulledUp(GpioInput::new(p, pin))),
        (ColumnConfig::Analog { pin, threshold }, Some(adc)) => {
            res.analog.take(pin).map(|channel| ColumnSense::Analog {
                input: AdcInput::new(adc, channel),
                threshold,
            })
        }
        (ColumnConfig::Analog { .. }, None) => Err(PinError::NotAnalog),
    });
    let columns = [c0?, c1?, c2?, c3?, c4?, c5?, c6?, c7?];

    Ok(BoardSensor::Matrix(MatrixScanner::new(rows, columns, Delay, flip)))
}

fn hall_scanner(
    config: &HallConfig,
    res: &mut SensorResources,
    flip: bool,
) -> Result<BoardSensor, PinError> {
    let mut output = |pin: PinConfig| res.pins.take(pin.pin).map(|p| GpioOutput::new(p, pin));
    let [e0, e1, e2, e3] = config.bank_enable.map(&mut output);
    let enables = [e0?, e1?, e2?, e3?];
    let [s0, s1, s2, s3] = config.select.map(&mut output);
    let select = [s0?, s1?, s2?, s3?];

    let channel = res.analog.take(config.analog)?;
    let input = AdcInput::new(res.adc()?, channel);

    Ok(BoardSensor::Hall(HallScanner::new(
        enables,
        select,
        input,
        config.midpoint,
        config.threshold,
        Delay,
        flip,
    )))
}
