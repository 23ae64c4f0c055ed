//! BMP180 barometric sensor logger for the Raspberry Pi.
//!
//! Reads the factory calibration once, then periodically converts raw
//! temperature and pressure with the datasheet's integer algorithm, appends
//! each reading to a CSV file and lights a "warmer" or "cooler" LED.

pub mod acquisition;
pub mod bmp180;
pub mod compensation;
pub mod config;
pub mod error;
pub mod indicator;
pub mod sink;
pub mod structs;

#[cfg(test)]
mod fakes;

pub use acquisition::{AcquisitionLoop, Cycle, State};
pub use bmp180::{Bmp180, I2cBus, RegisterBus, ADDR_BMP180};
pub use compensation::{compensate, compensate_pressure, compensate_temperature};
pub use config::Config;
pub use error::{Error, Result};
pub use indicator::{GpioIndicator, Trend, TrendIndicator};
pub use sink::{CsvSink, ReadingSink, Record};
pub use structs::{CalibratedSample, CalibrationTable, DeciCelsius, Oversampling, Pascal, RawSample};
