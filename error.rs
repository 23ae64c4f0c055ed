use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The calibration block did not contain all eleven words.
    #[error("calibration block is {len} bytes, expected 22")]
    MalformedCalibrationData { len: usize },

    /// Register read or write failed. Never retried here.
    #[error("bus error: {0}")]
    Bus(#[from] rppal::i2c::Error),

    /// Compensation hit a degenerate input (zero divisor).
    #[error("sensor fault: {0}")]
    SensorFault(&'static str),

    #[error("oversampling setting {0} is out of range 0..=3")]
    InvalidOversampling(u8),

    #[error("gpio error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink error: {0}")]
    Sink(#[from] csv::Error),
}
