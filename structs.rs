use core::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Length of the EEPROM calibration block (0xAA - 0xBF).
pub const CALIBRATION_LEN: usize = 22;

/// Factory calibration coefficients of a BMP180.
///
/// The eleven words are stored big-endian, `AC4`, `AC5` and `AC6` unsigned and
/// the rest two's complement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalibrationTable {
    pub ac1: i16,
    pub ac2: i16,
    pub ac3: i16,
    pub ac4: u16,
    pub ac5: u16,
    pub ac6: u16,
    pub b1: i16,
    pub b2: i16,
    pub mb: i16,
    pub mc: i16,
    pub md: i16,
}

impl CalibrationTable {
    /// Decodes a calibration block obtained in a single register read.
    ///
    /// Nothing is decoded unless the block has exactly [`CALIBRATION_LEN`] bytes.
    pub fn load(raw: &[u8]) -> Result<Self> {
        let block = <&[u8; CALIBRATION_LEN]>::try_from(raw)
            .map_err(|_| Error::MalformedCalibrationData { len: raw.len() })?;

        let word = |n: usize| u16::from_be_bytes([block[2 * n], block[2 * n + 1]]);

        Ok(CalibrationTable {
            ac1: word(0) as i16,
            ac2: word(1) as i16,
            ac3: word(2) as i16,
            ac4: word(3),
            ac5: word(4),
            ac6: word(5),
            b1: word(6) as i16,
            b2: word(7) as i16,
            mb: word(8) as i16,
            mc: word(9) as i16,
            md: word(10) as i16,
        })
    }
}

/// Pressure oversampling setting (`oss` in the datasheet).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Oversampling {
    UltraLowPower = 0,
    Standard = 1,
    HighResolution = 2,
    UltraHighResolution = 3,
}

impl Oversampling {
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Maximum conversion time of a pressure measurement in this mode.
    pub fn settling_delay(self) -> Duration {
        match self {
            Oversampling::UltraLowPower => Duration::from_millis(5),
            Oversampling::Standard => Duration::from_millis(8),
            Oversampling::HighResolution => Duration::from_millis(14),
            Oversampling::UltraHighResolution => Duration::from_millis(26),
        }
    }
}

impl Default for Oversampling {
    fn default() -> Self {
        Oversampling::UltraHighResolution
    }
}

impl TryFrom<u8> for Oversampling {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Oversampling::UltraLowPower),
            1 => Ok(Oversampling::Standard),
            2 => Ok(Oversampling::HighResolution),
            3 => Ok(Oversampling::UltraHighResolution),
            other => Err(Error::InvalidOversampling(other)),
        }
    }
}

/// Uncompensated ADC values of one acquisition cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawSample {
    /// UT
    pub temperature: u16,
    /// UP, already shifted right by `8 - oss`
    pub pressure: u32,
}

/// Temperature in 0.1 °C.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeciCelsius(pub i32);

/// Pressure in Pa.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pascal(pub i32);

impl fmt::Display for DeciCelsius {
    /// Formats as °C with one decimal, e.g. `15.0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

impl fmt::Display for Pascal {
    /// Formats as hPa with two decimals, e.g. `699.64`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for DeciCelsius {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for Pascal {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalibratedSample {
    pub temperature: DeciCelsius,
    pub pressure: Pascal,
}
