//! Integer compensation of BMP180 readings.
//!
//! Follows the fixed-point algorithm from the BMP180 datasheet step by step.
//! Everything is computed in `i64`: `/` truncates toward zero and `>>` is an
//! arithmetic shift, which is what the reference algorithm expects.
//!
//! With any 16-bit calibration word and any raw value, every step up to `B7`
//! stays well inside `i64`. `P` is limited to `i32` before it is squared.

use crate::error::{Error, Result};
use crate::structs::{
    CalibratedSample, CalibrationTable, DeciCelsius, Oversampling, Pascal, RawSample,
};

/// Returns the temperature and the `B5` intermediate value.
///
/// `B5` has to be passed to [`compensate_pressure`] for the same cycle.
pub fn compensate_temperature(
    raw_temperature: u16,
    calib: &CalibrationTable,
) -> Result<(DeciCelsius, i64)> {
    let ac5 = i64::from(calib.ac5);
    let ac6 = i64::from(calib.ac6);
    let mc = i64::from(calib.mc);
    let md = i64::from(calib.md);

    let x1 = ((i64::from(raw_temperature) - ac6) * ac5) >> 15;
    let divisor = x1 + md;
    if divisor == 0 {
        return Err(Error::SensorFault("temperature divisor X1 + MD is zero"));
    }
    let x2 = (mc << 11) / divisor;
    let b5 = x1 + x2;

    // |X1| <= 2^17 and |X2| <= 2^26, so the result always fits in i32.
    let temperature = ((b5 + 8) >> 4) as i32;
    Ok((DeciCelsius(temperature), b5))
}

pub fn compensate_pressure(
    raw_pressure: u32,
    b5: i64,
    oversampling: Oversampling,
    calib: &CalibrationTable,
) -> Result<Pascal> {
    let oss = u32::from(oversampling.bits());
    let ac1 = i64::from(calib.ac1);
    let ac2 = i64::from(calib.ac2);
    let ac3 = i64::from(calib.ac3);
    let ac4 = i64::from(calib.ac4);
    let b1 = i64::from(calib.b1);
    let b2 = i64::from(calib.b2);

    let b6 = b5 - 4000;
    let b62 = (b6 * b6) >> 12;
    let mut x1 = (b2 * b62) >> 11;
    let mut x2 = (ac2 * b6) >> 11;
    let mut x3 = x1 + x2;
    let b3 = (((ac1 * 4 + x3) << oss) + 2) >> 2;

    x1 = (ac3 * b6) >> 13;
    x2 = (b1 * b62) >> 16;
    x3 = ((x1 + x2) + 2) >> 2;
    let b4 = (ac4 * (x3 + 32768)) >> 15;
    if b4 == 0 {
        return Err(Error::SensorFault("pressure divisor B4 is zero"));
    }
    let p = (i64::from(raw_pressure) - b3)
        .checked_mul(50000 >> oss)
        .and_then(|b7| b7.checked_mul(2))
        .map(|b7| b7 / b4)
        .and_then(|p| i32::try_from(p).ok())
        .map(i64::from)
        .ok_or(Error::SensorFault("uncorrected pressure P out of range"))?;

    x1 = (p >> 8) * (p >> 8);
    x1 = (x1 * 3038) >> 16;
    x2 = (-7357 * p) >> 16;
    let pressure = p + ((x1 + x2 + 3791) >> 4);

    let pressure = i32::try_from(pressure)
        .map_err(|_| Error::SensorFault("compensated pressure out of range"))?;
    Ok(Pascal(pressure))
}

/// Compensates both values of one cycle, sharing `B5` between them.
pub fn compensate(
    raw: RawSample,
    oversampling: Oversampling,
    calib: &CalibrationTable,
) -> Result<CalibratedSample> {
    let (temperature, b5) = compensate_temperature(raw.temperature, calib)?;
    let pressure = compensate_pressure(raw.pressure, b5, oversampling, calib)?;
    Ok(CalibratedSample { temperature, pressure })
}
