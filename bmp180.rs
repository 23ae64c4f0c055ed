use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use rppal::i2c::I2c;

use crate::error::Result;
use crate::structs::{CalibrationTable, Oversampling, RawSample, CALIBRATION_LEN};

// BMP180 I2C slave address.
pub const ADDR_BMP180: u16 = 0x77;

// BMP180 register addresses.
const REG_CHIP_ID: u8 = 0xD0;
const REG_CALIB: u8 = 0xAA;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_OUT_MSB: u8 = 0xF6;

// Conversion commands written to REG_CTRL_MEAS.
const CMD_TEMPERATURE: u8 = 0x2E;
const CMD_PRESSURE: u8 = 0x34;

const CHIP_ID_BMP180: u8 = 0x55;
const TEMPERATURE_SETTLING: Duration = Duration::from_millis(5);

/// Register level access to a device on the bus.
///
/// Implementations report failures as [`Error::Bus`](crate::Error::Bus) and
/// do not retry.
pub trait RegisterBus {
    /// Reads `buffer.len()` consecutive registers starting at `register` in one transaction.
    fn read_block(&mut self, address: u16, register: u8, buffer: &mut [u8]) -> Result<()>;

    fn write_byte(&mut self, address: u16, register: u8, value: u8) -> Result<()>;
}

/// [`RegisterBus`] on a Linux I2C character device.
pub struct I2cBus {
    i2c: I2c,
    selected: Option<u16>,
}

impl I2cBus {
    pub fn new(bus: u8) -> Result<Self> {
        let i2c = I2c::with_bus(bus)?;
        Ok(I2cBus { i2c, selected: None })
    }

    fn select(&mut self, address: u16) -> Result<()> {
        if self.selected != Some(address) {
            self.i2c.set_slave_address(address)?;
            self.selected = Some(address);
        }
        Ok(())
    }
}

impl RegisterBus for I2cBus {
    fn read_block(&mut self, address: u16, register: u8, buffer: &mut [u8]) -> Result<()> {
        self.select(address)?;
        self.i2c.write_read(&[register], buffer)?;
        Ok(())
    }

    fn write_byte(&mut self, address: u16, register: u8, value: u8) -> Result<()> {
        self.select(address)?;
        self.i2c.smbus_write_byte(register, value)?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChipId {
    pub id: u8,
    pub version: u8,
}

/// BMP180 barometric pressure sensor at a fixed address.
pub struct Bmp180<B> {
    bus: B,
    address: u16,
    oversampling: Oversampling,
}

impl<B: RegisterBus> Bmp180<B> {
    pub fn new(bus: B, address: u16, oversampling: Oversampling) -> Self {
        Bmp180 {
            bus,
            address,
            oversampling,
        }
    }

    pub fn oversampling(&self) -> Oversampling {
        self.oversampling
    }

    /// Reads chip id and version. An unexpected id is only logged.
    pub fn identify(&mut self) -> Result<ChipId> {
        let mut data = [0u8; 2];
        self.bus.read_block(self.address, REG_CHIP_ID, &mut data)?;
        let chip = ChipId {
            id: data[0],
            version: data[1],
        };

        info!("Chip ID     : {:#04x}", chip.id);
        info!("Chip Version: {:#04x}", chip.version);
        if chip.id != CHIP_ID_BMP180 {
            warn!(
                "device at {:#04x} reports chip id {:#04x}, expected {:#04x}",
                self.address, chip.id, CHIP_ID_BMP180
            );
        }
        Ok(chip)
    }

    /// Reads the calibration EEPROM (0xAA - 0xBF) in a single block.
    pub fn read_calibration(&mut self) -> Result<CalibrationTable> {
        let mut calib = [0u8; CALIBRATION_LEN];
        self.bus.read_block(self.address, REG_CALIB, &mut calib)?;
        let table = CalibrationTable::load(&calib)?;
        debug!("calibration: {:?}", table);
        Ok(table)
    }

    pub fn read_raw_temperature(&mut self) -> Result<u16> {
        self.bus.write_byte(self.address, REG_CTRL_MEAS, CMD_TEMPERATURE)?;
        thread::sleep(TEMPERATURE_SETTLING);

        let mut data = [0u8; 2];
        self.bus.read_block(self.address, REG_OUT_MSB, &mut data)?;
        Ok(u16::from_be_bytes(data))
    }

    pub fn read_raw_pressure(&mut self) -> Result<u32> {
        let oss = self.oversampling.bits();
        self.bus.write_byte(self.address, REG_CTRL_MEAS, CMD_PRESSURE + (oss << 6))?;
        thread::sleep(self.oversampling.settling_delay());

        // MSB, LSB, XLSB
        let mut data = [0u8; 3];
        self.bus.read_block(self.address, REG_OUT_MSB, &mut data)?;
        let raw = (u32::from(data[0]) << 16) | (u32::from(data[1]) << 8) | u32::from(data[2]);
        Ok(raw >> (8 - oss))
    }

    /// Temperature first, then pressure, as the pressure compensation needs
    /// the temperature of the same cycle.
    pub fn read_raw_sample(&mut self) -> Result<RawSample> {
        let temperature = self.read_raw_temperature()?;
        let pressure = self.read_raw_pressure()?;
        debug!("raw sample: UT={} UP={}", temperature, pressure);
        Ok(RawSample {
            temperature,
            pressure,
        })
    }

    pub fn release(self) -> B {
        self.bus
    }
}
