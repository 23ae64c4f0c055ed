//! In-memory stand-ins for the bus, the indicator pins and the CSV file.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::bmp180::RegisterBus;
use crate::error::{Error, Result};
use crate::indicator::TrendIndicator;
use crate::sink::{ReadingSink, Record};
use crate::structs::CALIBRATION_LEN;

// Datasheet example coefficients, big-endian.
pub const DATASHEET_BLOCK: [u8; CALIBRATION_LEN] = [
    0x01, 0x98, // AC1 = 408
    0xFF, 0xB8, // AC2 = -72
    0xC7, 0xD1, // AC3 = -14383
    0x7F, 0xE5, // AC4 = 32741
    0x7F, 0xF5, // AC5 = 32757
    0x5A, 0x71, // AC6 = 23153
    0x18, 0x2E, // B1 = 6190
    0x00, 0x04, // B2 = 4
    0x80, 0x00, // MB = -32768
    0xDD, 0xF9, // MC = -8711
    0x0B, 0x34, // MD = 2868
];

const REG_CTRL_MEAS: u8 = 0xF4;
const REG_OUT_MSB: u8 = 0xF6;
const CMD_TEMPERATURE: u8 = 0x2E;

/// BMP180 register file. Writing a conversion command to 0xF4 loads the next
/// queued result for that command into 0xF6.
#[derive(Default)]
pub struct FakeBus {
    pub registers: HashMap<u8, Vec<u8>>,
    pub conversions: HashMap<u8, VecDeque<Vec<u8>>>,
    pub writes: Vec<(u16, u8, u8)>,
    pub reads: Vec<(u16, u8, usize)>,
    pub fail_register: Option<u8>,
    output: Vec<u8>,
}

impl FakeBus {
    /// Datasheet example device: UT = 27898, UP = 0x5D2300.
    pub fn datasheet() -> Self {
        let mut bus = FakeBus::default();
        bus.registers.insert(0xD0, vec![0x55, 0x02]);
        bus.registers.insert(0xAA, DATASHEET_BLOCK.to_vec());
        bus.set_temperatures(&[27898]);
        for oss in 0..4u8 {
            bus.conversions
                .insert(0x34 + (oss << 6), VecDeque::from(vec![vec![0x5D, 0x23, 0x00]]));
        }
        bus
    }

    /// Queues raw temperatures. The last one repeats once the queue is drained.
    pub fn set_temperatures(&mut self, raw: &[u16]) {
        let queue = raw.iter().map(|ut| ut.to_be_bytes().to_vec()).collect();
        self.conversions.insert(CMD_TEMPERATURE, queue);
    }
}

impl RegisterBus for FakeBus {
    fn read_block(&mut self, address: u16, register: u8, buffer: &mut [u8]) -> Result<()> {
        self.reads.push((address, register, buffer.len()));
        if self.fail_register == Some(register) {
            return Err(Error::Bus(rppal::i2c::Error::Io(io::Error::new(
                io::ErrorKind::Other,
                "no acknowledge",
            ))));
        }

        let data = if register == REG_OUT_MSB {
            self.output.as_slice()
        } else {
            self.registers.get(&register).map(Vec::as_slice).unwrap_or(&[])
        };
        for (n, byte) in buffer.iter_mut().enumerate() {
            *byte = data.get(n).copied().unwrap_or(0);
        }
        Ok(())
    }

    fn write_byte(&mut self, address: u16, register: u8, value: u8) -> Result<()> {
        self.writes.push((address, register, value));
        if register == REG_CTRL_MEAS {
            if let Some(queue) = self.conversions.get_mut(&value) {
                self.output = if queue.len() > 1 {
                    queue.pop_front().unwrap_or_default()
                } else {
                    queue.front().cloned().unwrap_or_default()
                };
            }
        }
        Ok(())
    }
}

/// Remembers every (warmer, cooler) state it was set to.
#[derive(Default)]
pub struct RecordingIndicator {
    pub states: Vec<(bool, bool)>,
}

impl TrendIndicator for RecordingIndicator {
    fn set(&mut self, warmer: bool, cooler: bool) -> Result<()> {
        self.states.push((warmer, cooler));
        Ok(())
    }
}

/// Collects records and raises `stop` after `stop_after` of them.
#[derive(Default)]
pub struct MemorySink {
    pub records: Vec<Record>,
    pub flushes: usize,
    pub stop_after: Option<(usize, Arc<AtomicBool>)>,
}

impl ReadingSink for MemorySink {
    fn append(&mut self, record: &Record) -> Result<()> {
        self.records.push(record.clone());
        if let Some((count, stop)) = &self.stop_after {
            if self.records.len() >= *count {
                stop.store(true, Ordering::SeqCst);
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
