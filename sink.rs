use std::fs::File;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::structs::{CalibratedSample, DeciCelsius, Pascal};

const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";
const HEADER: [&str; 3] = ["timestamp", "temperature", "pressure"];

/// One persisted reading. Temperature is written in °C, pressure in hPa.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    pub timestamp: String,
    pub temperature: DeciCelsius,
    pub pressure: Pascal,
}

impl Record {
    /// Stamps `sample` with the current local time.
    pub fn now(sample: &CalibratedSample) -> Self {
        Record {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            temperature: sample.temperature,
            pressure: sample.pressure,
        }
    }
}

/// Append-only destination for readings.
pub trait ReadingSink {
    fn append(&mut self, record: &Record) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

/// `;` separated values with a header row written on creation.
pub struct CsvSink<W: io::Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        CsvSink::new(file)
    }
}

impl<W: io::Write> CsvSink<W> {
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(&HEADER)?;
        writer.flush()?;
        Ok(CsvSink { writer })
    }

    pub fn into_inner(self) -> Result<W> {
        let inner = self.writer.into_inner().map_err(|err| err.into_error())?;
        Ok(inner)
    }
}

impl<W: io::Write> ReadingSink for CsvSink<W> {
    fn append(&mut self, record: &Record) -> Result<()> {
        self.writer.serialize(record)?;
        // readings are sparse, keep the file current
        self.writer.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
