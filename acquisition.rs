//! Periodic measure, compensate and report cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info, warn};

use crate::bmp180::{Bmp180, RegisterBus};
use crate::compensation::compensate;
use crate::error::Result;
use crate::indicator::{Trend, TrendIndicator};
use crate::sink::{ReadingSink, Record};
use crate::structs::{CalibratedSample, CalibrationTable, DeciCelsius};

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Reading,
    Compensating,
    Reporting,
}

/// Outcome of a single cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cycle {
    pub sample: CalibratedSample,
    pub trend: Trend,
    /// The trend was computed against the initial 0 °C placeholder, not a
    /// real previous reading.
    pub sentinel_baseline: bool,
}

pub struct AcquisitionLoop<B, I, S> {
    sensor: Bmp180<B>,
    calib: CalibrationTable,
    indicator: I,
    sink: S,
    period: Duration,
    previous: DeciCelsius,
    measured: bool,
    state: State,
}

impl<B, I, S> AcquisitionLoop<B, I, S>
where
    B: RegisterBus,
    I: TrendIndicator,
    S: ReadingSink,
{
    /// Identifies the sensor and reads its calibration once for the session.
    pub fn start(mut sensor: Bmp180<B>, indicator: I, sink: S, period: Duration) -> Result<Self> {
        sensor.identify()?;
        let calib = sensor.read_calibration()?;
        info!(
            "oversampling {:?}, one reading every {:?}",
            sensor.oversampling(),
            period
        );

        Ok(AcquisitionLoop {
            sensor,
            calib,
            indicator,
            sink,
            period,
            previous: DeciCelsius(0),
            measured: false,
            state: State::Idle,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn calibration(&self) -> &CalibrationTable {
        &self.calib
    }

    pub fn previous_temperature(&self) -> DeciCelsius {
        self.previous
    }

    pub fn run_cycle(&mut self) -> Result<Cycle> {
        self.state = State::Reading;
        let raw = self.sensor.read_raw_sample()?;

        self.state = State::Compensating;
        let sample = compensate(raw, self.sensor.oversampling(), &self.calib)?;

        self.state = State::Reporting;
        let record = Record::now(&sample);
        info!(
            "{}  temperature {} °C  pressure {} hPa",
            record.timestamp, sample.temperature, sample.pressure
        );
        self.sink.append(&record)?;

        let trend = Trend::between(self.previous, sample.temperature);
        let sentinel_baseline = !self.measured;
        if sentinel_baseline {
            warn!("first trend is relative to the 0 °C placeholder, not a previous reading");
        }
        self.indicator.show(trend)?;

        self.previous = sample.temperature;
        self.measured = true;
        self.state = State::Idle;

        Ok(Cycle {
            sample,
            trend,
            sentinel_baseline,
        })
    }

    /// Runs cycles until `stop` is set, checked once per cycle.
    ///
    /// A failing cycle ends the session. The sink is flushed and the
    /// indicators are turned off either way.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<()> {
        while !stop.load(Ordering::SeqCst) {
            let started = Instant::now();
            if let Err(err) = self.run_cycle() {
                error!("acquisition failed while {:?}: {}", self.state, err);
                if let Err(shutdown_err) = self.shutdown() {
                    error!("shutdown after failure: {}", shutdown_err);
                }
                return Err(err);
            }
            if stop.load(Ordering::SeqCst) {
                break;
            }
            thread::sleep(self.period.saturating_sub(started.elapsed()));
        }
        self.shutdown()
    }

    /// Does not change `state`.
    fn shutdown(&mut self) -> Result<()> {
        self.sink.flush()?;
        self.indicator.clear()
    }

    /// Hands back the bus, indicator and sink.
    pub fn into_parts(self) -> (B, I, S) {
        (self.sensor.release(), self.indicator, self.sink)
    }
}
