use core::cmp::Ordering;

use rppal::gpio::{Gpio, OutputPin};

use crate::error::Result;
use crate::structs::DeciCelsius;

/// Direction of the temperature change between two cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Warmer,
    Cooler,
    Steady,
}

impl Trend {
    pub fn between(previous: DeciCelsius, next: DeciCelsius) -> Trend {
        match next.cmp(&previous) {
            Ordering::Greater => Trend::Warmer,
            Ordering::Less => Trend::Cooler,
            Ordering::Equal => Trend::Steady,
        }
    }

    /// `(warmer, cooler)` output levels. A steady temperature lights both.
    pub fn indicator_state(self) -> (bool, bool) {
        match self {
            Trend::Warmer => (true, false),
            Trend::Cooler => (false, true),
            Trend::Steady => (true, true),
        }
    }
}

/// Two independent outputs signalling "warmer" and "cooler".
pub trait TrendIndicator {
    fn set(&mut self, warmer: bool, cooler: bool) -> Result<()>;

    /// Turns both outputs off before applying the state for `trend`.
    fn show(&mut self, trend: Trend) -> Result<()> {
        self.clear()?;
        let (warmer, cooler) = trend.indicator_state();
        self.set(warmer, cooler)
    }

    fn clear(&mut self) -> Result<()> {
        self.set(false, false)
    }
}

/// LEDs on two BCM GPIO pins. The pins are reset when dropped.
pub struct GpioIndicator {
    warmer: OutputPin,
    cooler: OutputPin,
}

impl GpioIndicator {
    pub fn new(warmer_pin: u8, cooler_pin: u8) -> Result<Self> {
        let gpio = Gpio::new()?;
        let mut warmer = gpio.get(warmer_pin)?.into_output();
        let mut cooler = gpio.get(cooler_pin)?.into_output();
        warmer.set_low();
        cooler.set_low();
        Ok(GpioIndicator { warmer, cooler })
    }
}

fn drive(pin: &mut OutputPin, on: bool) {
    if on {
        pin.set_high();
    } else {
        pin.set_low();
    }
}

impl TrendIndicator for GpioIndicator {
    fn set(&mut self, warmer: bool, cooler: bool) -> Result<()> {
        drive(&mut self.warmer, warmer);
        drive(&mut self.cooler, cooler);
        Ok(())
    }
}
