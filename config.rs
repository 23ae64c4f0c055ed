use std::path::PathBuf;
use std::time::Duration;

use argh::FromArgs;

use crate::acquisition::DEFAULT_PERIOD;
use crate::bmp180::ADDR_BMP180;
use crate::structs::Oversampling;

#[derive(FromArgs, Debug, PartialEq)]
/// Log BMP180 temperature and pressure to a CSV file and show the temperature trend on two LEDs.
pub struct Config {
    /// i2c bus number (default 1)
    #[argh(option, default = "1")]
    pub bus: u8,

    /// device address, decimal or 0x-prefixed hex (default 0x77)
    #[argh(option, default = "ADDR_BMP180", from_str_fn(parse_address))]
    pub address: u16,

    /// pressure oversampling 0-3 (default 3)
    #[argh(option, default = "Oversampling::default()", from_str_fn(parse_oversampling))]
    pub oversampling: Oversampling,

    /// seconds between readings (default 5)
    #[argh(option, default = "DEFAULT_PERIOD.as_secs()")]
    pub period: u64,

    /// csv output file (default readings.csv)
    #[argh(option, default = "PathBuf::from(\"readings.csv\")")]
    pub output: PathBuf,

    /// gpio pin (BCM numbering) of the "warmer" LED (default 17)
    #[argh(option, default = "17")]
    pub warmer_pin: u8,

    /// gpio pin (BCM numbering) of the "cooler" LED (default 27)
    #[argh(option, default = "27")]
    pub cooler_pin: u8,
}

impl Config {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period)
    }
}

fn parse_address(value: &str) -> Result<u16, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|err| format!("invalid address {:?}: {}", value, err))
}

fn parse_oversampling(value: &str) -> Result<Oversampling, String> {
    let setting: u8 = value
        .parse()
        .map_err(|err| format!("invalid oversampling {:?}: {}", value, err))?;
    Oversampling::try_from(setting).map_err(|err| err.to_string())
}
