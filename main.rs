use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use log::info;

use rpbmp180::{AcquisitionLoop, Bmp180, Config, CsvSink, GpioIndicator, I2cBus};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config: Config = argh::from_env();

    let bus = I2cBus::new(config.bus).with_context(|| format!("opening i2c bus {}", config.bus))?;
    let sensor = Bmp180::new(bus, config.address, config.oversampling);
    let indicator = GpioIndicator::new(config.warmer_pin, config.cooler_pin)
        .context("configuring indicator pins")?;
    let sink = CsvSink::create(&config.output)
        .with_context(|| format!("creating {}", config.output.display()))?;

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .context("installing Ctrl-C handler")?;
    }

    let mut acquisition = AcquisitionLoop::start(sensor, indicator, sink, config.period())
        .context("starting BMP180 session")?;
    info!("measuring every {} seconds, stop with Ctrl-C", config.period);

    acquisition.run(&stop).context("BMP180 session aborted")?;
    info!("stopped");

    Ok(())
}
