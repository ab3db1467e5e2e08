//! Dry run of the train choreographies without a train.
//!
//! Frames that would be written to the LionChief characteristic are logged
//! as hex instead. Delays are real, so the run takes a few seconds.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example dry_run
//! RUST_LOG=rs_lionchief=debug cargo run --example dry_run
//! ```

use std::convert::Infallible;

use anyhow::Context;
use rs_lionchief::hal::StdDelay;
use rs_lionchief::traits::{TrainConnector, TrainLink, WriteError};
use rs_lionchief::{Conductor, Config, SoundPitch};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Link that logs every frame instead of sending it.
struct PrintLink {
    written: usize,
}

impl TrainLink for PrintLink {
    type Error = Infallible;

    fn write(&mut self, frame: &[u8]) -> Result<usize, WriteError<Infallible>> {
        self.written += 1;
        let hex: Vec<String> = frame.iter().map(|b| format!("{b:02x}")).collect();
        info!(n = self.written, frame = %hex.join(" "), "write");
        Ok(frame.len())
    }

    fn disconnect(&mut self) -> Result<(), Infallible> {
        info!("link closed");
        Ok(())
    }
}

struct PrintConnector;

impl TrainConnector for PrintConnector {
    type Link = PrintLink;

    fn connect(&mut self, config: &Config) -> Result<PrintLink, Infallible> {
        info!(
            device = %config.device.name,
            service = %config.link.service_uuid,
            characteristic = %config.link.write_characteristic_uuid,
            "pretending to connect"
        );
        Ok(PrintLink { written: 0 })
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=================================");
    println!("  rs-lionchief Dry Run");
    println!("=================================");
    println!();

    let config = Config::default();
    let mut conductor = Conductor::connect(&mut PrintConnector, &config, StdDelay::new())
        .context("connecting to train")?;

    conductor.set_horn_pitch(SoundPitch::Low)?;
    conductor.begin_train_service().context("begin service")?;
    let phrase = conductor.speak()?;
    info!(?phrase, "announced");
    conductor.adjust_speed_to(8)?;
    conductor.reverse_train_service().context("reverse service")?;
    conductor.end_train_service().context("end service")?;

    info!(state = ?conductor.state(), "final state");
    conductor.disconnect()?;
    Ok(())
}
