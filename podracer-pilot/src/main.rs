use std::io::{self, BufWriter};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use podracer_core::protocol::{Observation, RaceSetup, TokenReader};

mod checkpoints;
mod physics;
mod pilot;
mod race;
mod world;

fn main() -> anyhow::Result<()> {
    // stdout belongs to the engine
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let mut reader = TokenReader::new(stdin.lock());
    let setup = RaceSetup::parse(&mut reader).context("could not read race setup")?;

    let mut race = race::RaceLoop::new(setup).context("could not build checkpoint layout")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    race.run(&mut reader, &mut writer)
        .context("race loop stopped")?;
    Ok(())
}
