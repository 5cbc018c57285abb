use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use podracer_core::protocol::{
    self, Observation, ProtocolError, RaceSetup, TokenReader, TurnObservation, PODS_PER_TEAM,
};
use podracer_core::GLOBAL_CONFIG;

use crate::checkpoints::{Layout, LayoutError};
use crate::pilot::Pilot;
use crate::world::World;

pub struct RaceLoop {
    setup: RaceSetup,
    world: World,
    pilots: Vec<Pilot>,
}

impl RaceLoop {
    pub fn new(setup: RaceSetup) -> Result<RaceLoop, LayoutError> {
        let layout = Layout::new(setup.checkpoints.iter().copied())?;
        let pilots = (0..PODS_PER_TEAM)
            .map(|pod| Pilot::new(pod, layout.clone()))
            .collect();
        info!(
            laps = setup.laps,
            checkpoints = setup.checkpoints.len(),
            "race set up"
        );

        Ok(RaceLoop {
            setup,
            world: World::new(),
            pilots,
        })
    }

    pub fn pilots(&self) -> &[Pilot] {
        &self.pilots
    }

    // Runs until the engine stops sending observations. Returns the number of
    // turns played.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        reader: &mut TokenReader<R>,
        writer: &mut W,
    ) -> Result<u32, ProtocolError> {
        let turn_budget = Duration::from_millis(GLOBAL_CONFIG.turn_budget_ms);
        let mut turns = 0;

        while let Some(observation) = TurnObservation::parse_next(reader)? {
            let start_time = Instant::now();

            self.check_checkpoint_ids(&observation)?;
            self.world.update(observation);

            for pilot in self.pilots.iter_mut() {
                pilot.observe(&self.world);
                if pilot.laps_finished() >= self.setup.laps {
                    pilot.finish();
                }
                let command = pilot.decide(&self.world);
                protocol::write_command(writer, &command)?;
            }
            writer.flush()?;

            let elapsed = start_time.elapsed();
            if elapsed > turn_budget {
                warn!(turn = turns, ?elapsed, "turn took longer than its budget");
            } else {
                debug!(turn = turns, ?elapsed, "turn done");
            }
            turns += 1;
        }

        info!(turns, "input closed, race over");
        Ok(turns)
    }

    fn check_checkpoint_ids(&self, observation: &TurnObservation) -> Result<(), ProtocolError> {
        let count = self.setup.checkpoints.len();
        let pods = observation.pods.iter().chain(observation.opponents.iter());
        match pods.map(|pod| pod.next_checkpoint_id).find(|id| *id >= count) {
            Some(id) => Err(ProtocolError::MalformedObservation {
                field: "nextCheckPointId",
                reason: format!("{} with only {} checkpoints", id, count),
            }),
            None => Ok(()),
        }
    }
}
