use tracing::{debug, info};

use podracer_core::lap_info::{CheckpointID, LapEvent};
use podracer_core::pod_state::{Action, Command};
use podracer_core::PodID;
use podracer_core::GLOBAL_CONFIG;

use crate::checkpoints::Layout;
use crate::physics::{PodEntity, ShieldStatus};
use crate::world::World;

use self::phase::RacerPhase;
use self::shield::{shield_policy_from_config, ShieldPolicy};
use self::steering::Approach;

pub mod phase;
pub mod shield;
pub mod steering;

// Drives one of our pods. Each pilot keeps its own copy of the layout since
// the current checkpoint and lap count are per pod.
pub struct Pilot {
    pod: PodID,
    layout: Layout,
    phase: RacerPhase,
    boost_available: bool,
    // our own record of the shield effects the engine is applying to us
    shield: ShieldStatus,
    previous_distance: Option<f64>,
    last_target: Option<CheckpointID>,
    checkpoints_passed: u32,
    shield_policy: Box<dyn ShieldPolicy>,
}

impl Pilot {
    pub fn new(pod: PodID, layout: Layout) -> Self {
        Self::with_shield_policy(pod, layout, shield_policy_from_config())
    }

    pub fn with_shield_policy(pod: PodID, layout: Layout, shield_policy: Box<dyn ShieldPolicy>) -> Self {
        Self {
            pod,
            layout,
            phase: RacerPhase::Discovery,
            boost_available: true,
            shield: ShieldStatus::default(),
            previous_distance: None,
            last_target: None,
            checkpoints_passed: 0,
            shield_policy,
        }
    }

    pub fn pod(&self) -> PodID {
        self.pod
    }

    pub fn phase(&self) -> RacerPhase {
        self.phase
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn boost_available(&self) -> bool {
        self.boost_available
    }

    pub fn checkpoints_passed(&self) -> u32 {
        self.checkpoints_passed
    }

    // Laps driven all the way back over checkpoint 0. The layout's lap count
    // runs one leg ahead of this, since it ticks as soon as 0 becomes the target.
    pub fn laps_finished(&self) -> u32 {
        self.checkpoints_passed / self.layout.len() as u32
    }

    // Bring the layout up to date with the checkpoint the engine says we're
    // chasing now. Call once per turn before decide().
    pub fn observe(&mut self, world: &World) -> LapEvent {
        let target = match world.pod(self.pod) {
            Some(state) => state.next_checkpoint_id % self.layout.len(),
            None => return LapEvent::Unchanged,
        };

        if let Some(last) = self.last_target {
            if last != target {
                self.checkpoints_passed += 1;
                // distances to the old checkpoint say nothing about the new one
                self.previous_distance = None;
            }
        }
        self.last_target = Some(target);
        let position = self.layout.checkpoint(target).position;
        self.layout.advance_to_observed_checkpoint(position)
    }

    pub fn finish(&mut self) {
        if self.phase != RacerPhase::Finished {
            info!(pod = self.pod, "finished racing");
        }
        self.phase = RacerPhase::Finished;
    }

    fn is_locked_out(&self) -> bool {
        self.shield.lockout_turns > 0
    }

    // Produce this turn's command and account for it as sent
    pub fn decide(&mut self, world: &World) -> Command {
        let state = match world.pod(self.pod) {
            Some(state) => *state,
            None => {
                return Command::thrust(self.layout.current_checkpoint().position, GLOBAL_CONFIG.max_thrust)
            }
        };

        if self.phase == RacerPhase::Finished {
            return Command::thrust(self.layout.checkpoint(state.next_checkpoint_id).position, 0);
        }

        let racing = self.phase == RacerPhase::Racing;
        let facts = match world.checkpoint_facts(self.pod, &self.layout, racing) {
            Some(facts) => facts,
            None => {
                return Command::thrust(self.layout.current_checkpoint().position, GLOBAL_CONFIG.max_thrust)
            }
        };

        let approach = Approach {
            position: state.position,
            checkpoint: facts.target,
            following_checkpoint: self.layout.checkpoint(facts.target_id + 1).position,
            distance: facts.distance,
            first_leg: self.checkpoints_passed == 0,
        };
        let target = steering::select_target(&approach);
        let thrust = steering::select_thrust(facts.distance, self.previous_distance, facts.angle);
        let planned = Command::thrust(target, thrust);

        let command = if racing && self.wants_shield(world, &planned) {
            Command::shield(target)
        } else if racing
            && self.boost_available
            && !self.is_locked_out()
            && self.layout.is_on_longest_leg()
            && steering::boost_aligned(facts.angle)
        {
            Command::boost(target)
        } else {
            planned
        };

        debug!(
            pod = self.pod,
            checkpoint = facts.target_id,
            distance = facts.distance,
            angle = facts.angle,
            command = %command,
            "decided"
        );

        self.previous_distance = Some(facts.distance);
        self.commit(&command);
        command
    }

    fn wants_shield(&self, world: &World, planned: &Command) -> bool {
        let state = match world.pod(self.pod) {
            Some(state) => *state,
            None => return false,
        };
        let me = PodEntity::with_shield(state, self.shield);
        // the teammate can ram us just as well as an opponent
        let others: Vec<PodEntity> = world
            .all_pods()
            .into_iter()
            .enumerate()
            .filter(|(index, _)| *index != self.pod)
            .map(|(_, state)| PodEntity::new(state))
            .collect();

        self.shield_policy
            .should_shield(&me, planned, &others, self.phase.is_first_turn())
    }

    // Shield bookkeeping follows PodEntity: the lock-out ticks down as a
    // command is applied, the mass effect as the turn ends
    fn commit(&mut self, command: &Command) {
        if self.shield.lockout_turns > 0 {
            self.shield.lockout_turns -= 1;
        }

        match command.action {
            Action::Boost => {
                self.boost_available = false;
                info!(pod = self.pod, "boost used");
            }
            Action::Shield => {
                self.shield = ShieldStatus {
                    mass_turns: GLOBAL_CONFIG.shield_mass_turns,
                    lockout_turns: GLOBAL_CONFIG.shield_lockout_turns,
                };
                info!(pod = self.pod, "shield raised");
            }
            Action::Thrust(_) => {}
        }

        if self.shield.mass_turns > 0 {
            self.shield.mass_turns -= 1;
        }
        self.phase = self.phase.after_commit();
    }
}
