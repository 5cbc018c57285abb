use glam::DVec2;

use podracer_core::pod_state::{Action, Command, PodState};
use podracer_core::vector_math;
use podracer_core::GLOBAL_CONFIG;

pub mod collisions;

// Turns left on the two shield effects; both count down to zero
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShieldStatus {
    pub mass_turns: u32,
    pub lockout_turns: u32,
}

// Our model of a pod as the engine will move it. Nothing here is
// authoritative: it only exists to guess where a command will take us.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PodEntity {
    pub state: PodState,
    pub shield: ShieldStatus,
}

impl PodEntity {
    pub fn new(state: PodState) -> Self {
        Self {
            state,
            shield: ShieldStatus::default(),
        }
    }

    pub fn with_shield(state: PodState, shield: ShieldStatus) -> Self {
        Self { state, shield }
    }

    pub fn position(&self) -> DVec2 {
        self.state.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.state.velocity
    }

    pub fn mass(&self) -> f64 {
        if self.shield.mass_turns > 0 {
            GLOBAL_CONFIG.shield_mass_multiplier
        } else {
            1.0
        }
    }

    // Heading after turning toward target. The turn is capped at
    // max_turn_degrees except on the first turn of the race (or whenever we
    // don't know which way we face yet).
    pub fn heading_towards(&self, target: DVec2, first_turn: bool) -> f64 {
        let current = self.state.reported_heading();
        let desired = match vector_math::vector_to_heading(target - self.state.position) {
            Some(desired) => desired,
            None => return current.unwrap_or(0.0),
        };

        match current {
            Some(current) if !first_turn => {
                let max_turn = GLOBAL_CONFIG.max_turn_degrees;
                let delta = vector_math::wrap_degrees(desired - current).clamp(-max_turn, max_turn);
                vector_math::normalize_heading(current + delta)
            }
            _ => desired,
        }
    }

    // Rotate and accelerate; the movement part of the turn happens in advance()
    pub fn apply_command(&mut self, command: &Command, first_turn: bool) {
        let locked_out = self.shield.lockout_turns > 0;
        if locked_out {
            self.shield.lockout_turns -= 1;
        }

        let heading = self.heading_towards(command.target, first_turn);
        let thrust = match command.action {
            Action::Thrust(thrust) => thrust.clamp(0, GLOBAL_CONFIG.max_thrust) as f64,
            Action::Boost => GLOBAL_CONFIG.boost_thrust,
            Action::Shield => {
                self.shield = ShieldStatus {
                    mass_turns: GLOBAL_CONFIG.shield_mass_turns,
                    lockout_turns: GLOBAL_CONFIG.shield_lockout_turns,
                };
                0.0
            }
        };
        let thrust = if locked_out { 0.0 } else { thrust };

        self.state.heading = heading;
        self.state.velocity += vector_math::heading_to_vector(heading) * thrust;
    }

    // Opponents get no command from us, so we predict them drifting
    pub fn coast(&mut self) {
        if self.shield.lockout_turns > 0 {
            self.shield.lockout_turns -= 1;
        }
    }

    // Move along the current velocity for a fraction of the turn
    pub fn advance(&mut self, time_step: f64) {
        self.state.position += self.state.velocity * time_step;
    }

    // Friction then the engine's integer snapping: truncated speed, rounded position
    pub fn end_turn(&mut self) {
        self.state.velocity = vector_math::truncate(self.state.velocity * GLOBAL_CONFIG.friction);
        self.state.position = vector_math::round(self.state.position);
        if self.shield.mass_turns > 0 {
            self.shield.mass_turns -= 1;
        }
    }

    /* Given a command, compute and return what next turn's state will be for
     * this pod if nothing gets in its way */
    pub fn do_physics_step(&self, command: &Command, first_turn: bool) -> PodEntity {
        let mut next = *self;
        next.apply_command(command, first_turn);
        next.advance(1.0);
        next.end_turn();
        next
    }
}

// Predict a full turn for every pod, bouncing them off one another. A None
// command means we don't know what that pod will do and assume it coasts.
pub fn simulate_turn(
    pods: &[PodEntity],
    commands: &[Option<Command>],
    first_turn: bool,
) -> Vec<PodEntity> {
    let mut next: Vec<PodEntity> = pods.to_vec();
    for (i, pod) in next.iter_mut().enumerate() {
        match commands.get(i).copied().flatten() {
            Some(command) => pod.apply_command(&command, first_turn),
            None => pod.coast(),
        }
    }

    collisions::move_with_collisions(&mut next);

    for pod in next.iter_mut() {
        pod.end_turn();
    }
    next
}
