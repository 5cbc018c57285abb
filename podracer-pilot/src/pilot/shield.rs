use podracer_core::pod_state::Command;
use podracer_core::GLOBAL_CONFIG;

use crate::physics::collisions::collision_time;
use crate::physics::PodEntity;

// Decides whether a pod should raise its shield instead of carrying out the
// command it was about to send. `others` are the pods we might hit, as they
// stand at the start of the turn.
pub trait ShieldPolicy {
    fn should_shield(&self, pod: &PodEntity, planned: &Command, others: &[PodEntity], first_turn: bool) -> bool;
}

// The baseline: never shield
pub struct NeverShield;

impl ShieldPolicy for NeverShield {
    fn should_shield(&self, _: &PodEntity, _: &Command, _: &[PodEntity], _: bool) -> bool {
        false
    }
}

// Shield when the physics model says we'll hit someone hard this turn
pub struct CollisionShield {
    pub min_impact_speed: f64,
}

impl ShieldPolicy for CollisionShield {
    fn should_shield(&self, pod: &PodEntity, planned: &Command, others: &[PodEntity], first_turn: bool) -> bool {
        let mut me = *pod;
        me.apply_command(planned, first_turn);

        others.iter().any(|other| {
            let mut other = *other;
            other.coast();
            collision_time(&me, &other, 1.0).is_some()
                && (me.velocity() - other.velocity()).length() >= self.min_impact_speed
        })
    }
}

pub fn shield_policy_from_config() -> Box<dyn ShieldPolicy> {
    if GLOBAL_CONFIG.shield_enabled {
        Box::new(CollisionShield {
            min_impact_speed: GLOBAL_CONFIG.shield_min_impact_speed,
        })
    } else {
        Box::new(NeverShield)
    }
}
