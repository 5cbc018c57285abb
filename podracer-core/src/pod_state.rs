use glam::DVec2;

use crate::lap_info::CheckpointID;
use crate::vector_math::{self, Point};

// Heading the engine reports before a pod has ever been oriented
pub const UNKNOWN_HEADING: f64 = -1.0;

// PodState is what the engine tells us about one pod at the start of a turn
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PodState {
    pub position: DVec2,
    pub velocity: DVec2,
    pub heading: f64, // degrees, 0 = east, 90 = south
    pub next_checkpoint_id: CheckpointID,
}

impl PodState {
    pub fn new(position: DVec2, velocity: DVec2, heading: f64, next_checkpoint_id: CheckpointID) -> Self {
        Self {
            position,
            velocity,
            heading,
            next_checkpoint_id,
        }
    }

    pub fn reported_heading(&self) -> Option<f64> {
        if self.heading < 0.0 || !self.heading.is_finite() {
            None
        } else {
            Some(vector_math::normalize_heading(self.heading))
        }
    }
}

// Exactly one of these goes out per pod per turn; BOOST and SHIELD replace the
// numeric thrust entirely
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Thrust(i32),
    Boost,
    Shield,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Command {
    pub target: Point,
    pub action: Action,
}

impl Command {
    pub fn thrust(target: Point, thrust: i32) -> Self {
        Self {
            target,
            action: Action::Thrust(thrust),
        }
    }

    pub fn boost(target: Point) -> Self {
        Self {
            target,
            action: Action::Boost,
        }
    }

    pub fn shield(target: Point) -> Self {
        Self {
            target,
            action: Action::Shield,
        }
    }
}
