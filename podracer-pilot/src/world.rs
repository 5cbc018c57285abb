use podracer_core::lap_info::CheckpointID;
use podracer_core::pod_state::PodState;
use podracer_core::protocol::TurnObservation;
use podracer_core::vector_math::{self, Point};
use podracer_core::PodID;

use crate::checkpoints::Layout;

// Everything the engine told us at the start of one turn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnSnapshot {
    pub turn: u32,
    pub pods: [PodState; 2],
    pub opponents: [PodState; 2],
}

// Distance and bearing from one of our pods to the checkpoint it is chasing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CheckpointFacts {
    pub target_id: CheckpointID,
    pub target: Point,
    pub distance: f64,
    pub angle: f64, // degrees, signed, 0 when we can't tell which way we face
}

// Holds this turn's snapshot and the one before it
#[derive(Default)]
pub struct World {
    current: Option<TurnSnapshot>,
    previous: Option<TurnSnapshot>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, observation: TurnObservation) {
        let turn = self.current.map_or(0, |snapshot| snapshot.turn + 1);
        self.previous = self.current.take();
        self.current = Some(TurnSnapshot {
            turn,
            pods: observation.pods,
            opponents: observation.opponents,
        });
    }

    pub fn current(&self) -> Option<&TurnSnapshot> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&TurnSnapshot> {
        self.previous.as_ref()
    }

    pub fn pod(&self, pod: PodID) -> Option<&PodState> {
        self.current.as_ref().and_then(|snapshot| snapshot.pods.get(pod))
    }

    pub fn previous_pod(&self, pod: PodID) -> Option<&PodState> {
        self.previous.as_ref().and_then(|snapshot| snapshot.pods.get(pod))
    }

    // Which way the pod points. The reported heading wins once we trust it;
    // otherwise fall back to the direction it moved since last turn.
    pub fn estimated_heading(&self, pod: PodID, trust_reported_heading: bool) -> Option<f64> {
        let state = self.pod(pod)?;
        if trust_reported_heading {
            if let Some(heading) = state.reported_heading() {
                return Some(heading);
            }
        }
        let previous = self.previous_pod(pod)?;
        vector_math::vector_to_heading(state.position - previous.position)
    }

    pub fn checkpoint_facts(
        &self,
        pod: PodID,
        layout: &Layout,
        trust_reported_heading: bool,
    ) -> Option<CheckpointFacts> {
        let state = self.pod(pod)?;
        let checkpoint = layout.checkpoint(state.next_checkpoint_id);
        let to_target = checkpoint.position - state.position;

        let angle = match self.estimated_heading(pod, trust_reported_heading) {
            Some(heading) => {
                vector_math::signed_angle_degrees(vector_math::heading_to_vector(heading), to_target)
            }
            None => 0.0,
        };

        Some(CheckpointFacts {
            target_id: checkpoint.id,
            target: checkpoint.position,
            distance: to_target.length(),
            angle,
        })
    }

    // Every pod on the track as the physics model sees it: ours first
    pub fn all_pods(&self) -> Vec<PodState> {
        self.current
            .iter()
            .flat_map(|snapshot| snapshot.pods.iter().chain(snapshot.opponents.iter()))
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;
    use podracer_core::pod_state::PodState;
    use podracer_core::protocol::TurnObservation;

    use super::World;
    use crate::checkpoints::Layout;

    fn observation(first: PodState) -> TurnObservation {
        let idle = PodState::new(DVec2::new(-5000.0, -5000.0), DVec2::ZERO, 0.0, 0);
        TurnObservation {
            pods: [first, idle],
            opponents: [idle, idle],
        }
    }

    fn layout() -> Layout {
        Layout::new([DVec2::new(0.0, 0.0), DVec2::new(1000.0, 0.0)]).unwrap()
    }

    #[test]
    fn test_previous_snapshot_is_last_turn() {
        let mut world = World::new();
        world.update(observation(PodState::new(DVec2::new(1.0, 2.0), DVec2::ZERO, 0.0, 1)));
        assert!(world.previous().is_none());
        world.update(observation(PodState::new(DVec2::new(3.0, 4.0), DVec2::ZERO, 0.0, 1)));

        assert_eq!(world.current().unwrap().turn, 1);
        assert_eq!(world.pod(0).unwrap().position, DVec2::new(3.0, 4.0));
        assert_eq!(world.previous_pod(0).unwrap().position, DVec2::new(1.0, 2.0));
        assert_eq!(world.all_pods().len(), 4);
    }

    #[test]
    fn test_facts_use_reported_heading_when_trusted() {
        let mut world = World::new();
        // facing south, checkpoint 1 is due east
        world.update(observation(PodState::new(DVec2::ZERO, DVec2::ZERO, 90.0, 1)));
        let facts = world.checkpoint_facts(0, &layout(), true).unwrap();
        assert_eq!(facts.target_id, 1);
        assert_eq!(facts.distance, 1000.0);
        assert!((facts.angle + 90.0).abs() < 1e-9);

        // untrusted and no history: no idea where we face
        let facts = world.checkpoint_facts(0, &layout(), false).unwrap();
        assert_eq!(facts.angle, 0.0);
    }

    #[test]
    fn test_heading_from_motion() {
        let mut world = World::new();
        world.update(observation(PodState::new(DVec2::new(0.0, 500.0), DVec2::ZERO, -1.0, 1)));
        world.update(observation(PodState::new(DVec2::new(0.0, 400.0), DVec2::ZERO, -1.0, 1)));

        // moved north, checkpoint 1 lies to the north-east
        assert_eq!(world.estimated_heading(0, true), Some(270.0));
        let facts = world.checkpoint_facts(0, &layout(), true).unwrap();
        assert!(facts.angle > 0.0 && facts.angle < 90.0);
    }
}
