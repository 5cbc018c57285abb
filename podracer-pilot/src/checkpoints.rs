use std::collections::HashSet;

use glam::DVec2;
use podracer_core::lap_info::*;
use podracer_core::vector_math::Point;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("a circuit needs at least one checkpoint")]
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Checkpoint {
    pub id: CheckpointID,
    pub position: Point,
}

impl Checkpoint {
    pub fn new(id: CheckpointID, position: Point) -> Self {
        Self { id, position }
    }
}

// Checkpoints are identified by their exact coordinates. Bit patterns make the
// pair hashable; adding 0.0 folds -0.0 into 0.0 so the two still compare equal.
fn coordinate_key(pos: Point) -> (u64, u64) {
    ((pos.x + 0.0).to_bits(), (pos.y + 0.0).to_bits())
}

// The circuit as we know it, plus where one pod is on it
#[derive(Clone, Debug)]
pub struct Layout {
    checkpoints: Vec<Checkpoint>,
    known_positions: HashSet<(u64, u64)>,
    lap_info: LapInformation,
    // index of the checkpoint that starts the longest leg, known after the first lap
    longest_leg: Option<CheckpointID>,
}

impl Layout {
    pub fn new(positions: impl IntoIterator<Item = Point>) -> Result<Self, LayoutError> {
        let mut layout = Layout {
            checkpoints: Vec::new(),
            known_positions: HashSet::new(),
            lap_info: LapInformation::new(),
            longest_leg: None,
        };
        for pos in positions {
            layout.insert_if_new(pos);
        }

        if layout.is_empty() {
            return Err(LayoutError::Empty);
        }
        Ok(layout)
    }

    pub fn insert_if_new(&mut self, pos: Point) -> bool {
        if !self.known_positions.insert(coordinate_key(pos)) {
            return false;
        }
        let id = self.checkpoints.len();
        debug!(id, x = pos.x, y = pos.y, "inserted checkpoint");
        self.checkpoints.push(Checkpoint::new(id, pos));
        true
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn checkpoint(&self, index: CheckpointID) -> &Checkpoint {
        &self.checkpoints[index % self.checkpoints.len()]
    }

    pub fn current_index(&self) -> CheckpointID {
        self.lap_info.current_checkpoint
    }

    pub fn current_checkpoint(&self) -> &Checkpoint {
        self.checkpoint(self.lap_info.current_checkpoint)
    }

    pub fn checkpoint_after_current(&self) -> &Checkpoint {
        self.checkpoint(self.lap_info.current_checkpoint + 1)
    }

    pub fn lap(&self) -> LapNumber {
        self.lap_info.lap
    }

    pub fn longest_leg(&self) -> Option<CheckpointID> {
        self.longest_leg
    }

    fn position_index(&self, pos: Point) -> Option<CheckpointID> {
        self.checkpoints
            .iter()
            .position(|checkpoint| checkpoint.position.x == pos.x && checkpoint.position.y == pos.y)
    }

    // An unknown position is a checkpoint we were never told about; learn it
    // rather than fail
    pub fn advance_to_observed_checkpoint(&mut self, pos: Point) -> LapEvent {
        let index = match self.position_index(pos) {
            Some(index) => index,
            None => {
                warn!(x = pos.x, y = pos.y, "observed checkpoint missing from layout");
                self.insert_if_new(pos);
                self.checkpoints.len() - 1
            }
        };
        self.advance_to_index(index)
    }

    pub fn advance_to_index(&mut self, index: CheckpointID) -> LapEvent {
        let index = index % self.checkpoints.len();
        let previous = self.lap_info.current_checkpoint;
        if index == previous {
            return LapEvent::Unchanged;
        }
        self.lap_info.current_checkpoint = index;

        // only the step from the last checkpoint back onto the first closes a lap
        if index == 0 && previous == self.checkpoints.len() - 1 {
            self.lap_info.lap += 1;
            self.recompute_longest_leg();
            info!(lap = self.lap_info.lap, "lap completed");
            return LapEvent::LapCompleted(self.lap_info.lap);
        }
        LapEvent::Advanced
    }

    pub fn recompute_longest_leg(&mut self) {
        let mut longest: Option<(CheckpointID, f64)> = None;
        for (i, checkpoint) in self.checkpoints.iter().enumerate() {
            let next: DVec2 = self.checkpoint(i + 1).position;
            let distance_squared = checkpoint.position.distance_squared(next);
            // strictly greater, so the first of equally long legs wins
            if longest.map_or(true, |(_, best)| distance_squared > best) {
                longest = Some((i, distance_squared));
            }
        }
        self.longest_leg = longest.map(|(index, _)| index);
        debug!(longest_leg = ?self.longest_leg, "recomputed longest leg");
    }

    // True while chasing the checkpoint that ends the longest leg, i.e. while
    // driving the leg itself
    pub fn is_on_longest_leg(&self) -> bool {
        self.longest_leg
            .map_or(false, |start| (start + 1) % self.checkpoints.len() == self.lap_info.current_checkpoint)
    }
}
