pub type LapNumber = u32;
pub type CheckpointID = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LapInformation {
    pub lap: LapNumber,
    pub current_checkpoint: CheckpointID,
}

impl LapInformation {
    pub fn new() -> Self {
        LapInformation {
            lap: 0,
            current_checkpoint: 0,
        }
    }
}

impl Default for LapInformation {
    fn default() -> Self {
        Self::new()
    }
}

// What moving to a newly observed checkpoint meant for the lap count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LapEvent {
    Unchanged,
    Advanced,
    LapCompleted(LapNumber),
}
