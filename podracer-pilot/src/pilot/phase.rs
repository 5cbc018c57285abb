#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RacerPhase {
    // The first turn: heading is unconstrained and we haven't committed to
    // anything yet, so no boost and no trusting the reported angle
    Discovery,
    // Normal policy
    Racing,
    // The engine says we're done; only no-op commands from here on
    Finished,
}

impl RacerPhase {
    pub fn is_first_turn(&self) -> bool {
        matches!(self, RacerPhase::Discovery)
    }

    // Discovery ends as soon as one command has gone out
    pub fn after_commit(self) -> Self {
        match self {
            RacerPhase::Discovery => RacerPhase::Racing,
            other => other,
        }
    }
}
