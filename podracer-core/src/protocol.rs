use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use glam::DVec2;
use thiserror::Error;

use crate::lap_info::LapNumber;
use crate::pod_state::{Action, Command, PodState, UNKNOWN_HEADING};
use crate::vector_math::{self, Point};
use crate::GLOBAL_CONFIG;

pub const PODS_PER_TEAM: usize = 2;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("malformed observation: {field} {reason}")]
    MalformedObservation { field: &'static str, reason: String },
    #[error("input ended while reading {field}")]
    UnexpectedEnd { field: &'static str },
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn malformed(field: &'static str, reason: impl Into<String>) -> ProtocolError {
    ProtocolError::MalformedObservation {
        field,
        reason: reason.into(),
    }
}

// Hands out whitespace separated tokens regardless of how the engine split
// them across lines
pub struct TokenReader<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn fill(&mut self) -> Result<bool, ProtocolError> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(false);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(true)
    }

    // true once nothing but whitespace is left
    pub fn at_end(&mut self) -> Result<bool, ProtocolError> {
        Ok(!self.fill()?)
    }

    pub fn next_token(&mut self, field: &'static str) -> Result<String, ProtocolError> {
        if !self.fill()? {
            return Err(ProtocolError::UnexpectedEnd { field });
        }
        self.pending
            .pop_front()
            .ok_or(ProtocolError::UnexpectedEnd { field })
    }

    pub fn next_value<T>(&mut self, field: &'static str) -> Result<T, ProtocolError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let token = self.next_token(field)?;
        token
            .parse()
            .map_err(|e| malformed(field, format!("'{}': {}", token, e)))
    }

    fn next_coordinate(&mut self, field: &'static str) -> Result<f64, ProtocolError> {
        let value: f64 = self.next_value(field)?;
        if !value.is_finite() {
            return Err(malformed(field, "is not a finite number"));
        }
        Ok(value)
    }

    fn next_point(&mut self, x_field: &'static str, y_field: &'static str) -> Result<Point, ProtocolError> {
        let x = self.next_coordinate(x_field)?;
        let y = self.next_coordinate(y_field)?;
        Ok(DVec2::new(x, y))
    }
}

pub trait Observation: Sized {
    fn parse<R: BufRead>(reader: &mut TokenReader<R>) -> Result<Self, ProtocolError>;

    // None when the engine closed the stream between two observations
    fn parse_next<R: BufRead>(reader: &mut TokenReader<R>) -> Result<Option<Self>, ProtocolError> {
        if reader.at_end()? {
            return Ok(None);
        }
        Self::parse(reader).map(Some)
    }
}

// Sent once, before the first turn
#[derive(Clone, Debug, PartialEq)]
pub struct RaceSetup {
    pub laps: LapNumber,
    pub checkpoints: Vec<Point>,
}

impl Observation for RaceSetup {
    fn parse<R: BufRead>(reader: &mut TokenReader<R>) -> Result<Self, ProtocolError> {
        let laps: LapNumber = reader.next_value("laps")?;
        if laps == 0 {
            return Err(malformed("laps", "must be at least 1"));
        }
        let count: usize = reader.next_value("checkpointCount")?;
        if count == 0 {
            return Err(malformed("checkpointCount", "must be at least 1"));
        }

        let checkpoints = (0..count)
            .map(|_| reader.next_point("checkpointX", "checkpointY"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RaceSetup { laps, checkpoints })
    }
}

impl Observation for PodState {
    fn parse<R: BufRead>(reader: &mut TokenReader<R>) -> Result<Self, ProtocolError> {
        let position = reader.next_point("x", "y")?;
        let velocity = reader.next_point("vx", "vy")?;

        let heading = reader.next_coordinate("angle")?;
        if !(UNKNOWN_HEADING..=360.0).contains(&heading) {
            return Err(malformed("angle", format!("{} is outside [-1, 360]", heading)));
        }

        let next_checkpoint_id: i64 = reader.next_value("nextCheckPointId")?;
        if next_checkpoint_id < 0 {
            return Err(malformed("nextCheckPointId", "must not be negative"));
        }

        Ok(PodState::new(
            position,
            velocity,
            heading,
            next_checkpoint_id as usize,
        ))
    }
}

// Our pods first, then the opponents, every turn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnObservation {
    pub pods: [PodState; PODS_PER_TEAM],
    pub opponents: [PodState; PODS_PER_TEAM],
}

impl Observation for TurnObservation {
    fn parse<R: BufRead>(reader: &mut TokenReader<R>) -> Result<Self, ProtocolError> {
        let pods = [PodState::parse(reader)?, PodState::parse(reader)?];
        let opponents = [PodState::parse(reader)?, PodState::parse(reader)?];
        Ok(TurnObservation { pods, opponents })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = vector_math::to_grid(self.target);
        match self.action {
            Action::Thrust(thrust) => write!(
                f,
                "{} {} {}",
                x,
                y,
                thrust.clamp(0, GLOBAL_CONFIG.max_thrust)
            ),
            Action::Boost => write!(f, "{} {} BOOST", x, y),
            Action::Shield => write!(f, "{} {} SHIELD", x, y),
        }
    }
}

pub fn write_command<W: Write>(write: &mut W, command: &Command) -> io::Result<()> {
    writeln!(write, "{}", command)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use glam::DVec2;

    use super::*;

    fn reader(input: &str) -> TokenReader<Cursor<Vec<u8>>> {
        TokenReader::new(Cursor::new(input.as_bytes().to_vec()))
    }

    #[test]
    fn test_parse_race_setup() {
        let mut input = reader("3\n4\n1000 1000\n5000 1000\n5000 5000\n1000 5000\n");
        let setup = RaceSetup::parse(&mut input).unwrap();
        assert_eq!(setup.laps, 3);
        assert_eq!(setup.checkpoints.len(), 4);
        assert_eq!(setup.checkpoints[2], DVec2::new(5000.0, 5000.0));
        assert!(input.at_end().unwrap());
    }

    #[test]
    fn test_setup_rejects_empty_circuit() {
        let mut input = reader("3 0\n");
        let err = RaceSetup::parse(&mut input).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::MalformedObservation {
                field: "checkpointCount",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_turn_observation() {
        let mut input = reader(
            "100 200 3 -4 90 1\n\
             300 400 0 0 -1 1\n\
             500 600 7 8 359 2\n\
             700 800 0 0 0 0\n",
        );
        let turn = TurnObservation::parse_next(&mut input).unwrap().unwrap();
        assert_eq!(turn.pods[0].position, DVec2::new(100.0, 200.0));
        assert_eq!(turn.pods[0].velocity, DVec2::new(3.0, -4.0));
        assert_eq!(turn.pods[0].reported_heading(), Some(90.0));
        assert_eq!(turn.pods[1].reported_heading(), None);
        assert_eq!(turn.opponents[0].next_checkpoint_id, 2);
        assert_eq!(turn.opponents[1].position, DVec2::new(700.0, 800.0));
        assert!(TurnObservation::parse_next(&mut input).unwrap().is_none());
    }

    #[test]
    fn test_truncated_turn_is_an_error() {
        let mut input = reader("100 200 3 -4 90 1\n300 400\n");
        let err = TurnObservation::parse(&mut input).unwrap_err();
        assert!(matches!(err, ProtocolError::UnexpectedEnd { field: "vx" }));
    }

    #[test]
    fn test_garbage_fields_are_malformed() {
        let mut input = reader("100 abc 3 -4 90 1\n");
        assert!(matches!(
            PodState::parse(&mut input).unwrap_err(),
            ProtocolError::MalformedObservation { field: "y", .. }
        ));

        let mut input = reader("100 200 3 -4 720 1\n");
        assert!(matches!(
            PodState::parse(&mut input).unwrap_err(),
            ProtocolError::MalformedObservation { field: "angle", .. }
        ));

        let mut input = reader("100 200 3 -4 90 -2\n");
        assert!(matches!(
            PodState::parse(&mut input).unwrap_err(),
            ProtocolError::MalformedObservation {
                field: "nextCheckPointId",
                ..
            }
        ));
    }

    #[test]
    fn test_command_formatting() {
        let target = DVec2::new(1234.7, -56.2);
        assert_eq!(Command::thrust(target, 75).to_string(), "1234 -56 75");
        assert_eq!(Command::thrust(target, 250).to_string(), "1234 -56 100");
        assert_eq!(Command::boost(target).to_string(), "1234 -56 BOOST");
        assert_eq!(Command::shield(target).to_string(), "1234 -56 SHIELD");

        let mut out = Vec::new();
        write_command(&mut out, &Command::thrust(target, 0)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1234 -56 0\n");
    }
}
