use std::error::Error;
use std::fmt;

/// # engine errors
/// every fallible engine operation returns one of these.
/// a failed operation never leaves a half mutated bracket behind:
/// the router and restructurer work on a copy and only hand it back on success.
#[derive(Debug, Clone, PartialEq)]
pub enum BracketError {
    /// the bracket, heat, or round asked for does not exist
    NotFound(String),
    /// the heat sizer was asked to size fewer than 1 racer
    InvalidRacerCount(usize),
    /// a heat holds more racers than the restructurer can cleanly resolve
    OverCapacity(String),
    /// a winner/loser outcome was recorded against the finals heat,
    /// or a four way ranking against a non finals heat
    InvalidOutcome(String),
}

impl fmt::Display for BracketError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BracketError::NotFound(details) => write!(f, "not found: {}", details),
            BracketError::InvalidRacerCount(n) => {
                write!(f, "cannot size heats for {} racers", n)
            }
            BracketError::OverCapacity(details) => write!(f, "over capacity: {}", details),
            BracketError::InvalidOutcome(details) => write!(f, "invalid outcome: {}", details),
        }
    }
}

impl Error for BracketError {}
