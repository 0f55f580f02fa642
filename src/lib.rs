use serde::{Deserialize, Serialize};

pub mod errors;
pub mod modules;
pub mod routes {
    pub mod api {
        pub mod bracket;
    }
}

use crate::modules::models::heat::Lane;

/// # heat completion event
/// the single mutating boundary payload of the engine: the declared result
/// of one heat. round and lane have to match the heat the number points at.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct HeatCompletionEvent {
    pub event_id: String,
    pub class_id: String,
    pub heat_number: i32,
    pub round: i32,
    pub lane: Lane,
    pub winners: Vec<i32>,
    pub losers: Vec<i32>,
    pub disqualified: Option<Vec<i32>>,
}

/// # finals ranking event
/// resolves the finals heat with a direct four way ranking instead of a
/// winner/loser pair.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct FinalsRankingEvent {
    pub event_id: String,
    pub class_id: String,
    pub rankings: RankingAssignment,
}

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Debug)]
pub struct RankingAssignment {
    pub first: i32,
    pub second: i32,
    pub third: i32,
    pub fourth: i32,
}
