use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// a heat never holds more than this many racers at rest
pub const HEAT_CAPACITY: usize = 4;

/// how many racers advance out of a winners lane heat
pub const ADVANCING_PER_HEAT: usize = 2;

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Winners,
    Losers,
    Final,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum HeatStatus {
    Pending,
    InProgress,
    Completed,
}

/// # the four way result of the finals heat
/// the slots are optional so a disqualification correction can clear a
/// single place without touching the others.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy)]
pub struct FinalRankings {
    pub first: Option<i32>,
    pub second: Option<i32>,
    pub third: Option<i32>,
    pub fourth: Option<i32>,
}

impl FinalRankings {
    /// clear every slot holding the given racer
    pub fn remove_racer(&mut self, racer_id: i32) {
        for slot in [
            &mut self.first,
            &mut self.second,
            &mut self.third,
            &mut self.fourth,
        ] {
            if *slot == Some(racer_id) {
                *slot = None;
            }
        }
    }
}

/// # the result of one completed heat
/// the router takes a single tagged outcome so the finals heat and the
/// regular heats go through the same entry point. a winner/loser outcome
/// against the finals heat (or a ranking against any other heat) is rejected.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub enum HeatOutcome {
    WinnerLoser {
        winners: Vec<i32>,
        losers: Vec<i32>,
        disqualified: Vec<i32>,
    },
    FinalRanking {
        first: i32,
        second: i32,
        third: i32,
        fourth: i32,
    },
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Heat {
    /// globally unique within the bracket, strictly increasing in creation order
    pub number: i32,
    pub lane: Lane,
    /// round index within the lane, 1-based
    pub round: i32,
    pub status: HeatStatus,
    /// racer ids currently assigned, in seed order for round 1
    pub racers: Vec<i32>,
    /// populated once the heat is completed
    pub winners: Vec<i32>,
    pub losers: Vec<i32>,
    pub disqualified: Vec<i32>,
    /// heat number the winners advance to, None for the finals
    pub next_heat: Option<i32>,
    /// heat number the losers drop to, only set on winners lane round 1 heats
    pub next_losers_heat: Option<i32>,
    /// only ever set on the finals heat
    pub rankings: Option<FinalRankings>,
}

impl Heat {
    /// # create an empty pending heat
    pub fn new(number: i32, lane: Lane, round: i32) -> Heat {
        Heat {
            number,
            lane,
            round,
            status: HeatStatus::Pending,
            racers: Vec::new(),
            winners: Vec::new(),
            losers: Vec::new(),
            disqualified: Vec::new(),
            next_heat: None,
            next_losers_heat: None,
            rankings: None,
        }
    }

    /// # add a racer to the heat
    /// additive and idempotent: a racer already in the heat is not
    /// duplicated, so re-routing a corrected result is a no-op.
    pub fn add_racer(&mut self, racer_id: i32) {
        if !self.racers.contains(&racer_id) {
            self.racers.push(racer_id);
        }
    }

    pub fn over_capacity(&self) -> bool {
        self.racers.len() > HEAT_CAPACITY
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Round {
    pub number: i32,
    pub lane: Lane,
    pub heats: Vec<Heat>,
}

impl Round {
    pub fn new(number: i32, lane: Lane) -> Round {
        Round {
            number,
            lane,
            heats: Vec::new(),
        }
    }
}

/// # the full bracket for one (event, class) pair
/// the ordered rounds spanning the winners lane, the losers lane and the
/// finals. all engine operations are read-modify-write over one of these.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Bracket {
    pub event_id: String,
    pub class_id: String,
    pub created_at: NaiveDateTime,
    pub rounds: Vec<Round>,
}

impl Bracket {
    pub fn new(event_id: &str, class_id: &str) -> Bracket {
        Bracket {
            event_id: event_id.to_string(),
            class_id: class_id.to_string(),
            created_at: chrono::Local::now().naive_local(),
            rounds: Vec::new(),
        }
    }

    /// # get a heat by its number
    pub fn heat(&self, number: i32) -> Option<&Heat> {
        self.rounds
            .iter()
            .flat_map(|round| round.heats.iter())
            .find(|heat| heat.number == number)
    }

    pub fn heat_mut(&mut self, number: i32) -> Option<&mut Heat> {
        self.rounds
            .iter_mut()
            .flat_map(|round| round.heats.iter_mut())
            .find(|heat| heat.number == number)
    }

    /// # get a round by lane and number
    pub fn round(&self, lane: Lane, number: i32) -> Option<&Round> {
        self.rounds
            .iter()
            .find(|round| round.lane == lane && round.number == number)
    }

    /// all heats across all rounds, in round order
    pub fn heats(&self) -> Vec<&Heat> {
        self.rounds
            .iter()
            .flat_map(|round| round.heats.iter())
            .collect()
    }

    /// the single finals heat of the bracket
    pub fn finals_heat(&self) -> Option<&Heat> {
        self.rounds
            .iter()
            .find(|round| round.lane == Lane::Final)
            .and_then(|round| round.heats.first())
    }
}
