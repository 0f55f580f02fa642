use serde::{Deserialize, Serialize};

use log::warn;

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Racer {
    pub id: i32,
    pub name: String,
    pub bib: i32,
    /// qualifying time in seconds, missing until the racer has been timed
    pub seed_time: Option<f64>,
    /// 1-based rank by ascending seed time, computed by `assign_starting_positions`
    pub starting_position: Option<i32>,
}

impl Racer {
    /// # assign starting positions
    /// rank the roster by ascending seed time and write the 1-based rank
    /// into each racer. the sort is stable so racers with equal times keep
    /// their original order. racers without a seed time are not ranked.
    ///
    /// ## Arguments
    /// * `racers` - the full roster for one class
    pub fn assign_starting_positions(racers: &mut Vec<Racer>) {
        let mut order: Vec<usize> = (0..racers.len())
            .filter(|index| racers[*index].seed_time.is_some())
            .collect();

        order.sort_by(|a, b| {
            let time_a = racers[*a].seed_time.unwrap_or(f64::INFINITY);
            let time_b = racers[*b].seed_time.unwrap_or(f64::INFINITY);
            time_a.total_cmp(&time_b)
        });

        for racer in racers.iter_mut() {
            racer.starting_position = None;
        }
        for (rank, index) in order.iter().enumerate() {
            racers[*index].starting_position = Some(rank as i32 + 1);
        }
    }

    /// # get the roster in starting order
    /// the seeded racers sorted by starting position. racers without a
    /// position are dropped, the caller is expected to have guarded
    /// against an unseeded roster already.
    pub fn in_starting_order(racers: &[Racer]) -> Vec<Racer> {
        let unseeded = racers
            .iter()
            .filter(|racer| racer.starting_position.is_none())
            .count();
        if unseeded > 0 {
            warn!(target: "seeding", "{} racers without a starting position left out", unseeded);
        }

        let mut seeded: Vec<Racer> = racers
            .iter()
            .filter(|racer| racer.starting_position.is_some())
            .cloned()
            .collect();
        seeded.sort_by_key(|racer| racer.starting_position.unwrap());

        seeded
    }

    /// true when nobody in the roster has a recorded seed time yet
    pub fn no_seed_times(racers: &[Racer]) -> bool {
        racers.iter().all(|racer| racer.seed_time.is_none())
    }
}
