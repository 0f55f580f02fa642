use std::collections::HashMap;

use log::info;

use crate::errors::BracketError;
use crate::modules::models::heat::{Bracket, Heat, HeatStatus};

pub struct Restructurer {}

impl Restructurer {
    /// # rebalance every over capacity heat
    /// scans the bracket for heats holding more than the capacity of 4 and
    /// splits each into two sibling heats in the same round, bigger half
    /// first (5 -> 3+2). repeats until the capacity invariant holds again.
    /// only a pending heat can be split; an over capacity heat in any other
    /// status is surfaced as an error instead of silently truncated.
    ///
    /// ## Arguments
    /// * `bracket` - the bracket to rebalance, mutated in place
    pub fn restructure(bracket: &mut Bracket) -> Result<(), BracketError> {
        loop {
            let overloaded = bracket
                .heats()
                .iter()
                .find(|heat| heat.over_capacity())
                .map(|heat| (heat.number, heat.status, heat.racers.len()));

            match overloaded {
                None => return Ok(()),
                Some((number, HeatStatus::Pending, count)) => {
                    info!(
                        target: "restructure",
                        "heat {} holds {} racers, splitting",
                        number, count
                    );
                    Restructurer::split(bracket, number);
                }
                Some((number, _, count)) => {
                    return Err(BracketError::OverCapacity(format!(
                        "heat {} holds {} racers but is no longer pending",
                        number, count
                    )));
                }
            }
        }
    }

    /// # split one over capacity heat in two
    /// the original keeps the first ceil(n/2) racers, a new sibling heat
    /// directly after it takes the rest. the sibling claims the next heat
    /// number; heats occupying a contiguous run of numbers after the
    /// original shift up by one to make room (a gap in the numbering
    /// absorbs the shift). forward pointers follow the renumbering and
    /// both halves feed the same downstream heats as before.
    fn split(bracket: &mut Bracket, number: i32) {
        // shift the contiguous run of numbers directly after the original
        let mut taken: Vec<i32> = bracket
            .heats()
            .iter()
            .map(|heat| heat.number)
            .filter(|n| *n > number)
            .collect();
        taken.sort();

        let mut renumbered: HashMap<i32, i32> = HashMap::new();
        let mut colliding = number + 1;
        for old in taken {
            if old != colliding {
                break;
            }
            renumbered.insert(old, old + 1);
            colliding = old + 1;
        }

        for round in &mut bracket.rounds {
            for heat in &mut round.heats {
                if let Some(new) = renumbered.get(&heat.number) {
                    heat.number = *new;
                }
                if let Some(target) = heat.next_heat {
                    if let Some(new) = renumbered.get(&target) {
                        heat.next_heat = Some(*new);
                    }
                }
                if let Some(target) = heat.next_losers_heat {
                    if let Some(new) = renumbered.get(&target) {
                        heat.next_losers_heat = Some(*new);
                    }
                }
            }
        }

        // carve the sibling off the original and slot it in right after
        for round in &mut bracket.rounds {
            let position = round.heats.iter().position(|heat| heat.number == number);
            if let Some(index) = position {
                let original = &mut round.heats[index];
                let keep = (original.racers.len() + 1) / 2;
                let moved = original.racers.split_off(keep);

                let mut sibling = Heat::new(number + 1, original.lane, original.round);
                sibling.racers = moved;
                sibling.next_heat = original.next_heat;
                sibling.next_losers_heat = original.next_losers_heat;

                round.heats.insert(index + 1, sibling);
                return;
            }
        }
    }
}
