use log::info;

use crate::errors::BracketError;
use crate::modules::engine::sizer::HeatSizer;
use crate::modules::models::heat::{
    Bracket, Heat, Lane, Round, ADVANCING_PER_HEAT, HEAT_CAPACITY,
};
use crate::modules::models::racer::Racer;

pub struct BracketBuilder {}

impl BracketBuilder {
    /// # build the full bracket for a seeded roster
    /// runs the heat sizer, fills the round 1 heats with contiguous blocks
    /// of the roster in starting order, then wires up the downstream graph:
    /// a single winners semifinal, one or two second chance rounds and the
    /// finals heat. heat numbers come from a single counter replayed over
    /// the creation order, so the numbering is correct for any heat count.
    ///
    /// ## Arguments
    /// * `racers` - the seeded roster, starting positions already assigned
    /// * `event_id` - the event this bracket belongs to
    /// * `class_id` - the racing class within the event
    ///
    /// ## Returns
    /// * `Bracket` - the full pending bracket
    pub fn build(
        racers: &[Racer],
        event_id: &str,
        class_id: &str,
    ) -> Result<Bracket, BracketError> {
        let seeded = Racer::in_starting_order(racers);
        let sizes = HeatSizer::sizes(seeded.len())?;

        info!(
            target: "bracket_builder",
            "building bracket for event={} class={}: {} racers in {} heats",
            event_id, class_id, seeded.len(), sizes.len()
        );

        let mut bracket = Bracket::new(event_id, class_id);
        let mut next_number = 1;

        // round 1: one heat per size, filled with the next block of seeds
        let mut round_one = Round::new(1, Lane::Winners);
        let mut cursor = 0;
        for size in &sizes {
            let mut heat = Heat::new(next_number, Lane::Winners, 1);
            for racer in &seeded[cursor..cursor + size] {
                heat.racers.push(racer.id);
            }
            cursor += size;
            next_number += 1;
            round_one.heats.push(heat);
        }

        // the single winners semifinal every round 1 heat advances into
        let semifinal_number = next_number;
        next_number += 1;
        let mut semifinal = Heat::new(semifinal_number, Lane::Winners, 2);

        // second chance round 1, fed by every round 1 heat
        let losers_one_number = next_number;
        next_number += 1;
        let mut losers_one = Heat::new(losers_one_number, Lane::Losers, 1);

        for heat in &mut round_one.heats {
            heat.next_heat = Some(semifinal_number);
            heat.next_losers_heat = Some(losers_one_number);
        }

        // with 3 or more round 1 heats the semifinal will take in more
        // winners than it can hold and gets split after routing. skip the
        // numbers those sibling heats will claim so the rest of the bracket
        // keeps its numbering when that happens.
        let semifinal_intake = sizes.len() * ADVANCING_PER_HEAT;
        let reserved = (semifinal_intake + HEAT_CAPACITY - 1) / HEAT_CAPACITY - 1;
        next_number += reserved as i32;

        // a second second-chance round once round 1 drops more than 2 racers
        let expected_losers = HeatSizer::expected_losers(&sizes);
        let mut losers_two = if expected_losers > 2 {
            let heat = Heat::new(next_number, Lane::Losers, 2);
            next_number += 1;
            Some(heat)
        } else {
            None
        };

        let finals_number = next_number;
        let finals = Heat::new(finals_number, Lane::Final, 1);

        semifinal.next_heat = Some(finals_number);
        match losers_two.as_mut() {
            Some(heat) => {
                losers_one.next_heat = Some(heat.number);
                heat.next_heat = Some(finals_number);
            }
            None => losers_one.next_heat = Some(finals_number),
        }

        bracket.rounds.push(round_one);

        let mut round_two = Round::new(2, Lane::Winners);
        round_two.heats.push(semifinal);
        bracket.rounds.push(round_two);

        let mut losers_round_one = Round::new(1, Lane::Losers);
        losers_round_one.heats.push(losers_one);
        bracket.rounds.push(losers_round_one);

        if let Some(heat) = losers_two {
            let mut losers_round_two = Round::new(2, Lane::Losers);
            losers_round_two.heats.push(heat);
            bracket.rounds.push(losers_round_two);
        }

        let mut final_round = Round::new(1, Lane::Final);
        final_round.heats.push(finals);
        bracket.rounds.push(final_round);

        Ok(bracket)
    }
}
