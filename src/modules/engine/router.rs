use log::{info, warn};

use crate::errors::BracketError;
use crate::modules::engine::restructure::Restructurer;
use crate::modules::helpers::general::Helpers;
use crate::modules::models::heat::{
    Bracket, FinalRankings, HeatOutcome, HeatStatus, Lane,
};
use crate::HeatCompletionEvent;

pub struct ProgressionRouter {}

impl ProgressionRouter {
    /// # record a completed heat and route its racers
    /// the single mutating entry point of the engine. marks the heat
    /// completed, stores its result, moves winners and losers into the
    /// heats the forward pointers reference and rebalances anything that
    /// went over capacity. the whole step is atomic: it works on a copy
    /// and either hands back the fully updated bracket or an error with
    /// the input untouched.
    ///
    /// ## Arguments
    /// * `bracket` - the bracket the heat belongs to
    /// * `heat_number` - the heat the outcome is for
    /// * `outcome` - winner/loser lists, or the four way finals ranking
    ///
    /// ## Returns
    /// * `Bracket` - the updated bracket
    pub fn record_outcome(
        bracket: &Bracket,
        heat_number: i32,
        outcome: HeatOutcome,
    ) -> Result<Bracket, BracketError> {
        let heat = bracket.heat(heat_number).ok_or_else(|| {
            BracketError::NotFound(format!("heat {} does not exist", heat_number))
        })?;

        let mut updated = bracket.clone();
        match (heat.lane, outcome) {
            (Lane::Final, HeatOutcome::FinalRanking { first, second, third, fourth }) => {
                ProgressionRouter::apply_ranking(&mut updated, heat_number, first, second, third, fourth);
            }
            (Lane::Final, HeatOutcome::WinnerLoser { .. }) => {
                return Err(BracketError::InvalidOutcome(format!(
                    "heat {} is the finals and takes a four way ranking",
                    heat_number
                )));
            }
            (_, HeatOutcome::FinalRanking { .. }) => {
                return Err(BracketError::InvalidOutcome(format!(
                    "heat {} is not the finals, record winners and losers",
                    heat_number
                )));
            }
            (_, HeatOutcome::WinnerLoser { winners, losers, disqualified }) => {
                ProgressionRouter::apply_winner_loser(
                    &mut updated,
                    heat_number,
                    &winners,
                    &losers,
                    &disqualified,
                )?;
            }
        }

        Restructurer::restructure(&mut updated)?;
        Ok(updated)
    }

    /// # record a completion event
    /// convenience wrapper over `record_outcome` for the boundary event
    /// payload. the round and lane in the event have to match the heat the
    /// number points at, otherwise the event is treated as referencing a
    /// heat that does not exist.
    pub fn record_completion(
        bracket: &Bracket,
        event: &HeatCompletionEvent,
    ) -> Result<Bracket, BracketError> {
        let heat = bracket.heat(event.heat_number).ok_or_else(|| {
            BracketError::NotFound(format!("heat {} does not exist", event.heat_number))
        })?;
        if heat.round != event.round || heat.lane != event.lane {
            return Err(BracketError::NotFound(format!(
                "heat {} is not in round {} of the {:?} lane",
                event.heat_number, event.round, event.lane
            )));
        }

        ProgressionRouter::record_outcome(
            bracket,
            event.heat_number,
            HeatOutcome::WinnerLoser {
                winners: event.winners.clone(),
                losers: event.losers.clone(),
                disqualified: event.disqualified.clone().unwrap_or_default(),
            },
        )
    }

    /// # disqualify a racer after the fact
    /// removes the racer from every winners/losers list and finals ranking
    /// slot, pulls them out of any heat they were routed into that has not
    /// run yet, and records the disqualification on the completed heats
    /// they raced in. nothing is renumbered and already advanced racers
    /// are not re-routed.
    pub fn disqualify(bracket: &Bracket, racer_id: i32) -> Result<Bracket, BracketError> {
        if !bracket
            .heats()
            .iter()
            .any(|heat| heat.racers.contains(&racer_id))
        {
            return Err(BracketError::NotFound(format!(
                "racer {} is not in any heat of this bracket",
                racer_id
            )));
        }

        info!(
            target: "routing",
            "disqualifying racer {} from bracket event={} class={}",
            racer_id, bracket.event_id, bracket.class_id
        );

        let mut updated = bracket.clone();
        for round in &mut updated.rounds {
            for heat in &mut round.heats {
                heat.winners.retain(|id| *id != racer_id);
                heat.losers.retain(|id| *id != racer_id);
                if let Some(rankings) = heat.rankings.as_mut() {
                    rankings.remove_racer(racer_id);
                }

                if heat.status == HeatStatus::Completed {
                    if heat.racers.contains(&racer_id) && !heat.disqualified.contains(&racer_id) {
                        heat.disqualified.push(racer_id);
                    }
                } else {
                    heat.racers.retain(|id| *id != racer_id);
                }
            }
        }

        Ok(updated)
    }

    /// complete a winners or losers lane heat and move its racers along the
    /// forward pointers. disqualified racers are dropped from both routed
    /// sets so they never occupy a downstream slot.
    fn apply_winner_loser(
        bracket: &mut Bracket,
        heat_number: i32,
        winners: &[i32],
        losers: &[i32],
        disqualified: &[i32],
    ) -> Result<(), BracketError> {
        let heat = bracket.heat(heat_number).unwrap();
        let winners_target = heat.next_heat;
        let losers_target = heat.next_losers_heat;

        // both targets have to exist before anything is written
        for target in [winners_target, losers_target].into_iter().flatten() {
            if bracket.heat(target).is_none() {
                return Err(BracketError::NotFound(format!(
                    "heat {} points at heat {} which does not exist",
                    heat_number, target
                )));
            }
        }

        let advancing = Helpers::get_difference_between_vectors(winners, disqualified);
        let dropping = Helpers::get_difference_between_vectors(losers, disqualified);

        let heat = bracket.heat_mut(heat_number).unwrap();
        heat.status = HeatStatus::Completed;
        heat.winners = winners.to_vec();
        heat.losers = losers.to_vec();
        heat.disqualified = disqualified.to_vec();

        if let Some(target) = winners_target {
            let routed = ProgressionRouter::route_into(bracket, target, &advancing);
            info!(
                target: "routing",
                "heat {} completed, {} winners advance to heat {}",
                heat_number, routed, target
            );
        }

        match losers_target {
            Some(target) => {
                let routed = ProgressionRouter::route_into(bracket, target, &dropping);
                info!(
                    target: "routing",
                    "heat {} completed, {} losers drop to heat {}",
                    heat_number, routed, target
                );
            }
            None => {
                // no losers pointer means elimination, e.g. the semifinal
                if !dropping.is_empty() {
                    info!(
                        target: "routing",
                        "heat {} completed, {} racers eliminated",
                        heat_number, dropping.len()
                    );
                }
            }
        }

        if !disqualified.is_empty() {
            warn!(
                target: "routing",
                "heat {} had {} disqualified racers, none were routed",
                heat_number, disqualified.len()
            );
        }

        Ok(())
    }

    /// # append routed racers to a heat
    /// skips every racer already racing somewhere in the target's round:
    /// once a split has spread the routed-in racers over sibling heats,
    /// re-routing the same result must not append them to the original
    /// again. returns how many racers were actually added.
    fn route_into(bracket: &mut Bracket, target: i32, racers: &[i32]) -> usize {
        let (lane, round) = {
            let heat = bracket.heat(target).unwrap();
            (heat.lane, heat.round)
        };

        let mut present = Vec::new();
        if let Some(round) = bracket.round(lane, round) {
            for heat in &round.heats {
                present.extend(heat.racers.iter().copied());
            }
        }

        let missing = Helpers::get_difference_between_vectors(racers, &present);
        let heat = bracket.heat_mut(target).unwrap();
        for racer_id in &missing {
            heat.add_racer(*racer_id);
        }

        missing.len()
    }

    /// resolve the finals heat with the direct four way ranking. the
    /// winner/loser pair is kept alongside the ranking so disqualification
    /// corrections work the same way as everywhere else.
    fn apply_ranking(
        bracket: &mut Bracket,
        heat_number: i32,
        first: i32,
        second: i32,
        third: i32,
        fourth: i32,
    ) {
        let heat = bracket.heat_mut(heat_number).unwrap();
        heat.status = HeatStatus::Completed;
        heat.rankings = Some(FinalRankings {
            first: Some(first),
            second: Some(second),
            third: Some(third),
            fourth: Some(fourth),
        });
        heat.winners = vec![first, second];
        heat.losers = vec![third, fourth];

        info!(
            target: "routing",
            "finals heat {} resolved: first={} second={} third={} fourth={}",
            heat_number, first, second, third, fourth
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::engine::builder::BracketBuilder;
    use crate::modules::models::racer::Racer;

    fn roster(count: i32) -> Vec<Racer> {
        let mut racers: Vec<Racer> = (1..=count)
            .map(|id| Racer {
                id,
                name: format!("racer {}", id),
                bib: 100 + id,
                seed_time: Some(38.0 + id as f64),
                starting_position: None,
            })
            .collect();
        Racer::assign_starting_positions(&mut racers);
        racers
    }

    fn winner_loser(winners: Vec<i32>, losers: Vec<i32>) -> HeatOutcome {
        HeatOutcome::WinnerLoser {
            winners,
            losers,
            disqualified: Vec::new(),
        }
    }

    #[test]
    fn round_one_routes_winners_and_losers() {
        // heats 1 and 2 hold racers 1,2,3 and 4,5,6
        let bracket = BracketBuilder::build(&roster(6), "event", "class").unwrap();

        let bracket =
            ProgressionRouter::record_outcome(&bracket, 1, winner_loser(vec![1, 2], vec![3]))
                .unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 2, winner_loser(vec![4, 5], vec![6]))
                .unwrap();

        assert_eq!(bracket.heat(1).unwrap().status, HeatStatus::Completed);
        assert_eq!(bracket.heat(3).unwrap().racers, vec![1, 2, 4, 5]);
        assert_eq!(bracket.heat(4).unwrap().racers, vec![3, 6]);
    }

    #[test]
    fn routing_is_idempotent() {
        let bracket = BracketBuilder::build(&roster(6), "event", "class").unwrap();

        let outcome = winner_loser(vec![1, 2], vec![3]);
        let once = ProgressionRouter::record_outcome(&bracket, 1, outcome.clone()).unwrap();
        let twice = ProgressionRouter::record_outcome(&once, 1, outcome).unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.heat(3).unwrap().racers, vec![1, 2]);
    }

    #[test]
    fn routing_stays_idempotent_after_a_split() {
        // 9 racers: the third completion overloads the semifinal and
        // splits it over heats 4 and 5
        let bracket = BracketBuilder::build(&roster(9), "event", "class").unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 1, winner_loser(vec![1, 2], vec![3]))
                .unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 2, winner_loser(vec![4, 5], vec![6]))
                .unwrap();

        let outcome = winner_loser(vec![7, 8], vec![9]);
        let once = ProgressionRouter::record_outcome(&bracket, 3, outcome.clone()).unwrap();
        let twice = ProgressionRouter::record_outcome(&once, 3, outcome).unwrap();

        assert_eq!(once, twice);

        // the winners stay in the sibling heat, nothing re-appends them to
        // the original and nothing splits or renumbers again
        let round_two = twice.round(Lane::Winners, 2).unwrap();
        assert_eq!(round_two.heats.len(), 2);
        assert_eq!(round_two.heats[0].racers, vec![1, 2, 4]);
        assert_eq!(round_two.heats[1].racers, vec![5, 7, 8]);
        assert_eq!(twice.finals_heat().unwrap().number, 8);
    }

    #[test]
    fn disqualified_racers_are_not_routed() {
        let bracket = BracketBuilder::build(&roster(6), "event", "class").unwrap();

        let outcome = HeatOutcome::WinnerLoser {
            winners: vec![1, 2],
            losers: vec![3],
            disqualified: vec![3],
        };
        let bracket = ProgressionRouter::record_outcome(&bracket, 1, outcome).unwrap();

        // the no-show loser does not take a second chance slot
        assert!(bracket.heat(4).unwrap().racers.is_empty());
        assert_eq!(bracket.heat(1).unwrap().disqualified, vec![3]);
    }

    #[test]
    fn semifinal_losers_are_eliminated() {
        let bracket = BracketBuilder::build(&roster(6), "event", "class").unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 1, winner_loser(vec![1, 2], vec![3]))
                .unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 2, winner_loser(vec![4, 5], vec![6]))
                .unwrap();

        let bracket =
            ProgressionRouter::record_outcome(&bracket, 3, winner_loser(vec![1, 4], vec![2, 5]))
                .unwrap();

        // semifinal winners reach the finals, its losers are out of the bracket
        assert_eq!(bracket.finals_heat().unwrap().racers, vec![1, 4]);
        for heat in bracket.heats() {
            if heat.lane == Lane::Losers {
                assert!(!heat.racers.contains(&2));
                assert!(!heat.racers.contains(&5));
            }
        }
    }

    #[test]
    fn second_chance_winners_reach_the_finals() {
        let bracket = BracketBuilder::build(&roster(6), "event", "class").unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 1, winner_loser(vec![1, 2], vec![3]))
                .unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 2, winner_loser(vec![4, 5], vec![6]))
                .unwrap();

        // no second losers round in a 6 racer bracket: heat 4 feeds the finals
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 4, winner_loser(vec![3, 6], vec![]))
                .unwrap();

        assert_eq!(bracket.finals_heat().unwrap().racers, vec![3, 6]);
    }

    #[test]
    fn completion_event_checks_round_and_lane() {
        let bracket = BracketBuilder::build(&roster(6), "event", "class").unwrap();

        let event = HeatCompletionEvent {
            event_id: "event".to_string(),
            class_id: "class".to_string(),
            heat_number: 1,
            round: 2,
            lane: Lane::Winners,
            winners: vec![1, 2],
            losers: vec![3],
            disqualified: None,
        };
        assert!(matches!(
            ProgressionRouter::record_completion(&bracket, &event),
            Err(BracketError::NotFound(_))
        ));

        let event = HeatCompletionEvent { round: 1, ..event };
        assert!(ProgressionRouter::record_completion(&bracket, &event).is_ok());
    }

    #[test]
    fn finals_take_a_ranking_and_nothing_else() {
        let bracket = BracketBuilder::build(&roster(6), "event", "class").unwrap();
        let finals_number = bracket.finals_heat().unwrap().number;

        assert!(matches!(
            ProgressionRouter::record_outcome(
                &bracket,
                finals_number,
                winner_loser(vec![1, 2], vec![3, 4])
            ),
            Err(BracketError::InvalidOutcome(_))
        ));
        assert!(matches!(
            ProgressionRouter::record_outcome(
                &bracket,
                1,
                HeatOutcome::FinalRanking { first: 1, second: 2, third: 3, fourth: 4 }
            ),
            Err(BracketError::InvalidOutcome(_))
        ));

        let bracket = ProgressionRouter::record_outcome(
            &bracket,
            finals_number,
            HeatOutcome::FinalRanking { first: 4, second: 1, third: 2, fourth: 5 },
        )
        .unwrap();

        let finals = bracket.finals_heat().unwrap();
        assert_eq!(finals.status, HeatStatus::Completed);
        assert_eq!(finals.winners, vec![4, 1]);
        assert_eq!(finals.losers, vec![2, 5]);
        assert_eq!(finals.rankings.unwrap().first, Some(4));
    }

    #[test]
    fn disqualification_unwinds_the_racer_everywhere() {
        let bracket = BracketBuilder::build(&roster(6), "event", "class").unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 1, winner_loser(vec![1, 2], vec![3]))
                .unwrap();

        let bracket = ProgressionRouter::disqualify(&bracket, 1).unwrap();

        // gone from the result and from the semifinal they advanced into
        assert_eq!(bracket.heat(1).unwrap().winners, vec![2]);
        assert_eq!(bracket.heat(3).unwrap().racers, vec![2]);
        // still on record in the completed heat
        assert!(bracket.heat(1).unwrap().racers.contains(&1));
        assert!(bracket.heat(1).unwrap().disqualified.contains(&1));
    }

    #[test]
    fn disqualifying_an_unknown_racer_fails() {
        let bracket = BracketBuilder::build(&roster(6), "event", "class").unwrap();
        assert!(matches!(
            ProgressionRouter::disqualify(&bracket, 99),
            Err(BracketError::NotFound(_))
        ));
    }

    #[test]
    fn full_six_racer_bracket_runs_to_the_finals() {
        let bracket = BracketBuilder::build(&roster(6), "event", "class").unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 1, winner_loser(vec![1, 2], vec![3]))
                .unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 2, winner_loser(vec![4, 5], vec![6]))
                .unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 3, winner_loser(vec![1, 4], vec![2, 5]))
                .unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 4, winner_loser(vec![3, 6], vec![]))
                .unwrap();

        // the finals hold exactly the survivors of both lanes
        let finals = bracket.finals_heat().unwrap();
        assert_eq!(finals.racers, vec![1, 4, 3, 6]);
        assert_eq!(finals.status, HeatStatus::Pending);

        let bracket = ProgressionRouter::record_outcome(
            &bracket,
            finals.number,
            HeatOutcome::FinalRanking { first: 4, second: 3, third: 1, fourth: 6 },
        )
        .unwrap();

        let finals = bracket.finals_heat().unwrap();
        assert_eq!(finals.status, HeatStatus::Completed);
        assert_eq!(finals.winners, vec![4, 3]);
        for heat in bracket.heats() {
            assert_eq!(heat.status, HeatStatus::Completed);
        }
    }

    #[test]
    fn overloaded_target_is_restructured_in_the_same_step() {
        // 9 racers: three round 1 heats all advance 2 into semifinal heat 4
        let bracket = BracketBuilder::build(&roster(9), "event", "class").unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 1, winner_loser(vec![1, 2], vec![3]))
                .unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 2, winner_loser(vec![4, 5], vec![6]))
                .unwrap();
        let bracket =
            ProgressionRouter::record_outcome(&bracket, 3, winner_loser(vec![7, 8], vec![9]))
                .unwrap();

        // 6 semifinal racers were split 3+3 into heats 4 and 5
        let round_two = bracket.round(Lane::Winners, 2).unwrap();
        assert_eq!(round_two.heats.len(), 2);
        assert_eq!(round_two.heats[0].racers, vec![1, 2, 4]);
        assert_eq!(round_two.heats[1].racers, vec![5, 7, 8]);

        // the reserved slot kept the rest of the numbering intact
        let losers_one = bracket.round(Lane::Losers, 1).unwrap();
        assert_eq!(losers_one.heats[0].number, 6);
        assert_eq!(losers_one.heats[0].racers, vec![3, 6, 9]);
        assert_eq!(bracket.finals_heat().unwrap().number, 8);
    }
}
