use crate::errors::BracketError;
use crate::modules::models::heat::{ADVANCING_PER_HEAT, HEAT_CAPACITY};

pub struct HeatSizer {}

impl HeatSizer {
    /// # compute the first round heat sizes
    /// partition `racer_count` racers into as few heats as possible without
    /// ever creating a heat of 1. up to 4 racers race in a single heat,
    /// above that the racers are spread over `ceil(n / 4)` heats as evenly
    /// as possible with the bigger heats first. this gives 5 -> [3,2],
    /// 6 -> [3,3], 7 -> [4,3], 8 -> [4,4], 9 -> [3,3,3] and so on, no two
    /// heats ever differing by more than one racer.
    ///
    /// ## Arguments
    /// * `racer_count` - how many racers are seeded into round 1
    ///
    /// ## Returns
    /// * `Vec<usize>` - the heat sizes, summing to `racer_count`
    pub fn sizes(racer_count: usize) -> Result<Vec<usize>, BracketError> {
        if racer_count < 1 {
            return Err(BracketError::InvalidRacerCount(racer_count));
        }

        if racer_count <= HEAT_CAPACITY {
            return Ok(vec![racer_count]);
        }

        let heat_count = (racer_count + HEAT_CAPACITY - 1) / HEAT_CAPACITY;
        let base = racer_count / heat_count;
        let remainder = racer_count % heat_count;

        let mut sizes = Vec::with_capacity(heat_count);
        for heat in 0..heat_count {
            if heat < remainder {
                sizes.push(base + 1);
            } else {
                sizes.push(base);
            }
        }

        Ok(sizes)
    }

    /// # count the expected first round losers
    /// two racers advance out of every heat, so a heat of 4 drops 2 racers
    /// into the second chance lane, a heat of 3 drops 1 and a heat of 2
    /// drops none.
    pub fn expected_losers(sizes: &[usize]) -> usize {
        sizes
            .iter()
            .map(|size| size.saturating_sub(ADVANCING_PER_HEAT))
            .sum()
    }
}
