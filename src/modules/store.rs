use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::modules::models::heat::Bracket;
use crate::modules::models::racer::Racer;

/// every bracket is stored per (event, class) pair
#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct BracketKey {
    pub event_id: String,
    pub class_id: String,
}

impl BracketKey {
    pub fn new(event_id: &str, class_id: &str) -> BracketKey {
        BracketKey {
            event_id: event_id.to_string(),
            class_id: class_id.to_string(),
        }
    }
}

/// # the bracket state store
/// owns every bracket and its roster, keyed by (event, class). the engine
/// is pure relative to this store: every operation loads a bracket value,
/// transforms it and saves the result back. durability and per key
/// serialization of updates are the caller's concern, the rocket layer
/// keeps the store behind a mutex.
#[derive(Debug, Default)]
pub struct BracketStore {
    brackets: HashMap<BracketKey, Bracket>,
    rosters: HashMap<BracketKey, Vec<Racer>>,
}

impl BracketStore {
    pub fn new() -> BracketStore {
        BracketStore {
            brackets: HashMap::new(),
            rosters: HashMap::new(),
        }
    }

    /// # load a bracket
    ///
    /// ## Arguments
    /// * `event_id` - the event to look in
    /// * `class_id` - the class within the event
    ///
    /// ## Returns
    /// * `Option<Bracket>` - a copy of the stored bracket, if any
    pub fn load(&self, event_id: &str, class_id: &str) -> Option<Bracket> {
        self.brackets
            .get(&BracketKey::new(event_id, class_id))
            .cloned()
    }

    /// # save a bracket
    /// overwrites whatever was stored for the (event, class) pair before.
    pub fn save(&mut self, event_id: &str, class_id: &str, bracket: Bracket) {
        self.brackets
            .insert(BracketKey::new(event_id, class_id), bracket);
    }

    /// the seeded roster belonging to a bracket. racers live here once,
    /// heats only reference them by id.
    pub fn roster(&self, event_id: &str, class_id: &str) -> Option<Vec<Racer>> {
        self.rosters
            .get(&BracketKey::new(event_id, class_id))
            .cloned()
    }

    pub fn save_roster(&mut self, event_id: &str, class_id: &str, racers: Vec<Racer>) {
        self.rosters
            .insert(BracketKey::new(event_id, class_id), racers);
    }

    /// # reset everything
    /// drops all bracket and roster state for every (event, class) pair.
    pub fn reset(&mut self) {
        info!(
            target: "store",
            "resetting bracket store, dropping {} brackets",
            self.brackets.len()
        );

        self.brackets.clear();
        self.rosters.clear();
    }
}
