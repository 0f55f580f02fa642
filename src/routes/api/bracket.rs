use std::sync::Mutex;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post, State};

use crate::errors::BracketError;
use crate::modules::engine::builder::BracketBuilder;
use crate::modules::engine::router::ProgressionRouter;
use crate::modules::models::heat::{Bracket, HeatOutcome};
use crate::modules::models::racer::Racer;
use crate::modules::store::BracketStore;
use crate::{FinalsRankingEvent, HeatCompletionEvent};

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/***** BUILD & READ *****/

/// # build the bracket for a class
/// takes the full roster, computes starting positions from the seed times
/// and builds the initial bracket graph. rejects a roster without any seed
/// times saved.
#[post("/brackets/<event_id>/<class_id>/build", data = "<roster>")]
pub fn build(
    event_id: String,
    class_id: String,
    roster: Json<Vec<Racer>>,
    store: &State<Mutex<BracketStore>>,
) -> Result<Json<Bracket>, Status> {
    let mut racers = roster.into_inner();
    if Racer::no_seed_times(&racers) {
        // nothing to seed by, the admin has not run qualifying yet
        return Err(Status::BadRequest);
    }

    Racer::assign_starting_positions(&mut racers);
    let bracket =
        BracketBuilder::build(&racers, &event_id, &class_id).map_err(|e| error_status(&e))?;

    let mut store = store.lock().map_err(|_| Status::InternalServerError)?;
    store.save_roster(&event_id, &class_id, racers);
    store.save(&event_id, &class_id, bracket.clone());

    Ok(Json(bracket))
}

/// # get the bracket of a class
#[get("/brackets/<event_id>/<class_id>")]
pub fn get_bracket(
    event_id: String,
    class_id: String,
    store: &State<Mutex<BracketStore>>,
) -> Result<Json<Bracket>, Status> {
    let store = store.lock().map_err(|_| Status::InternalServerError)?;

    match store.load(&event_id, &class_id) {
        Some(bracket) => Ok(Json(bracket)),
        None => Err(Status::NotFound),
    }
}

/// # get the seeded roster of a class
#[get("/brackets/<event_id>/<class_id>/roster")]
pub fn get_roster(
    event_id: String,
    class_id: String,
    store: &State<Mutex<BracketStore>>,
) -> Result<Json<Vec<Racer>>, Status> {
    let store = store.lock().map_err(|_| Status::InternalServerError)?;

    match store.roster(&event_id, &class_id) {
        Some(racers) => Ok(Json(racers)),
        None => Err(Status::NotFound),
    }
}

/***** RESULTS *****/

/// # record a heat result
/// routes the winners and losers of the completed heat into the downstream
/// heats and rebalances anything that went over capacity, all in one step.
#[post("/results", data = "<event>")]
pub fn record_result(
    event: Json<HeatCompletionEvent>,
    store: &State<Mutex<BracketStore>>,
) -> Result<Json<Bracket>, Status> {
    let event = event.into_inner();
    let mut store = store.lock().map_err(|_| Status::InternalServerError)?;

    let bracket = store
        .load(&event.event_id, &event.class_id)
        .ok_or(Status::NotFound)?;
    let updated =
        ProgressionRouter::record_completion(&bracket, &event).map_err(|e| error_status(&e))?;

    store.save(&event.event_id, &event.class_id, updated.clone());
    Ok(Json(updated))
}

/// # record the finals ranking
/// resolves the finals heat with the four way first/second/third/fourth
/// assignment.
#[post("/results/final", data = "<event>")]
pub fn record_final(
    event: Json<FinalsRankingEvent>,
    store: &State<Mutex<BracketStore>>,
) -> Result<Json<Bracket>, Status> {
    let event = event.into_inner();
    let mut store = store.lock().map_err(|_| Status::InternalServerError)?;

    let bracket = store
        .load(&event.event_id, &event.class_id)
        .ok_or(Status::NotFound)?;
    let finals_number = bracket.finals_heat().ok_or(Status::NotFound)?.number;

    let outcome = HeatOutcome::FinalRanking {
        first: event.rankings.first,
        second: event.rankings.second,
        third: event.rankings.third,
        fourth: event.rankings.fourth,
    };
    let updated = ProgressionRouter::record_outcome(&bracket, finals_number, outcome)
        .map_err(|e| error_status(&e))?;

    store.save(&event.event_id, &event.class_id, updated.clone());
    Ok(Json(updated))
}

/// # disqualify a racer after the fact
/// removes the racer from every result and from the heats they were routed
/// into that have not run yet. already advanced racers stay where they are.
#[post("/brackets/<event_id>/<class_id>/disqualify/<racer_id>")]
pub fn disqualify(
    event_id: String,
    class_id: String,
    racer_id: i32,
    store: &State<Mutex<BracketStore>>,
) -> Result<Json<Bracket>, Status> {
    let mut store = store.lock().map_err(|_| Status::InternalServerError)?;

    let bracket = store.load(&event_id, &class_id).ok_or(Status::NotFound)?;
    let updated =
        ProgressionRouter::disqualify(&bracket, racer_id).map_err(|e| error_status(&e))?;

    store.save(&event_id, &class_id, updated.clone());
    Ok(Json(updated))
}

/// # reset all bracket state
/// clears every bracket and roster for every (event, class) pair.
#[post("/reset")]
pub fn reset(store: &State<Mutex<BracketStore>>) -> Result<Status, Status> {
    let mut store = store.lock().map_err(|_| Status::InternalServerError)?;
    store.reset();

    Ok(Status::Ok)
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

/// map an engine error onto the http status the admin ui reports
fn error_status(error: &BracketError) -> Status {
    match error {
        BracketError::NotFound(_) => Status::NotFound,
        BracketError::InvalidRacerCount(_) => Status::BadRequest,
        BracketError::InvalidOutcome(_) => Status::BadRequest,
        BracketError::OverCapacity(_) => Status::Conflict,
    }
}
