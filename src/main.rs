use std::sync::Mutex;

use rocket::{Build, Rocket};

use elimination_bracket_admin::modules::helpers::logging::setup_logging;
use elimination_bracket_admin::modules::store::BracketStore;
use elimination_bracket_admin::routes::api::bracket;

#[macro_use]
extern crate rocket;

#[launch]
fn rocket() -> Rocket<Build> {
    setup_logging().expect("failed to set up logging");

    rocket::build()
        .manage(Mutex::new(BracketStore::new()))
        .mount(
            "/api",
            routes![
                bracket::build,
                bracket::get_bracket,
                bracket::get_roster,
                bracket::record_result,
                bracket::record_final,
                bracket::disqualify,
                bracket::reset,
            ],
        )
}
