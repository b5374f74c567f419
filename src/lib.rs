#[macro_use]
extern crate rocket;
#[macro_use]
extern crate log;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

use config::{ConfigFairing, DatabaseFairing};
use logging::LoggerFairing;

/// Build the server: configuration, database and stores come from the
/// figment at ignition.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .mount("/", api::routes())
}

/// Build a server around the given stores instead of a live database.
#[cfg(test)]
pub(crate) fn rocket_for_stores(
    config: Config,
    field_pools: api::FieldPools,
    evaluations: api::Evaluations,
) -> Rocket<Build> {
    rocket::build()
        .manage(config)
        .manage(field_pools)
        .manage(evaluations)
        .mount("/", api::routes())
}
