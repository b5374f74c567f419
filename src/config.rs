use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::api::{Evaluations, FieldPools};
use crate::model::{
    db::{evaluation::ProjectEvaluation, field_pool::FieldPool},
    mongodb::{ensure_indexes_exist, Coll},
};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    derive_status_on_read: bool,
    #[serde(default = "default_weight_tolerance")]
    weight_tolerance: f64,
}

fn default_weight_tolerance() -> f64 {
    crate::model::db::evaluation::DEFAULT_WEIGHT_TOLERANCE
}

impl Config {
    pub fn new(derive_status_on_read: bool, weight_tolerance: f64) -> Self {
        Self {
            derive_status_on_read,
            weight_tolerance,
        }
    }

    /// Whether reads should report lapsed open field pools as closed.
    /// Off by default: reads return whatever was last written.
    pub fn derive_status_on_read(&self) -> bool {
        self.derive_status_on_read
    }

    /// How far advisor and committee weights may sum away from 1.
    pub fn weight_tolerance(&self) -> f64 {
        self.weight_tolerance
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(false, default_weight_tolerance())
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with the database fairing and control over error
/// messages.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        if !(config.weight_tolerance.is_finite() && config.weight_tolerance >= 0.0) {
            error!(
                "Invalid weight_tolerance {}: must be a non-negative number",
                config.weight_tolerance
            );
            return Err(rocket);
        }
        info!(
            "Loaded application config (derive_status_on_read = {}, weight_tolerance = {})",
            config.derive_status_on_read, config.weight_tolerance
        );

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the database.
#[derive(Deserialize)]
struct DbConfig {
    // secrets
    db_uri: String,
    // non-secrets
    #[serde(default = "default_db_name")]
    db_name: String,
}

fn default_db_name() -> String {
    "research_portal".to_string()
}

/// A fairing that loads the MongoDB config, connects to the database,
/// performs any setup necessary, and places the `Client`, the `Database` and
/// the MongoDB-backed stores into managed state.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "MongoDB",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<DbConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded database config, connecting...");
        // Construct the connection.
        let client = match MongoClient::with_uri_str(config.db_uri).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(&config.db_name);

        // Ensure the required indexes exist.
        if let Err(e) = ensure_indexes_exist(&db).await {
            error!("Failed to set up database indexes: {e}");
            return Err(rocket);
        }
        info!("...database connection online!");

        // Manage the state.
        let field_pools: FieldPools = Box::new(Coll::<FieldPool>::from_db(&db));
        let evaluations: Evaluations = Box::new(Coll::<ProjectEvaluation>::from_db(&db));
        rocket = rocket
            .manage(client)
            .manage(db)
            .manage(field_pools)
            .manage(evaluations);
        Ok(rocket)
    }
}
