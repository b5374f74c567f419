use chrono::Utc;
use rocket::{serde::json::Json, Route, State};

use crate::config::Config;
use crate::error::Result;
use crate::model::{
    api::{
        field_pool::{DeadlineExtension, FieldPoolDescription, FieldPoolPatch, FieldPoolSpec},
        Response,
    },
    common::FieldPoolStatus,
    db::field_pool::{FieldPoolLifecycle, FieldPoolStore},
    mongodb::Id,
};

/// The field pool store, as held in managed state.
pub type FieldPools = Box<dyn FieldPoolStore>;

pub fn routes() -> Vec<Route> {
    routes![
        create_field_pool,
        list_field_pools,
        get_field_pool,
        update_field_pool,
        extend_deadline,
        delete_field_pool,
    ]
}

fn lifecycle<'s>(pools: &'s State<FieldPools>, config: &Config) -> FieldPoolLifecycle<'s> {
    FieldPoolLifecycle::new(pools.inner().as_ref())
        .derive_status_on_read(config.derive_status_on_read())
}

#[post("/field-pools", data = "<spec>", format = "json")]
async fn create_field_pool(
    spec: Json<FieldPoolSpec>,
    pools: &State<FieldPools>,
    config: &State<Config>,
) -> Result<Json<Response<FieldPoolDescription>>> {
    let written = lifecycle(pools, config).create(spec.0, Utc::now()).await?;
    Ok(Json(written.into()))
}

#[get("/field-pools?<status>")]
async fn list_field_pools(
    status: Option<&str>,
    pools: &State<FieldPools>,
    config: &State<Config>,
) -> Result<Json<Response<Vec<FieldPoolDescription>>>> {
    let status = status.map(str::parse::<FieldPoolStatus>).transpose()?;
    let pools = lifecycle(pools, config).list(status, Utc::now()).await?;
    Ok(Json(Response::data(
        pools.into_iter().map(Into::into).collect(),
    )))
}

#[get("/field-pools/<pool_id>")]
async fn get_field_pool(
    pool_id: Id,
    pools: &State<FieldPools>,
    config: &State<Config>,
) -> Result<Json<Response<FieldPoolDescription>>> {
    let pool = lifecycle(pools, config).get(pool_id, Utc::now()).await?;
    Ok(Json(Response::data(pool.into())))
}

#[patch("/field-pools/<pool_id>", data = "<patch>", format = "json")]
async fn update_field_pool(
    pool_id: Id,
    patch: Json<FieldPoolPatch>,
    pools: &State<FieldPools>,
    config: &State<Config>,
) -> Result<Json<Response<FieldPoolDescription>>> {
    let written = lifecycle(pools, config)
        .update(pool_id, patch.0, Utc::now())
        .await?;
    Ok(Json(written.into()))
}

#[post("/field-pools/<pool_id>/extend-deadline", data = "<extension>", format = "json")]
async fn extend_deadline(
    pool_id: Id,
    extension: Json<DeadlineExtension>,
    pools: &State<FieldPools>,
    config: &State<Config>,
) -> Result<Json<Response<FieldPoolDescription>>> {
    let written = lifecycle(pools, config)
        .extend_deadline(pool_id, extension.0, Utc::now())
        .await?;
    Ok(Json(written.into()))
}

#[delete("/field-pools/<pool_id>")]
async fn delete_field_pool(
    pool_id: Id,
    pools: &State<FieldPools>,
    config: &State<Config>,
) -> Result<Json<Response<String>>> {
    lifecycle(pools, config).delete(pool_id).await?;
    Ok(Json(Response::with_message(
        "Field pool deleted successfully",
        pool_id.to_string(),
    )))
}
