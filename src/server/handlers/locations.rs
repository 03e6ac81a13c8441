use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::edit::LoadingState;
use crate::entities::Location;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct UpdateParams {
    name: String,
    description: String,
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Location>>, Error> {
    let locations = api.list_locations().await?;

    Ok(locations.into())
}

pub async fn create(Extension(api): Extension<DynAPI>) -> Result<Json<Location>, Error> {
    let location = api.add_location().await?;

    Ok(location.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<UpdateParams>,
) -> Result<Json<Location>, Error> {
    let location = api
        .update_location(id, params.name, params.description)
        .await?;

    Ok(location.into())
}

pub async fn delete_all(Extension(api): Extension<DynAPI>) -> Result<StatusCode, Error> {
    api.delete_all_locations().await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn nearby(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<LoadingState>, Error> {
    let state = api.find_nearby(id).await?;

    Ok(state.into())
}
