use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::UnlockResult;
use crate::entities::MapRegion;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct UnlockParams {
    #[serde(default)]
    passcode: String,
}

pub async fn unlock(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<UnlockParams>,
) -> Json<UnlockResult> {
    api.unlock(params.passcode).await.into()
}

pub async fn find_region(Extension(api): Extension<DynAPI>) -> Result<Json<MapRegion>, Error> {
    let region = api.map_region().await?;

    Ok(region.into())
}

pub async fn update_region(
    Extension(api): Extension<DynAPI>,
    Json(region): Json<MapRegion>,
) -> Result<Json<MapRegion>, Error> {
    let region = api.set_map_region(region).await?;

    Ok(region.into())
}
