use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::UnlockResult;
use crate::edit::LoadingState;
use crate::entities::{Location, MapRegion};
use crate::error::Error;

#[async_trait]
pub trait LocationAPI {
    async fn list_locations(&self) -> Result<Vec<Location>, Error>;
    async fn add_location(&self) -> Result<Location, Error>;
    async fn update_location(
        &self,
        id: Uuid,
        name: String,
        description: String,
    ) -> Result<Location, Error>;
    async fn delete_all_locations(&self) -> Result<(), Error>;
}

#[async_trait]
pub trait SearchAPI {
    async fn find_nearby(&self, id: Uuid) -> Result<LoadingState, Error>;
}

#[async_trait]
pub trait SessionAPI {
    async fn unlock(&self, credential: String) -> UnlockResult;
    async fn map_region(&self) -> Result<MapRegion, Error>;
    async fn set_map_region(&self, region: MapRegion) -> Result<MapRegion, Error>;
}

pub trait API: LocationAPI + SearchAPI + SessionAPI {}
