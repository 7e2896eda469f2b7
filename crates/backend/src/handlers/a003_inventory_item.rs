use axum::extract::{Query, State};
use axum::Json;
use contracts::domain::a003_inventory_item::{InventoryItem, InventoryItemDto, StockStatus};
use serde::Deserialize;

use crate::domain::a003_inventory_item::service;
use crate::shared::app_state::AppState;
use crate::shared::errors::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub status: Option<StockStatus>,
    pub search: Option<String>,
}

/// GET /api/inventory
pub async fn list_all(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    let items = service::list(
        state.inventory.as_ref(),
        query.status,
        query.search.as_deref(),
    )
    .await?;
    Ok(Json(items))
}

/// POST /api/inventory
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<InventoryItemDto>,
) -> Result<Json<InventoryItem>, ApiError> {
    Ok(Json(service::create(state.inventory.as_ref(), dto).await?))
}
