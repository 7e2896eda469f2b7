use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::domain::a001_agent::{Agent, AgentDto};

use super::SearchQuery;
use crate::domain::a001_agent::service;
use crate::shared::app_state::AppState;
use crate::shared::errors::ApiError;

/// GET /api/agents
pub async fn list_all(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Agent>>, ApiError> {
    let agents = service::list(
        state.agents.as_ref(),
        state.customers.as_ref(),
        state.tokens.as_ref(),
        query.search.as_deref(),
    )
    .await?;
    Ok(Json(agents))
}

/// GET /api/agents/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Agent>, ApiError> {
    let agent = service::get_by_id(
        state.agents.as_ref(),
        state.customers.as_ref(),
        state.tokens.as_ref(),
        &id,
    )
    .await?;
    Ok(Json(agent))
}

/// POST /api/agents
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<AgentDto>,
) -> Result<Json<Agent>, ApiError> {
    Ok(Json(service::create(state.agents.as_ref(), dto).await?))
}
