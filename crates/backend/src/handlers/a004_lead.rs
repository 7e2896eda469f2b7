use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::domain::a002_customer::Customer;
use contracts::domain::a004_lead::{ConvertLeadRequest, Lead, LeadDto, LeadStatus};
use serde::Deserialize;

use crate::domain::a004_lead::service;
use crate::shared::app_state::AppState;
use crate::shared::errors::ApiError;
use crate::system::auth::extractor::{CurrentUser, DataScope};

#[derive(Debug, Default, Deserialize)]
pub struct LeadQuery {
    pub status: Option<LeadStatus>,
    pub search: Option<String>,
}

/// GET /api/leads
pub async fn list_all(
    State(state): State<AppState>,
    Query(query): Query<LeadQuery>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    let leads = service::list(state.leads.as_ref(), query.status, query.search.as_deref()).await?;
    Ok(Json(leads))
}

/// POST /api/leads
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<LeadDto>,
) -> Result<Json<Lead>, ApiError> {
    Ok(Json(service::create(state.leads.as_ref(), dto).await?))
}

/// POST /api/leads/:id/convert
pub async fn convert(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(mut request): Json<ConvertLeadRequest>,
) -> Result<Json<Customer>, ApiError> {
    if let DataScope::Agent(agent_id) = user.scope()? {
        request.agent_id = agent_id;
    }
    let customer = service::convert_to_customer(
        state.leads.as_ref(),
        state.customers.as_ref(),
        state.agents.as_ref(),
        &id,
        request,
    )
    .await?;
    Ok(Json(customer))
}
