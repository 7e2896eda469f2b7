use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::domain::a002_customer::{Customer, CustomerDto};

use super::SearchQuery;
use crate::domain::a002_customer::service;
use crate::shared::app_state::AppState;
use crate::shared::errors::ApiError;
use crate::system::auth::extractor::{CurrentUser, DataScope};

/// GET /api/customers
pub async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let agent_id = match user.scope()? {
        DataScope::Agent(id) => Some(id),
        _ => None,
    };
    let customers = service::list(
        state.customers.as_ref(),
        agent_id.as_deref(),
        query.search.as_deref(),
    )
    .await?;
    Ok(Json(customers))
}

/// GET /api/customers/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let customer = service::get_by_id(state.customers.as_ref(), &id).await?;
    if !user.scope()?.can_see_customer(&customer) {
        return Err(ApiError::forbidden("Customer belongs to another agent"));
    }
    Ok(Json(customer))
}

/// POST /api/customers
/// Агент может заводить клиентов только на себя
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(mut dto): Json<CustomerDto>,
) -> Result<Json<Customer>, ApiError> {
    if let DataScope::Agent(agent_id) = user.scope()? {
        dto.agent_id = agent_id;
    }
    let customer = service::create(state.customers.as_ref(), state.agents.as_ref(), dto).await?;
    Ok(Json(customer))
}
