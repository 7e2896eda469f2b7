use std::collections::HashSet;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use contracts::domain::a005_token::{TokenListQuery, TokenRecord};

use crate::domain::{a002_customer, a005_token};
use crate::shared::app_state::AppState;
use crate::shared::errors::ApiError;
use crate::system::auth::extractor::{CurrentUser, DataScope};

/// GET /api/tokens
pub async fn list_all(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(mut query): Query<TokenListQuery>,
) -> Result<Json<Vec<TokenRecord>>, ApiError> {
    let scope = user.scope()?;
    if let DataScope::Customer(customer_id) = &scope {
        query.customer_id = Some(customer_id.clone());
    }

    let mut records = a005_token::service::list(state.tokens.as_ref(), &query, Utc::now()).await?;

    if let DataScope::Agent(agent_id) = &scope {
        let own: HashSet<String> =
            a002_customer::service::list(state.customers.as_ref(), Some(agent_id.as_str()), None)
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect();
        records.retain(|r| own.contains(&r.customer_id));
    }

    Ok(Json(records))
}
