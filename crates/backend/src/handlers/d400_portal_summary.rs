use axum::extract::State;
use axum::Json;
use chrono::Utc;
use contracts::dashboards::d400_portal_summary::DashboardView;

use crate::dashboards::d400_portal_summary::service;
use crate::shared::app_state::AppState;
use crate::shared::errors::ApiError;
use crate::system::auth::extractor::{CurrentUser, DataScope};

/// GET /api/dashboard/summary
pub async fn summary(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<DashboardView>, ApiError> {
    let now = Utc::now();
    let view = match user.scope()? {
        DataScope::All => DashboardView::Admin(
            service::admin_summary(
                state.agents.as_ref(),
                state.customers.as_ref(),
                state.tokens.as_ref(),
                now,
            )
            .await?,
        ),
        DataScope::Agent(agent_id) => DashboardView::Agent(
            service::agent_summary(
                state.agents.as_ref(),
                state.customers.as_ref(),
                state.tokens.as_ref(),
                &agent_id,
                now,
            )
            .await?,
        ),
        DataScope::Customer(customer_id) => DashboardView::Customer(
            service::customer_summary(
                state.customers.as_ref(),
                state.tokens.as_ref(),
                &customer_id,
                now,
            )
            .await?,
        ),
    };
    Ok(Json(view))
}
