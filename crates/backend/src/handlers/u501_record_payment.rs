use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use contracts::usecases::common::UseCaseError;
use contracts::usecases::u501_record_payment::{
    PaymentPreviewResponse, RecordPaymentRequest, RecordPaymentResponse,
};

use crate::shared::app_state::AppState;
use crate::shared::errors::ApiError;
use crate::system::auth::extractor::{CurrentUser, DataScope};
use crate::usecases::u501_record_payment::executor::PaymentError;

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        let status = match &err {
            PaymentError::Allocation(_) | PaymentError::MissingReference => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::CustomerNotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::ReferenceConflict { .. } => StatusCode::CONFLICT,
            PaymentError::Issuance(_) | PaymentError::Storage(_) => {
                tracing::error!("Payment failed: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = if status.is_server_error() {
            "Failed to record payment".to_string()
        } else {
            err.to_string()
        };
        ApiError::new(status, UseCaseError::new(err.code(), message))
    }
}

/// Клиент платит только за себя, агент принимает платежи только от своих клиентов
async fn scoped_request(
    state: &AppState,
    user: &CurrentUser,
    mut request: RecordPaymentRequest,
) -> Result<RecordPaymentRequest, ApiError> {
    let scope = user.scope()?;
    if let DataScope::Customer(customer_id) = &scope {
        request.customer_id = customer_id.clone();
    }
    if let Some(customer) = state.customers.get_by_id(&request.customer_id).await? {
        if !scope.can_see_customer(&customer) {
            return Err(ApiError::forbidden("Customer belongs to another agent"));
        }
    }
    Ok(request)
}

/// POST /api/payments/preview
pub async fn preview(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<Json<PaymentPreviewResponse>, ApiError> {
    let request = scoped_request(&state, &user, request).await?;
    Ok(Json(state.payments.preview(&request).await?))
}

/// POST /api/payments
pub async fn record(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<Json<RecordPaymentResponse>, ApiError> {
    let request = scoped_request(&state, &user, request).await?;
    tracing::info!(
        "Payment submitted by {} for customer {} / product {}",
        user.0.username,
        request.customer_id,
        request.product_id
    );
    Ok(Json(state.payments.record(request).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::test_config;
    use crate::system::initialization::seed_demo_data;
    use contracts::enums::payment_method::PaymentMethod;
    use contracts::enums::portal_role::PortalRole;
    use contracts::system::auth::TokenClaims;

    fn staff(role: PortalRole, entity_id: Option<&str>) -> CurrentUser {
        CurrentUser(TokenClaims {
            sub: "u".into(),
            username: "tester".into(),
            role,
            entity_id: entity_id.map(str::to_string),
            exp: 0,
            iat: 0,
        })
    }

    fn request(
        customer_id: &str,
        product_id: &str,
        amount: f64,
        reference: &str,
    ) -> RecordPaymentRequest {
        RecordPaymentRequest {
            customer_id: customer_id.into(),
            product_id: product_id.into(),
            amount,
            payment_method: PaymentMethod::Momo,
            reference: reference.into(),
            notes: None,
        }
    }

    async fn state() -> AppState {
        let state = AppState::in_memory(&test_config()).unwrap();
        seed_demo_data(&state).await.unwrap();
        state
    }

    #[tokio::test]
    async fn test_agent_records_payment_for_own_customer() {
        let state = state().await;
        let Json(response) = record(
            State(state.clone()),
            staff(PortalRole::Agent, Some("1")),
            Json(request("1", "1", 150.0, "MOMO-1")),
        )
        .await
        .unwrap();

        assert_eq!(response.record.token.as_str(), "ABC123XYZ");
        assert_eq!(response.summary[1], "Payment covers 1.5 months");
        assert_eq!(response.summary[2], "Agent commission: $15.00 ($10.00/month)");
        assert_eq!(state.tokens.list_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_agent_cannot_touch_other_agents_customer() {
        let state = state().await;
        let err = preview(
            State(state),
            staff(PortalRole::Agent, Some("1")),
            Json(request("2", "3", 150.0, "MOMO-2")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_customer_pays_for_own_product() {
        let state = state().await;
        // customer_id из тела игнорируется, берётся из токена
        let Json(response) = record(
            State(state.clone()),
            staff(PortalRole::Customer, Some("2")),
            Json(request("1", "3", 300.0, "MOMO-SELF")),
        )
        .await
        .unwrap();

        assert_eq!(response.record.customer_id, "2");
        assert_eq!(response.record.customer_name, "Jane Smith");
        assert_eq!(response.allocation.periods_covered, 2.0);
        assert_eq!(state.tokens.list_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_customer_cannot_pay_for_foreign_product() {
        let state = state().await;
        let err = preview(
            State(state),
            staff(PortalRole::Customer, Some("2")),
            Json(request("1", "1", 150.0, "MOMO-X")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.code, "PRODUCT_NOT_OWNED");
    }

    #[tokio::test]
    async fn test_reused_reference_is_conflict() {
        let state = state().await;
        let admin = || staff(PortalRole::Admin, None);
        record(State(state.clone()), admin(), Json(request("1", "1", 100.0, "R-1")))
            .await
            .unwrap();

        let err = record(State(state.clone()), admin(), Json(request("1", "1", 1200.0, "R-1")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.body.code, "REFERENCE_CONFLICT");
        assert_eq!(state.tokens.list_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let state = state().await;
        let admin = || staff(PortalRole::Admin, None);

        let err = preview(State(state.clone()), admin(), Json(request("1", "3", 150.0, "R")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.code, "PRODUCT_NOT_OWNED");

        let err = preview(State(state.clone()), admin(), Json(request("1", "1", -5.0, "R")))
            .await
            .unwrap_err();
        assert_eq!(err.body.code, "INVALID_AMOUNT");

        let err = record(State(state.clone()), admin(), Json(request("1", "1", 150.0, "  ")))
            .await
            .unwrap_err();
        assert_eq!(err.body.code, "MISSING_REFERENCE");

        let err = preview(State(state), admin(), Json(request("99", "1", 150.0, "R")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
