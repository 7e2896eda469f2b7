use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use chrono::Utc;
use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};

use crate::shared::app_state::AppState;
use crate::shared::errors::{not_found, ApiError};
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::jwt;
use crate::system::users::service as user_service;

/// Login handler
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = user_service::verify_credentials(
        state.accounts.as_ref(),
        &request.username,
        &request.password,
        request.role,
    )
    .await?
    .map_err(|e| {
        tracing::warn!("Login failed for '{}' ({}): {}", request.username, request.role, e);
        ApiError::unauthorized(e.to_string())
    })?;

    let access_token = state.jwt.generate_access_token(&user)?;
    let refresh_token = jwt::generate_refresh_token();

    state
        .accounts
        .store_refresh_token(
            &user.id,
            hash_token(&refresh_token),
            state.jwt.refresh_token_expiration(),
        )
        .await?;

    tracing::info!("User '{}' logged in as {}", user.username, user.role);

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: user_service::to_user_info(user),
    }))
}

/// Refresh token handler
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let user_id = state
        .accounts
        .find_refresh_token(&hash_token(&request.refresh_token), Utc::now())
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired refresh token"))?;

    let user = user_service::get_by_id(state.accounts.as_ref(), &user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::unauthorized("Account is not active"))?;

    let access_token = state.jwt.generate_access_token(&user)?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Logout handler: отзывает refresh token
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .accounts
        .revoke_refresh_token(&hash_token(&request.refresh_token))
        .await?;

    Ok(StatusCode::OK)
}

/// Get current user handler (protected by middleware)
pub async fn current_user(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<UserInfo>, ApiError> {
    let user = user_service::get_by_id(state.accounts.as_ref(), &claims.sub)
        .await?
        .ok_or_else(|| not_found(format!("User {}", claims.sub)))?;

    Ok(Json(user_service::to_user_info(user)))
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::test_config;
    use crate::system::initialization;
    use contracts::enums::portal_role::PortalRole;

    async fn seeded_state() -> AppState {
        let state = AppState::in_memory(&test_config()).unwrap();
        initialization::seed_accounts(state.accounts.as_ref()).await.unwrap();
        state
    }

    fn login_request(username: &str, password: &str, role: PortalRole) -> Json<LoginRequest> {
        Json(LoginRequest {
            username: username.into(),
            password: password.into(),
            role,
        })
    }

    #[tokio::test]
    async fn test_login_refresh_logout() {
        let state = seeded_state().await;

        let Json(session) = login(
            State(state.clone()),
            login_request("agent1", "Agent@123", PortalRole::Agent),
        )
        .await
        .unwrap();
        assert_eq!(session.user.entity_id.as_deref(), Some("1"));
        let claims = state.jwt.validate_token(&session.access_token).unwrap();
        assert_eq!(claims.role, PortalRole::Agent);

        let refresh_body = || {
            Json(RefreshRequest {
                refresh_token: session.refresh_token.clone(),
            })
        };
        assert!(refresh(State(state.clone()), refresh_body()).await.is_ok());

        logout(State(state.clone()), refresh_body()).await.unwrap();
        let err = refresh(State(state.clone()), refresh_body()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_into_wrong_portal() {
        let state = seeded_state().await;
        let err = login(
            State(state),
            login_request("agent1", "Agent@123", PortalRole::Customer),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.body.message, "Invalid credentials");
    }

    #[test]
    fn test_hash_token_is_hex_sha256() {
        let hash = hash_token("refresh");
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, "refresh");
    }
}
