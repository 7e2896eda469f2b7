use axum::extract::{Path, Query, State};
use axum::Json;
use contracts::enums::portal_role::PortalRole;
use contracts::system::users::{CreateUserDto, UpdateUserDto, User};

use crate::handlers::SearchQuery;
use crate::shared::app_state::AppState;
use crate::shared::errors::{not_found, ApiError};
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service as user_service;

/// Роль super_admin выдаёт только super_admin
fn ensure_can_grant(caller: &CurrentUser, role: PortalRole) -> Result<(), ApiError> {
    if role == PortalRole::SuperAdmin && caller.0.role != PortalRole::SuperAdmin {
        return Err(ApiError::forbidden("Only a super admin can grant this role"));
    }
    Ok(())
}

/// GET /api/system/users
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = user_service::list(state.accounts.as_ref(), query.search.as_deref()).await?;
    Ok(Json(users))
}

/// GET /api/system/users/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = user_service::get_by_id(state.accounts.as_ref(), &id)
        .await?
        .ok_or_else(|| not_found(format!("User {}", id)))?;
    Ok(Json(user))
}

/// POST /api/system/users
pub async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(dto): Json<CreateUserDto>,
) -> Result<Json<User>, ApiError> {
    ensure_can_grant(&caller, dto.role)?;
    let id = user_service::create(state.accounts.as_ref(), dto).await?;
    let user = user_service::get_by_id(state.accounts.as_ref(), &id)
        .await?
        .ok_or_else(|| not_found(format!("User {}", id)))?;
    tracing::info!("User '{}' created by {}", user.username, caller.0.username);
    Ok(Json(user))
}

/// PUT /api/system/users/:id
pub async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<UpdateUserDto>,
) -> Result<Json<User>, ApiError> {
    ensure_can_grant(&caller, dto.role)?;
    if caller.0.sub == id && (!dto.is_active || dto.role != caller.0.role) {
        return Err(ApiError::forbidden("You cannot demote or deactivate yourself"));
    }
    Ok(Json(user_service::update(state.accounts.as_ref(), &id, dto).await?))
}

/// POST /api/system/users/:id/deactivate
pub async fn deactivate(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    if caller.0.sub == id {
        return Err(ApiError::forbidden("You cannot deactivate yourself"));
    }
    Ok(Json(user_service::deactivate(state.accounts.as_ref(), &id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::test_config;
    use crate::system::auth::password;
    use crate::system::handlers::auth::{login, refresh};
    use crate::system::initialization::seed_demo_data;
    use axum::http::StatusCode;
    use contracts::system::auth::{LoginRequest, RefreshRequest, TokenClaims};

    async fn state() -> AppState {
        let state = AppState::in_memory(&test_config()).unwrap();
        seed_demo_data(&state).await.unwrap();
        state
    }

    async fn caller(state: &AppState, username: &str) -> CurrentUser {
        let user = state.accounts.get_by_login(username).await.unwrap().unwrap();
        CurrentUser(TokenClaims {
            sub: user.id,
            username: user.username,
            role: user.role,
            entity_id: user.entity_id,
            exp: 0,
            iat: 0,
        })
    }

    fn new_agent(role: PortalRole) -> CreateUserDto {
        CreateUserDto {
            username: "agent3".into(),
            password: "Agent@789".into(),
            email: Some("mike@solarpay.com".into()),
            full_name: Some("Mike Turner".into()),
            role,
            entity_id: Some("1".into()),
            permissions: vec!["manage_customers".into()],
        }
    }

    #[tokio::test]
    async fn test_admin_creates_and_lists_users() {
        let state = state().await;
        let admin = caller(&state, "admin1").await;

        let dto = new_agent(PortalRole::Agent);
        let Json(created) = create(State(state.clone()), admin, Json(dto)).await.unwrap();
        assert!(created.is_active);
        let hash = state.accounts.get_password_hash(&created.id).await.unwrap().unwrap();
        assert!(password::verify_password("Agent@789", &hash).unwrap());

        let query = SearchQuery {
            search: Some("agent".into()),
        };
        let Json(agents) = list(State(state), Query(query)).await.unwrap();
        let names: Vec<&str> = agents.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["agent1", "agent2", "agent3"]);
    }

    #[tokio::test]
    async fn test_only_super_admin_grants_super_admin() {
        let state = state().await;
        let mut dto = new_agent(PortalRole::SuperAdmin);
        dto.entity_id = None;

        let admin = caller(&state, "admin1").await;
        let err = create(State(state.clone()), admin, Json(dto.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let root = caller(&state, "super").await;
        assert!(create(State(state), root, Json(dto)).await.is_ok());
    }

    #[tokio::test]
    async fn test_deactivated_user_loses_sessions() {
        let state = state().await;
        let Json(session) = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "agent2".into(),
                password: "Agent@456".into(),
                role: PortalRole::Agent,
            }),
        )
        .await
        .unwrap();

        let agent = state.accounts.get_by_login("agent2").await.unwrap().unwrap();
        let admin = caller(&state, "admin1").await;
        let Json(user) = deactivate(State(state.clone()), admin, Path(agent.id))
            .await
            .unwrap();
        assert!(!user.is_active);

        let err = refresh(
            State(state.clone()),
            Json(RefreshRequest {
                refresh_token: session.refresh_token,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let err = login(
            State(state),
            Json(LoginRequest {
                username: "agent2".into(),
                password: "Agent@456".into(),
                role: PortalRole::Agent,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.body.message, "Account is not active");
    }

    #[tokio::test]
    async fn test_admin_cannot_deactivate_self() {
        let state = state().await;
        let admin = caller(&state, "admin1").await;
        let id = admin.0.sub.clone();
        let err = deactivate(State(state), admin, Path(id)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
