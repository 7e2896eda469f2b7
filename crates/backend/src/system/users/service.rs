use anyhow::Result;
use chrono::Utc;
use contracts::enums::portal_role::PortalRole;
use contracts::system::auth::UserInfo;
use contracts::system::users::{CreateUserDto, UpdateUserDto, User};
use thiserror::Error;

use super::repository::AccountRepository;
use crate::shared::errors::{not_found, validation};
use crate::shared::search::matches_search;
use crate::system::auth::password;

/// Отказ во входе. Неверный логин, пароль и портал дают одну и ту же ошибку.
#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account is not active")]
    Inactive,
}

/// Create a new account
pub async fn create(repo: &dyn AccountRepository, dto: CreateUserDto) -> Result<String> {
    if dto.username.trim().is_empty() {
        return Err(validation("Username cannot be empty"));
    }

    validate_account(
        dto.email.as_deref(),
        dto.role,
        dto.entity_id.as_deref(),
        &dto.permissions,
    )?;

    password::validate_password_strength(&dto.password).map_err(|e| validation(e.to_string()))?;
    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        username: dto.username.trim().to_string(),
        email: dto.email,
        full_name: dto.full_name,
        role: dto.role,
        entity_id: dto.entity_id,
        permissions: dto.permissions,
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };

    repo.create_with_password(user, password_hash).await?;

    Ok(user_id)
}

fn validate_account(
    email: Option<&str>,
    role: PortalRole,
    entity_id: Option<&str>,
    permissions: &[String],
) -> Result<()> {
    if let Some(email) = email {
        if !email.trim().is_empty() && !email.contains('@') {
            return Err(validation("Invalid email format"));
        }
    }

    // Агент и клиент всегда привязаны к своей записи
    if matches!(role, PortalRole::Agent | PortalRole::Customer) && entity_id.is_none() {
        return Err(validation(format!(
            "{} account requires an entity id",
            role.display_name()
        )));
    }

    if role.is_staff() && permissions.is_empty() {
        return Err(validation("At least one permission is required"));
    }

    Ok(())
}

pub async fn get_by_id(repo: &dyn AccountRepository, id: &str) -> Result<Option<User>> {
    repo.get_by_id(id).await
}

/// Список пользователей для админки, по имени пользователя
pub async fn list(repo: &dyn AccountRepository, search: Option<&str>) -> Result<Vec<User>> {
    let mut users: Vec<User> = repo
        .list_all()
        .await?
        .into_iter()
        .filter(|u| matches_search(&u.search_fields(), search))
        .collect();
    users.sort_by(|a, b| a.username.cmp(&b.username));
    Ok(users)
}

/// Изменение роли, прав и контактов. Отключённая запись теряет refresh-токены.
pub async fn update(repo: &dyn AccountRepository, id: &str, dto: UpdateUserDto) -> Result<User> {
    let mut user = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| not_found(format!("User {}", id)))?;

    validate_account(
        dto.email.as_deref(),
        dto.role,
        dto.entity_id.as_deref(),
        &dto.permissions,
    )?;

    user.email = dto.email;
    user.full_name = dto.full_name;
    user.role = dto.role;
    user.entity_id = dto.entity_id;
    user.permissions = dto.permissions;
    user.is_active = dto.is_active;
    user.updated_at = Utc::now().to_rfc3339();

    if !repo.update(user.clone()).await? {
        return Err(not_found(format!("User {}", id)));
    }
    if !user.is_active {
        revoke_sessions(repo, &user).await?;
    }

    tracing::info!(
        "User '{}' updated: role={} active={}",
        user.username,
        user.role,
        user.is_active
    );
    Ok(user)
}

/// Отключение учётной записи: вход и обновление токена больше невозможны
pub async fn deactivate(repo: &dyn AccountRepository, id: &str) -> Result<User> {
    let mut user = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| not_found(format!("User {}", id)))?;

    if user.is_active {
        user.is_active = false;
        user.updated_at = Utc::now().to_rfc3339();
        repo.update(user.clone()).await?;
        tracing::info!("User '{}' deactivated", user.username);
    }
    revoke_sessions(repo, &user).await?;
    Ok(user)
}

async fn revoke_sessions(repo: &dyn AccountRepository, user: &User) -> Result<()> {
    let revoked = repo.revoke_user_refresh_tokens(&user.id).await?;
    if revoked > 0 {
        tracing::info!("Revoked {} refresh token(s) of '{}'", revoked, user.username);
    }
    Ok(())
}

/// Проверка учётных данных для входа в портал `role`.
/// Внешний `Result` для сбоев хранилища, внутренний для отказа во входе.
pub async fn verify_credentials(
    repo: &dyn AccountRepository,
    login: &str,
    password: &str,
    role: PortalRole,
) -> Result<Result<User, AuthError>> {
    let user = match repo.get_by_login(login).await? {
        Some(u) => u,
        None => return Ok(Err(AuthError::InvalidCredentials)),
    };

    let password_hash = match repo.get_password_hash(&user.id).await? {
        Some(hash) => hash,
        None => return Ok(Err(AuthError::InvalidCredentials)),
    };

    if !password::verify_password(password, &password_hash)? || user.role != role {
        return Ok(Err(AuthError::InvalidCredentials));
    }

    if !user.is_active {
        return Ok(Err(AuthError::Inactive));
    }

    repo.update_last_login(&user.id).await?;

    Ok(Ok(user))
}

pub fn to_user_info(user: User) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
        email: user.email,
        role: user.role,
        entity_id: user.entity_id,
        permissions: user.permissions,
    }
}
