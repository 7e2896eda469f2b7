use serde::{Deserialize, Serialize};

use crate::enums::portal_role::PortalRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Имя пользователя или email
    pub username: String,
    pub password: String,
    /// Портал, в который выполняется вход
    pub role: PortalRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: PortalRole,
    /// ID агента или клиента, к которому привязана учётная запись
    pub entity_id: Option<String>,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user_id
    pub username: String,
    pub role: PortalRole,
    pub entity_id: Option<String>,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at
}

impl TokenClaims {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
