use serde::{Deserialize, Serialize};

use crate::enums::portal_role::PortalRole;

/// Учётная запись портала
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: PortalRole,
    pub entity_id: Option<String>,
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: PortalRole,
    pub entity_id: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Редактирование учётной записи администратором (полная замена полей)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserDto {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: PortalRole,
    pub entity_id: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub is_active: bool,
}

impl User {
    /// Строки, по которым работает поиск в таблице пользователей
    pub fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.username.as_str(), self.role.code()];
        fields.extend(self.full_name.as_deref());
        fields.extend(self.email.as_deref());
        fields
    }
}
