use serde::{Deserialize, Serialize};

/// Роли пользователей портала
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalRole {
    SuperAdmin,
    Admin,
    Agent,
    Customer,
}

impl PortalRole {
    /// Получить код роли
    pub fn code(&self) -> &'static str {
        match self {
            PortalRole::SuperAdmin => "super_admin",
            PortalRole::Admin => "admin",
            PortalRole::Agent => "agent",
            PortalRole::Customer => "customer",
        }
    }

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            PortalRole::SuperAdmin => "Super Admin",
            PortalRole::Admin => "Admin",
            PortalRole::Agent => "Agent",
            PortalRole::Customer => "Customer",
        }
    }

    /// Роли с доступом к управлению справочниками
    pub fn is_admin(&self) -> bool {
        matches!(self, PortalRole::SuperAdmin | PortalRole::Admin)
    }

    /// Сотрудники портала: ведут клиентов и лиды, принимают платежи от клиентов
    pub fn is_staff(&self) -> bool {
        !matches!(self, PortalRole::Customer)
    }

    pub fn all() -> Vec<PortalRole> {
        vec![
            PortalRole::SuperAdmin,
            PortalRole::Admin,
            PortalRole::Agent,
            PortalRole::Customer,
        ]
    }

    /// Парсинг из строки
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "super_admin" | "superAdmin" => Some(PortalRole::SuperAdmin),
            "admin" => Some(PortalRole::Admin),
            "agent" => Some(PortalRole::Agent),
            "customer" => Some(PortalRole::Customer),
            _ => None,
        }
    }
}

impl std::fmt::Display for PortalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
