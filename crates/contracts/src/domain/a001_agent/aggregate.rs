use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Статус агента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    /// Ожидает подтверждения email
    Pending,
    Suspended,
}

/// Агент по продажам, приводящий клиентов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub county: String,
    pub status: AgentStatus,

    /// Ставка комиссии агента, % от ежемесячного платежа
    #[serde(rename = "commissionRate")]
    pub commission_rate: f64,

    /// Показатели ниже не хранятся: заполняются при чтении
    /// из справочника клиентов и журнала токенов
    #[serde(default)]
    pub customers: u32,
    #[serde(default)]
    pub sales: f64,
    #[serde(default)]
    pub commission: f64,

    #[serde(rename = "lastActive")]
    pub last_active: Option<NaiveDate>,

    #[serde(rename = "emailConfirmed")]
    pub email_confirmed: bool,
}

impl Agent {
    /// Создать нового агента из DTO (статус Pending до подтверждения email)
    pub fn new_for_insert(dto: &AgentDto) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: dto.name.trim().to_string(),
            email: dto.email.trim().to_string(),
            phone: dto.phone.trim().to_string(),
            county: dto.county.trim().to_string(),
            status: AgentStatus::Pending,
            commission_rate: dto.commission_rate,
            customers: 0,
            sales: 0.0,
            commission: 0.0,
            last_active: None,
            email_confirmed: false,
        }
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.name.chars().count() < 2 {
            return Err("Name must be at least 2 characters".into());
        }
        if !self.email.contains('@') {
            return Err("Invalid email address".into());
        }
        if self.phone.chars().count() < 10 {
            return Err("Phone number must be at least 10 digits".into());
        }
        if self.county.is_empty() {
            return Err("Please select a county".into());
        }
        if !self.commission_rate.is_finite()
            || !(0.0..=100.0).contains(&self.commission_rate)
        {
            return Err("Commission rate must be between 0 and 100".into());
        }
        Ok(())
    }

    /// Строки, по которым работает поиск в таблице агентов
    pub fn search_fields(&self) -> [&str; 4] {
        [&self.name, &self.email, &self.phone, &self.county]
    }
}

/// DTO для создания агента
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDto {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub county: String,
    #[serde(rename = "commissionRate")]
    pub commission_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> AgentDto {
        AgentDto {
            name: "Moses Kollie".into(),
            email: "moses@solarpay.com".into(),
            phone: "+231770000001".into(),
            county: "Bong".into(),
            commission_rate: 11.0,
        }
    }

    #[test]
    fn test_new_agent_is_pending() {
        let agent = Agent::new_for_insert(&dto());
        assert_eq!(agent.status, AgentStatus::Pending);
        assert!(!agent.email_confirmed);
        assert!(agent.validate().is_ok());
    }

    #[test]
    fn test_commission_rate_out_of_range() {
        let mut d = dto();
        d.commission_rate = 120.0;
        assert!(Agent::new_for_insert(&d).validate().is_err());
        d.commission_rate = -1.0;
        assert!(Agent::new_for_insert(&d).validate().is_err());
    }

    #[test]
    fn test_short_phone_rejected() {
        let mut d = dto();
        d.phone = "12345".into();
        let err = Agent::new_for_insert(&d).validate().unwrap_err();
        assert!(err.contains("Phone"));
    }
}
