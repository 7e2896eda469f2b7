use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// "Температура" лида
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Hot,
    Warm,
    Cold,
}

/// Потенциальный клиент агента
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: LeadStatus,
    /// Источник: Referral, Website, ...
    pub source: String,
    pub county: String,
    pub notes: Option<String>,
    #[serde(rename = "lastContact")]
    pub last_contact: Option<NaiveDate>,
    #[serde(rename = "nextFollowUp")]
    pub next_follow_up: NaiveDate,
}

impl Lead {
    pub fn new_for_insert(dto: &LeadDto, today: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: dto.name.trim().to_string(),
            email: dto.email.trim().to_string(),
            phone: dto.phone.trim().to_string(),
            status: dto.status,
            source: dto.source.trim().to_string(),
            county: dto.county.trim().to_string(),
            notes: dto.notes.clone().filter(|n| !n.trim().is_empty()),
            last_contact: Some(today),
            next_follow_up: dto.next_follow_up,
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
        if self.source.is_empty() {
            return Err("Please select a source".into());
        }
        if self.county.is_empty() {
            return Err("Please select a county".into());
        }
        Ok(())
    }

    pub fn search_fields(&self) -> [&str; 4] {
        [&self.name, &self.email, &self.phone, &self.source]
    }
}

/// DTO для создания лида
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadDto {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: LeadStatus,
    pub source: String,
    pub county: String,
    pub notes: Option<String>,
    #[serde(rename = "nextFollowUp")]
    pub next_follow_up: NaiveDate,
}

/// Запрос на конвертацию лида в клиента
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertLeadRequest {
    pub plan: String,
    #[serde(rename = "agentId")]
    pub agent_id: String,
}
