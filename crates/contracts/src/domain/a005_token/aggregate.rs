use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::payment_method::PaymentMethod;

/// Код активации устройства на один оплаченный период
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(pub String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    Active,
    Expired,
    Pending,
}

/// Запись журнала выданных токенов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub id: String,
    pub token: Token,

    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(rename = "productName")]
    pub product_name: String,

    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,

    /// Сумма платежа, за который выдан токен
    pub amount: f64,
    #[serde(rename = "periodsCovered")]
    pub periods_covered: f64,
    pub commission: f64,

    /// None для исторических записей без привязки к платежу
    #[serde(rename = "paymentMethod")]
    pub payment_method: Option<PaymentMethod>,
    pub reference: Option<String>,

    pub status: TokenStatus,
}

impl TokenRecord {
    /// Фактический статус на момент `now`: активный токен после срока считается истёкшим
    pub fn status_at(&self, now: DateTime<Utc>) -> TokenStatus {
        match self.status {
            TokenStatus::Active if self.expires_at <= now => TokenStatus::Expired,
            other => other,
        }
    }

    pub fn search_fields(&self) -> [&str; 3] {
        [self.token.as_str(), &self.customer_name, &self.product_name]
    }
}

/// Фильтры журнала токенов (GET /api/tokens)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenListQuery {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
    pub status: Option<TokenStatus>,
    pub search: Option<String>,
}
