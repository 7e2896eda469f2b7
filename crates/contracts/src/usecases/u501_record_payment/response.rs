use serde::{Deserialize, Serialize};

use crate::domain::a005_token::TokenRecord;

/// Результат распределения платежа
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommissionResult {
    /// Сколько месяцев покрывает платёж (может быть дробным)
    #[serde(rename = "periodsCovered")]
    pub periods_covered: f64,
    #[serde(rename = "totalCommission")]
    pub total_commission: f64,
    /// Комиссия агента за один месяц
    #[serde(rename = "commissionPerPeriod")]
    pub commission_per_period: f64,
}

/// Предпросмотр расчёта для формы приёма платежа
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPreviewResponse {
    pub allocation: CommissionResult,
    #[serde(rename = "agentCommissionRate")]
    pub agent_commission_rate: f64,
    #[serde(rename = "monthlyPayment")]
    pub monthly_payment: f64,
    #[serde(rename = "remainingMonths")]
    pub remaining_months: u32,
    /// Строки для отображения: "Payment covers 1.5 months" и т.п.
    pub summary: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentResponse {
    pub record: TokenRecord,
    pub allocation: CommissionResult,
    /// true, если платёж с таким reference уже был проведён и токен не выдавался повторно
    pub replayed: bool,
    pub message: String,
    pub summary: Vec<String>,
}
