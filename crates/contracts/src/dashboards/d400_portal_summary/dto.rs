use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a005_token::{Token, TokenStatus};
use crate::enums::payment_method::PaymentMethod;

/// Сколько последних платежей показывать на дашборде
pub const RECENT_PAYMENTS: usize = 5;

/// Точка графика выручки: месяц в формате `YYYY-MM`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
    pub commission: f64,
    pub payments: usize,
}

/// Строка блока "Recent Payments"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentPayment {
    #[serde(rename = "recordId")]
    pub record_id: String,
    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub amount: f64,
    #[serde(rename = "paymentMethod")]
    pub payment_method: Option<PaymentMethod>,
    pub status: TokenStatus,
    pub date: DateTime<Utc>,
}

/// Сводка для администраторов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalSummary {
    #[serde(rename = "totalRevenue")]
    pub total_revenue: f64,
    #[serde(rename = "activeCustomers")]
    pub active_customers: usize,
    /// Продукты активных клиентов
    #[serde(rename = "activeDevices")]
    pub active_devices: usize,
    #[serde(rename = "tokensIssued")]
    pub tokens_issued: usize,
    #[serde(rename = "totalCommission")]
    pub total_commission: f64,
    #[serde(rename = "topAgents")]
    pub top_agents: Vec<AgentSummary>,
    /// По возрастанию месяца
    #[serde(rename = "revenueByMonth")]
    pub revenue_by_month: Vec<MonthlyRevenue>,
    #[serde(rename = "recentPayments")]
    pub recent_payments: Vec<RecentPayment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    #[serde(rename = "agentId")]
    pub agent_id: String,
    pub name: String,
    pub customers: usize,
    pub sales: f64,
    pub commission: f64,
}

/// Отчёт агента: показатели и динамика по его клиентам
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReport {
    #[serde(flatten)]
    pub summary: AgentSummary,
    #[serde(rename = "revenueByMonth")]
    pub revenue_by_month: Vec<MonthlyRevenue>,
    #[serde(rename = "recentPayments")]
    pub recent_payments: Vec<RecentPayment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(rename = "systemStatus")]
    pub system_status: String,
    #[serde(rename = "currentToken")]
    pub current_token: Option<Token>,
    #[serde(rename = "remainingMonths")]
    pub remaining_months: u32,
    #[serde(rename = "totalPaid")]
    pub total_paid: f64,
}

/// Ответ GET /api/dashboard/summary зависит от роли вызывающего
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardView {
    Admin(PortalSummary),
    Agent(AgentReport),
    Customer(CustomerSummary),
}
