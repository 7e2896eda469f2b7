use serde::{Deserialize, Serialize};

use crate::enums::payment_method::PaymentMethod;

/// Платёж клиента по одному из его продуктов.
/// Используется и для предпросмотра, и для проведения.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(rename = "productId")]
    pub product_id: String,
    pub amount: f64,
    #[serde(rename = "paymentMethod")]
    pub payment_method: PaymentMethod,
    /// Номер транзакции или квитанции
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub notes: Option<String>,
}
