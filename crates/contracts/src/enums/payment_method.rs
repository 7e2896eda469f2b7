use serde::{Deserialize, Serialize};

/// Способ оплаты
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Mobile Money
    Momo,
    Cash,
}

impl PaymentMethod {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentMethod::Momo => "momo",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Momo => "Mobile Money",
            PaymentMethod::Cash => "Cash",
        }
    }
}
