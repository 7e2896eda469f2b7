use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

/// Продукт в рассрочке, закреплённый за клиентом
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProduct {
    pub id: String,
    pub name: String,

    /// Фиксированный ежемесячный платёж
    #[serde(rename = "monthlyPayment")]
    pub monthly_payment: f64,

    /// Оставшееся количество расчётных периодов (месяцев)
    #[serde(rename = "remainingMonths")]
    pub remaining_months: u32,
}

/// Клиент с привязкой к агенту и списком продуктов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub county: String,
    pub status: CustomerStatus,

    /// Название тарифного плана, например "Basic Plan"
    pub plan: String,

    #[serde(rename = "agentId")]
    pub agent_id: String,

    /// Ставка комиссии агента в процентах, 0..=100
    #[serde(rename = "agentCommission")]
    pub agent_commission: f64,

    pub products: Vec<CustomerProduct>,
}

impl Customer {
    /// Создать клиента из DTO; ставка комиссии берётся у агента
    pub fn new_for_insert(dto: &CustomerDto, agent_commission: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: dto.name.trim().to_string(),
            email: dto.email.trim().to_string(),
            phone: dto.phone.trim().to_string(),
            county: dto.county.trim().to_string(),
            status: CustomerStatus::Active,
            plan: dto.plan.trim().to_string(),
            agent_id: dto.agent_id.clone(),
            agent_commission,
            products: dto.products.clone(),
        }
    }

    /// Найти продукт клиента по ID
    pub fn product(&self, product_id: &str) -> Option<&CustomerProduct> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn owns_product(&self, product_id: &str) -> bool {
        self.product(product_id).is_some()
    }

    pub fn is_active(&self) -> bool {
        self.status == CustomerStatus::Active
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
        if self.plan.is_empty() {
            return Err("Please select a plan".into());
        }
        if self.county.is_empty() {
            return Err("Please select a county".into());
        }
        if !(0.0..=100.0).contains(&self.agent_commission) {
            return Err("Agent commission must be between 0 and 100".into());
        }
        for product in &self.products {
            if !(product.monthly_payment.is_finite() && product.monthly_payment > 0.0) {
                return Err(format!(
                    "Product '{}' must have a positive monthly payment",
                    product.name
                ));
            }
        }
        Ok(())
    }

    pub fn search_fields(&self) -> [&str; 5] {
        [&self.name, &self.email, &self.phone, &self.county, &self.plan]
    }
}

/// DTO для создания клиента
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDto {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub county: String,
    pub plan: String,
    #[serde(rename = "agentId")]
    pub agent_id: String,
    #[serde(default)]
    pub products: Vec<CustomerProduct>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer {
            id: "1".into(),
            name: "John Doe".into(),
            email: "john.doe@example.com".into(),
            phone: "+1234567890".into(),
            county: "Montserrado".into(),
            status: CustomerStatus::Active,
            plan: "Basic Plan".into(),
            agent_id: "1".into(),
            agent_commission: 10.0,
            products: vec![CustomerProduct {
                id: "1".into(),
                name: "Basic Solar Kit".into(),
                monthly_payment: 100.0,
                remaining_months: 6,
            }],
        }
    }

    #[test]
    fn test_product_lookup() {
        let c = customer();
        assert!(c.owns_product("1"));
        assert!(!c.owns_product("3"));
        assert_eq!(c.product("1").map(|p| p.monthly_payment), Some(100.0));
    }

    #[test]
    fn test_validate_rejects_zero_monthly_payment() {
        let mut c = customer();
        c.products[0].monthly_payment = 0.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_commission_over_100() {
        let mut c = customer();
        c.agent_commission = 100.5;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_serde_uses_portal_field_names() {
        let json = serde_json::to_value(customer()).unwrap();
        assert_eq!(json["agentCommission"], 10.0);
        assert_eq!(json["products"][0]["monthlyPayment"], 100.0);
        assert_eq!(json["products"][0]["remainingMonths"], 6);
    }
}
