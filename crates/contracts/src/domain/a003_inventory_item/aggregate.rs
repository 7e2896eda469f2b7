use serde::{Deserialize, Serialize};

/// Порог свободного остатка, ниже которого товар считается заканчивающимся
pub const LOW_STOCK_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Статус по свободному (нераспределённому) остатку
    pub fn from_available(available: u32) -> Self {
        match available {
            0 => StockStatus::OutOfStock,
            n if n < LOW_STOCK_THRESHOLD => StockStatus::LowStock,
            _ => StockStatus::InStock,
        }
    }
}

/// Складская позиция (солнечные комплекты, панели, аккумуляторы)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub status: StockStatus,
    pub quantity: u32,
    /// Количество, уже закреплённое за клиентами
    pub allocated: u32,
    pub price: f64,
    #[serde(rename = "serialNumbers")]
    pub serial_numbers: Vec<String>,
}

impl InventoryItem {
    pub fn new_for_insert(dto: &InventoryItemDto) -> Self {
        let mut item = Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: dto.name.trim().to_string(),
            sku: dto.sku.trim().to_string(),
            category: dto.category.trim().to_string(),
            status: StockStatus::OutOfStock,
            quantity: dto.quantity,
            allocated: 0,
            price: dto.price,
            serial_numbers: dto
                .serial_numbers
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };
        item.refresh_status();
        item
    }

    /// Свободный остаток
    pub fn available(&self) -> u32 {
        self.quantity.saturating_sub(self.allocated)
    }

    pub fn refresh_status(&mut self) {
        self.status = StockStatus::from_available(self.available());
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.name.chars().count() < 2 {
            return Err("Product name must be at least 2 characters".into());
        }
        if self.sku.chars().count() < 3 {
            return Err("SKU must be at least 3 characters".into());
        }
        if self.category.is_empty() {
            return Err("Please select a category".into());
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err("Price must be a positive number".into());
        }
        if self.allocated > self.quantity {
            return Err("Allocated quantity exceeds stock".into());
        }
        Ok(())
    }

    pub fn search_fields(&self) -> [&str; 3] {
        [&self.name, &self.sku, &self.category]
    }
}

/// DTO для добавления позиции на склад
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemDto {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub quantity: u32,
    pub price: f64,
    #[serde(rename = "serialNumbers", default)]
    pub serial_numbers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_thresholds() {
        assert_eq!(StockStatus::from_available(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_available(3), StockStatus::LowStock);
        assert_eq!(StockStatus::from_available(10), StockStatus::InStock);
    }

    #[test]
    fn test_new_item_status_and_serials() {
        let item = InventoryItem::new_for_insert(&InventoryItemDto {
            name: "Solar Battery Pack".into(),
            sku: "SBP-003".into(),
            category: "Batteries".into(),
            quantity: 4,
            price: 349.5,
            serial_numbers: vec!["SN010".into(), " ".into(), " SN011 ".into()],
        });
        assert_eq!(item.status, StockStatus::LowStock);
        assert_eq!(item.serial_numbers, vec!["SN010", "SN011"]);
        assert!(item.validate().is_ok());
    }
}
