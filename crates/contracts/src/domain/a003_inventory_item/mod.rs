pub mod aggregate;

pub use aggregate::{InventoryItem, InventoryItemDto, StockStatus};
