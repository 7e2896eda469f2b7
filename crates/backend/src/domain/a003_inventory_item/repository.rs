use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::a003_inventory_item::InventoryItem;
use tokio::sync::RwLock;

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<InventoryItem>>;
    async fn insert(&self, item: InventoryItem) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryInventoryRepository {
    rows: RwLock<Vec<InventoryItem>>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn list_all(&self) -> Result<Vec<InventoryItem>> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, item: InventoryItem) -> Result<()> {
        let mut rows = self.rows.write().await;
        // SKU уникален в пределах склада
        if rows.iter().any(|i| i.sku.eq_ignore_ascii_case(&item.sku)) {
            return Err(crate::shared::errors::validation(format!(
                "SKU {} already exists",
                item.sku
            )));
        }
        rows.push(item);
        Ok(())
    }
}
