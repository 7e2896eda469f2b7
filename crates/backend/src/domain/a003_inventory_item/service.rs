use anyhow::Result;
use contracts::domain::a003_inventory_item::{InventoryItem, InventoryItemDto, StockStatus};

use super::repository::InventoryRepository;
use crate::shared::errors::validation;
use crate::shared::search::matches_search;

/// Добавление позиции на склад
pub async fn create(
    repo: &dyn InventoryRepository,
    dto: InventoryItemDto,
) -> Result<InventoryItem> {
    let item = InventoryItem::new_for_insert(&dto);
    item.validate().map_err(validation)?;

    repo.insert(item.clone()).await?;
    tracing::info!(
        "Inventory item added: {} [{}], qty {}",
        item.name,
        item.sku,
        item.quantity
    );
    Ok(item)
}

pub async fn list(
    repo: &dyn InventoryRepository,
    status: Option<StockStatus>,
    search: Option<&str>,
) -> Result<Vec<InventoryItem>> {
    Ok(repo
        .list_all()
        .await?
        .into_iter()
        .filter(|i| status.map_or(true, |s| i.status == s))
        .filter(|i| matches_search(&i.search_fields(), search))
        .collect())
}

/// Вставка тестовых данных
pub async fn insert_test_data(repo: &dyn InventoryRepository) -> Result<()> {
    let data = vec![
        (
            InventoryItemDto {
                name: "Basic Solar Kit".into(),
                sku: "BSK-001".into(),
                category: "Solar Kits".into(),
                quantity: 45,
                price: 599.99,
                serial_numbers: vec!["SN001".into(), "SN002".into(), "SN003".into()],
            },
            12,
        ),
        (
            InventoryItemDto {
                name: "Premium Solar Panel".into(),
                sku: "PSP-002".into(),
                category: "Panels".into(),
                quantity: 8,
                price: 899.99,
                serial_numbers: vec!["SN004".into(), "SN005".into()],
            },
            5,
        ),
    ];

    for (idx, (dto, allocated)) in data.into_iter().enumerate() {
        let mut item = InventoryItem::new_for_insert(&dto);
        item.id = (idx + 1).to_string();
        item.allocated = allocated;
        item.refresh_status();
        repo.insert(item).await?;
    }
    Ok(())
}
