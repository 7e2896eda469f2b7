use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::a005_token::TokenRecord;
use tokio::sync::RwLock;

/// Журнал выданных токенов (только добавление)
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn append(&self, record: TokenRecord) -> Result<()>;
    async fn list_all(&self) -> Result<Vec<TokenRecord>>;
    /// Токен, уже выданный по платежу с данным reference
    async fn find_by_reference(
        &self,
        customer_id: &str,
        product_id: &str,
        reference: &str,
    ) -> Result<Option<TokenRecord>>;
}

#[derive(Default)]
pub struct InMemoryTokenRepository {
    rows: RwLock<Vec<TokenRecord>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn append(&self, record: TokenRecord) -> Result<()> {
        self.rows.write().await.push(record);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<TokenRecord>> {
        Ok(self.rows.read().await.clone())
    }

    async fn find_by_reference(
        &self,
        customer_id: &str,
        product_id: &str,
        reference: &str,
    ) -> Result<Option<TokenRecord>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| {
                r.customer_id == customer_id
                    && r.product_id == product_id
                    && r.reference.as_deref() == Some(reference)
            })
            .cloned())
    }
}
