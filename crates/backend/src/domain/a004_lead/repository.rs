use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::a004_lead::Lead;
use tokio::sync::RwLock;

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Option<Lead>>;
    async fn list_all(&self) -> Result<Vec<Lead>>;
    async fn insert(&self, lead: Lead) -> Result<()>;
    /// Удалить лид, возвращает удалённую запись
    async fn remove(&self, id: &str) -> Result<Option<Lead>>;
}

#[derive(Default)]
pub struct InMemoryLeadRepository {
    rows: RwLock<Vec<Lead>>,
}

impl InMemoryLeadRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn get_by_id(&self, id: &str) -> Result<Option<Lead>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|l| l.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Lead>> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, lead: Lead) -> Result<()> {
        self.rows.write().await.push(lead);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<Option<Lead>> {
        let mut rows = self.rows.write().await;
        Ok(rows
            .iter()
            .position(|l| l.id == id)
            .map(|idx| rows.remove(idx)))
    }
}
