use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::a001_agent::Agent;
use tokio::sync::RwLock;

#[async_trait]
pub trait AgentRepository: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Option<Agent>>;
    async fn list_all(&self) -> Result<Vec<Agent>>;
    async fn insert(&self, agent: Agent) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryAgentRepository {
    rows: RwLock<Vec<Agent>>,
}

impl InMemoryAgentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn get_by_id(&self, id: &str) -> Result<Option<Agent>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|a| a.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Agent>> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, agent: Agent) -> Result<()> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|a| a.email.eq_ignore_ascii_case(&agent.email)) {
            return Err(crate::shared::errors::validation(format!(
                "Agent with email {} already exists",
                agent.email
            )));
        }
        rows.push(agent);
        Ok(())
    }
}
