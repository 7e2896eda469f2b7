use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::a002_customer::Customer;
use tokio::sync::RwLock;

/// Справочник клиентов с их продуктами
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Option<Customer>>;
    async fn list_all(&self) -> Result<Vec<Customer>>;
    async fn insert(&self, customer: Customer) -> Result<()>;
}

/// Хранилище в памяти, порядок записей совпадает с порядком вставки
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    rows: RwLock<Vec<Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        Self {
            rows: RwLock::new(customers),
        }
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn get_by_id(&self, id: &str) -> Result<Option<Customer>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|c| c.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Customer>> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, customer: Customer) -> Result<()> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|c| c.id == customer.id) {
            return Err(anyhow::anyhow!("Customer {} already exists", customer.id));
        }
        rows.push(customer);
        Ok(())
    }
}
