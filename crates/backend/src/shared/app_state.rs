use std::sync::Arc;

use anyhow::Result;

use crate::domain::a001_agent::repository::{AgentRepository, InMemoryAgentRepository};
use crate::domain::a002_customer::repository::{CustomerRepository, InMemoryCustomerRepository};
use crate::domain::a003_inventory_item::repository::{
    InMemoryInventoryRepository, InventoryRepository,
};
use crate::domain::a004_lead::repository::{InMemoryLeadRepository, LeadRepository};
use crate::domain::a005_token::issuer::build_issuer;
use crate::domain::a005_token::repository::{InMemoryTokenRepository, TokenRepository};
use crate::shared::config::Config;
use crate::system::auth::jwt::JwtKeys;
use crate::system::users::repository::{AccountRepository, InMemoryAccountRepository};
use crate::usecases::u501_record_payment::executor::PaymentExecutor;

/// Общее состояние обработчиков: репозитории, ключи JWT и приём платежей
#[derive(Clone)]
pub struct AppState {
    pub agents: Arc<dyn AgentRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub inventory: Arc<dyn InventoryRepository>,
    pub leads: Arc<dyn LeadRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub jwt: JwtKeys,
    pub payments: Arc<PaymentExecutor>,
}

impl AppState {
    /// Состояние на in-memory репозиториях
    pub fn in_memory(config: &Config) -> Result<Self> {
        let customers: Arc<dyn CustomerRepository> = Arc::new(InMemoryCustomerRepository::new());
        let tokens: Arc<dyn TokenRepository> = Arc::new(InMemoryTokenRepository::new());
        let issuer = build_issuer(&config.tokens)?;

        Ok(Self {
            agents: Arc::new(InMemoryAgentRepository::new()),
            inventory: Arc::new(InMemoryInventoryRepository::new()),
            leads: Arc::new(InMemoryLeadRepository::new()),
            accounts: Arc::new(InMemoryAccountRepository::new()),
            jwt: JwtKeys::from_config(&config.auth),
            payments: Arc::new(PaymentExecutor::new(customers.clone(), tokens.clone(), issuer)),
            customers,
            tokens,
        })
    }
}
