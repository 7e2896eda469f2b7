use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use contracts::domain::a001_agent::{Agent, AgentDto, AgentStatus};
use contracts::domain::a002_customer::Customer;
use contracts::domain::a005_token::TokenRecord;

use super::repository::AgentRepository;
use crate::domain::a002_customer::repository::CustomerRepository;
use crate::domain::a005_token::repository::TokenRepository;
use crate::shared::errors::{not_found, validation};
use crate::shared::search::matches_search;

/// Показатели агента по его клиентам
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AgentTotals {
    pub customers: u32,
    pub sales: f64,
    pub commission: f64,
}

/// Клиенты, сумма платежей и комиссия по каждому агенту.
/// Платёж относится к агенту, за которым сейчас закреплён клиент.
pub fn totals_by_agent(
    customers: &[Customer],
    records: &[TokenRecord],
) -> HashMap<String, AgentTotals> {
    let mut totals: HashMap<String, AgentTotals> = HashMap::new();
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for customer in customers {
        owners.insert(&customer.id, &customer.agent_id);
        totals.entry(customer.agent_id.clone()).or_default().customers += 1;
    }
    for record in records {
        if let Some(agent_id) = owners.get(record.customer_id.as_str()) {
            let entry = totals.entry(agent_id.to_string()).or_default();
            entry.sales += record.amount;
            entry.commission += record.commission;
        }
    }
    totals
}

fn with_totals(mut agent: Agent, totals: &HashMap<String, AgentTotals>) -> Agent {
    let t = totals.get(&agent.id).copied().unwrap_or_default();
    agent.customers = t.customers;
    agent.sales = t.sales;
    agent.commission = t.commission;
    agent
}

/// Создание нового агента
pub async fn create(repo: &dyn AgentRepository, dto: AgentDto) -> Result<Agent> {
    let agent = Agent::new_for_insert(&dto);
    agent.validate().map_err(validation)?;

    repo.insert(agent.clone()).await?;
    tracing::info!("Agent created: {} ({})", agent.name, agent.id);
    Ok(agent)
}

pub async fn get_by_id(
    repo: &dyn AgentRepository,
    customers: &dyn CustomerRepository,
    tokens: &dyn TokenRepository,
    id: &str,
) -> Result<Agent> {
    let agent = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| not_found(format!("Agent {}", id)))?;
    let totals = totals_by_agent(&customers.list_all().await?, &tokens.list_all().await?);
    Ok(with_totals(agent, &totals))
}

pub async fn list(
    repo: &dyn AgentRepository,
    customers: &dyn CustomerRepository,
    tokens: &dyn TokenRepository,
    search: Option<&str>,
) -> Result<Vec<Agent>> {
    let totals = totals_by_agent(&customers.list_all().await?, &tokens.list_all().await?);
    Ok(repo
        .list_all()
        .await?
        .into_iter()
        .filter(|a| matches_search(&a.search_fields(), search))
        .map(|a| with_totals(a, &totals))
        .collect())
}

/// Вставка тестовых данных
pub async fn insert_test_data(repo: &dyn AgentRepository) -> Result<()> {
    let data = vec![
        Agent {
            id: "1".into(),
            name: "John Smith".into(),
            email: "john@solarpay.com".into(),
            phone: "+1234567890".into(),
            county: "Montserrado".into(),
            status: AgentStatus::Active,
            commission_rate: 10.0,
            customers: 0,
            sales: 0.0,
            commission: 0.0,
            last_active: NaiveDate::from_ymd_opt(2024, 1, 15),
            email_confirmed: true,
        },
        Agent {
            id: "2".into(),
            name: "Sarah Johnson".into(),
            email: "sarah@solarpay.com".into(),
            phone: "+1234567891".into(),
            county: "Margibi".into(),
            status: AgentStatus::Pending,
            commission_rate: 12.0,
            customers: 0,
            sales: 0.0,
            commission: 0.0,
            last_active: NaiveDate::from_ymd_opt(2024, 1, 14),
            email_confirmed: false,
        },
    ];

    for agent in data {
        repo.insert(agent).await?;
    }
    Ok(())
}
