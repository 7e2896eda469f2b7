use anyhow::Result;
use contracts::domain::a002_customer::{Customer, CustomerDto, CustomerProduct, CustomerStatus};

use super::repository::CustomerRepository;
use crate::domain::a001_agent::repository::AgentRepository;
use crate::shared::errors::{not_found, validation};
use crate::shared::search::matches_search;

/// Создание нового клиента, ставка комиссии берётся у агента
pub async fn create(
    customers: &dyn CustomerRepository,
    agents: &dyn AgentRepository,
    dto: CustomerDto,
) -> Result<Customer> {
    let agent = agents
        .get_by_id(&dto.agent_id)
        .await?
        .ok_or_else(|| validation(format!("Agent {} does not exist", dto.agent_id)))?;

    let customer = Customer::new_for_insert(&dto, agent.commission_rate);
    customer.validate().map_err(validation)?;

    customers.insert(customer.clone()).await?;
    tracing::info!(
        "Customer created: {} ({}), agent {}",
        customer.name,
        customer.id,
        agent.id
    );
    Ok(customer)
}

pub async fn get_by_id(repo: &dyn CustomerRepository, id: &str) -> Result<Customer> {
    repo.get_by_id(id)
        .await?
        .ok_or_else(|| not_found(format!("Customer {}", id)))
}

/// Список клиентов с фильтром по агенту и поиском по подстроке
pub async fn list(
    repo: &dyn CustomerRepository,
    agent_id: Option<&str>,
    search: Option<&str>,
) -> Result<Vec<Customer>> {
    Ok(repo
        .list_all()
        .await?
        .into_iter()
        .filter(|c| agent_id.map_or(true, |id| c.agent_id == id))
        .filter(|c| matches_search(&c.search_fields(), search))
        .collect())
}

/// Клиенты из формы приёма платежа
pub fn demo_customers() -> Vec<Customer> {
    vec![
        Customer {
            id: "1".into(),
            name: "John Doe".into(),
            email: "john.doe@example.com".into(),
            phone: "+1234567890".into(),
            county: "Montserrado".into(),
            status: CustomerStatus::Active,
            plan: "Basic Plan".into(),
            agent_id: "1".into(),
            agent_commission: 10.0,
            products: vec![
                CustomerProduct {
                    id: "1".into(),
                    name: "Basic Solar Kit".into(),
                    monthly_payment: 100.0,
                    remaining_months: 6,
                },
                CustomerProduct {
                    id: "2".into(),
                    name: "Premium Solar Panel".into(),
                    monthly_payment: 200.0,
                    remaining_months: 12,
                },
            ],
        },
        Customer {
            id: "2".into(),
            name: "Jane Smith".into(),
            email: "jane.smith@example.com".into(),
            phone: "+1234567891".into(),
            county: "Margibi".into(),
            status: CustomerStatus::Active,
            plan: "Premium Plan".into(),
            agent_id: "2".into(),
            agent_commission: 12.0,
            products: vec![CustomerProduct {
                id: "3".into(),
                name: "Solar Battery Pack".into(),
                monthly_payment: 150.0,
                remaining_months: 18,
            }],
        },
    ]
}

/// Вставка тестовых данных
pub async fn insert_test_data(repo: &dyn CustomerRepository) -> Result<()> {
    for customer in demo_customers() {
        repo.insert(customer).await?;
    }
    Ok(())
}
