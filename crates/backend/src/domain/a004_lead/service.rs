use anyhow::Result;
use chrono::{NaiveDate, Utc};
use contracts::domain::a002_customer::{Customer, CustomerDto};
use contracts::domain::a004_lead::{ConvertLeadRequest, Lead, LeadDto, LeadStatus};

use super::repository::LeadRepository;
use crate::domain::a001_agent::repository::AgentRepository;
use crate::domain::a002_customer::repository::CustomerRepository;
use crate::domain::a002_customer::service as customer_service;
use crate::shared::errors::{not_found, validation};
use crate::shared::search::matches_search;

pub async fn create(repo: &dyn LeadRepository, dto: LeadDto) -> Result<Lead> {
    let lead = Lead::new_for_insert(&dto, Utc::now().date_naive());
    lead.validate().map_err(validation)?;

    repo.insert(lead.clone()).await?;
    tracing::info!("Lead created: {} ({})", lead.name, lead.id);
    Ok(lead)
}

pub async fn list(
    repo: &dyn LeadRepository,
    status: Option<LeadStatus>,
    search: Option<&str>,
) -> Result<Vec<Lead>> {
    let mut leads: Vec<Lead> = repo
        .list_all()
        .await?
        .into_iter()
        .filter(|l| status.map_or(true, |s| l.status == s))
        .filter(|l| matches_search(&l.search_fields(), search))
        .collect();
    // Ближайшие follow-up сверху
    leads.sort_by_key(|l| l.next_follow_up);
    Ok(leads)
}

/// Конвертация лида в клиента.
/// Лид изымается из списка до создания клиента и возвращается, если создание не удалось:
/// параллельная конвертация того же лида получает NotFound.
pub async fn convert_to_customer(
    leads: &dyn LeadRepository,
    customers: &dyn CustomerRepository,
    agents: &dyn AgentRepository,
    lead_id: &str,
    request: ConvertLeadRequest,
) -> Result<Customer> {
    let lead = leads
        .remove(lead_id)
        .await?
        .ok_or_else(|| not_found(format!("Lead {}", lead_id)))?;

    let dto = CustomerDto {
        name: lead.name.clone(),
        email: lead.email.clone(),
        phone: lead.phone.clone(),
        county: lead.county.clone(),
        plan: request.plan,
        agent_id: request.agent_id,
        products: vec![],
    };
    let customer = match customer_service::create(customers, agents, dto).await {
        Ok(customer) => customer,
        Err(err) => {
            leads.insert(lead).await?;
            return Err(err);
        }
    };

    tracing::info!("Lead {} converted to customer {}", lead_id, customer.id);
    Ok(customer)
}

/// Вставка тестовых данных
pub async fn insert_test_data(repo: &dyn LeadRepository) -> Result<()> {
    let data = vec![
        Lead {
            id: "1".into(),
            name: "Michael Brown".into(),
            email: "michael@example.com".into(),
            phone: "+1234567890".into(),
            status: LeadStatus::Hot,
            source: "Referral".into(),
            county: "Montserrado".into(),
            notes: Some("Interested in premium package".into()),
            last_contact: NaiveDate::from_ymd_opt(2024, 1, 15),
            next_follow_up: date(2024, 1, 22)?,
        },
        Lead {
            id: "2".into(),
            name: "Sarah Wilson".into(),
            email: "sarah@example.com".into(),
            phone: "+1234567891".into(),
            status: LeadStatus::Warm,
            source: "Website".into(),
            county: "Margibi".into(),
            notes: Some("Requested pricing information".into()),
            last_contact: NaiveDate::from_ymd_opt(2024, 1, 14),
            next_follow_up: date(2024, 1, 21)?,
        },
    ];

    for lead in data {
        repo.insert(lead).await?;
    }
    Ok(())
}

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow::anyhow!("Invalid date {y}-{m}-{d}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_agent::repository::InMemoryAgentRepository;
    use crate::domain::a001_agent::service as agent_service;
    use crate::domain::a002_customer::repository::InMemoryCustomerRepository;
    use crate::domain::a004_lead::repository::InMemoryLeadRepository;
    use crate::shared::errors::NotFoundError;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_sorted_by_follow_up() {
        let repo = InMemoryLeadRepository::new();
        insert_test_data(&repo).await.unwrap();

        let leads = list(&repo, None, None).await.unwrap();
        assert_eq!(leads[0].name, "Sarah Wilson");
        assert_eq!(list(&repo, Some(LeadStatus::Hot), None).await.unwrap().len(), 1);
        assert_eq!(list(&repo, None, Some("pricing")).await.unwrap().len(), 0);
        assert_eq!(list(&repo, None, Some("referral")).await.unwrap()[0].id, "1");
    }

    #[tokio::test]
    async fn test_convert_lead_to_customer() {
        let leads = InMemoryLeadRepository::new();
        insert_test_data(&leads).await.unwrap();
        let agents = InMemoryAgentRepository::new();
        agent_service::insert_test_data(&agents).await.unwrap();
        let customers = InMemoryCustomerRepository::new();

        let customer = convert_to_customer(
            &leads,
            &customers,
            &agents,
            "1",
            ConvertLeadRequest {
                plan: "Premium Plan".into(),
                agent_id: "1".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(customer.name, "Michael Brown");
        assert_eq!(customer.agent_commission, 10.0);
        assert!(leads.get_by_id("1").await.unwrap().is_none());
        assert_eq!(customers.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_conversion_keeps_lead() {
        let leads = InMemoryLeadRepository::new();
        insert_test_data(&leads).await.unwrap();
        let agents = InMemoryAgentRepository::new();
        let customers = InMemoryCustomerRepository::new();

        let result = convert_to_customer(
            &leads,
            &customers,
            &agents,
            "2",
            ConvertLeadRequest {
                plan: "Basic Plan".into(),
                agent_id: "missing".into(),
            },
        )
        .await;

        assert!(result.is_err());
        assert!(leads.get_by_id("2").await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_conversion_creates_one_customer() {
        let leads = Arc::new(InMemoryLeadRepository::new());
        insert_test_data(leads.as_ref()).await.unwrap();
        let agents = Arc::new(InMemoryAgentRepository::new());
        agent_service::insert_test_data(agents.as_ref()).await.unwrap();
        let customers = Arc::new(InMemoryCustomerRepository::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let (leads, customers, agents) = (leads.clone(), customers.clone(), agents.clone());
            handles.push(tokio::spawn(async move {
                convert_to_customer(
                    leads.as_ref(),
                    customers.as_ref(),
                    agents.as_ref(),
                    "1",
                    ConvertLeadRequest {
                        plan: "Premium Plan".into(),
                        agent_id: "1".into(),
                    },
                )
                .await
            }));
        }

        let mut converted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => converted += 1,
                Err(err) => assert!(err.downcast_ref::<NotFoundError>().is_some()),
            }
        }

        assert_eq!(converted, 1);
        assert_eq!(customers.list_all().await.unwrap().len(), 1);
        assert!(leads.get_by_id("1").await.unwrap().is_none());
    }
}
