use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use chrono::{DateTime, Utc};
use contracts::dashboards::d400_portal_summary::{
    AgentReport, AgentSummary, CustomerSummary, MonthlyRevenue, PortalSummary, RecentPayment,
    RECENT_PAYMENTS,
};
use contracts::domain::a001_agent::Agent;
use contracts::domain::a002_customer::Customer;
use contracts::domain::a005_token::{TokenListQuery, TokenRecord, TokenStatus};

use crate::domain::a001_agent::repository::AgentRepository;
use crate::domain::a001_agent::service::{totals_by_agent, AgentTotals};
use crate::domain::a002_customer::repository::CustomerRepository;
use crate::domain::a005_token::repository::TokenRepository;
use crate::domain::a005_token::service as token_service;
use crate::shared::errors::not_found;

/// Сколько агентов показывать в рейтинге
const TOP_AGENTS: usize = 5;

/// Сводка для администраторов по всему порталу
pub async fn admin_summary(
    agents: &dyn AgentRepository,
    customers: &dyn CustomerRepository,
    tokens: &dyn TokenRepository,
    now: DateTime<Utc>,
) -> Result<PortalSummary> {
    let agents = agents.list_all().await?;
    let customers = customers.list_all().await?;
    let records = token_service::list(tokens, &TokenListQuery::default(), now).await?;

    let active: Vec<&Customer> = customers.iter().filter(|c| c.is_active()).collect();
    let totals = totals_by_agent(&customers, &records);

    let mut top_agents: Vec<AgentSummary> =
        agents.iter().map(|a| summarize_agent(a, &totals)).collect();
    top_agents.sort_by(|a, b| b.sales.total_cmp(&a.sales));
    top_agents.truncate(TOP_AGENTS);

    Ok(PortalSummary {
        total_revenue: records.iter().map(|r| r.amount).sum(),
        active_customers: active.len(),
        active_devices: active.iter().map(|c| c.products.len()).sum(),
        tokens_issued: records.len(),
        total_commission: records.iter().map(|r| r.commission).sum(),
        top_agents,
        revenue_by_month: revenue_by_month(&records),
        recent_payments: recent_payments(&records),
    })
}

/// Отчёт агента по его клиентам
pub async fn agent_summary(
    agents: &dyn AgentRepository,
    customers: &dyn CustomerRepository,
    tokens: &dyn TokenRepository,
    agent_id: &str,
    now: DateTime<Utc>,
) -> Result<AgentReport> {
    let agent = agents
        .get_by_id(agent_id)
        .await?
        .ok_or_else(|| not_found(format!("Agent {}", agent_id)))?;
    let customers = customers.list_all().await?;
    let records = token_service::list(tokens, &TokenListQuery::default(), now).await?;

    let totals = totals_by_agent(&customers, &records);
    let own: Vec<TokenRecord> = records
        .into_iter()
        .filter(|r| {
            customers
                .iter()
                .any(|c| c.id == r.customer_id && c.agent_id == agent.id)
        })
        .collect();

    Ok(AgentReport {
        summary: summarize_agent(&agent, &totals),
        revenue_by_month: revenue_by_month(&own),
        recent_payments: recent_payments(&own),
    })
}

/// Состояние системы клиента: текущий токен, остаток месяцев, сумма оплат
pub async fn customer_summary(
    customers: &dyn CustomerRepository,
    tokens: &dyn TokenRepository,
    customer_id: &str,
    now: DateTime<Utc>,
) -> Result<CustomerSummary> {
    let customer = customers
        .get_by_id(customer_id)
        .await?
        .ok_or_else(|| not_found(format!("Customer {}", customer_id)))?;

    let query = TokenListQuery {
        customer_id: Some(customer.id.clone()),
        ..Default::default()
    };
    let records = token_service::list(tokens, &query, now).await?;
    let current = records.iter().find(|r| r.status == TokenStatus::Active);

    Ok(CustomerSummary {
        customer_id: customer.id.clone(),
        system_status: if current.is_some() { "Active" } else { "Inactive" }.to_string(),
        current_token: current.map(|r| r.token.clone()),
        remaining_months: customer.products.iter().map(|p| p.remaining_months).sum(),
        total_paid: records.iter().map(|r| r.amount).sum(),
    })
}

/// Выручка и комиссия по месяцам выдачи токена (UTC), по возрастанию
fn revenue_by_month(records: &[TokenRecord]) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<String, MonthlyRevenue> = BTreeMap::new();
    for record in records {
        let month = record.generated_at.format("%Y-%m").to_string();
        let entry = months.entry(month.clone()).or_insert_with(|| MonthlyRevenue {
            month,
            revenue: 0.0,
            commission: 0.0,
            payments: 0,
        });
        entry.revenue += record.amount;
        entry.commission += record.commission;
        entry.payments += 1;
    }
    months.into_values().collect()
}

/// Последние платежи; `records` уже отсортированы от новых к старым
fn recent_payments(records: &[TokenRecord]) -> Vec<RecentPayment> {
    records
        .iter()
        .take(RECENT_PAYMENTS)
        .map(|r| RecentPayment {
            record_id: r.id.clone(),
            customer_id: r.customer_id.clone(),
            customer_name: r.customer_name.clone(),
            product_name: r.product_name.clone(),
            amount: r.amount,
            payment_method: r.payment_method,
            status: r.status,
            date: r.generated_at,
        })
        .collect()
}

fn summarize_agent(agent: &Agent, totals: &HashMap<String, AgentTotals>) -> AgentSummary {
    let t = totals.get(&agent.id).copied().unwrap_or_default();
    AgentSummary {
        agent_id: agent.id.clone(),
        name: agent.name.clone(),
        customers: t.customers as usize,
        sales: t.sales,
        commission: t.commission,
    }
}
