use anyhow::Result;
use contracts::enums::portal_role::PortalRole;
use contracts::system::users::CreateUserDto;

use crate::domain::{a001_agent, a002_customer, a003_inventory_item, a004_lead, a005_token};
use crate::shared::app_state::AppState;
use crate::system::users::repository::AccountRepository;
use crate::system::users::service;

/// Заполнить пустые репозитории демо-данными
pub async fn seed_demo_data(state: &AppState) -> Result<()> {
    if state.accounts.count_users().await? > 0 {
        tracing::info!("Accounts already present, skipping demo data");
        return Ok(());
    }

    a001_agent::service::insert_test_data(state.agents.as_ref()).await?;
    a002_customer::service::insert_test_data(state.customers.as_ref()).await?;
    a003_inventory_item::service::insert_test_data(state.inventory.as_ref()).await?;
    a004_lead::service::insert_test_data(state.leads.as_ref()).await?;
    a005_token::service::insert_test_data(state.tokens.as_ref()).await?;
    seed_accounts(state.accounts.as_ref()).await?;

    tracing::info!("Demo data loaded");
    Ok(())
}

struct SeedAccount {
    username: &'static str,
    password: &'static str,
    email: &'static str,
    full_name: &'static str,
    role: PortalRole,
    entity_id: Option<&'static str>,
}

const ADMIN_PERMISSIONS: [&str; 4] = [
    "manage_users",
    "manage_inventory",
    "manage_agents",
    "view_reports",
];
const AGENT_PERMISSIONS: [&str; 4] = [
    "manage_customers",
    "view_inventory",
    "generate_tokens",
    "view_reports",
];

/// Демо-учётные записи для каждого портала
pub async fn seed_accounts(repo: &dyn AccountRepository) -> Result<()> {
    let accounts = [
        SeedAccount {
            username: "super",
            password: "Super@231",
            email: "",
            full_name: "Super Admin",
            role: PortalRole::SuperAdmin,
            entity_id: None,
        },
        SeedAccount {
            username: "admin1",
            password: "Admin@123",
            email: "admin@solarpay.com",
            full_name: "Admin User",
            role: PortalRole::Admin,
            entity_id: None,
        },
        SeedAccount {
            username: "admin2",
            password: "Admin@456",
            email: "system@solarpay.com",
            full_name: "System Admin",
            role: PortalRole::Admin,
            entity_id: None,
        },
        SeedAccount {
            username: "agent1",
            password: "Agent@123",
            email: "john@solarpay.com",
            full_name: "John Smith",
            role: PortalRole::Agent,
            entity_id: Some("1"),
        },
        SeedAccount {
            username: "agent2",
            password: "Agent@456",
            email: "sarah@solarpay.com",
            full_name: "Sarah Johnson",
            role: PortalRole::Agent,
            entity_id: Some("2"),
        },
        SeedAccount {
            username: "customer1",
            password: "Customer@123",
            email: "john.doe@example.com",
            full_name: "John Doe",
            role: PortalRole::Customer,
            entity_id: Some("1"),
        },
        SeedAccount {
            username: "customer2",
            password: "Customer@456",
            email: "jane.smith@example.com",
            full_name: "Jane Smith",
            role: PortalRole::Customer,
            entity_id: Some("2"),
        },
    ];

    for seed in accounts {
        let mut permissions: Vec<String> = match seed.role {
            PortalRole::SuperAdmin | PortalRole::Admin => &ADMIN_PERMISSIONS[..],
            PortalRole::Agent => &AGENT_PERMISSIONS[..],
            PortalRole::Customer => &[][..],
        }
        .iter()
        .map(|p| p.to_string())
        .collect();
        if seed.username == "admin2" || seed.role == PortalRole::SuperAdmin {
            permissions.push("manage_settings".to_string());
        }

        service::create(
            repo,
            CreateUserDto {
                username: seed.username.to_string(),
                password: seed.password.to_string(),
                email: Some(seed.email.to_string()).filter(|e| !e.is_empty()),
                full_name: Some(seed.full_name.to_string()),
                role: seed.role,
                entity_id: seed.entity_id.map(str::to_string),
                permissions,
            },
        )
        .await?;
    }

    tracing::warn!("Demo accounts created, change their passwords before going live");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::test_config;

    #[tokio::test]
    async fn test_seed_is_applied_once() {
        let state = AppState::in_memory(&test_config()).unwrap();
        seed_demo_data(&state).await.unwrap();
        seed_demo_data(&state).await.unwrap();

        assert_eq!(state.accounts.count_users().await.unwrap(), 7);
        assert_eq!(state.customers.list_all().await.unwrap().len(), 2);
        assert_eq!(state.tokens.list_all().await.unwrap().len(), 3);

        let admin2 = state
            .accounts
            .get_by_login("system@solarpay.com")
            .await
            .unwrap()
            .unwrap();
        assert!(admin2.permissions.contains(&"manage_settings".to_string()));
    }
}
