use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::domain::a002_customer::Customer;
use contracts::enums::portal_role::PortalRole;
use contracts::system::auth::TokenClaims;

use crate::shared::errors::ApiError;

/// Extractor for getting current user from JWT token
/// Usage in handlers: `async fn handler(CurrentUser(claims): CurrentUser) -> Response`
pub struct CurrentUser(pub TokenClaims);

/// Какие записи видит вызывающий
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataScope {
    All,
    Agent(String),
    Customer(String),
}

impl DataScope {
    /// Агент видит своих клиентов, клиент только себя
    pub fn can_see_customer(&self, customer: &Customer) -> bool {
        match self {
            DataScope::All => true,
            DataScope::Agent(agent_id) => customer.agent_id == *agent_id,
            DataScope::Customer(customer_id) => customer.id == *customer_id,
        }
    }
}

impl CurrentUser {
    pub fn scope(&self) -> Result<DataScope, ApiError> {
        let claims = &self.0;
        let entity = || {
            claims
                .entity_id
                .clone()
                .ok_or_else(|| ApiError::forbidden("Account is not linked to a portal record"))
        };
        match claims.role {
            PortalRole::SuperAdmin | PortalRole::Admin => Ok(DataScope::All),
            PortalRole::Agent => entity().map(DataScope::Agent),
            PortalRole::Customer => entity().map(DataScope::Customer),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Claims кладёт middleware require_*
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: PortalRole, entity_id: Option<&str>) -> CurrentUser {
        CurrentUser(TokenClaims {
            sub: "u".into(),
            username: "u".into(),
            role,
            entity_id: entity_id.map(str::to_string),
            exp: 0,
            iat: 0,
        })
    }

    #[test]
    fn test_scope_by_role() {
        assert_eq!(user(PortalRole::SuperAdmin, None).scope().unwrap(), DataScope::All);
        assert_eq!(
            user(PortalRole::Agent, Some("1")).scope().unwrap(),
            DataScope::Agent("1".into())
        );
        assert_eq!(
            user(PortalRole::Customer, Some("2")).scope().unwrap(),
            DataScope::Customer("2".into())
        );
    }

    #[test]
    fn test_customer_visibility() {
        let customers = crate::domain::a002_customer::service::demo_customers();
        let agent = DataScope::Agent("1".into());
        assert!(agent.can_see_customer(&customers[0]));
        assert!(!agent.can_see_customer(&customers[1]));
        assert!(DataScope::Customer("2".into()).can_see_customer(&customers[1]));
        assert!(DataScope::All.can_see_customer(&customers[1]));
    }

    #[test]
    fn test_unlinked_agent_is_forbidden() {
        let err = user(PortalRole::Agent, None).scope().unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
