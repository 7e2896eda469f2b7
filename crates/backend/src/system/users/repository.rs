use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contracts::system::users::User;
use tokio::sync::RwLock;

use crate::shared::errors::validation;

/// Учётные записи и refresh-токены (хранятся только sha256-хеши)
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create_with_password(&self, user: User, password_hash: String) -> Result<()>;
    async fn get_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn list_all(&self) -> Result<Vec<User>>;
    /// Замена полей записи `user.id`; false, если записи нет
    async fn update(&self, user: User) -> Result<bool>;
    /// Поиск по имени пользователя или email без учёта регистра
    async fn get_by_login(&self, login: &str) -> Result<Option<User>>;
    async fn get_password_hash(&self, user_id: &str) -> Result<Option<String>>;
    async fn count_users(&self) -> Result<usize>;
    async fn update_last_login(&self, id: &str) -> Result<()>;

    async fn store_refresh_token(
        &self,
        user_id: &str,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;
    /// user_id по действующему (не отозванному и не истёкшему) токену
    async fn find_refresh_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<String>>;
    async fn revoke_refresh_token(&self, token_hash: &str) -> Result<bool>;
    /// Отозвать все действующие токены пользователя, вернуть их число
    async fn revoke_user_refresh_tokens(&self, user_id: &str) -> Result<usize>;
}

struct AccountRow {
    user: User,
    password_hash: String,
}

struct RefreshTokenRow {
    user_id: String,
    token_hash: String,
    expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Vec<AccountRow>>,
    refresh_tokens: RwLock<Vec<RefreshTokenRow>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_login(user: &User, login: &str) -> bool {
    user.username.eq_ignore_ascii_case(login)
        || user
            .email
            .as_deref()
            .is_some_and(|email| email.eq_ignore_ascii_case(login))
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create_with_password(&self, user: User, password_hash: String) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .iter()
            .any(|a| a.user.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(validation("Username already exists"));
        }
        accounts.push(AccountRow {
            user,
            password_hash,
        });
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| a.user.id == id)
            .map(|a| a.user.clone()))
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().map(|a| a.user.clone()).collect())
    }

    async fn update(&self, user: User) -> Result<bool> {
        let mut accounts = self.accounts.write().await;
        match accounts.iter_mut().find(|a| a.user.id == user.id) {
            Some(row) => {
                row.user = user;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<User>> {
        let login = login.trim();
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| matches_login(&a.user, login))
            .map(|a| a.user.clone()))
    }

    async fn get_password_hash(&self, user_id: &str) -> Result<Option<String>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| a.user.id == user_id)
            .map(|a| a.password_hash.clone()))
    }

    async fn count_users(&self) -> Result<usize> {
        Ok(self.accounts.read().await.len())
    }

    async fn update_last_login(&self, id: &str) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if let Some(row) = accounts.iter_mut().find(|a| a.user.id == id) {
            let now = Utc::now().to_rfc3339();
            row.user.last_login_at = Some(now.clone());
            row.user.updated_at = now;
        }
        Ok(())
    }

    async fn store_refresh_token(
        &self,
        user_id: &str,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.refresh_tokens.write().await.push(RefreshTokenRow {
            user_id: user_id.to_string(),
            token_hash,
            expires_at,
            revoked_at: None,
        });
        Ok(())
    }

    async fn find_refresh_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<String>> {
        let tokens = self.refresh_tokens.read().await;
        Ok(tokens
            .iter()
            .find(|t| {
                t.token_hash == token_hash && t.expires_at > now && t.revoked_at.is_none()
            })
            .map(|t| t.user_id.clone()))
    }

    async fn revoke_refresh_token(&self, token_hash: &str) -> Result<bool> {
        let mut tokens = self.refresh_tokens.write().await;
        let mut revoked = false;
        for row in tokens
            .iter_mut()
            .filter(|t| t.token_hash == token_hash && t.revoked_at.is_none())
        {
            row.revoked_at = Some(Utc::now());
            revoked = true;
        }
        Ok(revoked)
    }

    async fn revoke_user_refresh_tokens(&self, user_id: &str) -> Result<usize> {
        let mut tokens = self.refresh_tokens.write().await;
        let now = Utc::now();
        let mut revoked = 0;
        for row in tokens
            .iter_mut()
            .filter(|t| t.user_id == user_id && t.revoked_at.is_none())
        {
            row.revoked_at = Some(now);
            revoked += 1;
        }
        Ok(revoked)
    }
}
