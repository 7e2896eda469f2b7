use std::sync::Arc;

use anyhow::Result;
use contracts::domain::a002_customer::{Customer, CustomerProduct};
use contracts::domain::a005_token::Token;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::shared::config::{TokenIssuerKind, TokensConfig};

/// Выдача токена активации за оплаченный период.
/// Реализации не должны обращаться к журналу токенов, запись делает вызывающий.
pub trait TokenIssuer: Send + Sync {
    fn issue(
        &self,
        customer: &Customer,
        product: &CustomerProduct,
        periods_covered: f64,
    ) -> Result<Token>;
}

/// Возвращает одно и то же значение на любой платёж
pub struct PlaceholderTokenIssuer {
    value: String,
}

impl PlaceholderTokenIssuer {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl TokenIssuer for PlaceholderTokenIssuer {
    fn issue(&self, _: &Customer, _: &CustomerProduct, _: f64) -> Result<Token> {
        Ok(Token::new(self.value.clone()))
    }
}

/// Without 0/O and 1/I, so tokens can be read out over the phone.
const TOKEN_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const DIGEST_TOKEN_LEN: usize = 9;

/// Токен из sha256(secret, customer, product, periods, nonce)
pub struct DigestTokenIssuer {
    secret: Vec<u8>,
}

impl DigestTokenIssuer {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }
}

impl TokenIssuer for DigestTokenIssuer {
    fn issue(
        &self,
        customer: &Customer,
        product: &CustomerProduct,
        periods_covered: f64,
    ) -> Result<Token> {
        let mut nonce = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce);

        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(customer.id.as_bytes());
        hasher.update([0u8]);
        hasher.update(product.id.as_bytes());
        hasher.update([0u8]);
        hasher.update(periods_covered.to_bits().to_be_bytes());
        hasher.update(nonce);
        let digest = hasher.finalize();

        // 256 кратно 32: символы распределены равномерно
        let token: String = digest
            .iter()
            .take(DIGEST_TOKEN_LEN)
            .map(|b| TOKEN_ALPHABET[(*b as usize) % TOKEN_ALPHABET.len()] as char)
            .collect();
        Ok(Token::new(token))
    }
}

pub fn build_issuer(config: &TokensConfig) -> Result<Arc<dyn TokenIssuer>> {
    match config.issuer {
        TokenIssuerKind::Placeholder => {
            tracing::warn!(
                "Token issuer: placeholder '{}' (every payment gets the same token)",
                config.placeholder
            );
            Ok(Arc::new(PlaceholderTokenIssuer::new(config.placeholder.clone())))
        }
        TokenIssuerKind::Digest => {
            let secret = config
                .secret
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("Digest token issuer requires [tokens] secret"))?;
            tracing::info!("Token issuer: digest");
            Ok(Arc::new(DigestTokenIssuer::new(secret)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_customer::CustomerStatus;

    fn fixture() -> (Customer, CustomerProduct) {
        let product = CustomerProduct {
            id: "3".into(),
            name: "Solar Battery Pack".into(),
            monthly_payment: 150.0,
            remaining_months: 18,
        };
        let customer = Customer {
            id: "2".into(),
            name: "Jane Smith".into(),
            email: "jane.smith@example.com".into(),
            phone: "+1234567891".into(),
            county: "Margibi".into(),
            status: CustomerStatus::Active,
            plan: "Premium Plan".into(),
            agent_id: "2".into(),
            agent_commission: 12.0,
            products: vec![product.clone()],
        };
        (customer, product)
    }

    #[test]
    fn test_placeholder_is_constant() {
        let (customer, product) = fixture();
        let issuer = PlaceholderTokenIssuer::new("ABC123XYZ");
        assert_eq!(issuer.issue(&customer, &product, 1.0).unwrap().as_str(), "ABC123XYZ");
        assert_eq!(issuer.issue(&customer, &product, 7.5).unwrap().as_str(), "ABC123XYZ");
    }

    #[test]
    fn test_digest_token_shape() {
        let (customer, product) = fixture();
        let issuer = DigestTokenIssuer::new("secret");
        let token = issuer.issue(&customer, &product, 2.0).unwrap();
        assert_eq!(token.as_str().len(), DIGEST_TOKEN_LEN);
        assert!(token.as_str().bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_digest_tokens_differ_per_issue() {
        let (customer, product) = fixture();
        let issuer = DigestTokenIssuer::new("secret");
        let a = issuer.issue(&customer, &product, 1.0).unwrap();
        let b = issuer.issue(&customer, &product, 1.0).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_build_issuer_from_config() {
        let (customer, product) = fixture();
        let issuer = build_issuer(&TokensConfig::default()).unwrap();
        assert_eq!(issuer.issue(&customer, &product, 1.0).unwrap().as_str(), "ABC123XYZ");

        let digest = TokensConfig {
            issuer: TokenIssuerKind::Digest,
            placeholder: String::new(),
            secret: None,
        };
        assert!(build_issuer(&digest).is_err());
    }
}
