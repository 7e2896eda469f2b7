use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a005_token::{Token, TokenListQuery, TokenRecord, TokenStatus};

use super::repository::TokenRepository;
use crate::shared::search::matches_search;

/// Журнал токенов с фильтрами. Статус пересчитывается на момент `now`,
/// свежие записи идут первыми.
pub async fn list(
    repo: &dyn TokenRepository,
    query: &TokenListQuery,
    now: DateTime<Utc>,
) -> Result<Vec<TokenRecord>> {
    let mut records: Vec<TokenRecord> = repo
        .list_all()
        .await?
        .into_iter()
        .map(|mut r| {
            r.status = r.status_at(now);
            r
        })
        .filter(|r| {
            query
                .customer_id
                .as_deref()
                .map_or(true, |id| r.customer_id == id)
        })
        .filter(|r| {
            query
                .product_id
                .as_deref()
                .map_or(true, |id| r.product_id == id)
        })
        .filter(|r| query.status.map_or(true, |s| r.status == s))
        .filter(|r| matches_search(&r.search_fields(), query.search.as_deref()))
        .collect();

    records.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
    Ok(records)
}

struct SeedToken {
    id: &'static str,
    token: &'static str,
    customer: (&'static str, &'static str),
    product: (&'static str, &'static str),
    generated: (i32, u32, u32),
    expires: (i32, u32, u32),
    amount: f64,
    monthly_payment: f64,
    rate: f64,
    status: TokenStatus,
}

/// Вставка тестовых данных
pub async fn insert_test_data(repo: &dyn TokenRepository) -> Result<()> {
    let data = [
        SeedToken {
            id: "1",
            token: "ABC123XYZ",
            customer: ("1", "John Doe"),
            product: ("1", "Basic Solar Kit"),
            generated: (2024, 1, 15),
            expires: (2024, 2, 15),
            amount: 150.0,
            monthly_payment: 100.0,
            rate: 10.0,
            status: TokenStatus::Active,
        },
        SeedToken {
            id: "2",
            token: "DEF456UVW",
            customer: ("1", "John Doe"),
            product: ("1", "Basic Solar Kit"),
            generated: (2023, 12, 15),
            expires: (2024, 1, 15),
            amount: 150.0,
            monthly_payment: 100.0,
            rate: 10.0,
            status: TokenStatus::Expired,
        },
        SeedToken {
            id: "3",
            token: "GHI789RST",
            customer: ("2", "Jane Smith"),
            product: ("3", "Solar Battery Pack"),
            generated: (2024, 2, 15),
            expires: (2024, 3, 15),
            amount: 200.0,
            monthly_payment: 150.0,
            rate: 12.0,
            status: TokenStatus::Pending,
        },
    ];

    for seed in data {
        repo.append(TokenRecord {
            id: seed.id.into(),
            token: Token::new(seed.token),
            customer_id: seed.customer.0.into(),
            customer_name: seed.customer.1.into(),
            product_id: seed.product.0.into(),
            product_name: seed.product.1.into(),
            generated_at: midnight(seed.generated)?,
            expires_at: midnight(seed.expires)?,
            amount: seed.amount,
            periods_covered: seed.amount / seed.monthly_payment,
            commission: seed.amount * seed.rate / 100.0,
            payment_method: None,
            reference: None,
            status: seed.status,
        })
        .await?;
    }
    Ok(())
}

fn midnight((y, m, d): (i32, u32, u32)) -> Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| anyhow::anyhow!("Invalid date {y}-{m}-{d}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a005_token::repository::InMemoryTokenRepository;

    async fn seeded() -> InMemoryTokenRepository {
        let repo = InMemoryTokenRepository::new();
        insert_test_data(&repo).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = seeded().await;
        let now = midnight((2024, 1, 20)).unwrap();
        let all = list(&repo, &TokenListQuery::default(), now).await.unwrap();
        let tokens: Vec<&str> = all.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(tokens, vec!["GHI789RST", "ABC123XYZ", "DEF456UVW"]);
    }

    #[tokio::test]
    async fn test_active_token_expires_over_time() {
        let repo = seeded().await;
        let query = TokenListQuery {
            status: Some(TokenStatus::Active),
            ..Default::default()
        };

        let before = midnight((2024, 2, 1)).unwrap();
        assert_eq!(list(&repo, &query, before).await.unwrap().len(), 1);

        let after = midnight((2024, 3, 1)).unwrap();
        assert!(list(&repo, &query, after).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filters_by_customer_and_search() {
        let repo = seeded().await;
        let now = midnight((2024, 1, 20)).unwrap();

        let query = TokenListQuery {
            customer_id: Some("2".into()),
            ..Default::default()
        };
        let rows = list(&repo, &query, now).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, TokenStatus::Pending);
        assert!((rows[0].commission - 24.0).abs() < 1e-9);

        let query = TokenListQuery {
            search: Some("def456".into()),
            ..Default::default()
        };
        assert_eq!(list(&repo, &query, now).await.unwrap().len(), 1);
    }
}
