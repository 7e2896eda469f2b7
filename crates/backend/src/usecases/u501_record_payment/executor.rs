use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Months, Utc};
use contracts::domain::a002_customer::{Customer, CustomerProduct};
use contracts::domain::a005_token::{TokenRecord, TokenStatus};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_record_payment::{
    CommissionResult, PaymentPreviewResponse, RecordPayment, RecordPaymentRequest,
    RecordPaymentResponse,
};
use thiserror::Error;

use super::calculator::{compute_allocation, AllocationError};
use crate::domain::a002_customer::repository::CustomerRepository;
use crate::domain::a005_token::issuer::TokenIssuer;
use crate::domain::a005_token::repository::TokenRepository;
use crate::shared::format::{format_money, format_periods};

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("Customer {0} not found")]
    CustomerNotFound(String),

    #[error("Reference number is required")]
    MissingReference,

    #[error("Reference {reference} was already used for a different payment")]
    ReferenceConflict { reference: String },

    #[error("Token issuance failed: {0:#}")]
    Issuance(anyhow::Error),

    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl PaymentError {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentError::Allocation(e) => e.code(),
            PaymentError::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            PaymentError::MissingReference => "MISSING_REFERENCE",
            PaymentError::ReferenceConflict { .. } => "REFERENCE_CONFLICT",
            PaymentError::Issuance(_) => "TOKEN_ISSUANCE_FAILED",
            PaymentError::Storage(_) => "INTERNAL_ERROR",
        }
    }
}

type PairKey = (String, String);
type PairLocks = Mutex<HashMap<PairKey, Arc<tokio::sync::Mutex<()>>>>;

/// Блокировка пары на время проведения платежа.
/// Последний держатель удаляет запись из карты, карта не растёт.
struct PairLease<'a> {
    locks: &'a PairLocks,
    key: PairKey,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl Drop for PairLease<'_> {
    fn drop(&mut self) {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // карта + этот держатель
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.key);
        }
    }
}

/// Приём платежа: расчёт распределения и выдача токена.
///
/// Выдача токена и запись в журнал сериализуются по паре (клиент, продукт),
/// чтобы повтор одного платежа не выдал второй токен.
pub struct PaymentExecutor {
    customers: Arc<dyn CustomerRepository>,
    tokens: Arc<dyn TokenRepository>,
    issuer: Arc<dyn TokenIssuer>,
    pair_locks: PairLocks,
}

impl PaymentExecutor {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        tokens: Arc<dyn TokenRepository>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            customers,
            tokens,
            issuer,
            pair_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Предпросмотр для формы: без побочных эффектов
    pub async fn preview(
        &self,
        request: &RecordPaymentRequest,
    ) -> Result<PaymentPreviewResponse, PaymentError> {
        let customer = self.load_customer(&request.customer_id).await?;
        let allocation = compute_allocation(request.amount, &customer, &request.product_id)?;
        let product = owned_product(&customer, &request.product_id)?;

        Ok(PaymentPreviewResponse {
            allocation,
            agent_commission_rate: customer.agent_commission,
            monthly_payment: product.monthly_payment,
            remaining_months: product.remaining_months,
            summary: summary_lines(&allocation),
        })
    }

    /// Провести платёж и выдать токен
    pub async fn record(
        &self,
        request: RecordPaymentRequest,
    ) -> Result<RecordPaymentResponse, PaymentError> {
        let reference = request.reference.trim().to_string();
        if reference.is_empty() {
            return Err(PaymentError::MissingReference);
        }

        let customer = self.load_customer(&request.customer_id).await?;
        let allocation = compute_allocation(request.amount, &customer, &request.product_id)?;
        let product = owned_product(&customer, &request.product_id)?;

        let lease = self.pair_lock(&customer.id, &product.id);
        let _guard = lease.lock.lock().await;

        if let Some(existing) = self
            .tokens
            .find_by_reference(&customer.id, &product.id, &reference)
            .await
            .map_err(PaymentError::Storage)?
        {
            if existing.amount != request.amount
                || existing.payment_method != Some(request.payment_method)
            {
                tracing::warn!(
                    "{}: reference {} reused with amount={} method={}, recorded amount={}",
                    RecordPayment::full_name(),
                    reference,
                    request.amount,
                    request.payment_method.code(),
                    existing.amount
                );
                return Err(PaymentError::ReferenceConflict { reference });
            }
            tracing::warn!(
                "{}: payment {} for customer {} / product {} already recorded, returning token {}",
                RecordPayment::full_name(),
                reference,
                customer.id,
                product.id,
                existing.token
            );
            let allocation = CommissionResult {
                periods_covered: existing.periods_covered,
                total_commission: existing.commission,
                commission_per_period: allocation.commission_per_period,
            };
            return Ok(RecordPaymentResponse {
                message: "Payment was already recorded".to_string(),
                summary: record_summary(&existing, &allocation),
                record: existing,
                allocation,
                replayed: true,
            });
        }

        let token = self
            .issuer
            .issue(&customer, product, allocation.periods_covered)
            .map_err(PaymentError::Issuance)?;

        let generated_at = Utc::now();
        let record = TokenRecord {
            id: uuid::Uuid::new_v4().to_string(),
            token,
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            generated_at,
            expires_at: token_expiry(generated_at, allocation.periods_covered),
            amount: request.amount,
            periods_covered: allocation.periods_covered,
            commission: allocation.total_commission,
            payment_method: Some(request.payment_method),
            reference: Some(reference),
            status: TokenStatus::Active,
        };

        self.tokens
            .append(record.clone())
            .await
            .map_err(PaymentError::Storage)?;

        tracing::info!(
            "{}: customer={} product={} amount={} method={} periods={:.3} commission={:.2} token={}",
            RecordPayment::full_name(),
            record.customer_id,
            record.product_id,
            record.amount,
            request.payment_method.code(),
            allocation.periods_covered,
            allocation.total_commission,
            record.token
        );

        Ok(RecordPaymentResponse {
            message: "Payment recorded successfully!".to_string(),
            summary: record_summary(&record, &allocation),
            record,
            allocation,
            replayed: false,
        })
    }

    async fn load_customer(&self, customer_id: &str) -> Result<Customer, PaymentError> {
        self.customers
            .get_by_id(customer_id)
            .await
            .map_err(PaymentError::Storage)?
            .ok_or_else(|| PaymentError::CustomerNotFound(customer_id.to_string()))
    }

    fn pair_lock(&self, customer_id: &str, product_id: &str) -> PairLease<'_> {
        let key = (customer_id.to_string(), product_id.to_string());
        let mut locks = self
            .pair_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let lock = locks.entry(key.clone()).or_default().clone();
        PairLease {
            locks: &self.pair_locks,
            key,
            lock,
        }
    }

    #[cfg(test)]
    fn held_pair_locks(&self) -> usize {
        self.pair_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

fn owned_product<'a>(
    customer: &'a Customer,
    product_id: &str,
) -> Result<&'a CustomerProduct, PaymentError> {
    customer.product(product_id).ok_or_else(|| {
        PaymentError::Allocation(AllocationError::ProductNotOwned {
            customer_id: customer.id.clone(),
            product_id: product_id.to_string(),
        })
    })
}

/// Срок действия: целое число оплаченных месяцев с округлением вверх, минимум один месяц
pub fn token_expiry(generated_at: DateTime<Utc>, periods_covered: f64) -> DateTime<Utc> {
    let months = periods_covered.ceil().max(1.0) as u32;
    generated_at
        .checked_add_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn summary_lines(allocation: &CommissionResult) -> Vec<String> {
    vec![
        format!(
            "Payment covers {} months",
            format_periods(allocation.periods_covered)
        ),
        format!(
            "Agent commission: {} ({}/month)",
            format_money(allocation.total_commission),
            format_money(allocation.commission_per_period)
        ),
    ]
}

fn record_summary(record: &TokenRecord, allocation: &CommissionResult) -> Vec<String> {
    let mut lines = vec![format!("Token: {}", record.token)];
    lines.extend(summary_lines(allocation));
    lines
}
