//! Распределение платежа: сколько месяцев он покрывает и какая комиссия положена агенту.
//!
//! Чистая функция без ввода-вывода. `periods_covered` намеренно не округляется:
//! частичный платёж покрывает часть месяца.

use contracts::domain::a002_customer::{Customer, CustomerProduct};
use contracts::usecases::u501_record_payment::CommissionResult;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    #[error("Payment amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    #[error("Product {product_id} does not belong to customer {customer_id}")]
    ProductNotOwned {
        customer_id: String,
        product_id: String,
    },

    #[error("Product {product_id} has no valid monthly payment ({monthly_payment})")]
    InvalidProduct {
        product_id: String,
        monthly_payment: f64,
    },

    #[error("Agent commission rate {rate} is outside 0..=100")]
    InvalidCommissionRate { rate: f64 },
}

impl AllocationError {
    /// Код ошибки для ответа API
    pub fn code(&self) -> &'static str {
        match self {
            AllocationError::InvalidAmount(_) => "INVALID_AMOUNT",
            AllocationError::ProductNotOwned { .. } => "PRODUCT_NOT_OWNED",
            AllocationError::InvalidProduct { .. } => "INVALID_PRODUCT",
            AllocationError::InvalidCommissionRate { .. } => "INVALID_COMMISSION_RATE",
        }
    }
}

/// Рассчитать покрытие и комиссию по платежу `amount` за продукт `product_id` клиента.
///
/// ```text
/// periods_covered       = amount / monthly_payment
/// commission_per_period = monthly_payment * agent_commission / 100
/// total_commission      = commission_per_period * periods_covered
/// ```
pub fn compute_allocation(
    amount: f64,
    customer: &Customer,
    product_id: &str,
) -> Result<CommissionResult, AllocationError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AllocationError::InvalidAmount(amount));
    }

    let product = customer
        .product(product_id)
        .ok_or_else(|| AllocationError::ProductNotOwned {
            customer_id: customer.id.clone(),
            product_id: product_id.to_string(),
        })?;

    let monthly_payment = validated_monthly_payment(product)?;

    let rate = customer.agent_commission;
    if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
        return Err(AllocationError::InvalidCommissionRate { rate });
    }

    let periods_covered = amount / monthly_payment;
    let commission_per_period = monthly_payment * rate / 100.0;
    let total_commission = commission_per_period * periods_covered;

    Ok(CommissionResult {
        periods_covered,
        total_commission,
        commission_per_period,
    })
}

fn validated_monthly_payment(product: &CustomerProduct) -> Result<f64, AllocationError> {
    let monthly_payment = product.monthly_payment;
    if !monthly_payment.is_finite() || monthly_payment <= 0.0 {
        return Err(AllocationError::InvalidProduct {
            product_id: product.id.clone(),
            monthly_payment,
        });
    }
    Ok(monthly_payment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_customer::CustomerStatus;

    const EPS: f64 = 1e-9;

    fn product(id: &str, monthly_payment: f64) -> CustomerProduct {
        CustomerProduct {
            id: id.into(),
            name: format!("Product {id}"),
            monthly_payment,
            remaining_months: 12,
        }
    }

    fn customer(rate: f64, products: Vec<CustomerProduct>) -> Customer {
        Customer {
            id: "1".into(),
            name: "John Doe".into(),
            email: "john.doe@example.com".into(),
            phone: "+1234567890".into(),
            county: "Montserrado".into(),
            status: CustomerStatus::Active,
            plan: "Basic Plan".into(),
            agent_id: "1".into(),
            agent_commission: rate,
            products,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_partial_payment_covers_fraction_of_month() {
        let c = customer(10.0, vec![product("1", 100.0)]);
        let result = compute_allocation(150.0, &c, "1").unwrap();
        assert_close(result.periods_covered, 1.5);
        assert_close(result.commission_per_period, 10.0);
        assert_close(result.total_commission, 15.0);
    }

    #[test]
    fn test_full_year_payment() {
        let c = customer(12.0, vec![product("2", 200.0)]);
        let result = compute_allocation(2400.0, &c, "2").unwrap();
        assert_close(result.periods_covered, 12.0);
        assert_close(result.commission_per_period, 24.0);
        assert_close(result.total_commission, 288.0);
    }

    #[test]
    fn test_periods_are_not_rounded() {
        let c = customer(10.0, vec![product("1", 150.0)]);
        let result = compute_allocation(100.0, &c, "1").unwrap();
        assert_close(result.periods_covered, 100.0 / 150.0);
        assert!(result.periods_covered < 1.0);
    }

    #[test]
    fn test_total_commission_is_rate_of_amount() {
        let amounts = [0.01, 1.0, 37.5, 99.99, 150.0, 1234.56, 1e6];
        let monthly = [0.5, 1.0, 100.0, 149.99, 200.0, 5000.0];
        let rates = [0.0, 0.5, 10.0, 12.0, 33.3, 100.0];
        for &amount in &amounts {
            for &m in &monthly {
                for &rate in &rates {
                    let c = customer(rate, vec![product("p", m)]);
                    let r = compute_allocation(amount, &c, "p").unwrap();
                    assert_close(r.periods_covered, amount / m);
                    assert_close(r.total_commission, amount * rate / 100.0);
                    assert_close(r.commission_per_period, m * rate / 100.0);
                    assert!(r.periods_covered >= 0.0);
                    assert!(r.total_commission >= 0.0);
                    assert!(r.total_commission.is_finite());
                }
            }
        }
    }

    #[test]
    fn test_commission_per_period_independent_of_amount() {
        let c = customer(12.0, vec![product("3", 150.0)]);
        let a = compute_allocation(10.0, &c, "3").unwrap();
        let b = compute_allocation(10_000.0, &c, "3").unwrap();
        assert_eq!(a.commission_per_period, b.commission_per_period);
    }

    #[test]
    fn test_monotonic_in_amount() {
        let c = customer(10.0, vec![product("1", 100.0)]);
        let mut previous: Option<CommissionResult> = None;
        for amount in [1.0, 50.0, 99.0, 100.0, 150.0, 1000.0] {
            let current = compute_allocation(amount, &c, "1").unwrap();
            if let Some(prev) = previous {
                assert!(current.periods_covered > prev.periods_covered);
                assert!(current.total_commission > prev.total_commission);
            }
            previous = Some(current);
        }
    }

    #[test]
    fn test_same_inputs_same_outputs() {
        let c = customer(10.0, vec![product("1", 100.0)]);
        assert_eq!(
            compute_allocation(150.0, &c, "1"),
            compute_allocation(150.0, &c, "1")
        );
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let c = customer(10.0, vec![product("1", 100.0)]);
        for amount in [0.0, -0.0, -150.0] {
            let err = compute_allocation(amount, &c, "1").unwrap_err();
            assert!(matches!(err, AllocationError::InvalidAmount(_)));
            assert_eq!(err.code(), "INVALID_AMOUNT");
        }
    }

    #[test]
    fn test_non_numeric_amount_rejected() {
        let c = customer(10.0, vec![product("1", 100.0)]);
        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                compute_allocation(amount, &c, "1"),
                Err(AllocationError::InvalidAmount(_))
            ));
        }
    }

    #[test]
    fn test_zero_monthly_payment_is_invalid_product() {
        let c = customer(10.0, vec![product("1", 0.0)]);
        let err = compute_allocation(150.0, &c, "1").unwrap_err();
        assert_eq!(
            err,
            AllocationError::InvalidProduct {
                product_id: "1".into(),
                monthly_payment: 0.0,
            }
        );
    }

    #[test]
    fn test_foreign_product_rejected() {
        let c = customer(10.0, vec![product("1", 100.0), product("2", 200.0)]);
        let err = compute_allocation(150.0, &c, "3").unwrap_err();
        assert_eq!(
            err,
            AllocationError::ProductNotOwned {
                customer_id: "1".into(),
                product_id: "3".into(),
            }
        );
        assert_eq!(err.code(), "PRODUCT_NOT_OWNED");
    }

    #[test]
    fn test_amount_checked_before_ownership() {
        let c = customer(10.0, vec![product("1", 100.0)]);
        assert!(matches!(
            compute_allocation(-1.0, &c, "missing"),
            Err(AllocationError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_commission_rate_outside_range_rejected() {
        let c = customer(150.0, vec![product("1", 100.0)]);
        assert!(matches!(
            compute_allocation(100.0, &c, "1"),
            Err(AllocationError::InvalidCommissionRate { .. })
        ));
    }
}
