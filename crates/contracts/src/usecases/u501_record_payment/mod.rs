pub mod request;
pub mod response;

pub use request::RecordPaymentRequest;
pub use response::{CommissionResult, PaymentPreviewResponse, RecordPaymentResponse};

use crate::usecases::common::UseCaseMetadata;

pub struct RecordPayment;

impl UseCaseMetadata for RecordPayment {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "record_payment"
    }

    fn display_name() -> &'static str {
        "Record Payment & Issue Token"
    }

    fn description() -> &'static str {
        "Расчёт покрытых месяцев и комиссии агента, выдача токена на оплаченный период"
    }
}
