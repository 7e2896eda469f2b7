pub mod a001_agent;
pub mod a002_customer;
pub mod a003_inventory_item;
pub mod a004_lead;
pub mod a005_token;
pub mod d400_portal_summary;
pub mod u501_record_payment;

use serde::Deserialize;

/// `?search=` для табличных списков
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}
