pub mod a001_agent;
pub mod a002_customer;
pub mod a003_inventory_item;
pub mod a004_lead;
pub mod a005_token;
