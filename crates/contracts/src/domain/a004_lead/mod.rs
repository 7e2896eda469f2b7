pub mod aggregate;

pub use aggregate::{ConvertLeadRequest, Lead, LeadDto, LeadStatus};
