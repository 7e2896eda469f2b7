pub mod payment_method;
pub mod portal_role;
