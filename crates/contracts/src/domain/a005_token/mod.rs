pub mod aggregate;

pub use aggregate::{Token, TokenListQuery, TokenRecord, TokenStatus};
