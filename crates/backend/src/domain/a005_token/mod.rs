pub mod issuer;
pub mod repository;
pub mod service;
