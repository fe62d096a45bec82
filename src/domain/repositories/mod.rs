pub mod position_repository;
pub mod quote_provider;
