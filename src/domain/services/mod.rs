pub mod csv_export;
pub mod display;
pub mod portfolio_stats;
pub mod validation;
