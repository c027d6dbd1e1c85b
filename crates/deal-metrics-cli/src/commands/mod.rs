pub mod analyze;
pub mod payment;
