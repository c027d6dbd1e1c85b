pub mod amortization;
pub mod error;
pub mod irr;
pub mod metrics;
pub mod projection;
pub mod types;

pub use error::DealMetricsError;
pub use types::*;

/// Standard result type for all deal-metrics operations
pub type DealMetricsResult<T> = Result<T, DealMetricsError>;
