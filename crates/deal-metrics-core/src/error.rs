use thiserror::Error;

#[derive(Debug, Error)]
pub enum DealMetricsError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Solver singularity: {function} derivative vanished at iteration {iteration}")]
    SolverSingularity { function: String, iteration: u32 },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DealMetricsError {
    fn from(e: serde_json::Error) -> Self {
        DealMetricsError::SerializationError(e.to_string())
    }
}
