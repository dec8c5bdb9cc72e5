use thiserror::Error;

/// Everything that can go wrong while building or driving a flow.
///
/// The traversal machinery itself recovers nothing: failures raised by a
/// node implementation travel through aggregates and flows untouched until
/// the consumer decides what to do with them.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A node implementation failed while executing or traversing.
    #[error("node failure: {0}")]
    Node(String),

    /// A driver was handed a node shape it cannot run.
    #[error("unsupported executable: {0}")]
    UnsupportedExecutable(String),

    /// Payload (de)serialization failed inside a node implementation.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Shorthand for results produced anywhere in the flow machinery.
pub type FlowResult<T> = Result<T, FlowError>;
