use super::graph::VertexId;

/// Errors raised by the graph engine.  Every variant carries the offending value so that a
/// failed call can be diagnosed from the message alone.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("vertex {vertex} {}", .vertex_count.checked_sub(1).map_or_else(
        || String::from("does not exist, the graph has no vertices"),
        |last| format!("is not between 0 and {}", last)))]
    VertexOutOfRange { vertex: VertexId, vertex_count: usize },

    #[error("an edge cannot connect vertex {0} to itself")]
    SelfLoop(VertexId),

    #[error("heap capacity of {capacity} exceeded")]
    HeapOverflow { capacity: usize },

    #[error("vertex {0} has no position")]
    MissingPosition(VertexId),

    #[error("no vertex has a position, so nothing can be located")]
    EmptyLocator,

    #[error("load costs are stale; recompute them after the last payload insertion")]
    StaleLoadCosts,

    #[error("{operation} is not allowed while the analysis is {phase}")]
    WrongPhase { operation: &'static str, phase: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
