// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for graph compilation, persistence and settings.

use crate::node::NodeId;
use crate::pin::PinId;
use thiserror::Error;

/// Compilation failure
#[derive(Debug, Error)]
pub enum CompileError {
    /// The validator reported errors; the first entry is a summary line
    #[error("{}", .0.join("\n"))]
    InvalidGraph(Vec<String>),

    /// The parser could not lower a sub-graph
    #[error("Failed to construct animation graph prototype: {0}")]
    Parse(#[from] ParseError),
}

/// Failure while lowering a sub-graph into a prototype
#[derive(Debug, Error)]
pub enum ParseError {
    /// Sub-graph missing from the sub-graph map
    #[error("Sub-graph {0:?} does not exist")]
    MissingSubGraph(NodeId),

    /// A link references a pin that does not exist
    #[error("Link references missing pin {0:?}")]
    MissingPin(PinId),

    /// An event node has no event name
    #[error("Event node {0:?} has no event name")]
    MissingEventName(NodeId),

    /// Input actions cannot be compiled
    #[error("Input actions are not supported (node {0:?})")]
    UnsupportedInputAction(NodeId),

    /// A nested sub-graph failed to compile
    #[error("Failed to parse sub-graph of '{name}': {source}")]
    Subroutine {
        /// Name of the owning node
        name: String,
        /// Nested failure
        #[source]
        source: Box<ParseError>,
    },
}

/// Failure while saving or loading graphs and prototypes
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// RON serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// RON deserialization failed
    #[error("Deserialization error: {0}")]
    Deserialize(#[from] ron::error::SpannedError),

    /// Binary encoding failed
    #[error("Binary encoding error: {0}")]
    Binary(#[from] bincode::Error),
}

/// Failure while loading or saving compiler settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed or written
    #[error(transparent)]
    Format(#[from] PersistenceError),
}

/// Result type for compilation
pub type Result<T> = std::result::Result<T, CompileError>;
