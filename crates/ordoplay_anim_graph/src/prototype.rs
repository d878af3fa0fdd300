// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compiled graph representation handed to the runtime.
//!
//! A [`Prototype`] mirrors the sub-graph nesting of the editor graph, with
//! every literal translated into a plain runtime value and every link
//! flattened into a direct [`PrototypeConnection`].

use crate::error::PersistenceError;
use crate::identifier::Identifier;
use crate::node::NodeId;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Named value: a graph input/output, a default plug or a local variable plug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Endpoint name hash
    pub id: Identifier,
    /// Translated value
    pub default_value: Value,
}

impl Endpoint {
    /// Create an endpoint
    pub fn new(id: Identifier, default_value: Value) -> Self {
        Self { id, default_value }
    }
}

/// One runtime node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeNode {
    /// Node type hash
    pub node_type_id: Identifier,
    /// ID of the editor node it was compiled from
    pub id: NodeId,
    /// Values for inputs without a live connection
    pub default_value_plugs: Vec<Endpoint>,
    /// Compiled sub-graph of a subroutine node
    pub subroutine: Option<Box<Prototype>>,
}

/// What a connection links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Node output value to node input
    NodeValueToNodeValue,
    /// Node trigger to node trigger
    NodeEventToNodeEvent,
    /// Graph input value to node input
    GraphValueToNodeValue,
    /// Graph input trigger to node trigger
    GraphEventToNodeEvent,
    /// Node output value to graph output
    NodeValueToGraphValue,
    /// Node trigger to a graph event
    NodeEventToGraphEvent,
    /// Local variable plug to node input
    LocalVariableToNodeValue,
    /// Graph input straight to graph output
    GraphValueToGraphValue,
    /// Graph input trigger straight to a graph event
    GraphEventToGraphEvent,
    /// Local variable plug to graph output
    LocalVariableToGraphValue,
}

/// One side of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionEndpoint {
    /// Node, prototype ID for graph-side endpoints, or `NodeId::ROOT` for graph outputs
    pub node_id: NodeId,
    /// Pin, property or event name hash
    pub endpoint_id: Identifier,
}

impl ConnectionEndpoint {
    /// Create an endpoint
    pub fn new(node_id: NodeId, endpoint_id: Identifier) -> Self {
        Self { node_id, endpoint_id }
    }
}

/// A flattened link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrototypeConnection {
    /// Producer
    pub source: ConnectionEndpoint,
    /// Consumer
    pub destination: ConnectionEndpoint,
    /// Routing kind
    pub kind: ConnectionKind,
}

/// Compiled (sub-)graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prototype {
    /// Human readable name
    pub debug_name: String,
    /// Asset ID for the top level, owner node ID for sub-graphs
    pub id: NodeId,
    /// Skeleton asset handle
    pub skeleton: u64,
    /// Graph inputs (top level only)
    pub inputs: Vec<Endpoint>,
    /// Graph outputs
    pub outputs: Vec<Endpoint>,
    /// Default values of local variables
    pub local_variable_plugs: Vec<Endpoint>,
    /// Nodes in evaluation order
    pub nodes: Vec<PrototypeNode>,
    /// Connections in link order
    pub connections: Vec<PrototypeConnection>,
}

impl Prototype {
    /// Create an empty prototype
    pub fn new(debug_name: impl Into<String>, id: NodeId, skeleton: u64) -> Self {
        Self {
            debug_name: debug_name.into(),
            id,
            skeleton,
            inputs: Vec::new(),
            outputs: Vec::new(),
            local_variable_plugs: Vec::new(),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Find a node by editor node ID
    pub fn node(&self, id: NodeId) -> Option<&PrototypeNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Total number of nodes, including nested sub-graphs
    pub fn node_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| 1 + n.subroutine.as_ref().map_or(0, |s| s.node_count()))
            .sum()
    }

    /// Encode for the runtime
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a runtime encoding
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistenceError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
