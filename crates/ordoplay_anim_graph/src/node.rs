// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the animation graph.

use crate::pin::{Pin, PinId, PinKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sort index of a node the sorter has not reached
pub const UNDEFINED_SORT_INDEX: i32 = -1;

/// Category of local variable nodes
pub const LOCAL_VARIABLE_CATEGORY: &str = "Local Variable";

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Key of the top-level graph in the sub-graph map
    pub const ROOT: NodeId = NodeId(0);

    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().as_u128() as u64 | 1)
    }

    /// Whether this is the top-level sentinel
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// How a node behaves in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    /// Plain node
    Simple,
    /// Node with custom body
    Blueprint,
    /// Annotation, never compiled
    Comment,
    /// Owns a nested sub-graph
    Subroutine,
}

/// Closed set of node kinds the compiler cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Any plain animation node
    Animation,
    /// State machine container
    StateMachine,
    /// State with its own animation sub-graph
    State,
    /// State playing a single clip
    QuickState,
    /// Transition between two states
    Transition,
    /// Blend space container
    BlendSpace,
    /// Conditional blend with a sub-graph
    ConditionalBlend,
    /// One shot blend with a sub-graph
    OneShot,
}

/// A node instance in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Factory category
    pub category: String,
    /// Type name within the category
    pub name: String,
    /// User label
    pub description: String,
    /// Input pins
    pub inputs: Vec<Pin>,
    /// Output pins
    pub outputs: Vec<Pin>,
    /// Header color
    pub color: [u8; 3],
    /// Editor behavior
    pub node_type: NodeType,
    /// Position in the graph UI
    pub position: [f32; 2],
    /// Size in the graph UI
    pub size: [f32; 2],
    /// Evaluation order, `UNDEFINED_SORT_INDEX` until sorted
    pub sort_index: i32,
    /// Entry state flag (state machine sub-graphs only)
    pub is_entry_state: bool,
    /// Position inside a blend space
    pub offset: [f32; 2],
    /// Blend space lerp time per unit, per axis
    pub lerp_seconds_per_unit: [f32; 2],
}

impl Node {
    /// Create a new node with no pins
    pub fn new(name: impl Into<String>, color: [u8; 3]) -> Self {
        let name = name.into();
        Self {
            id: NodeId::new(),
            category: String::new(),
            description: name.clone(),
            name,
            inputs: Vec::new(),
            outputs: Vec::new(),
            color,
            node_type: NodeType::Simple,
            position: [0.0, 0.0],
            size: [0.0, 0.0],
            sort_index: UNDEFINED_SORT_INDEX,
            is_entry_state: false,
            offset: [0.0, 0.0],
            lerp_seconds_per_unit: [0.2, 0.2],
        }
    }

    /// Set the node type
    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    /// Set the input pins
    pub fn with_inputs(mut self, inputs: Vec<Pin>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set the output pins
    pub fn with_outputs(mut self, outputs: Vec<Pin>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set the UI size
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = [width, height];
        self
    }

    /// Classify this node
    pub fn kind(&self) -> NodeKind {
        if self.category == "StateMachine" {
            match self.name.as_str() {
                "State Machine" => return NodeKind::StateMachine,
                "State" => return NodeKind::State,
                "Quick State" => return NodeKind::QuickState,
                "Transition" => return NodeKind::Transition,
                _ => {}
            }
        }
        match self.name.as_str() {
            "State Machine" => NodeKind::StateMachine,
            "Blend Space" => NodeKind::BlendSpace,
            "Conditional Blend" => NodeKind::ConditionalBlend,
            "One Shot" => NodeKind::OneShot,
            _ => NodeKind::Animation,
        }
    }

    /// Whether this node is a comment
    pub fn is_comment(&self) -> bool {
        self.node_type == NodeType::Comment
    }

    /// Whether this node owns a sub-graph
    pub fn is_subroutine(&self) -> bool {
        self.node_type == NodeType::Subroutine
    }

    /// Whether the sorter assigned an index
    pub fn has_sort_index(&self) -> bool {
        self.sort_index != UNDEFINED_SORT_INDEX
    }

    /// Whether this is a local variable setter or getter
    pub fn is_local_variable(&self) -> bool {
        self.category == LOCAL_VARIABLE_CATEGORY
            && self.inputs.len() + self.outputs.len() == 1
    }

    /// Whether this is a local variable setter
    pub fn is_local_variable_setter(&self) -> bool {
        self.is_local_variable() && self.inputs.len() == 1
    }

    /// Name of the variable a local variable node refers to
    pub fn local_variable_name(&self) -> Option<&str> {
        if !self.is_local_variable() {
            return None;
        }
        self.inputs.first().or_else(|| self.outputs.first()).map(|p| p.name.as_str())
    }

    /// Get a pin by ID
    pub fn pin(&self, pin_id: PinId) -> Option<&Pin> {
        self.pins().find(|p| p.id == pin_id)
    }

    /// Get a mutable pin by ID
    pub fn pin_mut(&mut self, pin_id: PinId) -> Option<&mut Pin> {
        self.inputs
            .iter_mut()
            .chain(self.outputs.iter_mut())
            .find(|p| p.id == pin_id)
    }

    /// Get an input pin by name
    pub fn input_named(&self, name: &str) -> Option<&Pin> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Get an output pin by name
    pub fn output_named(&self, name: &str) -> Option<&Pin> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Get all pins
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Give every pin a fresh ID and bind it to this node
    pub fn assign_pin_ids(&mut self) {
        let node_id = self.id;
        for pin in &mut self.inputs {
            pin.id = PinId::new();
            pin.node_id = node_id;
            pin.kind = PinKind::Input;
        }
        for pin in &mut self.outputs {
            pin.id = PinId::new();
            pin.node_id = node_id;
            pin.kind = PinKind::Output;
        }
    }

    /// Re-key the node, keeping pin IDs
    pub fn set_id(&mut self, id: NodeId) {
        self.id = id;
        for pin in self.inputs.iter_mut().chain(self.outputs.iter_mut()) {
            pin.node_id = id;
        }
    }
}
