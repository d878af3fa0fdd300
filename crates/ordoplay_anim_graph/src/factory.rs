// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node factories keyed by `(category, name)`.
//!
//! Every sub-graph is edited with the factory matching its owner:
//! state machines get states and transitions, transitions get condition
//! nodes, blend spaces get vertices, everything else gets animation nodes.

use crate::graphs;
use crate::node::{Node, NodeKind};
use crate::pin::{Pin, PinKind, PinType, StorageKind};
use crate::value::Value;
use indexmap::IndexMap;

/// Constructor for one node type
pub type NodeConstructor = fn() -> Node;

/// Which registry a sub-graph uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphKind {
    /// Top-level graph and animation bodies
    Animation,
    /// Inside a state machine
    StateMachine,
    /// Inside a transition
    Transition,
    /// Inside a blend space
    BlendSpace,
}

impl GraphKind {
    /// Registry for a sub-graph owned by a node of the given kind (`None` for top level)
    pub fn for_owner(owner_kind: Option<NodeKind>) -> Self {
        match owner_kind {
            Some(NodeKind::StateMachine) => Self::StateMachine,
            Some(NodeKind::Transition) => Self::Transition,
            Some(NodeKind::BlendSpace) => Self::BlendSpace,
            _ => Self::Animation,
        }
    }
}

/// Registry of constructible node types for one graph kind
pub struct NodeFactory {
    kind: GraphKind,
    registry: IndexMap<String, IndexMap<String, NodeConstructor>>,
}

impl NodeFactory {
    /// Create an empty factory
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            registry: IndexMap::new(),
        }
    }

    /// Create the populated factory for a graph kind
    pub fn for_kind(kind: GraphKind) -> Self {
        match kind {
            GraphKind::Animation => graphs::animation::create_animation_factory(),
            GraphKind::StateMachine => graphs::state_machine::create_state_machine_factory(),
            GraphKind::Transition => graphs::transition::create_transition_factory(),
            GraphKind::BlendSpace => graphs::blend_space::create_blend_space_factory(),
        }
    }

    /// Graph kind this factory serves
    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Register a node type
    pub fn register(&mut self, category: &str, name: &str, constructor: NodeConstructor) {
        self.registry
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string(), constructor);
    }

    /// Whether `(category, name)` is registered
    pub fn contains(&self, category: &str, name: &str) -> bool {
        self.registry.get(category).is_some_and(|c| c.contains_key(name))
    }

    /// Whether a type name is registered in any category
    pub fn contains_type(&self, name: &str) -> bool {
        self.registry.values().any(|c| c.contains_key(name))
    }

    /// Registered categories
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }

    /// Type names registered in a category
    pub fn node_names<'a>(&'a self, category: &str) -> impl Iterator<Item = &'a str> {
        self.registry
            .get(category)
            .into_iter()
            .flat_map(|c| c.keys().map(String::as_str))
    }

    /// Construct a node with fresh IDs
    pub fn spawn_node(&self, category: &str, name: &str) -> Option<Node> {
        let constructor = self.registry.get(category)?.get(name)?;
        let mut node = constructor();
        node.category = category.to_string();
        node.assign_pin_ids();
        Some(node)
    }

    /// Create an input pin of the given type
    pub fn create_pin_for_type(&self, pin_type: PinType, name: &str) -> Pin {
        Pin::new(name, pin_type, PinKind::Input)
    }

    /// Icon color for a pin type
    pub fn icon_color(&self, pin_type: PinType) -> [u8; 3] {
        pin_type.color()
    }

    /// Classify a value into a pin type and storage kind
    pub fn pin_type_and_storage_for_value(&self, value: &Value) -> (PinType, StorageKind) {
        PinType::for_value(value)
    }

    /// Value a node type declares for one of its input pins
    pub fn declared_pin_value(&self, node: &Node, pin_name: &str) -> Option<Value> {
        let constructor = self.registry.get(&node.category)?.get(&node.name)?;
        constructor().input_named(pin_name).map(|p| p.value.clone())
    }
}

/// One factory per graph kind
pub struct NodeFactories {
    animation: NodeFactory,
    state_machine: NodeFactory,
    transition: NodeFactory,
    blend_space: NodeFactory,
}

impl NodeFactories {
    /// Create all factories
    pub fn new() -> Self {
        Self {
            animation: NodeFactory::for_kind(GraphKind::Animation),
            state_machine: NodeFactory::for_kind(GraphKind::StateMachine),
            transition: NodeFactory::for_kind(GraphKind::Transition),
            blend_space: NodeFactory::for_kind(GraphKind::BlendSpace),
        }
    }

    /// Factory for a graph kind
    pub fn get(&self, kind: GraphKind) -> &NodeFactory {
        match kind {
            GraphKind::Animation => &self.animation,
            GraphKind::StateMachine => &self.state_machine,
            GraphKind::Transition => &self.transition,
            GraphKind::BlendSpace => &self.blend_space,
        }
    }

    /// Whether the runtime knows a node type name
    pub fn contains_runtime_type(&self, name: &str) -> bool {
        name == "Transition"
            || [&self.animation, &self.state_machine, &self.transition, &self.blend_space]
                .iter()
                .any(|f| f.contains_type(name))
    }
}

impl Default for NodeFactories {
    fn default() -> Self {
        Self::new()
    }
}
