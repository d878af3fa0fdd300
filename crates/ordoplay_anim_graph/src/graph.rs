// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation graph asset: property sets and nested sub-graphs.

use crate::error::PersistenceError;
use crate::link::{Link, LinkId};
use crate::node::{Node, NodeId, NodeKind};
use crate::pin::{Pin, PinId};
use crate::property_set::{PropertyKind, PropertySet};
use crate::prototype::Prototype;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Nodes and links of one (sub-)graph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubGraph {
    /// Nodes in evaluation order once sorted
    pub nodes: Vec<Node>,
    /// Links in evaluation order once sorted
    pub links: Vec<Link>,
}

impl SubGraph {
    /// Create an empty sub-graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == node_id)
    }

    /// Position of a node in the node list
    pub fn node_position(&self, node_id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == node_id)
    }

    /// First node with the given type name
    pub fn find_node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Get a pin by ID
    pub fn pin(&self, pin_id: PinId) -> Option<&Pin> {
        self.nodes.iter().find_map(|n| n.pin(pin_id))
    }

    /// Get a mutable pin by ID
    pub fn pin_mut(&mut self, pin_id: PinId) -> Option<&mut Pin> {
        self.nodes.iter_mut().find_map(|n| n.pin_mut(pin_id))
    }

    /// Node owning a pin
    pub fn node_for_pin(&self, pin_id: PinId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.pin(pin_id).is_some())
    }

    /// Get a link by ID
    pub fn link(&self, link_id: LinkId) -> Option<&Link> {
        self.links.iter().find(|l| l.id == link_id)
    }

    /// First link touching a pin
    pub fn link_connected_to_pin(&self, pin_id: PinId) -> Option<&Link> {
        self.links.iter().find(|l| l.involves_pin(pin_id))
    }

    /// All links touching a pin
    pub fn links_connected_to_pin(&self, pin_id: PinId) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.involves_pin(pin_id))
    }

    /// Whether any link touches a pin
    pub fn is_pin_linked(&self, pin_id: PinId) -> bool {
        self.link_connected_to_pin(pin_id).is_some()
    }

    /// Node on the other end of the first link touching a pin
    pub fn node_connected_to_pin(&self, pin_id: PinId) -> Option<&Node> {
        let link = self.link_connected_to_pin(pin_id)?;
        let other = if link.start_pin_id == pin_id { link.end_pin_id } else { link.start_pin_id };
        self.node_for_pin(other)
    }

    /// Producer feeding an input pin
    pub fn producer_pin(&self, input_pin: PinId) -> Option<&Pin> {
        let link = self.links.iter().find(|l| l.end_pin_id == input_pin)?;
        self.pin(link.start_pin_id)
    }

    /// Setter node of a local variable
    pub fn local_variable_setter(&self, name: &str) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|n| n.is_local_variable_setter() && n.local_variable_name() == Some(name))
    }

    /// Output pin feeding the setter of a local variable
    pub fn local_variable_source(&self, name: &str) -> Option<&Pin> {
        let setter = self.local_variable_setter(name)?;
        self.producer_pin(setter.inputs.first()?.id)
    }
}

/// An editable animation graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationGraphAsset {
    /// Persistent ID, used as the compiled top-level prototype ID
    pub id: NodeId,
    /// Graph name
    pub name: String,
    /// Parameters supplied from outside
    pub inputs: PropertySet,
    /// Results computed by the graph
    pub outputs: PropertySet,
    /// Shared named values
    pub local_variables: PropertySet,
    /// Skeleton asset handle
    pub skeleton: u64,
    /// Sub-graphs keyed by owner node (`NodeId::ROOT` = top level)
    graphs: IndexMap<NodeId, SubGraph>,
    /// Last successfully compiled prototype
    pub prototype: Option<Prototype>,
}

impl AnimationGraphAsset {
    /// Create an empty graph
    pub fn new(name: impl Into<String>) -> Self {
        let mut graphs = IndexMap::new();
        graphs.insert(NodeId::ROOT, SubGraph::new());
        Self {
            id: NodeId::new(),
            name: name.into(),
            inputs: PropertySet::new(),
            outputs: PropertySet::new(),
            local_variables: PropertySet::new(),
            skeleton: 0,
            graphs,
            prototype: None,
        }
    }

    /// Property set for a property kind
    pub fn properties(&self, kind: PropertyKind) -> &PropertySet {
        match kind {
            PropertyKind::Input => &self.inputs,
            PropertyKind::Output => &self.outputs,
            PropertyKind::LocalVariable => &self.local_variables,
        }
    }

    /// Mutable property set for a property kind
    pub fn properties_mut(&mut self, kind: PropertyKind) -> &mut PropertySet {
        match kind {
            PropertyKind::Input => &mut self.inputs,
            PropertyKind::Output => &mut self.outputs,
            PropertyKind::LocalVariable => &mut self.local_variables,
        }
    }

    /// Sub-graph owned by a node
    pub fn sub_graph(&self, owner: NodeId) -> Option<&SubGraph> {
        self.graphs.get(&owner)
    }

    /// Mutable sub-graph owned by a node
    pub fn sub_graph_mut(&mut self, owner: NodeId) -> Option<&mut SubGraph> {
        self.graphs.get_mut(&owner)
    }

    /// Sub-graph owned by a node, created empty if missing
    pub fn sub_graph_entry(&mut self, owner: NodeId) -> &mut SubGraph {
        self.graphs.entry(owner).or_default()
    }

    /// Whether a node owns a sub-graph
    pub fn has_sub_graph(&self, owner: NodeId) -> bool {
        self.graphs.contains_key(&owner)
    }

    /// Remove a sub-graph
    pub fn remove_sub_graph(&mut self, owner: NodeId) -> Option<SubGraph> {
        self.graphs.shift_remove(&owner)
    }

    /// All sub-graph owners
    pub fn owners(&self) -> Vec<NodeId> {
        self.graphs.keys().copied().collect()
    }

    /// All sub-graphs
    pub fn sub_graphs(&self) -> impl Iterator<Item = (NodeId, &SubGraph)> {
        self.graphs.iter().map(|(k, v)| (*k, v))
    }

    /// All sub-graphs, mutably
    pub fn sub_graphs_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut SubGraph)> {
        self.graphs.iter_mut().map(|(k, v)| (*k, v))
    }

    /// Find a node in any sub-graph
    pub fn find_in_all_nodes(&self, node_id: NodeId) -> Option<&Node> {
        self.graphs.values().find_map(|g| g.node(node_id))
    }

    /// Node owning the sub-graph that contains `node_id`
    pub fn find_parent(&self, node_id: NodeId) -> Option<&Node> {
        let (owner, _) = self.graphs.iter().find(|(_, g)| g.node(node_id).is_some())?;
        self.find_in_all_nodes(*owner)
    }

    /// Kind of the node owning a sub-graph (`None` for the top level)
    pub fn owner_kind(&self, owner: NodeId) -> Option<NodeKind> {
        if owner.is_root() {
            return None;
        }
        self.find_in_all_nodes(owner).map(Node::kind)
    }

    /// Whether a node is a property node for a property with the given name
    pub fn is_property_node_named(&self, kind: PropertyKind, node: &Node, name: &str) -> bool {
        if node.category != kind.token() {
            return false;
        }
        let pin = match kind {
            PropertyKind::Input if node.inputs.is_empty() => node.outputs.first(),
            PropertyKind::Output if node.outputs.is_empty() => node.inputs.first(),
            PropertyKind::LocalVariable if node.is_local_variable() => {
                node.inputs.first().or_else(|| node.outputs.first())
            }
            _ => None,
        };
        pin.is_some_and(|p| p.name == name)
    }

    /// Whether a node is a property node of the given kind for an existing property
    pub fn is_property_node_of(&self, kind: PropertyKind, node: &Node) -> bool {
        let pin = match kind {
            PropertyKind::Input => node.outputs.first(),
            PropertyKind::Output => node.inputs.first(),
            PropertyKind::LocalVariable => node.inputs.first().or_else(|| node.outputs.first()),
        };
        pin.is_some_and(|p| {
            self.properties(kind).has(&p.name) && self.is_property_node_named(kind, node, &p.name)
        })
    }

    /// Whether a node is an input, output or local variable node
    pub fn is_property_node(&self, node: &Node) -> bool {
        [PropertyKind::Input, PropertyKind::Output, PropertyKind::LocalVariable]
            .into_iter()
            .any(|kind| self.is_property_node_of(kind, node))
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String, PersistenceError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Deserialize from RON
    pub fn from_ron(content: &str) -> Result<Self, PersistenceError> {
        Ok(ron::from_str(content)?)
    }
}

impl Default for AnimationGraphAsset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
