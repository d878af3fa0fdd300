// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph inputs, outputs and local variables, and the nodes that stand for them.

use super::AnimationGraphModel;
use crate::link::LinkId;
use crate::node::{Node, NodeId, LOCAL_VARIABLE_CATEGORY};
use crate::pin::{Pin, PinKind, PinType};
use crate::property_set::PropertyKind;
use crate::value::Value;

const INPUT_NODE_COLOR: [u8; 3] = [130, 170, 255];

/// Words a property name may not be, since they collide with runtime keywords
const KEYWORDS: &[&str] = &[
    "if", "do", "for", "let", "var", "int", "try", "else", "bool", "true", "case", "enum", "loop",
    "void", "while", "break", "const", "int32", "int64", "float", "false", "using", "fixed",
    "graph", "input", "event", "class", "catch", "throw", "output", "return", "string", "struct",
    "import", "switch", "public", "double", "private", "float32", "float64", "default", "complex",
    "continue", "external", "operator", "processor", "namespace", "complex32", "complex64",
    "connection",
];

impl AnimationGraphModel {
    /// Add a property under a fresh default name, returning the name
    pub fn add_property_to_graph(&mut self, kind: PropertyKind, value: Value) -> String {
        let set = self.asset_mut().properties_mut(kind);
        let name = set.unique_name(kind.default_name());
        set.set(name.clone(), value);
        set.sort();
        self.invalidate_player();
        name
    }

    /// Remove a property and every node standing for it
    pub fn remove_property_from_graph(&mut self, kind: PropertyKind, name: &str) -> bool {
        if self.asset_mut().properties_mut(kind).remove(name).is_none() {
            return false;
        }
        for (owner, nodes) in self.property_nodes(kind, name) {
            self.remove_nodes_in(owner, &nodes);
        }
        self.invalidate_player();
        true
    }

    /// Set the value of a property, updating its nodes' unlinked pins
    pub fn set_property_value(&mut self, kind: PropertyKind, name: &str, value: Value) -> bool {
        if !self.asset().properties(kind).has(name) {
            return false;
        }
        self.asset_mut().properties_mut(kind).set(name, value.clone());

        for (owner, nodes) in self.property_nodes(kind, name) {
            let Some(graph) = self.asset_mut().sub_graph_mut(owner) else {
                continue;
            };
            let linked_inputs: Vec<_> = graph
                .nodes
                .iter()
                .filter(|n| nodes.contains(&n.id))
                .flat_map(|n| n.inputs.iter())
                .filter(|p| graph.is_pin_linked(p.id))
                .map(|p| p.id)
                .collect();
            for node in graph.nodes.iter_mut().filter(|n| nodes.contains(&n.id)) {
                for pin in node.inputs.iter_mut().chain(node.outputs.iter_mut()) {
                    if pin.name == name && !linked_inputs.contains(&pin.id) {
                        pin.value = value.clone();
                    }
                }
            }
        }
        self.invalidate_player();
        true
    }

    /// Rename a property and its nodes; fails if the new name is not valid
    pub fn rename_property(&mut self, kind: PropertyKind, old_name: &str, new_name: &str) -> bool {
        if old_name == new_name {
            return true;
        }
        if !self.is_graph_property_name_valid(kind, new_name) {
            tracing::warn!("Cannot rename property '{}' to '{}'", old_name, new_name);
            return false;
        }
        let Some(value) = self.asset_mut().properties_mut(kind).remove(old_name) else {
            return false;
        };
        let nodes = self.property_nodes(kind, old_name);

        let set = self.asset_mut().properties_mut(kind);
        set.set(new_name, value);
        set.sort();

        for (owner, ids) in nodes {
            let Some(graph) = self.asset_mut().sub_graph_mut(owner) else {
                continue;
            };
            for node in graph.nodes.iter_mut().filter(|n| ids.contains(&n.id)) {
                for pin in node.inputs.iter_mut().chain(node.outputs.iter_mut()) {
                    if pin.name == old_name {
                        pin.name = new_name.to_string();
                    }
                }
                if kind == PropertyKind::LocalVariable {
                    node.name = new_name.to_string();
                    node.description = new_name.to_string();
                }
            }
        }
        self.invalidate_player();
        true
    }

    /// Change the type of a property.
    ///
    /// Pins of its nodes are retagged in place and every link touching them
    /// is removed. Returns `false` if the type did not change.
    pub fn change_property_type(&mut self, kind: PropertyKind, name: &str, value: Value) -> bool {
        let Some(current) = self.asset().properties(kind).get(name) else {
            return false;
        };
        if current.is_same_type(&value) {
            return false;
        }
        self.asset_mut().properties_mut(kind).set(name, value.clone());

        let (pin_type, storage) = PinType::for_value(&value);
        for (owner, ids) in self.property_nodes(kind, name) {
            let stale: Vec<LinkId> = self
                .sub_graph(owner)
                .map(|graph| {
                    graph
                        .links
                        .iter()
                        .filter(|l| {
                            let touches = |pin| graph.node_for_pin(pin).is_some_and(|n| ids.contains(&n.id));
                            touches(l.start_pin_id) || touches(l.end_pin_id)
                        })
                        .map(|l| l.id)
                        .collect()
                })
                .unwrap_or_default();
            self.remove_links_in(owner, &stale);

            let Some(graph) = self.asset_mut().sub_graph_mut(owner) else {
                continue;
            };
            for node in graph.nodes.iter_mut().filter(|n| ids.contains(&n.id)) {
                for pin in node.inputs.iter_mut().chain(node.outputs.iter_mut()) {
                    if pin.name == name {
                        pin.retag(pin_type, storage, value.clone());
                    }
                }
                node.color = pin_type.color();
            }
        }
        self.invalidate_player();
        true
    }

    /// Whether a name can be used for a new or renamed property
    pub fn is_graph_property_name_valid(&self, kind: PropertyKind, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        let properties = self.asset().properties(kind);
        if properties.has(name) {
            return false;
        }
        let compact = name.replace(' ', "");
        if properties.names().any(|existing| existing.replace(' ', "") == compact) {
            return false;
        }
        !KEYWORDS.contains(&compact.to_lowercase().as_str())
    }

    /// Spawn a node reading a graph input in the active sub-graph
    pub fn spawn_graph_input_node(&mut self, name: &str) -> Option<NodeId> {
        let Some(value) = self.asset().inputs.get(name).cloned() else {
            tracing::error!("Graph has no input named '{}'", name);
            return None;
        };
        let pin = property_pin(name, &value, PinKind::Output);
        let mut node = Node::new(PropertyKind::Input.token(), INPUT_NODE_COLOR).with_outputs(vec![pin]);
        node.category = PropertyKind::Input.token().to_string();
        node.assign_pin_ids();

        let owner = self.current_owner();
        Some(self.add_node(owner, node))
    }

    /// Spawn a getter (or setter) of a local variable in the active sub-graph.
    ///
    /// A sub-graph holds at most one setter per variable.
    pub fn spawn_local_variable_node(&mut self, name: &str, getter: bool) -> Option<NodeId> {
        let Some(value) = self.asset().local_variables.get(name).cloned() else {
            tracing::error!("Graph has no local variable named '{}'", name);
            return None;
        };
        let owner = self.current_owner();
        if !getter && self.sub_graph(owner).and_then(|g| g.local_variable_setter(name)).is_some() {
            tracing::warn!("Local variable '{}' already has a setter in this graph", name);
            return None;
        }

        let (pin_type, _) = PinType::for_value(&value);
        let mut node = Node::new(name, pin_type.color());
        node.category = LOCAL_VARIABLE_CATEGORY.to_string();
        if getter {
            node.outputs.push(property_pin(name, &value, PinKind::Output));
        } else {
            node.inputs.push(property_pin(name, &value, PinKind::Input));
        }
        node.assign_pin_ids();

        Some(self.add_node(owner, node))
    }

    /// Whether two nodes refer to the same local variable
    pub fn is_same_local_variable_nodes(&self, a: &Node, b: &Node) -> bool {
        a.is_local_variable() && b.is_local_variable() && a.local_variable_name() == b.local_variable_name()
    }

    /// Property nodes for `name`, grouped by owning sub-graph
    fn property_nodes(&self, kind: PropertyKind, name: &str) -> Vec<(NodeId, Vec<NodeId>)> {
        let asset = self.asset();
        asset
            .sub_graphs()
            .filter_map(|(owner, graph)| {
                let ids: Vec<NodeId> = graph
                    .nodes
                    .iter()
                    .filter(|n| asset.is_property_node_named(kind, n, name))
                    .map(|n| n.id)
                    .collect();
                (!ids.is_empty()).then_some((owner, ids))
            })
            .collect()
    }
}

fn property_pin(name: &str, value: &Value, kind: PinKind) -> Pin {
    let (pin_type, storage) = PinType::for_value(value);
    let mut pin = Pin::new(name, pin_type, kind);
    pin.retag(pin_type, storage, value.clone());
    pin
}
