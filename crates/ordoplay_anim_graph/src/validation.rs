// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structural checks run before a graph is compiled.
//!
//! Every sub-graph is checked and all problems are collected, so the user
//! gets the full list in one go. Errors block compilation; warnings only
//! flag layouts that compile but will probably misbehave.

use crate::assets::NULL_BONE_INDEX;
use crate::graph::SubGraph;
use crate::model::AnimationGraphModel;
use crate::node::{Node, NodeId, NodeKind};
use crate::pin::PinType;
use crate::pin::StorageKind;
use crate::triangulation;
use crate::value::Value;

/// Names the validator accepts without a factory entry
const STRUCTURAL_NODE_NAMES: &[&str] = &["Output", "Input Action", "Event"];

/// Result of validating a whole graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that block compilation
    pub errors: Vec<String>,
    /// Problems that are only reported
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Whether no errors were found
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl AnimationGraphModel {
    /// Check every sub-graph for structural problems
    pub fn pre_validate_graph(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        for (owner, graph) in self.asset().sub_graphs() {
            self.validate_sub_graph(owner, graph, &mut report);
        }
        report
    }

    fn validate_sub_graph(&self, owner: NodeId, graph: &SubGraph, report: &mut ValidationReport) {
        let owner_node = if owner.is_root() { None } else { self.find_in_all_nodes(owner) };
        let owner_kind = owner_node.map(Node::kind);
        let owner_name = owner_node.map_or("", |n| n.description.as_str());

        for node in graph.nodes.iter().filter(|n| !n.is_comment()) {
            let known = STRUCTURAL_NODE_NAMES.contains(&node.name.as_str())
                || self.is_property_node(node)
                || self.factories().contains_runtime_type(&node.name);
            if !known {
                report
                    .errors
                    .push(format!("Animation Graph Factory doesn't contain node with type ID '{}'", node.name));
            }

            for pin in &node.inputs {
                if pin.value.is_void() && !graph.is_pin_linked(pin.id) && !pin.is_flow() {
                    report
                        .errors
                        .push(format!("Invalid linkage: node '{}', pin '{}'", node.name, pin.name));
                }
            }

            if let Some(error) = self.node_error(owner, node) {
                report.errors.push(format!("Node '{}': {}", node.description, error));
            }
        }

        let outputs = graph
            .nodes
            .iter()
            .filter(|n| !n.is_comment() && n.name == "Output")
            .count();
        let scope = if owner.is_root() {
            "Animation graph".to_string()
        } else {
            format!("Animation subgraph for '{owner_name}'")
        };
        if outputs > 1 {
            report.errors.push(format!("{scope} must have only one 'Output' node"));
        } else if outputs == 0 && !matches!(owner_kind, Some(NodeKind::StateMachine | NodeKind::BlendSpace)) {
            report.errors.push(format!("{scope} must have an 'Output' node"));
        }

        match owner_kind {
            Some(NodeKind::StateMachine) => {
                let states = graph
                    .nodes
                    .iter()
                    .filter(|n| !n.is_comment() && n.kind() != NodeKind::Transition)
                    .count();
                if states == 0 {
                    report
                        .errors
                        .push(format!("Animation state machine '{owner_name}' must have at least one state"));
                }
            }
            Some(NodeKind::BlendSpace) => self.validate_blend_space(owner_name, graph, report),
            _ => {}
        }

        for link in &graph.links {
            let valid = match (graph.pin(link.start_pin_id), graph.pin(link.end_pin_id)) {
                (Some(start), Some(end)) => start.is_same_type(end),
                _ => false,
            };
            if !valid {
                report.errors.push("Invalid linkage".to_string());
            }
        }
    }

    fn validate_blend_space(&self, name: &str, graph: &SubGraph, report: &mut ValidationReport) {
        let points: Vec<[f32; 2]> = graph
            .nodes
            .iter()
            .filter(|n| n.name == "Blend Space Vertex")
            .map(|n| n.offset)
            .collect();
        if points.is_empty() {
            report
                .errors
                .push(format!("Animation blend space '{name}' must have at least one vertex"));
            return;
        }
        if triangulation::has_duplicates(&points) {
            report
                .errors
                .push(format!("Animation Blend Space '{name}' has duplicate vertices!"));
            return;
        }

        let min_area = f64::from(self.settings().min_triangle_area);
        let min_extent = f64::from(self.settings().min_triangle_extent);
        let degenerate = triangulation::triangulate(&points)
            .into_iter()
            .any(|t| triangulation::is_degenerate(&points, t, min_area, min_extent));
        if degenerate {
            tracing::warn!("Blend space '{}' has degenerate triangles", name);
            report
                .warnings
                .push(format!("Animation Blend Space '{name}' has degenerate triangles!"));
        }
    }

    /// First semantic problem with a node, if any.
    ///
    /// Subroutine nodes are checked through their sub-graph. Node kinds with
    /// no known requirements are always accepted.
    pub fn node_error(&self, owner: NodeId, node: &Node) -> Option<String> {
        if node.is_subroutine() {
            return self.subroutine_error(node);
        }
        let graph = self.asset().sub_graph(owner)?;

        for pin in &node.inputs {
            match pin.pin_type {
                PinType::AnimationAsset => {
                    let handle = match pin.storage {
                        StorageKind::Array => 0,
                        StorageKind::Value => pin.value.as_asset_handle().unwrap_or(0),
                    };
                    if !self.assets().is_asset_handle_valid(handle) && graph.node_connected_to_pin(pin.id).is_none() {
                        return Some(format!("{} asset is not valid", pin.name));
                    }
                }
                PinType::Pose if pin.name == "Pose" => {
                    if graph.node_connected_to_pin(pin.id).is_none() {
                        return Some(format!("{} input is not connected", pin.name));
                    }
                }
                PinType::Bone => {
                    if let Some(bone) = pin.value.as_bone_name() {
                        if self.find_bone_index(bone) == NULL_BONE_INDEX {
                            return Some(format!("{} '{}' not found in skeleton", pin.name, bone));
                        }
                    }
                }
                _ => {}
            }
        }

        for pin in &node.outputs {
            let Some(link) = graph.links.iter().find(|l| l.start_pin_id == pin.id) else {
                continue;
            };
            match graph.pin(link.end_pin_id) {
                None => return Some(format!("{} output is connected to a pin that does not exist", pin.name)),
                Some(end) if !end.is_same_type(pin) => {
                    return Some(format!("{} output is connected to a pin of different type", pin.name));
                }
                Some(_) => {}
            }
        }

        None
    }

    fn subroutine_error(&self, node: &Node) -> Option<String> {
        let kind = node.kind();
        let stub_len = usize::from(kind == NodeKind::State);
        let Some(graph) = self.asset().sub_graph(node.id).filter(|g| g.nodes.len() > stub_len) else {
            return Some(format!("{} sub-graph has not been defined", node.name));
        };

        if let Some(error) = graph.nodes.iter().find_map(|sub| self.node_error(node.id, sub)) {
            return Some(error);
        }

        match kind {
            NodeKind::State if graph.find_node_by_name("Output").is_none() => {
                Some(format!("State '{}' graph has no 'Output' node", node.description))
            }
            NodeKind::Transition => {
                let Some(output) = graph.find_node_by_name("Output") else {
                    return Some("Transition graph has no 'Output' node".to_string());
                };
                let condition = output.inputs.first()?;
                let fires = graph.is_pin_linked(condition.id) || condition.value == Value::Bool(true);
                (!fires).then(|| "Transition will never occur.".to_string())
            }
            _ => None,
        }
    }
}
