// SPDX-License-Identifier: MIT OR Apache-2.0
//! Evaluation order of sub-graph nodes and links.
//!
//! Each sub-graph is walked depth-first from its sinks (`Output` and `Event`
//! nodes). Producers are visited before the node itself, so every node gets an
//! index larger than all of its producers. Consumers of sorted nodes are walked
//! afterwards the same way. On a cycle, the link into the node already on the
//! stack is the only one left running backwards. Nodes with no path to or from
//! a sink keep `UNDEFINED_SORT_INDEX`.
//!
//! All nodes standing for one local variable (one optional setter and any
//! number of getters) move as a single unit and share an index. Variables
//! without a setter take index 0, ahead of everything else.
//!
//! State machines are not pipelines: the entry state gets 0, every other
//! node 1.

use crate::error::PersistenceError;
use crate::graph::SubGraph;
use crate::model::AnimationGraphModel;
use crate::node::{Node, NodeId, NodeKind, UNDEFINED_SORT_INDEX};
use crate::pin::PinId;
use std::collections::{HashMap, HashSet, VecDeque};

/// Index shared by local variables that have no setter
const SETTERLESS_VARIABLE_INDEX: i32 = 0;

impl AnimationGraphModel {
    /// Sort the nodes and links of every sub-graph into evaluation order
    pub fn sort(&mut self) {
        for owner in self.asset().owners() {
            let state_machine = self.asset().owner_kind(owner) == Some(NodeKind::StateMachine);
            if let Some(graph) = self.asset_mut().sub_graph_mut(owner) {
                if state_machine {
                    sort_state_machine(graph);
                } else {
                    sort_sub_graph(graph);
                }
            }
        }
        tracing::trace!("Sorted {} sub-graph(s)", self.asset().owners().len());
    }

    /// Sort, then write the asset as RON
    pub fn serialize(&mut self) -> Result<String, PersistenceError> {
        self.sort();
        self.asset().to_ron()
    }
}

/// Order the states of a state machine: entry first
pub fn sort_state_machine(graph: &mut SubGraph) {
    for node in &mut graph.nodes {
        node.sort_index = if node.is_entry_state { 0 } else { 1 };
    }
    graph.nodes.sort_by_key(|n| n.sort_index);
}

/// Order the nodes and links of a dataflow sub-graph
pub fn sort_sub_graph(graph: &mut SubGraph) {
    let mut sorter = Sorter::new(graph);

    let mut sinks: Vec<NodeId> = graph.nodes.iter().filter(|n| is_sink(n)).map(|n| n.id).collect();
    sinks.sort_unstable();
    for sink in sinks {
        sorter.visit_from(sink);
    }

    apply_indices(graph, &sorter.index);
    sort_links(graph);
}

fn is_sink(node: &Node) -> bool {
    !node.is_comment() && (node.name == "Output" || node.name == "Event")
}

struct Sorter {
    producers: HashMap<NodeId, Vec<NodeId>>,
    consumers: HashMap<NodeId, Vec<NodeId>>,
    variable_of: HashMap<NodeId, String>,
    members: HashMap<String, Vec<NodeId>>,
    setters: HashMap<String, NodeId>,
    index: HashMap<NodeId, i32>,
    /// Nodes whose producers are being visited
    on_stack: HashSet<NodeId>,
    /// Consumers of sorted nodes, each the root of a later walk
    pending: VecDeque<NodeId>,
    next: i32,
}

impl Sorter {
    fn new(graph: &SubGraph) -> Self {
        let owner_of: HashMap<PinId, NodeId> = graph
            .nodes
            .iter()
            .flat_map(|n| n.pins().map(move |p| (p.id, n.id)))
            .collect();

        let mut sources: HashMap<PinId, Vec<NodeId>> = HashMap::new();
        let mut consumers: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for link in &graph.links {
            let (Some(start), Some(end)) = (owner_of.get(&link.start_pin_id), owner_of.get(&link.end_pin_id)) else {
                continue;
            };
            sources.entry(link.end_pin_id).or_default().push(*start);
            consumers.entry(*start).or_default().push(*end);
        }
        for list in consumers.values_mut() {
            list.sort_unstable();
            list.dedup();
        }

        // Producers in input pin order, independent of link order
        let mut producers: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for node in &graph.nodes {
            let mut list: Vec<NodeId> = Vec::new();
            for pin in &node.inputs {
                let mut feeding = sources.get(&pin.id).cloned().unwrap_or_default();
                feeding.sort_unstable();
                for producer in feeding {
                    if !list.contains(&producer) {
                        list.push(producer);
                    }
                }
            }
            producers.insert(node.id, list);
        }

        let mut variable_of = HashMap::new();
        let mut members: HashMap<String, Vec<NodeId>> = HashMap::new();
        let mut setters: HashMap<String, NodeId> = HashMap::new();
        for node in &graph.nodes {
            let Some(name) = node.local_variable_name() else {
                continue;
            };
            variable_of.insert(node.id, name.to_string());
            members.entry(name.to_string()).or_default().push(node.id);
            if node.is_local_variable_setter() {
                setters
                    .entry(name.to_string())
                    .and_modify(|s| *s = (*s).min(node.id))
                    .or_insert(node.id);
            }
        }
        for list in members.values_mut() {
            list.sort_unstable();
        }

        Self {
            producers,
            consumers,
            variable_of,
            members,
            setters,
            index: HashMap::new(),
            on_stack: HashSet::new(),
            pending: VecDeque::new(),
            next: SETTERLESS_VARIABLE_INDEX + 1,
        }
    }

    fn is_defined(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    fn can_enter(&self, id: NodeId) -> bool {
        if self.is_defined(id) {
            return false;
        }
        match self.variable_of.get(&id).and_then(|name| self.members.get(name)) {
            Some(members) => members.iter().all(|m| !self.on_stack.contains(m)),
            None => !self.on_stack.contains(&id),
        }
    }

    fn next_index(&mut self) -> i32 {
        let index = self.next;
        self.next += 1;
        index
    }

    fn producers_of(&self, id: NodeId) -> Vec<NodeId> {
        self.producers.get(&id).cloned().unwrap_or_default()
    }

    fn consumers_of(&self, id: NodeId) -> Vec<NodeId> {
        self.consumers.get(&id).cloned().unwrap_or_default()
    }

    /// Walk from `root`, then from every consumer of what got sorted on the way
    ///
    /// Consumers start their own walk once the stack is empty, so a node on the
    /// stack is always downstream of the node being visited.
    fn visit_from(&mut self, root: NodeId) {
        self.pending.push_back(root);
        while let Some(id) = self.pending.pop_front() {
            if self.can_enter(id) {
                self.visit(id);
            }
        }
    }

    fn visit(&mut self, id: NodeId) {
        if let Some(name) = self.variable_of.get(&id).cloned() {
            self.visit_variable(&name);
            return;
        }

        self.on_stack.insert(id);
        for producer in self.producers_of(id) {
            // A producer on the stack closes a cycle; only that link runs backwards
            if self.can_enter(producer) {
                self.visit(producer);
            }
        }
        self.on_stack.remove(&id);

        let index = self.next_index();
        self.index.insert(id, index);
        let consumers = self.consumers_of(id);
        self.pending.extend(consumers);
    }

    fn visit_variable(&mut self, name: &str) {
        let members = self.members.get(name).cloned().unwrap_or_default();
        if members.is_empty() {
            return;
        }
        let setter = self.setters.get(name).copied();

        self.on_stack.extend(members.iter().copied());
        for producer in setter.map(|s| self.producers_of(s)).unwrap_or_default() {
            if self.can_enter(producer) {
                self.visit(producer);
            }
        }
        for member in &members {
            self.on_stack.remove(member);
        }

        let index = match setter {
            Some(_) => self.next_index(),
            None => SETTERLESS_VARIABLE_INDEX,
        };
        for member in &members {
            self.index.insert(*member, index);
            let consumers = self.consumers_of(*member);
            self.pending.extend(consumers);
        }
    }
}

/// Write indices back, order nodes by them and renumber densely from 0
fn apply_indices(graph: &mut SubGraph, index: &HashMap<NodeId, i32>) {
    for node in &mut graph.nodes {
        node.sort_index = index.get(&node.id).copied().unwrap_or(UNDEFINED_SORT_INDEX);
    }
    graph
        .nodes
        .sort_by_key(|n| if n.has_sort_index() { (0, n.sort_index) } else { (1, 0) });

    let mut ranks: Vec<i32> = graph
        .nodes
        .iter()
        .filter(|n| n.has_sort_index())
        .map(|n| n.sort_index)
        .collect();
    ranks.dedup();
    for node in graph.nodes.iter_mut().filter(|n| n.has_sort_index()) {
        node.sort_index = ranks
            .binary_search(&node.sort_index)
            .ok()
            .and_then(|rank| i32::try_from(rank).ok())
            .unwrap_or(UNDEFINED_SORT_INDEX);
    }
}

/// Order links by the positions of their source and destination nodes
fn sort_links(graph: &mut SubGraph) {
    let position: HashMap<PinId, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .flat_map(|(i, n)| n.pins().map(move |p| (p.id, i)))
        .collect();
    let key = |pin: PinId| position.get(&pin).copied().unwrap_or(usize::MAX);
    graph.links.sort_by_key(|l| (key(l.start_pin_id), key(l.end_pin_id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::state_machine::STATE_MACHINE_CATEGORY;
    use crate::value::Value;

    fn link(model: &mut AnimationGraphModel, from: NodeId, output: usize, to: NodeId, input: usize) {
        let start = model.node(from).unwrap().outputs[output].id;
        let end = model.node(to).unwrap().inputs[input].id;
        model.create_link(start, end).unwrap();
    }

    fn index_of(model: &AnimationGraphModel, id: NodeId) -> i32 {
        model.node(id).unwrap().sort_index
    }

    #[test]
    fn test_producers_come_first() {
        let mut model = AnimationGraphModel::default();
        let output = model.create_node("Animation", "Output").unwrap();
        let player = model.create_node("Animation", "Animation Player").unwrap();
        let scale = model.create_node("Math", "Multiply (Float)").unwrap();
        let base = model.create_node("Math", "Add (Float)").unwrap();
        link(&mut model, base, 0, scale, 0);
        link(&mut model, scale, 0, player, 1);
        link(&mut model, player, 0, output, 0);

        model.sort();
        assert_eq!(index_of(&model, base), 0);
        assert_eq!(index_of(&model, scale), 1);
        assert_eq!(index_of(&model, player), 2);
        assert_eq!(index_of(&model, output), 3);
        let order: Vec<NodeId> = model.nodes().iter().map(|n| n.id).collect();
        assert_eq!(order, vec![base, scale, player, output]);
    }

    #[test]
    fn test_orphans_stay_undefined_and_last() {
        let mut model = AnimationGraphModel::default();
        let orphan = model.create_node("Math", "Add (Float)").unwrap();
        let player = model.create_node("Animation", "Animation Player").unwrap();
        let output = model.create_node("Animation", "Output").unwrap();
        link(&mut model, player, 0, output, 0);

        model.sort();
        assert_eq!(index_of(&model, orphan), UNDEFINED_SORT_INDEX);
        assert_eq!(model.nodes().last().map(|n| n.id), Some(orphan));
        assert_eq!(index_of(&model, player), 0);
    }

    #[test]
    fn test_consumers_of_reached_nodes_are_sorted() {
        let mut model = AnimationGraphModel::default();
        let output = model.create_node("Animation", "Output").unwrap();
        let player = model.create_node("Animation", "Animation Player").unwrap();
        let speed = model.create_node("Math", "Add (Float)").unwrap();
        let side = model.create_node("Math", "Multiply (Float)").unwrap();
        link(&mut model, speed, 0, player, 1);
        link(&mut model, speed, 0, side, 0);
        link(&mut model, player, 0, output, 0);

        model.sort();
        // Reached forward from `speed`, so it is not an orphan
        assert!(index_of(&model, side) > index_of(&model, speed));
    }

    #[test]
    fn test_cycle_only_reverses_closing_link() {
        let mut model = AnimationGraphModel::default();
        let output = model.create_node("Animation", "Output").unwrap();
        let player = model.create_node("Animation", "Animation Player").unwrap();
        let scale = model.create_node("Math", "Multiply (Float)").unwrap();
        let base = model.create_node("Math", "Add (Float)").unwrap();
        link(&mut model, base, 0, scale, 0);
        link(&mut model, scale, 0, base, 0);
        link(&mut model, scale, 0, player, 1);
        link(&mut model, player, 0, output, 0);

        model.sort();
        assert_eq!(index_of(&model, base), 0);
        assert_eq!(index_of(&model, scale), 1);
        assert_eq!(index_of(&model, player), 2);
        assert_eq!(index_of(&model, output), 3);

        let graph = model.sub_graph(NodeId::ROOT).unwrap();
        let backwards: Vec<(NodeId, NodeId)> = graph
            .links
            .iter()
            .map(|l| {
                let from = graph.node_for_pin(l.start_pin_id).unwrap().id;
                let to = graph.node_for_pin(l.end_pin_id).unwrap().id;
                (from, to)
            })
            .filter(|(from, to)| index_of(&model, *from) >= index_of(&model, *to))
            .collect();
        assert_eq!(backwards, vec![(scale, base)]);
    }

    #[test]
    fn test_local_variable_nodes_share_index() {
        let mut model = AnimationGraphModel::default();
        model.asset_mut().local_variables.set("Blend", Value::Float32(0.5));
        let output = model.create_node("Animation", "Output").unwrap();
        let blend = model.create_node("Blend", "Pose Blend").unwrap();
        let source = model.create_node("Math", "Add (Float)").unwrap();
        let setter = model.spawn_local_variable_node("Blend", false).unwrap();
        let getter_a = model.spawn_local_variable_node("Blend", true).unwrap();
        let getter_b = model.spawn_local_variable_node("Blend", true).unwrap();
        let clamp = model.create_node("Math", "Clamp (Float)").unwrap();
        link(&mut model, source, 0, setter, 0);
        link(&mut model, getter_a, 0, clamp, 0);
        link(&mut model, clamp, 0, blend, 2);
        link(&mut model, getter_b, 0, clamp, 2);
        link(&mut model, blend, 0, output, 0);

        model.sort();
        let shared = index_of(&model, setter);
        assert_ne!(shared, UNDEFINED_SORT_INDEX);
        assert_eq!(index_of(&model, getter_a), shared);
        assert_eq!(index_of(&model, getter_b), shared);
        assert!(index_of(&model, source) < shared);
        assert!(shared < index_of(&model, clamp));
        assert!(index_of(&model, clamp) < index_of(&model, blend));
    }

    #[test]
    fn test_setterless_variable_comes_first() {
        let mut model = AnimationGraphModel::default();
        model.asset_mut().local_variables.set("Weight", Value::Float32(1.0));
        let output = model.create_node("Animation", "Output").unwrap();
        let blend = model.create_node("Blend", "Pose Blend").unwrap();
        let getter = model.spawn_local_variable_node("Weight", true).unwrap();
        link(&mut model, getter, 0, blend, 2);
        link(&mut model, blend, 0, output, 0);

        model.sort();
        assert_eq!(index_of(&model, getter), 0);
        assert_eq!(index_of(&model, blend), 1);
        assert_eq!(index_of(&model, output), 2);
    }

    #[test]
    fn test_state_machine_entry_first() {
        let mut model = AnimationGraphModel::default();
        let machine = model.create_node("Animation", "State Machine").unwrap();
        model.enter_node(machine);
        let idle = model.create_node(STATE_MACHINE_CATEGORY, "State").unwrap();
        let walk = model.create_node(STATE_MACHINE_CATEGORY, "State").unwrap();
        let transition = model.create_transition(walk, idle).unwrap();

        model.sort();
        assert_eq!(index_of(&model, idle), 0);
        assert_eq!(index_of(&model, walk), 1);
        assert_eq!(index_of(&model, transition), 1);
        assert_eq!(model.nodes()[0].id, idle);
    }

    #[test]
    fn test_links_follow_node_order() {
        let mut model = AnimationGraphModel::default();
        let output = model.create_node("Animation", "Output").unwrap();
        let player = model.create_node("Animation", "Animation Player").unwrap();
        let speed = model.create_node("Math", "Add (Float)").unwrap();
        link(&mut model, player, 0, output, 0);
        link(&mut model, speed, 0, player, 1);

        model.sort();
        let links = model.links();
        let speed_out = model.node(speed).unwrap().outputs[0].id;
        assert_eq!(links[0].start_pin_id, speed_out);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut model = AnimationGraphModel::default();
        let output = model.create_node("Animation", "Output").unwrap();
        let blend = model.create_node("Blend", "Pose Blend").unwrap();
        let a = model.create_node("Animation", "Animation Player").unwrap();
        let b = model.create_node("Animation", "Animation Player").unwrap();
        model.create_node("Math", "Add (Float)").unwrap();
        link(&mut model, a, 0, blend, 0);
        link(&mut model, b, 0, blend, 1);
        link(&mut model, blend, 0, output, 0);

        model.sort();
        let first = model.sub_graph(NodeId::ROOT).unwrap().clone();
        model.sort();
        assert_eq!(model.sub_graph(NodeId::ROOT).unwrap(), &first);
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut model = AnimationGraphModel::default();
        let output = model.create_node("Animation", "Output").unwrap();
        let player = model.create_node("Animation", "Animation Player").unwrap();
        link(&mut model, player, 0, output, 0);

        let ron = model.serialize().unwrap();
        let loaded = crate::graph::AnimationGraphAsset::from_ron(&ron).unwrap();
        assert_eq!(&loaded, model.asset());
        assert_eq!(loaded.sub_graph(NodeId::ROOT).unwrap().nodes[0].id, player);
    }
}
