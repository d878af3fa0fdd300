// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor model for animation graphs.
//!
//! [`AnimationGraphModel`] owns an [`AnimationGraphAsset`] and applies every
//! user edit to it: nodes, links, properties and sub-graph navigation. Node
//! and link operations act on the sub-graph at the end of the current path.
//! The compiler and validator only read the model.

mod links;
mod properties;
mod state_machine;

pub use links::LinkQueryResult;

use crate::assets::{AssetCatalog, AssetResolver, NULL_BONE_INDEX};
use crate::factory::{GraphKind, NodeFactories, NodeFactory};
use crate::graph::{AnimationGraphAsset, SubGraph};
use crate::link::Link;
use crate::node::{Node, NodeId, NodeKind};
use crate::pin::{Pin, PinId, PinKind, StorageKind};
use crate::settings::CompilerSettings;
use crate::value::Value;

/// Editable animation graph
pub struct AnimationGraphModel {
    asset: AnimationGraphAsset,
    factories: NodeFactories,
    assets: Box<dyn AssetResolver>,
    settings: CompilerSettings,
    current_path: Vec<NodeId>,
    player_dirty: bool,
}

impl AnimationGraphModel {
    /// Create a model over an asset with an empty asset catalog
    pub fn new(asset: AnimationGraphAsset) -> Self {
        Self::with_assets(asset, AssetCatalog::new())
    }

    /// Create a model over an asset using the given asset lookups
    pub fn with_assets(asset: AnimationGraphAsset, assets: impl AssetResolver + 'static) -> Self {
        let mut model = Self {
            asset,
            factories: NodeFactories::new(),
            assets: Box::new(assets),
            settings: CompilerSettings::default(),
            current_path: Vec::new(),
            player_dirty: true,
        };
        model.asset.sub_graph_entry(NodeId::ROOT);
        model.ensure_entry_states();
        model
    }

    /// Replace the compiler settings
    pub fn with_settings(mut self, settings: CompilerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The edited asset
    pub fn asset(&self) -> &AnimationGraphAsset {
        &self.asset
    }

    /// Take the edited asset
    pub fn into_asset(self) -> AnimationGraphAsset {
        self.asset
    }

    /// Compiler settings
    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// Replace the compiler settings
    pub fn set_settings(&mut self, settings: CompilerSettings) {
        self.settings = settings;
    }

    /// Node factories for every graph kind
    pub fn factories(&self) -> &NodeFactories {
        &self.factories
    }

    /// Asset lookups
    pub fn assets(&self) -> &dyn AssetResolver {
        self.assets.as_ref()
    }

    /// Skeleton used to resolve bone names
    pub fn skeleton(&self) -> u64 {
        self.asset.skeleton
    }

    /// Set the skeleton used to resolve bone names
    pub fn set_skeleton(&mut self, handle: u64) {
        self.asset.skeleton = handle;
        self.invalidate_player();
    }

    /// Whether the graph changed since the last successful compile
    pub fn is_player_dirty(&self) -> bool {
        self.player_dirty
    }

    pub(crate) fn invalidate_player(&mut self) {
        self.player_dirty = true;
    }

    pub(crate) fn mark_player_clean(&mut self) {
        self.player_dirty = false;
    }

    pub(crate) fn asset_mut(&mut self) -> &mut AnimationGraphAsset {
        &mut self.asset
    }

    // ---------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------

    /// Nesting from the top level down to the active sub-graph
    pub fn current_path(&self) -> &[NodeId] {
        &self.current_path
    }

    /// Owner of the active sub-graph (`NodeId::ROOT` for the top level)
    pub fn current_owner(&self) -> NodeId {
        self.current_path.last().copied().unwrap_or(NodeId::ROOT)
    }

    /// Navigate to a sub-graph, returning the previous tail of the path.
    ///
    /// `None` (or the root) returns to the top level. A node already on the
    /// path truncates the path to it. Any other node is descended into.
    pub fn set_current_path(&mut self, node: Option<NodeId>) -> Option<NodeId> {
        let previous = self.current_path.last().copied();
        match node {
            None => self.current_path.clear(),
            Some(id) if id.is_root() => self.current_path.clear(),
            Some(id) => {
                if let Some(position) = self.current_path.iter().position(|n| *n == id) {
                    self.current_path.truncate(position + 1);
                } else {
                    self.current_path.push(id);
                }
            }
        }
        previous
    }

    /// Descend into a node's sub-graph, creating it if needed
    pub fn enter_node(&mut self, node_id: NodeId) {
        self.set_current_path(Some(node_id));
        self.ensure_sub_graph(node_id);
        self.invalidate_player();
    }

    /// Registry used for a sub-graph
    pub fn graph_kind(&self, owner: NodeId) -> GraphKind {
        GraphKind::for_owner(self.asset.owner_kind(owner))
    }

    /// Factory used for a sub-graph
    pub fn factory_for(&self, owner: NodeId) -> &NodeFactory {
        self.factories.get(self.graph_kind(owner))
    }

    /// Factory used for the active sub-graph
    pub fn factory(&self) -> &NodeFactory {
        self.factory_for(self.current_owner())
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Sub-graph owned by a node
    pub fn sub_graph(&self, owner: NodeId) -> Option<&SubGraph> {
        self.asset.sub_graph(owner)
    }

    /// Nodes of the active sub-graph
    pub fn nodes(&self) -> &[Node] {
        self.asset
            .sub_graph(self.current_owner())
            .map(|g| g.nodes.as_slice())
            .unwrap_or_default()
    }

    /// Links of the active sub-graph
    pub fn links(&self) -> &[Link] {
        self.asset
            .sub_graph(self.current_owner())
            .map(|g| g.links.as_slice())
            .unwrap_or_default()
    }

    /// Node of the active sub-graph
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.asset.sub_graph(self.current_owner())?.node(node_id)
    }

    /// Mutable node of the active sub-graph (layout edits)
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.player_dirty = true;
        let owner = self.current_owner();
        self.asset.sub_graph_mut(owner)?.node_mut(node_id)
    }

    /// Pin of the active sub-graph
    pub fn find_pin(&self, pin_id: PinId) -> Option<&Pin> {
        self.asset.sub_graph(self.current_owner())?.pin(pin_id)
    }

    /// Node in any sub-graph
    pub fn find_in_all_nodes(&self, node_id: NodeId) -> Option<&Node> {
        self.asset.find_in_all_nodes(node_id)
    }

    /// Node owning the sub-graph that contains `node_id`
    pub fn find_parent(&self, node_id: NodeId) -> Option<&Node> {
        self.asset.find_parent(node_id)
    }

    /// Whether a node is an input, output or local variable node
    pub fn is_property_node(&self, node: &Node) -> bool {
        self.asset.is_property_node(node)
    }

    /// Index of a bone in the graph's skeleton; `"root"` is always 0
    pub fn find_bone_index(&self, bone_name: &str) -> u32 {
        if bone_name == "root" {
            return 0;
        }
        self.assets
            .find_bone(self.asset.skeleton, bone_name)
            .map_or(NULL_BONE_INDEX, |index| index + 1)
    }

    // ---------------------------------------------------------------
    // Nodes
    // ---------------------------------------------------------------

    /// Create a node in the active sub-graph
    pub fn create_node(&mut self, category: &str, name: &str) -> Option<NodeId> {
        let owner = self.current_owner();
        let Some(node) = self.factory_for(owner).spawn_node(category, name) else {
            tracing::error!("Failed to create node '{}' in category '{}'", name, category);
            return None;
        };
        Some(self.add_node(owner, node))
    }

    pub(crate) fn add_node(&mut self, owner: NodeId, node: Node) -> NodeId {
        let node_id = node.id;
        self.asset.sub_graph_entry(owner).nodes.push(node);
        self.on_node_created(owner, node_id);
        node_id
    }

    fn on_node_created(&mut self, owner: NodeId, node_id: NodeId) {
        self.invalidate_player();
        if self.asset.sub_graph(owner).and_then(|g| g.node(node_id)).is_some_and(Node::is_subroutine) {
            self.ensure_sub_graph(node_id);
        }
        if self.asset.owner_kind(owner) == Some(NodeKind::StateMachine) {
            self.ensure_entry_state_in(owner);
        }
    }

    /// Remove a node of the active sub-graph
    pub fn remove_node(&mut self, node_id: NodeId) -> bool {
        self.remove_nodes(&[node_id])
    }

    /// Remove nodes of the active sub-graph
    pub fn remove_nodes(&mut self, node_ids: &[NodeId]) -> bool {
        let owner = self.current_owner();
        self.remove_nodes_in(owner, node_ids)
    }

    pub(crate) fn remove_nodes_in(&mut self, owner: NodeId, node_ids: &[NodeId]) -> bool {
        let Some(graph) = self.asset.sub_graph(owner) else {
            return false;
        };
        let doomed: Vec<NodeId> = node_ids
            .iter()
            .copied()
            .filter(|id| graph.node(*id).is_some())
            .collect();
        if doomed.is_empty() {
            return false;
        }

        for node_id in &doomed {
            self.delete_dead_links(owner, *node_id);
        }
        if let Some(graph) = self.asset.sub_graph_mut(owner) {
            graph.nodes.retain(|n| !doomed.contains(&n.id));
        }
        self.on_node_deleted(owner);
        true
    }

    /// Remove links touching a node (or a missing pin), resetting downstream inputs
    fn delete_dead_links(&mut self, owner: NodeId, node_id: NodeId) {
        let Some(graph) = self.asset.sub_graph(owner) else {
            return;
        };
        let dead: Vec<_> = graph
            .links
            .iter()
            .filter(|link| {
                match (graph.node_for_pin(link.start_pin_id), graph.node_for_pin(link.end_pin_id)) {
                    (Some(start), Some(end)) => start.id == node_id || end.id == node_id,
                    _ => true,
                }
            })
            .map(|link| (link.id, link.end_pin_id))
            .collect();
        if dead.is_empty() {
            return;
        }

        for (_, end_pin) in &dead {
            self.assign_some_default_value(owner, *end_pin);
        }
        if let Some(graph) = self.asset.sub_graph_mut(owner) {
            graph.links.retain(|l| !dead.iter().any(|(id, _)| *id == l.id));
        }
        self.on_link_deleted(owner);
    }

    /// Reset an input pin to the value its node type declares, or its type default
    pub(crate) fn assign_some_default_value(&mut self, owner: NodeId, pin_id: PinId) {
        let factory = self.factory_for(owner);
        let Some(graph) = self.asset.sub_graph(owner) else {
            return;
        };
        let Some(node) = graph.node_for_pin(pin_id) else {
            return;
        };
        let Some(pin) = node.pin(pin_id) else {
            return;
        };
        if pin.kind == PinKind::Output {
            return;
        }

        let value = factory.declared_pin_value(node, &pin.name).unwrap_or_else(|| {
            if pin.storage == StorageKind::Array {
                Value::Void
            } else {
                pin.pin_type.default_value()
            }
        });
        if let Some(pin) = self.asset.sub_graph_mut(owner).and_then(|g| g.pin_mut(pin_id)) {
            pin.value = value;
        }
    }

    fn on_node_deleted(&mut self, owner: NodeId) {
        self.invalidate_player();

        // A transition needs a state on both ends
        let dangling: Vec<NodeId> = self
            .asset
            .sub_graph(owner)
            .map(|graph| {
                let connected = |pin: Option<&Pin>| pin.is_some_and(|p| graph.node_connected_to_pin(p.id).is_some());
                graph
                    .nodes
                    .iter()
                    .filter(|n| n.kind() == NodeKind::Transition)
                    .filter(|n| !connected(n.inputs.first()) || !connected(n.outputs.first()))
                    .map(|n| n.id)
                    .collect()
            })
            .unwrap_or_default();
        if !dangling.is_empty() {
            tracing::debug!("Removing {} dangling transition(s)", dangling.len());
            self.remove_nodes_in(owner, &dangling);
            return;
        }

        self.collect_orphaned_sub_graphs();

        if self.asset.owner_kind(owner) == Some(NodeKind::StateMachine) {
            self.ensure_entry_state_in(owner);
        }
    }

    /// Drop sub-graphs whose owner node no longer exists
    fn collect_orphaned_sub_graphs(&mut self) {
        loop {
            let orphans: Vec<NodeId> = self
                .asset
                .owners()
                .into_iter()
                .filter(|owner| !owner.is_root() && self.asset.find_in_all_nodes(*owner).is_none())
                .collect();
            if orphans.is_empty() {
                break;
            }
            for owner in orphans {
                tracing::trace!("Removing orphaned sub-graph {:?}", owner);
                self.asset.remove_sub_graph(owner);
            }
        }
    }

    /// Create the sub-graph of a subroutine node if it does not exist yet
    pub fn ensure_sub_graph(&mut self, node_id: NodeId) {
        if node_id.is_root() || self.asset.has_sub_graph(node_id) {
            return;
        }
        let Some(node) = self.asset.find_in_all_nodes(node_id) else {
            return;
        };
        if !node.is_subroutine() {
            return;
        }

        let seed = match node.kind() {
            NodeKind::Transition => self.factories.get(GraphKind::Transition).spawn_node("Transition", "Output"),
            NodeKind::StateMachine | NodeKind::BlendSpace => None,
            _ => self.factories.get(GraphKind::Animation).spawn_node("Animation", "Output"),
        };
        let graph = self.asset.sub_graph_entry(node_id);
        if let Some(output) = seed {
            graph.nodes.push(output);
        }
    }

    /// Set the literal value of a pin in the active sub-graph
    pub fn set_pin_value(&mut self, pin_id: PinId, value: Value) -> bool {
        let owner = self.current_owner();
        let Some(pin) = self.asset.sub_graph_mut(owner).and_then(|g| g.pin_mut(pin_id)) else {
            return false;
        };
        pin.value = value;
        let node_id = pin.node_id;
        self.on_pin_value_changed(owner, node_id, pin_id);
        true
    }

    fn on_pin_value_changed(&mut self, owner: NodeId, node_id: NodeId, pin_id: PinId) {
        self.invalidate_player();

        let Some(node) = self.asset.sub_graph(owner).and_then(|g| g.node(node_id)) else {
            return;
        };
        if node.kind() != NodeKind::QuickState {
            return;
        }
        // Quick states are labelled after their clip
        let description = node
            .pin(pin_id)
            .and_then(|p| p.value.as_asset_handle())
            .filter(|handle| self.assets.is_asset_handle_valid(*handle))
            .and_then(|handle| self.assets.asset_name(handle))
            .unwrap_or_else(|| node.name.clone());
        if let Some(node) = self.asset.sub_graph_mut(owner).and_then(|g| g.node_mut(node_id)) {
            node.description = description;
        }
    }
}

impl Default for AnimationGraphModel {
    fn default() -> Self {
        Self::new(AnimationGraphAsset::default())
    }
}
