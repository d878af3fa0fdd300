// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link creation and removal.

use super::AnimationGraphModel;
use crate::link::{Link, LinkId};
use crate::node::{NodeId, NodeKind};
use crate::pin::{PinId, PinKind};
use crate::value::Value;

/// Outcome of a link compatibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkQueryResult {
    /// The pins can be linked
    CanConnect,
    /// The start pin does not exist
    InvalidStartPin,
    /// The end pin does not exist
    InvalidEndPin,
    /// Both ends are the same pin
    SamePin,
    /// Both pins belong to the same node
    SameNode,
    /// Both pins are inputs or both are outputs
    IncompatiblePinKind,
    /// Value and array pins cannot be linked
    IncompatibleStorageKind,
    /// The declared types differ
    IncompatibleType,
    /// The link would feed a local variable into itself
    CausesLoop,
}

impl LinkQueryResult {
    /// Whether the link is allowed
    pub fn is_ok(self) -> bool {
        self == Self::CanConnect
    }
}

impl AnimationGraphModel {
    /// Check whether two pins of the active sub-graph can be linked
    pub fn can_create_link(&self, start_pin_id: PinId, end_pin_id: PinId) -> LinkQueryResult {
        let Some(graph) = self.sub_graph(self.current_owner()) else {
            return LinkQueryResult::InvalidStartPin;
        };
        let Some(start) = graph.pin(start_pin_id) else {
            return LinkQueryResult::InvalidStartPin;
        };
        let Some(end) = graph.pin(end_pin_id) else {
            return LinkQueryResult::InvalidEndPin;
        };

        if start.id == end.id {
            return LinkQueryResult::SamePin;
        }
        if start.node_id == end.node_id {
            return LinkQueryResult::SameNode;
        }
        if start.kind == end.kind {
            return LinkQueryResult::IncompatiblePinKind;
        }
        if start.storage != end.storage {
            return LinkQueryResult::IncompatibleStorageKind;
        }
        if start.pin_type != end.pin_type {
            return LinkQueryResult::IncompatibleType;
        }

        if let (Some(a), Some(b)) = (graph.node(start.node_id), graph.node(end.node_id)) {
            if a.is_local_variable() && b.is_local_variable() && a.local_variable_name() == b.local_variable_name() {
                return LinkQueryResult::CausesLoop;
            }
        }

        LinkQueryResult::CanConnect
    }

    /// Link two pins of the active sub-graph.
    ///
    /// The caller is expected to have checked [`Self::can_create_link`].
    /// Pins may be given in either order. Any other link into the same input
    /// is removed.
    pub fn create_link(&mut self, start_pin_id: PinId, end_pin_id: PinId) -> Option<LinkId> {
        let owner = self.current_owner();
        self.create_link_in(owner, start_pin_id, end_pin_id)
    }

    pub(crate) fn create_link_in(&mut self, owner: NodeId, start_pin_id: PinId, end_pin_id: PinId) -> Option<LinkId> {
        let graph = self.asset_mut().sub_graph_mut(owner)?;

        let (start_pin_id, end_pin_id) = match graph.pin(start_pin_id) {
            Some(pin) if pin.kind == PinKind::Input => (end_pin_id, start_pin_id),
            Some(_) => (start_pin_id, end_pin_id),
            None => {
                tracing::error!("Cannot link missing pin {:?}", start_pin_id);
                return None;
            }
        };
        let color = graph.pin(start_pin_id)?.pin_type.color();
        let end = graph.pin_mut(end_pin_id)?;
        end.value = Value::Void;

        let link = Link::new(start_pin_id, end_pin_id, color);
        let link_id = link.id;
        graph.links.push(link);

        self.on_link_created(owner, link_id);
        Some(link_id)
    }

    fn on_link_created(&mut self, owner: NodeId, link_id: LinkId) {
        let Some(graph) = self.sub_graph(owner) else {
            return;
        };
        let Some(end_pin_id) = graph.link(link_id).map(|l| l.end_pin_id) else {
            return;
        };
        let displaced: Vec<LinkId> = graph
            .links
            .iter()
            .filter(|l| l.end_pin_id == end_pin_id && l.id != link_id)
            .map(|l| l.id)
            .collect();

        if !displaced.is_empty() {
            self.remove_links_in(owner, &displaced);
            // Removing the old link restored a default; the input is linked again
            if let Some(pin) = self.asset_mut().sub_graph_mut(owner).and_then(|g| g.pin_mut(end_pin_id)) {
                pin.value = Value::Void;
            }
        }
        self.invalidate_player();
    }

    /// Remove a link of the active sub-graph
    pub fn remove_link(&mut self, link_id: LinkId) -> bool {
        self.remove_links(&[link_id])
    }

    /// Remove links of the active sub-graph
    pub fn remove_links(&mut self, link_ids: &[LinkId]) -> bool {
        let owner = self.current_owner();
        self.remove_links_in(owner, link_ids)
    }

    pub(crate) fn remove_links_in(&mut self, owner: NodeId, link_ids: &[LinkId]) -> bool {
        let Some(graph) = self.sub_graph(owner) else {
            return false;
        };
        let end_pins: Vec<PinId> = graph
            .links
            .iter()
            .filter(|l| link_ids.contains(&l.id))
            .map(|l| l.end_pin_id)
            .collect();
        if end_pins.is_empty() {
            return false;
        }

        for pin_id in end_pins {
            self.assign_some_default_value(owner, pin_id);
        }
        if let Some(graph) = self.asset_mut().sub_graph_mut(owner) {
            graph.links.retain(|l| !link_ids.contains(&l.id));
        }
        self.on_link_deleted(owner);
        true
    }

    pub(crate) fn on_link_deleted(&mut self, owner: NodeId) {
        self.invalidate_player();

        let owner_kind = self.asset().owner_kind(owner);
        if !(owner.is_root() || owner_kind == Some(NodeKind::State)) {
            return;
        }
        let Some(graph) = self.asset_mut().sub_graph_mut(owner) else {
            return;
        };
        let Some(pose_pin) = graph
            .find_node_by_name("Output")
            .and_then(|n| n.inputs.first())
            .map(|p| p.id)
        else {
            return;
        };
        if !graph.is_pin_linked(pose_pin) {
            // Unlinked output pose falls back to the bind pose
            if let Some(pin) = graph.pin_mut(pose_pin) {
                pin.value = Value::Int64(0);
            }
        }
    }
}
