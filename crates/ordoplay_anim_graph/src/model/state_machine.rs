// SPDX-License-Identifier: MIT OR Apache-2.0
//! State machine editing: transitions, entry states and quick state promotion.

use super::AnimationGraphModel;
use crate::factory::GraphKind;
use crate::graphs::state_machine::{self, STATE_MACHINE_CATEGORY};
use crate::node::{NodeId, NodeKind};
use crate::pin::{Pin, PinType};

impl AnimationGraphModel {
    fn current_state_machine(&self) -> Option<NodeId> {
        let owner = self.current_owner();
        if self.asset().owner_kind(owner) == Some(NodeKind::StateMachine) {
            Some(owner)
        } else {
            tracing::error!("The active graph is not a state machine");
            None
        }
    }

    /// Create an unconnected transition node in the active state machine
    pub fn create_transition_node(&mut self) -> Option<NodeId> {
        let owner = self.current_state_machine()?;
        Some(self.add_node(owner, state_machine::create_transition_node()))
    }

    /// Connect two states of the active state machine through a new transition
    pub fn create_transition(&mut self, from: NodeId, to: NodeId) -> Option<NodeId> {
        let owner = self.current_state_machine()?;
        let graph = self.sub_graph(owner)?;
        let is_state = |id| graph.node(id).is_some_and(|n| !n.is_comment() && n.kind() != NodeKind::Transition);
        if from == to || !is_state(from) || !is_state(to) {
            tracing::warn!("Transitions can only connect two different states");
            return None;
        }
        let midpoint = match (graph.node(from), graph.node(to)) {
            (Some(a), Some(b)) => [(a.position[0] + b.position[0]) * 0.5, (a.position[1] + b.position[1]) * 0.5],
            _ => [0.0, 0.0],
        };

        let transition = self.create_transition_node()?;
        self.ensure_sub_graph(transition);

        let flow = |node_id, output: bool| {
            let mut pin = if output {
                Pin::output("Transition", PinType::Flow)
            } else {
                Pin::input("Transition", PinType::Flow)
            };
            pin.node_id = node_id;
            pin
        };
        let from_out = flow(from, true);
        let transition_in = flow(transition, false);
        let transition_out = flow(transition, true);
        let to_in = flow(to, false);
        let ids = (from_out.id, transition_in.id, transition_out.id, to_in.id);

        let graph = self.asset_mut().sub_graph_mut(owner)?;
        graph.node_mut(from)?.outputs.push(from_out);
        graph.node_mut(to)?.inputs.push(to_in);
        let node = graph.node_mut(transition)?;
        node.inputs.push(transition_in);
        node.outputs.push(transition_out);
        node.position = midpoint;

        self.create_link_in(owner, ids.0, ids.1)?;
        self.create_link_in(owner, ids.2, ids.3)?;
        Some(transition)
    }

    /// Make sure the active state machine has an entry state
    pub fn ensure_entry_state(&mut self) {
        let owner = self.current_owner();
        self.ensure_entry_state_in(owner);
    }

    pub(crate) fn ensure_entry_state_in(&mut self, owner: NodeId) {
        let Some(graph) = self.asset_mut().sub_graph_mut(owner) else {
            return;
        };
        if graph.nodes.iter().any(|n| n.is_entry_state) {
            return;
        }
        if let Some(node) = graph
            .nodes
            .iter_mut()
            .find(|n| !n.is_comment() && n.kind() != NodeKind::Transition)
        {
            tracing::debug!("'{}' is now the entry state", node.description);
            node.is_entry_state = true;
        }
    }

    /// Make sure every state machine has an entry state
    pub fn ensure_entry_states(&mut self) {
        let machines: Vec<NodeId> = self
            .asset()
            .owners()
            .into_iter()
            .filter(|owner| self.asset().owner_kind(*owner) == Some(NodeKind::StateMachine))
            .collect();
        for owner in machines {
            self.ensure_entry_state_in(owner);
        }
    }

    /// Replace a quick state with a full state playing the same clip.
    ///
    /// The state takes over the quick state's ID, entry flag and transition
    /// pins, so existing transitions stay connected.
    pub fn promote_quick_state_to_state(&mut self, node_id: NodeId) -> Option<NodeId> {
        let owner = self.current_state_machine()?;
        let quick = self.sub_graph(owner)?.node(node_id)?.clone();
        if quick.kind() != NodeKind::QuickState {
            tracing::warn!("'{}' is not a quick state", quick.description);
            return None;
        }
        let animation = quick.input_named("Animation").map(|p| p.value.clone());

        let mut state = self
            .factories()
            .get(GraphKind::StateMachine)
            .spawn_node(STATE_MACHINE_CATEGORY, "State")?;
        state.position = quick.position;
        state.is_entry_state = quick.is_entry_state;
        state.inputs = quick.inputs.iter().filter(|p| p.is_flow()).cloned().collect();
        state.outputs = quick.outputs.iter().filter(|p| p.is_flow()).cloned().collect();
        state.set_id(quick.id);

        let graph = self.asset_mut().sub_graph_mut(owner)?;
        let position = graph.node_position(node_id)?;
        graph.nodes[position] = state;
        let stale: Vec<_> = graph
            .links
            .iter()
            .filter(|l| graph.pin(l.start_pin_id).is_none() || graph.pin(l.end_pin_id).is_none())
            .map(|l| l.id)
            .collect();
        graph.links.retain(|l| !stale.contains(&l.id));

        self.ensure_sub_graph(node_id);
        let mut player = self
            .factories()
            .get(GraphKind::Animation)
            .spawn_node("Animation", "Animation Player")?;
        if let (Some(pin), Some(value)) = (player.inputs.first_mut(), animation) {
            pin.value = value;
        }
        let pose_out = player.output_named("Pose")?.id;
        let body = self.asset_mut().sub_graph_mut(node_id)?;
        let pose_in = body.find_node_by_name("Output")?.inputs.first()?.id;
        body.nodes.push(player);
        self.create_link_in(node_id, pose_out, pose_in)?;

        self.invalidate_player();
        Some(node_id)
    }
}
