// SPDX-License-Identifier: MIT OR Apache-2.0
//! State machine nodes: states, quick states and transitions.

use super::{blueprint, comment, input, subroutine};
use crate::factory::{GraphKind, NodeFactory};
use crate::node::{Node, NodeType};
use crate::pin::PinType;

/// Category shared by state machine nodes
pub const STATE_MACHINE_CATEGORY: &str = "StateMachine";

const STATE_COLOR: [u8; 3] = [143, 188, 143];
const QUICK_STATE_COLOR: [u8; 3] = [51, 150, 215];
const TRANSITION_COLOR: [u8; 3] = [200, 200, 200];

/// Create the state machine node factory
pub fn create_state_machine_factory() -> NodeFactory {
    let mut factory = NodeFactory::new(GraphKind::StateMachine);

    factory.register(STATE_MACHINE_CATEGORY, "State Machine", || subroutine("State Machine", vec![], vec![]));
    factory.register(STATE_MACHINE_CATEGORY, "State", || {
        let mut node = subroutine("State", vec![], vec![]);
        node.color = STATE_COLOR;
        node
    });
    factory.register(STATE_MACHINE_CATEGORY, "Quick State", || {
        let mut node = blueprint("Quick State", vec![input("Animation", PinType::AnimationAsset)], vec![]);
        node.color = QUICK_STATE_COLOR;
        node
    });
    factory.register("Utility", "Comment", comment);

    factory
}

/// Create a transition node; its pins are added when two states are linked
pub fn create_transition_node() -> Node {
    let mut node = Node::new("Transition", TRANSITION_COLOR).with_type(NodeType::Subroutine);
    node.category = STATE_MACHINE_CATEGORY.to_string();
    node
}
