// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transition condition graph nodes.

use super::{comment, common, event, input, simple, OUTPUT_COLOR};
use crate::factory::{GraphKind, NodeFactory};
use crate::pin::PinType;

/// Create the transition graph node factory
pub fn create_transition_factory() -> NodeFactory {
    let mut factory = NodeFactory::new(GraphKind::Transition);

    // Condition result
    factory.register("Transition", "Output", || {
        simple(
            "Output",
            OUTPUT_COLOR,
            vec![
                input("Transition", PinType::Bool),
                input("Synchronize", PinType::Bool),
                input("Duration", PinType::Float),
            ],
            vec![],
        )
    });
    factory.register("Transition", "Event", event);

    common::register_array_nodes(&mut factory);
    common::register_logic_nodes(&mut factory);
    common::register_math_nodes(&mut factory);
    common::register_trigger_nodes(&mut factory);

    factory.register("Utility", "Comment", comment);

    factory
}
