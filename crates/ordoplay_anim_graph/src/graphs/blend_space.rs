// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blend space vertices.

use super::{blueprint, input, input_with};
use crate::factory::{GraphKind, NodeFactory};
use crate::pin::PinType;
use crate::value::Value;

/// Create the blend space node factory
pub fn create_blend_space_factory() -> NodeFactory {
    let mut factory = NodeFactory::new(GraphKind::BlendSpace);

    // Position lives in `Node::offset`
    factory.register("BlendSpace", "Blend Space Vertex", || {
        blueprint(
            "Blend Space Vertex",
            vec![
                input("Animation", PinType::AnimationAsset),
                input_with("Synchronize", PinType::Bool, Value::Bool(true)),
            ],
            vec![],
        )
    });

    factory
}
