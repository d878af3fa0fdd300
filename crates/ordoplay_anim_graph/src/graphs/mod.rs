// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node registries for each kind of animation sub-graph.

pub mod animation;
pub mod blend_space;
pub mod common;
pub mod state_machine;
pub mod transition;

use crate::node::{Node, NodeType};
use crate::pin::{Pin, PinType};
use crate::value::Value;

pub(crate) const OUTPUT_COLOR: [u8; 3] = [255, 128, 128];
pub(crate) const EVENT_COLOR: [u8; 3] = [255, 160, 60];
pub(crate) const BLUEPRINT_COLOR: [u8; 3] = [54, 207, 145];
pub(crate) const SUBROUTINE_COLOR: [u8; 3] = [236, 158, 36];
pub(crate) const LOGIC_COLOR: [u8; 3] = [220, 48, 48];
pub(crate) const MATH_COLOR: [u8; 3] = [147, 226, 74];
pub(crate) const ARRAY_COLOR: [u8; 3] = [68, 201, 156];

pub(crate) fn input(name: &str, pin_type: PinType) -> Pin {
    Pin::input(name, pin_type)
}

pub(crate) fn input_with(name: &str, pin_type: PinType, value: Value) -> Pin {
    Pin::input(name, pin_type).with_value(value)
}

pub(crate) fn output(name: &str, pin_type: PinType) -> Pin {
    Pin::output(name, pin_type)
}

pub(crate) fn simple(name: &str, color: [u8; 3], inputs: Vec<Pin>, outputs: Vec<Pin>) -> Node {
    Node::new(name, color).with_inputs(inputs).with_outputs(outputs)
}

pub(crate) fn blueprint(name: &str, inputs: Vec<Pin>, outputs: Vec<Pin>) -> Node {
    simple(name, BLUEPRINT_COLOR, inputs, outputs).with_type(NodeType::Blueprint)
}

pub(crate) fn subroutine(name: &str, inputs: Vec<Pin>, outputs: Vec<Pin>) -> Node {
    simple(name, SUBROUTINE_COLOR, inputs, outputs).with_type(NodeType::Subroutine)
}

/// Comment box
pub(crate) fn comment() -> Node {
    Node::new("Comment", [255, 255, 255])
        .with_type(NodeType::Comment)
        .with_size(300.0, 200.0)
}

/// Event sink: fires the named graph event when triggered
pub(crate) fn event() -> Node {
    simple(
        "Event",
        EVENT_COLOR,
        vec![input("Trigger", PinType::Flow), input("Event ID", PinType::String)],
        vec![],
    )
}
