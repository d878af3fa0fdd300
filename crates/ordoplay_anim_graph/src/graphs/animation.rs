// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation graph nodes.
//!
//! Used for the top-level graph and for the bodies of states, conditional
//! blends and one shots.

use super::{blueprint, comment, event, input, input_with, output, simple, subroutine, OUTPUT_COLOR};
use super::common;
use crate::factory::{GraphKind, NodeFactory};
use crate::pin::PinType;
use crate::value::Value;

/// Create the animation graph node factory
pub fn create_animation_factory() -> NodeFactory {
    let mut factory = NodeFactory::new(GraphKind::Animation);

    // Graph output
    factory.register("Animation", "Output", || {
        simple("Output", OUTPUT_COLOR, vec![input("Pose", PinType::Pose)], vec![])
    });
    factory.register("Animation", "Event", event);

    // Clip playback
    factory.register("Animation", "Animation Player", || {
        blueprint(
            "Animation Player",
            vec![
                input("Animation", PinType::AnimationAsset),
                input_with("Playback Speed", PinType::Float, Value::Float32(1.0)),
                input("Offset", PinType::Float),
                input_with("Loop", PinType::Bool, Value::Bool(true)),
            ],
            vec![
                output("Pose", PinType::Pose),
                output("On Finish", PinType::Flow),
                output("On Loop", PinType::Flow),
            ],
        )
    });
    factory.register("Animation", "Sample Animation", || {
        blueprint(
            "Sample Animation",
            vec![
                input("Animation", PinType::AnimationAsset),
                input("Animation Time", PinType::Float),
            ],
            vec![output("Pose", PinType::Pose)],
        )
    });
    factory.register("Animation", "State Machine", || {
        subroutine("State Machine", vec![], vec![output("Pose", PinType::Pose)])
    });

    // Arrays
    common::register_array_nodes(&mut factory);
    factory.register("Array", "Get Animation", || {
        simple(
            "Get Animation",
            super::ARRAY_COLOR,
            vec![input("Array", PinType::AnimationAsset).array(), input("Index", PinType::Int)],
            vec![output("Element", PinType::AnimationAsset)],
        )
    });
    factory.register("Array", "Get Random Animation", || {
        blueprint(
            "Get Random Animation",
            vec![
                input("Next", PinType::Flow),
                input("Reset", PinType::Flow),
                input("Array", PinType::AnimationAsset).array(),
                input_with("No Repeats", PinType::Bool, Value::Bool(true)),
                input_with("Seed", PinType::Int, Value::Int32(-1)),
            ],
            vec![output("On Next", PinType::Flow), output("Selected", PinType::AnimationAsset)],
        )
    });

    // Blending
    factory.register("Blend", "Blend Space", || {
        subroutine(
            "Blend Space",
            vec![input("X", PinType::Float), input("Y", PinType::Float)],
            vec![output("Pose", PinType::Pose)],
        )
    });
    factory.register("Blend", "Conditional Blend", || {
        subroutine(
            "Conditional Blend",
            vec![
                input("Base Pose", PinType::Pose),
                input("Condition", PinType::Bool),
                input_with("Weight", PinType::Float, Value::Float32(1.0)),
                input("Blend Root Bone", PinType::Bone),
                input_with("Blend In Duration", PinType::Float, Value::Float32(0.1)),
                input_with("Blend Out Duration", PinType::Float, Value::Float32(0.1)),
            ],
            vec![output("Pose", PinType::Pose)],
        )
    });
    factory.register("Blend", "One Shot", || {
        subroutine(
            "One Shot",
            vec![
                input("Trigger", PinType::Flow),
                input("Base Pose", PinType::Pose),
                input_with("Weight", PinType::Float, Value::Float32(1.0)),
                input("Blend Root Bone", PinType::Bone),
                input_with("Blend In Duration", PinType::Float, Value::Float32(0.1)),
                input_with("Blend Out Duration", PinType::Float, Value::Float32(0.1)),
            ],
            vec![output("Pose", PinType::Pose), output("On Finish", PinType::Flow)],
        )
    });
    factory.register("Blend", "Pose Blend", || {
        blueprint(
            "Pose Blend",
            vec![
                input("Pose A", PinType::Pose),
                input("Pose B", PinType::Pose),
                input_with("Weight", PinType::Float, Value::Float32(0.5)),
                input("Blend Root Bone", PinType::Bone),
            ],
            vec![output("Pose", PinType::Pose)],
        )
    });
    factory.register("Blend", "Ranged Blend", || {
        blueprint(
            "Ranged Blend",
            vec![
                input("Animation A", PinType::AnimationAsset),
                input("Animation B", PinType::AnimationAsset),
                input_with("Playback Speed A", PinType::Float, Value::Float32(1.0)),
                input_with("Playback Speed B", PinType::Float, Value::Float32(1.0)),
                input_with("Synchronize", PinType::Bool, Value::Bool(true)),
                input("Offset A", PinType::Float),
                input("Offset B", PinType::Float),
                input_with("Loop", PinType::Bool, Value::Bool(true)),
                input("Range A", PinType::Float),
                input_with("Range B", PinType::Float, Value::Float32(1.0)),
                input("Value", PinType::Float),
            ],
            vec![output("Pose", PinType::Pose)],
        )
    });

    // Inverse kinematics
    factory.register("Inverse Kinematics", "Aim IK", || {
        blueprint(
            "Aim IK",
            vec![
                input("Pose", PinType::Pose),
                input("Target", PinType::Vec3),
                input_with("Weight", PinType::Float, Value::Float32(1.0)),
                input("Bone", PinType::Bone),
                input("Aim Offset", PinType::Vec3),
                input_with("Aim Axis", PinType::Vec3, Value::Vec3([0.0, 0.0, 1.0])),
                input_with("Pole Vector", PinType::Vec3, Value::Vec3([0.0, 1.0, 0.0])),
                input_with("Chain Length", PinType::Int, Value::Int32(2)),
                input_with("Chain Factor", PinType::Float, Value::Float32(0.5)),
            ],
            vec![output("Pose", PinType::Pose)],
        )
    });

    common::register_logic_nodes(&mut factory);
    common::register_math_nodes(&mut factory);
    common::register_trigger_nodes(&mut factory);

    factory.register("Utility", "Comment", comment);

    factory
}
