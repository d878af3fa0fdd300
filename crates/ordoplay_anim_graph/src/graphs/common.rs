// SPDX-License-Identifier: MIT OR Apache-2.0
//! Logic, math, array and trigger nodes shared by animation and transition graphs.

use super::{blueprint, input, input_with, output, simple, ARRAY_COLOR, LOGIC_COLOR, MATH_COLOR};
use crate::factory::NodeFactory;
use crate::node::Node;
use crate::pin::PinType;
use crate::value::Value;

fn binary(name: &str, color: [u8; 3], operand: PinType, result: PinType) -> Node {
    simple(
        name,
        color,
        vec![input("Value 1", operand), input("Value 2", operand)],
        vec![output("Out", result)],
    )
}

fn array_get(name: &str, element: PinType) -> Node {
    simple(
        name,
        ARRAY_COLOR,
        vec![input("Array", element).array(), input("Index", PinType::Int)],
        vec![output("Element", element)],
    )
}

/// Register the array access nodes
pub fn register_array_nodes(factory: &mut NodeFactory) {
    factory.register("Array", "Get (Float)", || array_get("Get (Float)", PinType::Float));
    factory.register("Array", "Get (Int)", || array_get("Get (Int)", PinType::Int));
}

/// Register comparison and boolean nodes
pub fn register_logic_nodes(factory: &mut NodeFactory) {
    factory.register("Logic", "Check Equal (Float)", || {
        binary("Check Equal (Float)", LOGIC_COLOR, PinType::Float, PinType::Bool)
    });
    factory.register("Logic", "Check Not Equal (Float)", || {
        binary("Check Not Equal (Float)", LOGIC_COLOR, PinType::Float, PinType::Bool)
    });
    factory.register("Logic", "Check Less (Float)", || {
        binary("Check Less (Float)", LOGIC_COLOR, PinType::Float, PinType::Bool)
    });
    factory.register("Logic", "Check Less Equal (Float)", || {
        binary("Check Less Equal (Float)", LOGIC_COLOR, PinType::Float, PinType::Bool)
    });
    factory.register("Logic", "Check Greater (Float)", || {
        binary("Check Greater (Float)", LOGIC_COLOR, PinType::Float, PinType::Bool)
    });
    factory.register("Logic", "Check Greater Equal (Float)", || {
        binary("Check Greater Equal (Float)", LOGIC_COLOR, PinType::Float, PinType::Bool)
    });
    factory.register("Logic", "Check Equal (Int)", || {
        binary("Check Equal (Int)", LOGIC_COLOR, PinType::Int, PinType::Bool)
    });
    factory.register("Logic", "Check Not Equal (Int)", || {
        binary("Check Not Equal (Int)", LOGIC_COLOR, PinType::Int, PinType::Bool)
    });
    factory.register("Logic", "Check Less (Int)", || {
        binary("Check Less (Int)", LOGIC_COLOR, PinType::Int, PinType::Bool)
    });
    factory.register("Logic", "Check Less Equal (Int)", || {
        binary("Check Less Equal (Int)", LOGIC_COLOR, PinType::Int, PinType::Bool)
    });
    factory.register("Logic", "Check Greater (Int)", || {
        binary("Check Greater (Int)", LOGIC_COLOR, PinType::Int, PinType::Bool)
    });
    factory.register("Logic", "Check Greater Equal (Int)", || {
        binary("Check Greater Equal (Int)", LOGIC_COLOR, PinType::Int, PinType::Bool)
    });
    factory.register("Logic", "And", || binary("And", LOGIC_COLOR, PinType::Bool, PinType::Bool));
    factory.register("Logic", "Or", || binary("Or", LOGIC_COLOR, PinType::Bool, PinType::Bool));
    factory.register("Logic", "Not", || {
        simple("Not", LOGIC_COLOR, vec![input("Value", PinType::Bool)], vec![output("Out", PinType::Bool)])
    });
}

/// Register arithmetic nodes
pub fn register_math_nodes(factory: &mut NodeFactory) {
    // Float
    factory.register("Math", "Add (Float)", || binary("Add (Float)", MATH_COLOR, PinType::Float, PinType::Float));
    factory.register("Math", "Subtract (Float)", || {
        binary("Subtract (Float)", MATH_COLOR, PinType::Float, PinType::Float)
    });
    factory.register("Math", "Multiply (Float)", || {
        binary("Multiply (Float)", MATH_COLOR, PinType::Float, PinType::Float)
    });
    factory.register("Math", "Divide (Float)", || {
        simple(
            "Divide (Float)",
            MATH_COLOR,
            vec![
                input("Value", PinType::Float),
                input_with("Divisor", PinType::Float, Value::Float32(1.0)),
            ],
            vec![output("Out", PinType::Float)],
        )
    });
    factory.register("Math", "Min (Float)", || binary("Min (Float)", MATH_COLOR, PinType::Float, PinType::Float));
    factory.register("Math", "Max (Float)", || binary("Max (Float)", MATH_COLOR, PinType::Float, PinType::Float));
    factory.register("Math", "Clamp (Float)", || {
        simple(
            "Clamp (Float)",
            MATH_COLOR,
            vec![
                input("In", PinType::Float),
                input("Min", PinType::Float),
                input_with("Max", PinType::Float, Value::Float32(1.0)),
            ],
            vec![output("Out", PinType::Float)],
        )
    });
    factory.register("Math", "Map Range (Float)", || {
        simple(
            "Map Range (Float)",
            MATH_COLOR,
            vec![
                input("In", PinType::Float),
                input("In Range Min", PinType::Float),
                input_with("In Range Max", PinType::Float, Value::Float32(1.0)),
                input("Out Range Min", PinType::Float),
                input_with("Out Range Max", PinType::Float, Value::Float32(1.0)),
                input_with("Clamped", PinType::Bool, Value::Bool(true)),
            ],
            vec![output("Out", PinType::Float)],
        )
    });
    factory.register("Math", "Log", || {
        simple(
            "Log",
            MATH_COLOR,
            vec![
                input_with("Base", PinType::Float, Value::Float32(std::f32::consts::E)),
                input_with("Value", PinType::Float, Value::Float32(1.0)),
            ],
            vec![output("Out", PinType::Float)],
        )
    });
    factory.register("Math", "Power", || {
        simple(
            "Power",
            MATH_COLOR,
            vec![
                input("Base", PinType::Float),
                input_with("Exponent", PinType::Float, Value::Float32(1.0)),
            ],
            vec![output("Out", PinType::Float)],
        )
    });

    // Int
    factory.register("Math", "Add (Int)", || binary("Add (Int)", MATH_COLOR, PinType::Int, PinType::Int));
    factory.register("Math", "Subtract (Int)", || binary("Subtract (Int)", MATH_COLOR, PinType::Int, PinType::Int));
    factory.register("Math", "Multiply (Int)", || binary("Multiply (Int)", MATH_COLOR, PinType::Int, PinType::Int));
    factory.register("Math", "Divide (Int)", || {
        simple(
            "Divide (Int)",
            MATH_COLOR,
            vec![input("Value", PinType::Int), input_with("Divisor", PinType::Int, Value::Int32(1))],
            vec![output("Out", PinType::Int)],
        )
    });
    factory.register("Math", "Min (Int)", || binary("Min (Int)", MATH_COLOR, PinType::Int, PinType::Int));
    factory.register("Math", "Max (Int)", || binary("Max (Int)", MATH_COLOR, PinType::Int, PinType::Int));
    factory.register("Math", "Modulo", || {
        simple(
            "Modulo",
            MATH_COLOR,
            vec![input("Value", PinType::Int), input_with("Modulo", PinType::Int, Value::Int32(1))],
            vec![output("Out", PinType::Int)],
        )
    });
}

/// Register trigger helpers
pub fn register_trigger_nodes(factory: &mut NodeFactory) {
    factory.register("Trigger", "Bool Trigger", || {
        blueprint(
            "Bool Trigger",
            vec![input("Trigger", PinType::Flow), input("Value", PinType::Bool)],
            vec![output("True", PinType::Flow), output("False", PinType::Flow)],
        )
    });
}
