// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end editing and compilation scenarios.

use ordoplay_anim_graph::graphs::state_machine::STATE_MACHINE_CATEGORY;
use ordoplay_anim_graph::{
    AnimationGraphAsset, AnimationGraphModel, AssetCatalog, AssetType, CompileError, CompileSession, ConnectionEndpoint,
    ConnectionKind, Identifier, LinkQueryResult, NodeId, NodeKind, PropertyKind, PrototypeConnection, Value,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn model() -> AnimationGraphModel {
    init_tracing();
    let mut catalog = AssetCatalog::new();
    catalog.add_animation(11, "Idle");
    catalog.add_animation(12, "Walk");
    catalog.add_animation(4242, "Jump");
    catalog.add_skeleton(90, "Humanoid", &["pelvis", "spine", "head"]);
    let mut model = AnimationGraphModel::with_assets(AnimationGraphAsset::new("Character"), catalog);
    model.set_skeleton(90);
    model
}

fn link(model: &mut AnimationGraphModel, from: NodeId, output: usize, to: NodeId, input: usize) {
    let start = model.node(from).unwrap().outputs[output].id;
    let end = model.node(to).unwrap().inputs[input].id;
    assert_eq!(model.can_create_link(start, end), LinkQueryResult::CanConnect);
    model.create_link(start, end).unwrap();
}

fn set_input(model: &mut AnimationGraphModel, node: NodeId, input: usize, value: Value) {
    let pin = model.node(node).unwrap().inputs[input].id;
    assert!(model.set_pin_value(pin, value));
}

/// Output fed by an animation player playing `clip`
fn player_graph(model: &mut AnimationGraphModel, clip: u64) -> NodeId {
    let output = model.create_node("Animation", "Output").unwrap();
    let player = model.create_node("Animation", "Animation Player").unwrap();
    set_input(model, player, 0, Value::asset_handle(AssetType::Animation, clip));
    link(model, player, 0, output, 0);
    player
}

#[test]
fn test_empty_graph_needs_output() {
    let mut model = model();
    let report = model.pre_validate_graph();
    assert_eq!(report.errors, vec!["Animation graph must have an 'Output' node".to_string()]);
    assert!(report.warnings.is_empty());

    let error = model.compile(&mut CompileSession::new()).unwrap_err();
    match error {
        CompileError::InvalidGraph(errors) => assert_eq!(
            errors,
            vec![
                "Graph is invalid.".to_string(),
                "Animation graph must have an 'Output' node".to_string(),
            ]
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert!(model.asset().prototype.is_none());
}

#[test]
fn test_entry_state_follows_states() {
    let mut model = model();
    let machine = model.create_node("Animation", "State Machine").unwrap();
    model.enter_node(machine);

    let first = model.create_node(STATE_MACHINE_CATEGORY, "State").unwrap();
    model.ensure_entry_state();
    assert!(model.node(first).unwrap().is_entry_state);

    let second = model.create_node(STATE_MACHINE_CATEGORY, "State").unwrap();
    model.ensure_entry_state();
    assert!(model.node(first).unwrap().is_entry_state);
    assert!(!model.node(second).unwrap().is_entry_state);

    assert!(model.remove_node(first));
    assert!(model.node(second).unwrap().is_entry_state);
}

#[test]
fn test_duplicate_blend_space_vertices() {
    let mut model = model();
    let output = model.create_node("Animation", "Output").unwrap();
    let space = model.create_node("Blend", "Blend Space").unwrap();
    link(&mut model, space, 0, output, 0);

    model.enter_node(space);
    assert_eq!(model.asset().owner_kind(space), Some(NodeKind::BlendSpace));
    let _ = model.create_node("BlendSpace", "Blend Space Vertex").unwrap();
    let moved = model.create_node("BlendSpace", "Blend Space Vertex").unwrap();

    let has_duplicates = |model: &AnimationGraphModel| {
        model
            .pre_validate_graph()
            .errors
            .iter()
            .any(|e| e.contains("duplicate vertices"))
    };
    assert!(has_duplicates(&model));

    model.node_mut(moved).unwrap().offset = [0.25, 0.0];
    assert!(!has_duplicates(&model));
}

#[test]
fn test_asset_handle_becomes_int64_plug() {
    let mut model = model();
    let player = player_graph(&mut model, 4242);
    model.compile(&mut CompileSession::new()).unwrap();

    let prototype = model.asset().prototype.as_ref().unwrap();
    let node = prototype.node(player).unwrap();
    let animation = node
        .default_value_plugs
        .iter()
        .find(|p| p.id == Identifier::from_name("Animation"))
        .unwrap();
    assert_eq!(animation.default_value, Value::Int64(4242));
}

#[test]
fn test_link_compatibility() {
    let mut model = model();
    let a = model.create_node("Math", "Add (Float)").unwrap();
    let b = model.create_node("Math", "Add (Float)").unwrap();
    let player = model.create_node("Animation", "Animation Player").unwrap();
    let get = model.create_node("Array", "Get (Float)").unwrap();

    let a_out = model.node(a).unwrap().outputs[0].id;
    let a_in = model.node(a).unwrap().inputs[0].id;
    let b_out = model.node(b).unwrap().outputs[0].id;
    let b_in = model.node(b).unwrap().inputs[0].id;
    let looping = model.node(player).unwrap().inputs[3].id;
    let array = model.node(get).unwrap().inputs[0].id;

    assert_eq!(model.can_create_link(a_out, a_out), LinkQueryResult::SamePin);
    assert_eq!(model.can_create_link(a_out, a_in), LinkQueryResult::SameNode);
    assert_eq!(model.can_create_link(a_out, b_out), LinkQueryResult::IncompatiblePinKind);
    assert_eq!(model.can_create_link(a_in, b_in), LinkQueryResult::IncompatiblePinKind);
    assert_eq!(model.can_create_link(a_out, array), LinkQueryResult::IncompatibleStorageKind);
    assert_eq!(model.can_create_link(a_out, looping), LinkQueryResult::IncompatibleType);
    assert_eq!(model.can_create_link(a_out, b_in), LinkQueryResult::CanConnect);
    assert!(model.links().is_empty());
}

#[test]
fn test_relinking_replaces_incoming_link() {
    let mut model = model();
    let player = player_graph(&mut model, 11);
    let first = model.create_node("Math", "Add (Float)").unwrap();
    let second = model.create_node("Math", "Multiply (Float)").unwrap();
    link(&mut model, first, 0, player, 1);
    link(&mut model, second, 0, player, 1);

    let speed = model.node(player).unwrap().inputs[1].id;
    let second_out = model.node(second).unwrap().outputs[0].id;
    let incoming: Vec<_> = model.links().iter().filter(|l| l.end_pin_id == speed).collect();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].start_pin_id, second_out);
    assert!(model.find_pin(speed).unwrap().value.is_void());
}

#[test]
fn test_local_variable_aliasing() {
    let mut model = model();
    let player = player_graph(&mut model, 11);
    let name = model.add_property_to_graph(PropertyKind::LocalVariable, Value::Float32(1.0));
    let name = name.as_str();

    let source = model.create_node("Math", "Add (Float)").unwrap();
    let offset = model.create_node("Math", "Multiply (Float)").unwrap();
    let setter = model.spawn_local_variable_node(name, false).unwrap();
    let speed_getter = model.spawn_local_variable_node(name, true).unwrap();
    let offset_getter = model.spawn_local_variable_node(name, true).unwrap();
    assert!(model.spawn_local_variable_node(name, false).is_none());

    link(&mut model, source, 0, setter, 0);
    link(&mut model, speed_getter, 0, player, 1);
    link(&mut model, offset_getter, 0, offset, 0);
    link(&mut model, offset, 0, player, 2);

    model.compile(&mut CompileSession::new()).unwrap();

    let index = model.node(setter).unwrap().sort_index;
    assert!(index >= 0);
    assert_eq!(model.node(speed_getter).unwrap().sort_index, index);
    assert_eq!(model.node(offset_getter).unwrap().sort_index, index);
    assert!(model.node(source).unwrap().sort_index < index);
    assert!(model.node(offset).unwrap().sort_index > index);

    let prototype = model.asset().prototype.as_ref().unwrap();
    for id in [setter, speed_getter, offset_getter] {
        assert!(prototype.node(id).is_none());
    }
    assert_eq!(prototype.nodes.len(), 3);
    assert!(prototype
        .connections
        .iter()
        .filter(|c| c.destination.node_id == player || c.destination.node_id == offset)
        .filter(|c| c.kind == ConnectionKind::NodeValueToNodeValue)
        .any(|c| c.source.node_id == source));
    assert!(prototype.connections.iter().all(|c| c.kind != ConnectionKind::LocalVariableToNodeValue));
}

/// Compile, failing on any validation or parse error
fn compile(model: &mut AnimationGraphModel) -> Vec<PrototypeConnection> {
    model.compile(&mut CompileSession::new()).unwrap();
    model.asset().prototype.as_ref().unwrap().connections.clone()
}

#[test]
fn test_graph_input_feeds_graph_output() {
    let mut model = model();
    let name = model.add_property_to_graph(PropertyKind::Input, Value::Int64(0));
    assert_eq!(name, "New Input");
    let input = model.spawn_graph_input_node(&name).unwrap();
    let output = model.create_node("Animation", "Output").unwrap();
    link(&mut model, input, 0, output, 0);

    let connections = compile(&mut model);
    let proto_id = model.asset().prototype.as_ref().unwrap().id;
    assert_eq!(
        connections,
        vec![PrototypeConnection {
            source: ConnectionEndpoint::new(proto_id, Identifier::from_name("NewInput")),
            destination: ConnectionEndpoint::new(NodeId::ROOT, Identifier::from_name("Pose")),
            kind: ConnectionKind::GraphValueToGraphValue,
        }]
    );
}

#[test]
fn test_graph_trigger_raises_graph_event() {
    let mut model = model();
    player_graph(&mut model, 11);
    let name = model.add_property_to_graph(PropertyKind::Input, Value::flow());
    let input = model.spawn_graph_input_node(&name).unwrap();
    let event = model.create_node("Animation", "Event").unwrap();
    set_input(&mut model, event, 1, Value::String("Footstep".to_string()));
    link(&mut model, input, 0, event, 0);

    let connections = compile(&mut model);
    let proto_id = model.asset().prototype.as_ref().unwrap().id;
    let raised: Vec<_> = connections
        .iter()
        .filter(|c| c.kind == ConnectionKind::GraphEventToGraphEvent)
        .collect();
    assert_eq!(
        raised,
        vec![&PrototypeConnection {
            source: ConnectionEndpoint::new(proto_id, Identifier::from_name("NewInput")),
            destination: ConnectionEndpoint::new(proto_id, Identifier::from_name("Trigger")),
            kind: ConnectionKind::GraphEventToGraphEvent,
        }]
    );
}

#[test]
fn test_graph_trigger_fires_node_event() {
    let mut model = model();
    player_graph(&mut model, 11);
    let name = model.add_property_to_graph(PropertyKind::Input, Value::flow());
    let input = model.spawn_graph_input_node(&name).unwrap();
    let trigger = model.create_node("Trigger", "Bool Trigger").unwrap();
    let event = model.create_node("Animation", "Event").unwrap();
    set_input(&mut model, trigger, 1, Value::Bool(true));
    set_input(&mut model, event, 1, Value::String("Land".to_string()));
    link(&mut model, input, 0, trigger, 0);
    link(&mut model, trigger, 0, event, 0);

    let connections = compile(&mut model);
    let proto_id = model.asset().prototype.as_ref().unwrap().id;
    assert!(connections.contains(&PrototypeConnection {
        source: ConnectionEndpoint::new(proto_id, Identifier::from_name("NewInput")),
        destination: ConnectionEndpoint::new(trigger, Identifier::from_name("Trigger")),
        kind: ConnectionKind::GraphEventToNodeEvent,
    }));
    assert!(connections.contains(&PrototypeConnection {
        source: ConnectionEndpoint::new(trigger, Identifier::from_name("True")),
        destination: ConnectionEndpoint::new(proto_id, Identifier::from_name("Land")),
        kind: ConnectionKind::NodeEventToGraphEvent,
    }));
}

#[test]
fn test_setterless_variable_feeds_graph_output() {
    let mut model = model();
    let name = model.add_property_to_graph(PropertyKind::LocalVariable, Value::Int64(0));
    assert_eq!(name, "New Variable");
    let getter = model.spawn_local_variable_node(&name, true).unwrap();
    let output = model.create_node("Animation", "Output").unwrap();
    link(&mut model, getter, 0, output, 0);

    let connections = compile(&mut model);
    let prototype = model.asset().prototype.as_ref().unwrap();
    let variable = Identifier::from_name("NewVariable");
    assert_eq!(
        connections,
        vec![PrototypeConnection {
            source: ConnectionEndpoint::new(prototype.id, variable),
            destination: ConnectionEndpoint::new(NodeId::ROOT, Identifier::from_name("Pose")),
            kind: ConnectionKind::LocalVariableToGraphValue,
        }]
    );
    assert!(prototype.local_variable_plugs.iter().any(|plug| plug.id == variable));
}

#[test]
fn test_compile_is_deterministic() {
    let mut model = model();
    let player = player_graph(&mut model, 12);
    let speed = model.create_node("Math", "Clamp (Float)").unwrap();
    let scale = model.create_node("Math", "Multiply (Float)").unwrap();
    link(&mut model, scale, 0, speed, 0);
    link(&mut model, speed, 0, player, 1);
    let _orphan = model.create_node("Math", "Add (Float)").unwrap();

    model.compile(&mut CompileSession::new()).unwrap();
    let first = model.asset().prototype.as_ref().unwrap().to_bytes().unwrap();
    let first_ron = model.serialize().unwrap();

    model.compile(&mut CompileSession::new()).unwrap();
    let second = model.asset().prototype.as_ref().unwrap().to_bytes().unwrap();
    assert_eq!(first, second);
    assert_eq!(model.serialize().unwrap(), first_ron);

    // The orphan is never compiled
    assert_eq!(model.asset().prototype.as_ref().unwrap().nodes.len(), 3);
}

#[test]
fn test_failed_compile_keeps_previous_prototype() {
    let mut model = model();
    let player = player_graph(&mut model, 11);
    model.compile(&mut CompileSession::new()).unwrap();
    let previous = model.asset().prototype.clone();
    assert!(previous.is_some());

    set_input(&mut model, player, 0, Value::asset_handle(AssetType::Animation, 77));
    assert!(model.is_player_dirty());
    let error = model.compile(&mut CompileSession::new()).unwrap_err();
    let CompileError::InvalidGraph(errors) = error else {
        panic!("expected validation errors");
    };
    assert!(errors.contains(&"Node 'Animation Player': Animation asset is not valid".to_string()));
    assert_eq!(model.asset().prototype, previous);
    assert!(model.is_player_dirty());
}

#[test]
fn test_state_machine_with_transition() {
    let mut model = model();
    let output = model.create_node("Animation", "Output").unwrap();
    let machine = model.create_node("Animation", "State Machine").unwrap();
    link(&mut model, machine, 0, output, 0);

    model.enter_node(machine);
    let idle = model.create_node(STATE_MACHINE_CATEGORY, "Quick State").unwrap();
    let walk = model.create_node(STATE_MACHINE_CATEGORY, "Quick State").unwrap();
    set_input(&mut model, idle, 0, Value::asset_handle(AssetType::Animation, 11));
    set_input(&mut model, walk, 0, Value::asset_handle(AssetType::Animation, 12));
    assert_eq!(model.node(idle).unwrap().description, "Idle");
    let transition = model.create_transition(idle, walk).unwrap();

    // A transition whose condition is never set cannot fire
    model.set_current_path(None);
    let errors = model.pre_validate_graph().errors;
    assert!(errors.contains(&"Node 'Transition': Transition will never occur.".to_string()));

    model.set_current_path(Some(machine));
    model.enter_node(transition);
    let condition = model.nodes()[0].inputs[0].id;
    assert!(model.set_pin_value(condition, Value::Bool(true)));
    model.set_current_path(None);

    let mut session = CompileSession::new();
    model.compile(&mut session).unwrap();
    assert!(session.warnings().is_empty());

    let prototype = model.asset().prototype.as_ref().unwrap();
    let machine_proto = prototype.node(machine).unwrap().subroutine.as_deref().unwrap();
    let order: Vec<NodeId> = machine_proto.nodes.iter().map(|n| n.id).collect();
    assert_eq!(order[0], idle);
    assert_eq!(order.len(), 3);
    assert!(machine_proto
        .connections
        .iter()
        .all(|c| c.kind == ConnectionKind::NodeEventToNodeEvent));
    assert_eq!(machine_proto.connections.len(), 2);

    let transition_proto = machine_proto.node(transition).unwrap().subroutine.as_deref().unwrap();
    assert_eq!(transition_proto.debug_name, "Transition");
    assert_eq!(transition_proto.outputs[0].id, Identifier::from_name("Transition"));
    assert_eq!(transition_proto.outputs[0].default_value, Value::Bool(true));
    assert!(transition_proto.nodes.is_empty());
}
