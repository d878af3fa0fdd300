// SPDX-License-Identifier: MIT OR Apache-2.0
//! Lowering of a sorted animation graph into a [`Prototype`] tree.
//!
//! Compilation validates the whole graph first and stops on any error.
//! A valid graph is parsed sub-graph by sub-graph: graph outputs and inputs
//! become prototype endpoints, nodes become prototype nodes carrying the
//! literal values of their unconnected inputs, and links become flat
//! connections. Property nodes and local variables never turn into runtime
//! nodes; links through them are rerouted to the real producer.

use crate::error::{CompileError, ParseError, Result};
use crate::graph::SubGraph;
use crate::identifier::{endpoint_name, Identifier};
use crate::model::AnimationGraphModel;
use crate::node::{Node, NodeId, NodeKind};
use crate::pin::Pin;
use crate::prototype::{ConnectionEndpoint, ConnectionKind, Endpoint, Prototype, PrototypeConnection, PrototypeNode};
use crate::value::Value;
use indexmap::IndexMap;

/// Node names handled as graph boundaries rather than runtime nodes
const BOUNDARY_NODE_NAMES: &[&str] = &["Input Action", "Input", "Output", "Event"];

/// State kept for one compile: identifier names and non-fatal warnings
#[derive(Debug, Default)]
pub struct CompileSession {
    names: IndexMap<Identifier, String>,
    warnings: Vec<String>,
}

impl CompileSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a name and remember it for display
    pub fn register_identifier(&mut self, name: &str) -> Identifier {
        let id = Identifier::from_name(name);
        self.names.entry(id).or_insert_with(|| name.to_string());
        id
    }

    /// Display name of a registered identifier
    pub fn name_of(&self, id: Identifier) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Warnings raised so far
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Validate a sorted graph and build its prototype.
///
/// Validation warnings go to the session. Nothing is built if validation
/// reports an error; the returned error lists every problem after a
/// `"Graph is invalid."` header.
pub fn construct_prototype(model: &AnimationGraphModel, session: &mut CompileSession) -> Result<Prototype> {
    let report = model.pre_validate_graph();
    for warning in report.warnings {
        session.warn(warning);
    }
    if !report.errors.is_empty() {
        let mut errors = Vec::with_capacity(report.errors.len() + 1);
        errors.push("Graph is invalid.".to_string());
        errors.extend(report.errors);
        tracing::error!("{}", errors.join("\n"));
        return Err(CompileError::InvalidGraph(errors));
    }

    Parser::new(model, session).parse_graph().map_err(|error| {
        tracing::error!("Failed to construct animation graph prototype: {}", error);
        CompileError::from(error)
    })
}

impl AnimationGraphModel {
    /// Sort and compile the graph, storing the prototype on the asset.
    ///
    /// On failure the previously compiled prototype is kept.
    pub fn compile(&mut self, session: &mut CompileSession) -> Result<()> {
        self.sort();
        tracing::info!("Compiling animation graph '{}'", self.asset().name);

        let prototype = construct_prototype(self, session)?;
        tracing::info!(
            "Compiled animation graph '{}': {} node(s), {} warning(s)",
            self.asset().name,
            prototype.node_count(),
            session.warnings().len()
        );
        self.asset_mut().prototype = Some(prototype);
        self.mark_player_clean();
        Ok(())
    }
}

/// Identifier of a node pin as seen by the runtime
fn pin_identifier(name: &str) -> Identifier {
    Identifier::from_name(&name.replace(' ', ""))
}

/// Identifier of a graph input, output or local variable
fn graph_identifier(name: &str) -> Identifier {
    Identifier::from_name(&endpoint_name(name))
}

fn has_literal(pin: &Pin) -> bool {
    !pin.value.is_void() && !pin.value.is_string() && !pin.is_flow()
}

struct Parser<'a> {
    model: &'a AnimationGraphModel,
    session: &'a mut CompileSession,
}

impl<'a> Parser<'a> {
    fn new(model: &'a AnimationGraphModel, session: &'a mut CompileSession) -> Self {
        Self { model, session }
    }

    fn parse_graph(&mut self) -> std::result::Result<Prototype, ParseError> {
        let asset = self.model.asset();
        let (id, name) = (asset.id, asset.name.clone());
        self.parse(NodeId::ROOT, id, &name)
    }

    fn parse(&mut self, owner: NodeId, id: NodeId, debug_name: &str) -> std::result::Result<Prototype, ParseError> {
        let model = self.model;
        let graph = model.sub_graph(owner).ok_or(ParseError::MissingSubGraph(owner))?;
        let mut prototype = Prototype::new(debug_name, id, model.skeleton());

        self.construct_io(graph, &mut prototype);
        if owner.is_root() {
            self.parse_input_parameters(&mut prototype);
        }
        self.parse_nodes(owner, graph, &mut prototype)?;
        self.parse_connections(owner, graph, &mut prototype)?;
        Ok(prototype)
    }

    fn construct_io(&self, graph: &SubGraph, prototype: &mut Prototype) {
        let Some(output) = graph.nodes.iter().find(|n| !n.is_comment() && n.name == "Output") else {
            return;
        };
        prototype.outputs = output
            .inputs
            .iter()
            .map(|pin| Endpoint::new(graph_identifier(&pin.name), self.translate_value(&pin.value)))
            .collect();
    }

    fn parse_input_parameters(&mut self, prototype: &mut Prototype) {
        let model = self.model;
        for (name, value) in model.asset().inputs.iter() {
            let id = self.session.register_identifier(&endpoint_name(name));
            prototype.inputs.push(Endpoint::new(id, self.translate_value(value)));
        }
    }

    /// Whether nodes of this sub-graph are compiled regardless of sort order
    fn is_container(&self, owner: NodeId) -> bool {
        matches!(
            self.model.asset().owner_kind(owner),
            Some(NodeKind::StateMachine | NodeKind::BlendSpace)
        )
    }

    fn parse_nodes(&mut self, owner: NodeId, graph: &SubGraph, prototype: &mut Prototype) -> std::result::Result<(), ParseError> {
        let container = self.is_container(owner);

        for node in &graph.nodes {
            if node.is_local_variable() {
                self.parse_local_variable(graph, node, prototype);
                continue;
            }
            if node.is_comment() || BOUNDARY_NODE_NAMES.contains(&node.name.as_str()) {
                continue;
            }
            if !container && !node.has_sort_index() {
                tracing::debug!("Skipping orphaned node '{}'", node.description);
                continue;
            }

            let mut plugs: Vec<Endpoint> = node
                .inputs
                .iter()
                .filter(|pin| has_literal(pin))
                .map(|pin| Endpoint::new(pin_identifier(&pin.name), self.translate_value(&pin.value)))
                .collect();
            if node.name == "Blend Space Vertex" {
                plugs.push(Endpoint::new(Identifier::X, Value::Float32(node.offset[0])));
                plugs.push(Endpoint::new(Identifier::Y, Value::Float32(node.offset[1])));
            }
            if node.kind() == NodeKind::BlendSpace {
                let [x, y] = node.lerp_seconds_per_unit;
                plugs.push(Endpoint::new(Identifier::LERP_SECONDS_PER_UNIT_X, Value::Float32(x)));
                plugs.push(Endpoint::new(Identifier::LERP_SECONDS_PER_UNIT_Y, Value::Float32(y)));
            }

            let subroutine = if node.is_subroutine() {
                let nested = self
                    .parse(node.id, node.id, &node.description)
                    .map_err(|source| ParseError::Subroutine {
                        name: node.description.clone(),
                        source: Box::new(source),
                    })?;
                Some(Box::new(nested))
            } else {
                None
            };

            prototype.nodes.push(PrototypeNode {
                node_type_id: Identifier::from_name(&node.name),
                id: node.id,
                default_value_plugs: plugs,
                subroutine,
            });
        }
        Ok(())
    }

    /// Emit the default plug of a local variable, if this node provides one
    fn parse_local_variable(&self, graph: &SubGraph, node: &Node, prototype: &mut Prototype) {
        let Some(name) = node.local_variable_name() else {
            return;
        };
        let value = if node.is_local_variable_setter() {
            node.inputs.first().filter(|pin| has_literal(pin)).map(|pin| &pin.value)
        } else if graph.local_variable_setter(name).is_none() {
            self.model
                .asset()
                .local_variables
                .get(name)
                .filter(|value| !value.is_flow())
        } else {
            None
        };
        let Some(value) = value else {
            return;
        };

        let id = graph_identifier(name);
        if prototype.local_variable_plugs.iter().all(|plug| plug.id != id) {
            prototype
                .local_variable_plugs
                .push(Endpoint::new(id, self.translate_value(value)));
        }
    }

    fn parse_connections(&mut self, owner: NodeId, graph: &SubGraph, prototype: &mut Prototype) -> std::result::Result<(), ParseError> {
        let container = self.is_container(owner);

        for link in &graph.links {
            let start = graph.pin(link.start_pin_id).ok_or(ParseError::MissingPin(link.start_pin_id))?;
            let end = graph.pin(link.end_pin_id).ok_or(ParseError::MissingPin(link.end_pin_id))?;
            let source_node = graph.node_for_pin(start.id).ok_or(ParseError::MissingPin(start.id))?;
            let destination_node = graph.node_for_pin(end.id).ok_or(ParseError::MissingPin(end.id))?;

            if !start.is_same_type(end) {
                tracing::warn!(
                    "Skipping link between pins of different types: '{}' -> '{}'",
                    start.name,
                    end.name
                );
                continue;
            }
            if !container && (!source_node.has_sort_index() || !destination_node.has_sort_index()) {
                continue;
            }
            // Setters are read through their producer
            if destination_node.is_local_variable() {
                continue;
            }

            let (source_node, start) = match self.resolve_local_variable(graph, source_node, start) {
                Some(resolved) => resolved,
                None => {
                    self.connect_local_variable_plug(graph, source_node, start, destination_node, end, prototype);
                    continue;
                }
            };

            if source_node.name == "Input Action" {
                return Err(ParseError::UnsupportedInputAction(source_node.id));
            }
            let connection = self.classify(prototype.id, source_node, start, destination_node, end)?;
            prototype.connections.push(connection);
        }
        Ok(())
    }

    /// Follow local variables back to the pin that feeds them.
    ///
    /// Returns `None` when a variable has no fed setter, so its plug is the
    /// only source.
    fn resolve_local_variable<'g>(&self, graph: &'g SubGraph, node: &'g Node, pin: &'g Pin) -> Option<(&'g Node, &'g Pin)> {
        let (mut node, mut pin) = (node, pin);
        let mut hops = 0;
        while node.is_local_variable() {
            let name = node.local_variable_name()?;
            pin = graph.local_variable_source(name)?;
            node = graph.node_for_pin(pin.id)?;
            hops += 1;
            if hops > graph.nodes.len() {
                tracing::warn!("Local variable '{}' feeds itself", name);
                return None;
            }
        }
        Some((node, pin))
    }

    fn connect_local_variable_plug(
        &mut self,
        graph: &SubGraph,
        getter: &Node,
        start: &Pin,
        destination: &Node,
        end: &Pin,
        prototype: &mut Prototype,
    ) {
        let variable = getter.local_variable_name().unwrap_or(start.name.as_str());
        if start.is_flow() {
            if self.model.settings().warn_on_untriggered_flow_variables {
                let reason = if graph.local_variable_setter(variable).is_some() {
                    "whose setter has nothing linked"
                } else {
                    "with no setter"
                };
                self.session.warn(format!(
                    "Local variable '{}' is a trigger {}; '{}' will never be triggered by it",
                    variable, reason, destination.description
                ));
            }
            return;
        }

        let source = ConnectionEndpoint::new(prototype.id, graph_identifier(variable));
        let connection = if destination.name == "Output" {
            PrototypeConnection {
                source,
                destination: ConnectionEndpoint::new(NodeId::ROOT, graph_identifier(&end.name)),
                kind: ConnectionKind::LocalVariableToGraphValue,
            }
        } else {
            PrototypeConnection {
                source,
                destination: ConnectionEndpoint::new(destination.id, pin_identifier(&end.name)),
                kind: ConnectionKind::LocalVariableToNodeValue,
            }
        };
        prototype.connections.push(connection);
    }

    fn classify(
        &self,
        prototype_id: NodeId,
        source_node: &Node,
        start: &Pin,
        destination_node: &Node,
        end: &Pin,
    ) -> std::result::Result<PrototypeConnection, ParseError> {
        let from_graph_input = source_node.name == "Input";
        let source = if from_graph_input {
            ConnectionEndpoint::new(prototype_id, graph_identifier(&start.name))
        } else {
            ConnectionEndpoint::new(source_node.id, pin_identifier(&start.name))
        };

        let (destination, kind) = match destination_node.name.as_str() {
            "Output" => (
                ConnectionEndpoint::new(NodeId::ROOT, graph_identifier(&end.name)),
                if from_graph_input {
                    ConnectionKind::GraphValueToGraphValue
                } else {
                    ConnectionKind::NodeValueToGraphValue
                },
            ),
            "Event" if from_graph_input => (
                ConnectionEndpoint::new(prototype_id, graph_identifier(&end.name)),
                ConnectionKind::GraphEventToGraphEvent,
            ),
            "Event" => {
                let event = destination_node
                    .inputs
                    .get(1)
                    .and_then(|pin| pin.value.as_str())
                    .filter(|name| !name.is_empty())
                    .ok_or(ParseError::MissingEventName(destination_node.id))?;
                (
                    ConnectionEndpoint::new(prototype_id, Identifier::from_name(event)),
                    ConnectionKind::NodeEventToGraphEvent,
                )
            }
            _ => {
                let kind = match (from_graph_input, start.is_flow()) {
                    (true, true) => ConnectionKind::GraphEventToNodeEvent,
                    (true, false) => ConnectionKind::GraphValueToNodeValue,
                    (false, true) => ConnectionKind::NodeEventToNodeEvent,
                    (false, false) => ConnectionKind::NodeValueToNodeValue,
                };
                (ConnectionEndpoint::new(destination_node.id, pin_identifier(&end.name)), kind)
            }
        };

        Ok(PrototypeConnection { source, destination, kind })
    }

    /// Translate an editor literal into its runtime form
    fn translate_value(&self, value: &Value) -> Value {
        if let Value::Array(elements) = value {
            return Value::Array(elements.iter().map(|e| self.translate_value(e)).collect());
        }
        if let Some(handle) = value.as_asset_handle() {
            // Bit-for-bit, matching the stored handle
            return Value::Int64(handle as i64);
        }
        if let Some(bone) = value.as_bone_name() {
            let index = self.model.find_bone_index(bone);
            // The null index does not fit and becomes -1
            return Value::Int32(i32::try_from(index).unwrap_or(-1));
        }
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetCatalog;
    use crate::graph::AnimationGraphAsset;
    use crate::graphs::state_machine::STATE_MACHINE_CATEGORY;
    use crate::property_set::PropertyKind;
    use crate::settings::CompilerSettings;
    use crate::value::AssetType;

    fn link(model: &mut AnimationGraphModel, from: NodeId, output: usize, to: NodeId, input: usize) {
        let start = model.node(from).unwrap().outputs[output].id;
        let end = model.node(to).unwrap().inputs[input].id;
        model.create_link(start, end).unwrap();
    }

    fn model() -> AnimationGraphModel {
        let mut catalog = AssetCatalog::new();
        catalog.add_animation(5, "Idle");
        catalog.add_skeleton(9, "Humanoid", &["pelvis", "spine"]);
        let mut model = AnimationGraphModel::with_assets(AnimationGraphAsset::new("Locomotion"), catalog);
        model.set_skeleton(9);
        model
    }

    /// Player with a valid clip feeding the output
    fn playable(model: &mut AnimationGraphModel) -> NodeId {
        let output = model.create_node("Animation", "Output").unwrap();
        let player = model.create_node("Animation", "Animation Player").unwrap();
        let clip = model.node(player).unwrap().inputs[0].id;
        model.set_pin_value(clip, Value::asset_handle(AssetType::Animation, 5));
        link(model, player, 0, output, 0);
        player
    }

    fn plug(node: &PrototypeNode, name: &str) -> Option<Value> {
        let id = Identifier::from_name(name);
        node.default_value_plugs.iter().find(|p| p.id == id).map(|p| p.default_value.clone())
    }

    #[test]
    fn test_compile_player_graph() {
        let mut model = model();
        let player = playable(&mut model);
        let mut session = CompileSession::new();
        model.compile(&mut session).unwrap();
        assert!(!model.is_player_dirty());

        let proto = model.asset().prototype.clone().unwrap();
        assert_eq!(proto.id, model.asset().id);
        assert_eq!(proto.debug_name, "Locomotion");
        assert_eq!(proto.skeleton, 9);
        assert_eq!(proto.outputs.len(), 1);
        assert_eq!(proto.outputs[0].id, Identifier::from_name("Pose"));

        assert_eq!(proto.nodes.len(), 1);
        let node = &proto.nodes[0];
        assert_eq!(node.id, player);
        assert_eq!(node.node_type_id, Identifier::from_name("Animation Player"));
        assert_eq!(plug(node, "Animation"), Some(Value::Int64(5)));
        assert_eq!(plug(node, "PlaybackSpeed"), Some(Value::Float32(1.0)));
        assert_eq!(plug(node, "Loop"), Some(Value::Bool(true)));

        assert_eq!(
            proto.connections,
            vec![PrototypeConnection {
                source: ConnectionEndpoint::new(player, Identifier::from_name("Pose")),
                destination: ConnectionEndpoint::new(NodeId::ROOT, Identifier::from_name("Pose")),
                kind: ConnectionKind::NodeValueToGraphValue,
            }]
        );
    }

    #[test]
    fn test_invalid_graph_keeps_previous_prototype() {
        let mut model = model();
        playable(&mut model);
        model.compile(&mut CompileSession::new()).unwrap();
        let previous = model.asset().prototype.clone();

        model.create_node("Animation", "Output").unwrap();
        let error = model.compile(&mut CompileSession::new()).unwrap_err();
        let CompileError::InvalidGraph(errors) = error else {
            panic!("expected validation errors");
        };
        assert_eq!(errors[0], "Graph is invalid.");
        assert!(errors.contains(&"Animation graph must have only one 'Output' node".to_string()));
        assert_eq!(model.asset().prototype, previous);
        assert!(model.is_player_dirty());
    }

    #[test]
    fn test_graph_input_connection() {
        let mut model = model();
        let player = playable(&mut model);
        model.asset_mut().inputs.set("Move Speed", Value::Float32(1.5));
        let input = model.spawn_graph_input_node("Move Speed").unwrap();
        link(&mut model, input, 0, player, 1);

        let mut session = CompileSession::new();
        model.compile(&mut session).unwrap();
        let proto = model.asset().prototype.as_ref().unwrap();

        let speed = Identifier::from_name("MoveSpeed");
        assert_eq!(proto.inputs, vec![Endpoint::new(speed, Value::Float32(1.5))]);
        assert_eq!(session.name_of(speed), Some("MoveSpeed"));
        assert!(proto.node(input).is_none());
        assert!(proto.connections.contains(&PrototypeConnection {
            source: ConnectionEndpoint::new(proto.id, speed),
            destination: ConnectionEndpoint::new(player, Identifier::from_name("PlaybackSpeed")),
            kind: ConnectionKind::GraphValueToNodeValue,
        }));
        // Linked input has no plug
        assert_eq!(plug(proto.node(player).unwrap(), "PlaybackSpeed"), None);
    }

    #[test]
    fn test_local_variable_is_rerouted() {
        let mut model = model();
        let player = playable(&mut model);
        model.asset_mut().local_variables.set("Speed", Value::Float32(1.0));
        let source = model.create_node("Math", "Add (Float)").unwrap();
        let setter = model.spawn_local_variable_node("Speed", false).unwrap();
        let getter = model.spawn_local_variable_node("Speed", true).unwrap();
        link(&mut model, source, 0, setter, 0);
        link(&mut model, getter, 0, player, 1);

        model.compile(&mut CompileSession::new()).unwrap();
        let proto = model.asset().prototype.as_ref().unwrap();

        assert!(proto.node(setter).is_none());
        assert!(proto.node(getter).is_none());
        assert!(proto.node(source).is_some());
        assert!(proto.local_variable_plugs.is_empty());
        assert!(proto.connections.contains(&PrototypeConnection {
            source: ConnectionEndpoint::new(source, Identifier::from_name("Out")),
            destination: ConnectionEndpoint::new(player, Identifier::from_name("PlaybackSpeed")),
            kind: ConnectionKind::NodeValueToNodeValue,
        }));
    }

    #[test]
    fn test_setterless_variable_uses_plug() {
        let mut model = model();
        let player = playable(&mut model);
        model.add_property_to_graph(PropertyKind::LocalVariable, Value::Float32(0.75));
        let getter = model.spawn_local_variable_node("New Variable", true).unwrap();
        link(&mut model, getter, 0, player, 1);

        model.compile(&mut CompileSession::new()).unwrap();
        let proto = model.asset().prototype.as_ref().unwrap();
        let variable = Identifier::from_name("NewVariable");

        assert_eq!(proto.local_variable_plugs, vec![Endpoint::new(variable, Value::Float32(0.75))]);
        assert!(proto.connections.contains(&PrototypeConnection {
            source: ConnectionEndpoint::new(proto.id, variable),
            destination: ConnectionEndpoint::new(player, Identifier::from_name("PlaybackSpeed")),
            kind: ConnectionKind::LocalVariableToNodeValue,
        }));
    }

    fn trigger_graph(model: &mut AnimationGraphModel) -> NodeId {
        playable(model);
        model.asset_mut().local_variables.set("Jump", Value::flow());
        let getter = model.spawn_local_variable_node("Jump", true).unwrap();
        let trigger = model.create_node("Trigger", "Bool Trigger").unwrap();
        let event = model.create_node("Animation", "Event").unwrap();
        let name = model.node(event).unwrap().inputs[1].id;
        model.set_pin_value(name, Value::String("Land".to_string()));
        link(model, getter, 0, trigger, 0);
        link(model, trigger, 0, event, 0);
        trigger
    }

    #[test]
    fn test_untriggered_flow_variable_warns() {
        let mut model = model();
        let trigger = trigger_graph(&mut model);
        let mut session = CompileSession::new();
        model.compile(&mut session).unwrap();

        assert_eq!(
            session.warnings(),
            &["Local variable 'Jump' is a trigger with no setter; 'Bool Trigger' will never be triggered by it".to_string()]
        );
        let proto = model.asset().prototype.as_ref().unwrap();
        assert!(proto.connections.iter().all(|c| c.destination.node_id != trigger));
        assert!(proto.connections.contains(&PrototypeConnection {
            source: ConnectionEndpoint::new(trigger, Identifier::from_name("True")),
            destination: ConnectionEndpoint::new(proto.id, Identifier::from_name("Land")),
            kind: ConnectionKind::NodeEventToGraphEvent,
        }));
    }

    #[test]
    fn test_unlinked_setter_warning_names_setter() {
        let mut model = model();
        let trigger = trigger_graph(&mut model);
        model.spawn_local_variable_node("Jump", false).unwrap();
        let mut session = CompileSession::new();
        model.compile(&mut session).unwrap();

        assert_eq!(
            session.warnings(),
            &["Local variable 'Jump' is a trigger whose setter has nothing linked; 'Bool Trigger' will never be triggered by it"
                .to_string()]
        );
        let proto = model.asset().prototype.as_ref().unwrap();
        assert!(proto.connections.iter().all(|c| c.destination.node_id != trigger));
    }

    #[test]
    fn test_untriggered_flow_warning_can_be_disabled() {
        let mut model = model();
        model.set_settings(CompilerSettings {
            warn_on_untriggered_flow_variables: false,
            ..Default::default()
        });
        trigger_graph(&mut model);
        let mut session = CompileSession::new();
        model.compile(&mut session).unwrap();
        assert!(session.warnings().is_empty());
    }

    #[test]
    fn test_state_machine_subroutine() {
        let mut model = model();
        let output = model.create_node("Animation", "Output").unwrap();
        let machine = model.create_node("Animation", "State Machine").unwrap();
        link(&mut model, machine, 0, output, 0);
        model.enter_node(machine);
        let idle = model.create_node(STATE_MACHINE_CATEGORY, "Quick State").unwrap();
        let clip = model.node(idle).unwrap().inputs[0].id;
        model.set_pin_value(clip, Value::asset_handle(AssetType::Animation, 5));
        model.set_current_path(None);

        model.compile(&mut CompileSession::new()).unwrap();
        let proto = model.asset().prototype.as_ref().unwrap();
        let node = proto.node(machine).unwrap();
        let nested = node.subroutine.as_ref().unwrap();
        assert_eq!(nested.id, machine);
        assert_eq!(nested.debug_name, "State Machine");
        assert!(nested.inputs.is_empty());
        assert_eq!(nested.nodes.len(), 1);
        assert_eq!(nested.nodes[0].id, idle);
        assert_eq!(plug(&nested.nodes[0], "Animation"), Some(Value::Int64(5)));
    }

    #[test]
    fn test_translate_value() {
        let model = model();
        let mut session = CompileSession::new();
        let parser = Parser::new(&model, &mut session);

        assert_eq!(parser.translate_value(&Value::asset_handle(AssetType::Animation, 4242)), Value::Int64(4242));
        assert_eq!(parser.translate_value(&Value::bone("root")), Value::Int32(0));
        assert_eq!(parser.translate_value(&Value::bone("spine")), Value::Int32(2));
        assert_eq!(parser.translate_value(&Value::bone("tail")), Value::Int32(-1));
        assert_eq!(
            parser.translate_value(&Value::Array(vec![
                Value::asset_handle(AssetType::Animation, 1),
                Value::asset_handle(AssetType::Animation, 2),
            ])),
            Value::Array(vec![Value::Int64(1), Value::Int64(2)])
        );
        assert_eq!(parser.translate_value(&Value::Float32(0.5)), Value::Float32(0.5));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let mut model = model();
        let player = playable(&mut model);
        let speed = model.create_node("Math", "Multiply (Float)").unwrap();
        link(&mut model, speed, 0, player, 1);

        model.compile(&mut CompileSession::new()).unwrap();
        let first = model.asset().prototype.as_ref().unwrap().to_bytes().unwrap();
        model.compile(&mut CompileSession::new()).unwrap();
        let second = model.asset().prototype.as_ref().unwrap().to_bytes().unwrap();
        assert_eq!(first, second);
    }
}
