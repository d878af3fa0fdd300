// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin definitions for node inputs/outputs.

use crate::node::NodeId;
use crate::value::{AssetType, Value, BONE_CLASS, ENUM_CLASS, FLOW_CLASS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PinId(pub u64);

impl PinId {
    /// Create a new random pin ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().as_u128() as u64 | 1)
    }
}

impl Default for PinId {
    fn default() -> Self {
        Self::new()
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinKind {
    /// Input pin
    Input,
    /// Output pin
    Output,
}

/// Whether a pin carries a single value or an array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    /// Single value
    Value,
    /// Array of values
    Array,
}

/// Data type that can flow through animation graph pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinType {
    /// Execution trigger
    Flow,
    /// Boolean value
    Bool,
    /// Integer value
    Int,
    /// Floating point value
    Float,
    /// 3D vector
    Vec3,
    /// Animation clip reference
    AnimationAsset,
    /// String value
    String,
    /// Skeleton reference
    SkeletonAsset,
    /// Enumeration value
    Enum,
    /// Skeletal pose
    Pose,
    /// Bone name, resolved to an index when compiled
    Bone,
}

impl PinType {
    /// Get the color for this pin type (for UI)
    pub fn color(self) -> [u8; 3] {
        match self {
            Self::Flow | Self::Bone => [200, 200, 200],
            Self::Bool => [220, 48, 48],
            Self::Int => [68, 201, 156],
            Self::Float => [147, 226, 74],
            Self::Vec3 => [251, 199, 34],
            Self::AnimationAsset => [51, 150, 215],
            Self::String => [194, 75, 227],
            Self::SkeletonAsset => [215, 150, 51],
            Self::Enum => [2, 92, 48],
            Self::Pose => [255, 255, 0],
        }
    }

    /// Default value for a freshly created pin of this type
    pub fn default_value(self) -> Value {
        match self {
            Self::Flow => Value::flow(),
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int32(0),
            Self::Float => Value::Float32(0.0),
            Self::Vec3 => Value::Vec3([0.0; 3]),
            Self::AnimationAsset => Value::asset_handle(AssetType::Animation, 0),
            Self::String => Value::String(String::new()),
            Self::SkeletonAsset => Value::asset_handle(AssetType::Skeleton, 0),
            Self::Enum => Value::enumeration(-1),
            // Null pose: the runtime substitutes the bind pose.
            Self::Pose => Value::Int64(0),
            Self::Bone => Value::bone("root"),
        }
    }

    /// Classify a value into a pin type and storage kind
    pub fn for_value(value: &Value) -> (PinType, StorageKind) {
        match value {
            Value::Array(elements) => {
                let element = elements.first().map_or(PinType::Flow, |e| Self::for_value(e).0);
                (element, StorageKind::Array)
            }
            Value::Void => (Self::Flow, StorageKind::Value),
            Value::Bool(_) => (Self::Bool, StorageKind::Value),
            Value::Int32(_) => (Self::Int, StorageKind::Value),
            Value::Int64(_) => (Self::Pose, StorageKind::Value),
            Value::Float32(_) => (Self::Float, StorageKind::Value),
            Value::String(_) => (Self::String, StorageKind::Value),
            Value::Vec3(_) => (Self::Vec3, StorageKind::Value),
            Value::Object(object) => {
                let pin_type = match object.class_name.as_str() {
                    "AnimationAsset" => Self::AnimationAsset,
                    "SkeletonAsset" => Self::SkeletonAsset,
                    BONE_CLASS => Self::Bone,
                    ENUM_CLASS => Self::Enum,
                    FLOW_CLASS => Self::Flow,
                    other => {
                        tracing::warn!("Unknown value class '{}', treating as flow", other);
                        Self::Flow
                    }
                };
                (pin_type, StorageKind::Value)
            }
        }
    }
}

/// A pin on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// Unique pin ID
    pub id: PinId,
    /// Owning node
    pub node_id: NodeId,
    /// Pin name
    pub name: String,
    /// Literal value (void once an input is linked)
    pub value: Value,
    /// Value or array storage
    pub storage: StorageKind,
    /// Input or output
    pub kind: PinKind,
    /// Declared type
    pub pin_type: PinType,
}

impl Pin {
    /// Create a new pin holding the type's default value
    pub fn new(name: impl Into<String>, pin_type: PinType, kind: PinKind) -> Self {
        Self {
            id: PinId::new(),
            node_id: NodeId::ROOT,
            name: name.into(),
            value: pin_type.default_value(),
            storage: StorageKind::Value,
            kind,
            pin_type,
        }
    }

    /// Create a new input pin
    pub fn input(name: impl Into<String>, pin_type: PinType) -> Self {
        Self::new(name, pin_type, PinKind::Input)
    }

    /// Create a new output pin
    pub fn output(name: impl Into<String>, pin_type: PinType) -> Self {
        Self::new(name, pin_type, PinKind::Output)
    }

    /// Set the literal value
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    /// Turn this pin into an array pin with no elements
    pub fn array(mut self) -> Self {
        self.storage = StorageKind::Array;
        self.value = Value::Void;
        self
    }

    /// Whether this is a flow (trigger) pin
    pub fn is_flow(&self) -> bool {
        self.pin_type == PinType::Flow
    }

    /// Whether two pins have the same declared type
    pub fn is_same_type(&self, other: &Pin) -> bool {
        self.pin_type == other.pin_type
    }

    /// Change the declared type in place, keeping the pin identity
    pub fn retag(&mut self, pin_type: PinType, storage: StorageKind, value: Value) {
        self.pin_type = pin_type;
        self.storage = storage;
        self.value = value;
    }
}
