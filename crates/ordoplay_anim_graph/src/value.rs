// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dynamically-typed values stored on pins and in property sets.
//!
//! Most pin types map onto a primitive variant. Asset handles, bones, enums
//! and flow triggers are wrapped in an [`ObjectValue`] tagged with a class
//! name, so the compiler can recognise and translate them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Class name of the flow (trigger) wrapper
pub const FLOW_CLASS: &str = "Flow";
/// Class name of the bone wrapper
pub const BONE_CLASS: &str = "Bone";
/// Class name of the enum wrapper
pub const ENUM_CLASS: &str = "Enum";
/// Member holding the payload of a wrapper object
pub const VALUE_MEMBER: &str = "Value";

/// Asset types that can be referenced from a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    /// Animation clip
    Animation,
    /// Skeleton
    Skeleton,
}

impl AssetType {
    /// Class name used by the wrapper object
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Animation => "AnimationAsset",
            Self::Skeleton => "SkeletonAsset",
        }
    }

    /// Look up an asset type from a wrapper class name
    pub fn from_class_name(class_name: &str) -> Option<Self> {
        match class_name {
            "AnimationAsset" => Some(Self::Animation),
            "SkeletonAsset" => Some(Self::Skeleton),
            _ => None,
        }
    }
}

/// A named object with ordered members
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectValue {
    /// Class tag
    pub class_name: String,
    /// Members in declaration order
    pub members: IndexMap<String, Value>,
}

impl ObjectValue {
    /// Create an object with no members
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            members: IndexMap::new(),
        }
    }

    /// Add a member
    pub fn with_member(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members.insert(name.into(), value);
        self
    }
}

/// A dynamically-typed value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    /// No value (cleared by an incoming link)
    #[default]
    Void,
    /// Boolean
    Bool(bool),
    /// 32-bit integer
    Int32(i32),
    /// 64-bit integer
    Int64(i64),
    /// 32-bit float
    Float32(f32),
    /// String
    String(String),
    /// 3D vector
    Vec3([f32; 3]),
    /// Homogeneous array
    Array(Vec<Value>),
    /// Tagged object
    Object(ObjectValue),
}

impl Value {
    /// The flow (trigger) marker value
    pub fn flow() -> Self {
        Self::Object(ObjectValue::new(FLOW_CLASS))
    }

    /// Wrap an asset handle
    pub fn asset_handle(asset_type: AssetType, handle: u64) -> Self {
        // Stored bit-for-bit in the signed member.
        let raw = handle as i64;
        Self::Object(ObjectValue::new(asset_type.class_name()).with_member(VALUE_MEMBER, Self::Int64(raw)))
    }

    /// Wrap a bone name
    pub fn bone(name: impl Into<String>) -> Self {
        Self::Object(ObjectValue::new(BONE_CLASS).with_member(VALUE_MEMBER, Self::String(name.into())))
    }

    /// Wrap an enum value
    pub fn enumeration(value: i32) -> Self {
        Self::Object(ObjectValue::new(ENUM_CLASS).with_member(VALUE_MEMBER, Self::Int32(value)))
    }

    /// Whether this is the void value
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Whether this is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Whether this is an array
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Get the array elements
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Get the wrapped object
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Class name of a wrapped object
    pub fn class_name(&self) -> Option<&str> {
        self.as_object().map(|o| o.class_name.as_str())
    }

    /// Whether this is an object of the given class
    pub fn is_object_of(&self, class_name: &str) -> bool {
        self.class_name() == Some(class_name)
    }

    /// Whether this is the flow marker
    pub fn is_flow(&self) -> bool {
        self.is_object_of(FLOW_CLASS)
    }

    /// Asset type of a wrapped handle
    pub fn asset_type(&self) -> Option<AssetType> {
        self.class_name().and_then(AssetType::from_class_name)
    }

    /// Unwrap an asset handle of any asset type
    pub fn as_asset_handle(&self) -> Option<u64> {
        self.asset_type()?;
        match self.as_object()?.members.get(VALUE_MEMBER)? {
            Self::Int64(raw) => Some(*raw as u64),
            _ => None,
        }
    }

    /// Unwrap a bone name
    pub fn as_bone_name(&self) -> Option<&str> {
        if !self.is_object_of(BONE_CLASS) {
            return None;
        }
        self.as_object()?.members.get(VALUE_MEMBER)?.as_str()
    }

    /// Short description of the value's shape, used to detect type changes
    pub fn type_name(&self) -> String {
        match self {
            Self::Void => "Void".to_string(),
            Self::Bool(_) => "Bool".to_string(),
            Self::Int32(_) => "Int32".to_string(),
            Self::Int64(_) => "Int64".to_string(),
            Self::Float32(_) => "Float32".to_string(),
            Self::String(_) => "String".to_string(),
            Self::Vec3(_) => "Vec3".to_string(),
            Self::Array(elements) => {
                let element = elements.first().map_or_else(|| "Void".to_string(), Self::type_name);
                format!("Array<{element}>")
            }
            Self::Object(object) => object.class_name.clone(),
        }
    }

    /// Whether two values have the same shape
    pub fn is_same_type(&self, other: &Value) -> bool {
        self.type_name() == other.type_name()
    }
}
