// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation graph authoring model and compiler for `OrdoPlay` Editor.
//!
//! This crate covers the editor side of animation graphs:
//! - Editing nodes, pins, links and graph properties
//! - State machines, transitions and blend spaces as nested sub-graphs
//! - Validation and deterministic evaluation ordering
//! - Compilation into a runtime [`Prototype`]
//!
//! ## Architecture
//!
//! - [`graph`]: the persistent asset, one [`SubGraph`] per owner node
//! - [`model`]: [`AnimationGraphModel`], every edit goes through it
//! - [`graphs`]: node registries per sub-graph kind
//! - [`validation`]: structural checks reported before compiling
//! - [`sort`]: evaluation order of nodes and links
//! - [`compiler`]: lowering of a sorted graph into a [`Prototype`]

pub mod assets;
pub mod compiler;
pub mod error;
pub mod factory;
pub mod graph;
pub mod graphs;
pub mod identifier;
pub mod link;
pub mod model;
pub mod node;
pub mod pin;
pub mod property_set;
pub mod prototype;
pub mod settings;
pub mod sort;
pub mod triangulation;
pub mod validation;
pub mod value;

pub use assets::{AssetCatalog, AssetHandle, AssetResolver};
pub use compiler::{construct_prototype, CompileSession};
pub use error::{CompileError, ParseError, PersistenceError, SettingsError};
pub use factory::{GraphKind, NodeFactories, NodeFactory};
pub use graph::{AnimationGraphAsset, SubGraph};
pub use identifier::Identifier;
pub use link::{Link, LinkId};
pub use model::{AnimationGraphModel, LinkQueryResult};
pub use node::{Node, NodeId, NodeKind, NodeType};
pub use pin::{Pin, PinId, PinKind, PinType, StorageKind};
pub use property_set::{PropertyKind, PropertySet};
pub use prototype::{ConnectionEndpoint, ConnectionKind, Endpoint, Prototype, PrototypeConnection, PrototypeNode};
pub use settings::CompilerSettings;
pub use validation::ValidationReport;
pub use value::{AssetType, Value};
