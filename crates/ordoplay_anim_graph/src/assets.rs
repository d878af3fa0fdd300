// SPDX-License-Identifier: MIT OR Apache-2.0
//! Asset and skeleton lookups the compiler depends on.

use indexmap::IndexMap;

/// Handle of an asset
pub type AssetHandle = u64;

/// Bone index for names that do not resolve
pub const NULL_BONE_INDEX: u32 = u32::MAX;

/// Asset lookups used for validation and value translation
pub trait AssetResolver {
    /// Whether a handle refers to a loaded asset
    fn is_asset_handle_valid(&self, handle: AssetHandle) -> bool;

    /// Index of a bone in a skeleton asset
    fn find_bone(&self, skeleton: AssetHandle, bone_name: &str) -> Option<u32>;

    /// Display name of an asset
    fn asset_name(&self, handle: AssetHandle) -> Option<String>;
}

#[derive(Debug, Clone)]
enum CatalogEntry {
    Animation { name: String },
    Skeleton { name: String, bones: Vec<String> },
}

/// In-memory asset table
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    entries: IndexMap<AssetHandle, CatalogEntry>,
}

impl AssetCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animation clip
    pub fn add_animation(&mut self, handle: AssetHandle, name: impl Into<String>) {
        self.entries.insert(handle, CatalogEntry::Animation { name: name.into() });
    }

    /// Register a skeleton with its bones in index order
    pub fn add_skeleton(&mut self, handle: AssetHandle, name: impl Into<String>, bones: &[&str]) {
        self.entries.insert(
            handle,
            CatalogEntry::Skeleton {
                name: name.into(),
                bones: bones.iter().map(|b| (*b).to_string()).collect(),
            },
        );
    }
}

impl AssetResolver for AssetCatalog {
    fn is_asset_handle_valid(&self, handle: AssetHandle) -> bool {
        handle != 0 && self.entries.contains_key(&handle)
    }

    fn find_bone(&self, skeleton: AssetHandle, bone_name: &str) -> Option<u32> {
        match self.entries.get(&skeleton)? {
            CatalogEntry::Skeleton { bones, .. } => bones
                .iter()
                .position(|b| b == bone_name)
                .and_then(|i| u32::try_from(i).ok()),
            CatalogEntry::Animation { .. } => None,
        }
    }

    fn asset_name(&self, handle: AssetHandle) -> Option<String> {
        match self.entries.get(&handle)? {
            CatalogEntry::Animation { name } | CatalogEntry::Skeleton { name, .. } => Some(name.clone()),
        }
    }
}
