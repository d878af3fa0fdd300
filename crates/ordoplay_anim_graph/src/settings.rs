// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compiler settings, stored as RON.

use crate::error::{PersistenceError, SettingsError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for validation and prototype construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Blend space triangles with a smaller area are reported as degenerate
    pub min_triangle_area: f32,
    /// Blend space triangles narrower than this are reported as degenerate
    pub min_triangle_extent: f32,
    /// Warn when a trigger local variable has no setter
    pub warn_on_untriggered_flow_variables: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            min_triangle_area: 0.001,
            min_triangle_extent: 0.01,
            warn_on_untriggered_flow_variables: true,
        }
    }
}

impl CompilerSettings {
    /// Parse settings from RON
    pub fn from_ron_str(content: &str) -> Result<Self, PersistenceError> {
        Ok(ron::from_str(content)?)
    }

    /// Write settings as RON
    pub fn to_ron_string(&self) -> Result<String, PersistenceError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_ron_str(&content)?;
        tracing::debug!("Loaded compiler settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = self.to_ron_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
