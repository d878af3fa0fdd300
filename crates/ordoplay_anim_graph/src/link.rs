// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link (edge) definitions for the graph.

use crate::pin::PinId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkId(pub u64);

impl LinkId {
    /// Create a new random link ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().as_u128() as u64 | 1)
    }
}

impl Default for LinkId {
    fn default() -> Self {
        Self::new()
    }
}

/// A directed link from an output pin to an input pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Unique link ID
    pub id: LinkId,
    /// Source (output) pin
    pub start_pin_id: PinId,
    /// Destination (input) pin
    pub end_pin_id: PinId,
    /// Display color, taken from the source pin type
    pub color: [u8; 3],
}

impl Link {
    /// Create a new link
    pub fn new(start_pin_id: PinId, end_pin_id: PinId, color: [u8; 3]) -> Self {
        Self {
            id: LinkId::new(),
            start_pin_id,
            end_pin_id,
            color,
        }
    }

    /// Check if this link touches a specific pin
    pub fn involves_pin(&self, pin_id: PinId) -> bool {
        self.start_pin_id == pin_id || self.end_pin_id == pin_id
    }
}
