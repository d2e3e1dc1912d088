// Copyright 2016 Matthew D. Michelotti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use crate::error::WorldError;
use crate::geom::{rect, Rect};
use crate::quadtree::{DEFAULT_MAX_DEPTH, DEFAULT_NODE_CAPACITY};

/// Settings for a `CollisionWorld`.
///
/// Both spatial indices of a world share the same bounds and split settings.
#[derive(PartialEq, Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// Area covered by the spatial indices. Bodies entirely outside of it
    /// cannot be found by queries or collision tests.
    pub bounds: Rect,
    /// Number of entries a quadtree leaf holds before splitting.
    #[cfg_attr(feature = "serde", serde(default = "default_node_capacity"))]
    pub node_capacity: usize,
    /// Depth at which quadtree leaves stop splitting.
    #[cfg_attr(feature = "serde", serde(default = "default_max_depth"))]
    pub max_depth: usize,
}

#[cfg(feature = "serde")]
fn default_node_capacity() -> usize {
    DEFAULT_NODE_CAPACITY
}

#[cfg(feature = "serde")]
fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl WorldConfig {
    /// Constructs a config covering `bounds` with the default split settings.
    pub fn new(bounds: Rect) -> WorldConfig {
        WorldConfig {
            bounds,
            node_capacity: DEFAULT_NODE_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Constructs a config for a tile map anchored at the origin, spanning
    /// `tiles_x` tiles of `tile_width` horizontally and `tiles_y` tiles of
    /// `tile_height` vertically.
    pub fn from_tiles(tile_width: f64, tiles_x: f64, tile_height: f64, tiles_y: f64) -> WorldConfig {
        WorldConfig::new(tile_bounds(tile_width, tiles_x, tile_height, tiles_y))
    }

    pub fn with_node_capacity(mut self, node_capacity: usize) -> WorldConfig {
        self.node_capacity = node_capacity;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> WorldConfig {
        self.max_depth = max_depth;
        self
    }

    /// Checks that the bounds are usable and the capacity is non-zero.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.bounds.is_degenerate() {
            return Err(WorldError::DegenerateWorld(self.bounds));
        }
        if self.node_capacity == 0 {
            return Err(WorldError::ZeroCapacity);
        }
        Ok(())
    }
}

pub(crate) fn tile_bounds(tile_width: f64, tiles_x: f64, tile_height: f64, tiles_y: f64) -> Rect {
    rect(0.0, 0.0, tile_width * tiles_x, tile_height * tiles_y)
}
