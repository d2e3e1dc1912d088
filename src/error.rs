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


use crate::geom::Rect;
use crate::world::BodyId;
use thiserror::Error;

/// Geometry or configuration rejected by a `CollisionWorld`.
///
/// Contract violations such as unknown or duplicate body ids are not reported
/// here; those panic.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WorldError {
    /// A body rectangle had a non-positive width or height, or a non-finite coordinate.
    #[error("body {id} has degenerate bounds {rect:?}")]
    DegenerateRect {
        /// The body that was being created.
        id: BodyId,
        /// The rejected rectangle.
        rect: Rect,
    },
    /// The world rectangle had a non-positive width or height, or a non-finite coordinate.
    #[error("world bounds {0:?} must have positive, finite dimensions")]
    DegenerateWorld(Rect),
    /// A body was created entirely outside the world, where no index can hold it.
    #[error("body {id} at {rect:?} lies outside the world {world:?}")]
    OutsideWorld {
        /// The body that was being created.
        id: BodyId,
        /// The rejected rectangle.
        rect: Rect,
        /// The current world bounds.
        world: Rect,
    },
    /// The quadtree split capacity was zero.
    #[error("node capacity must be at least 1")]
    ZeroCapacity,
}
