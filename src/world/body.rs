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


use crate::geom::{Rect, Vec2};

/// Identifies a body. Ids are chosen by the caller and must be unique among
/// the live bodies of a world.
pub type BodyId = u64;

/// Decides which spatial index owns a body.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mobility {
    /// Never displaced by `resolve`, though its move requests are still
    /// tested and notified. Typical for level geometry.
    Static,
    /// Moved through `request_move` and committed by `resolve`.
    Dynamic,
}

/// Decides which population(s) a body is tested against when it moves.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlapClass {
    /// Collides with static bodies only.
    StaticOnly,
    /// Collides with dynamic bodies only.
    DynamicOnly,
    /// Collides with every body.
    All,
}

impl OverlapClass {
    pub(crate) fn filter(self) -> QueryFilter {
        match self {
            OverlapClass::StaticOnly => QueryFilter::StaticOnly,
            OverlapClass::DynamicOnly => QueryFilter::DynamicOnly,
            OverlapClass::All => QueryFilter::Both,
        }
    }
}

/// Selects the spatial indices an area query runs against.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryFilter {
    /// Only static bodies.
    StaticOnly,
    /// Only dynamic bodies.
    DynamicOnly,
    /// Static and dynamic bodies.
    Both,
}

impl QueryFilter {
    pub(crate) fn includes_dynamic(self) -> bool {
        self != QueryFilter::StaticOnly
    }

    pub(crate) fn includes_static(self) -> bool {
        self != QueryFilter::DynamicOnly
    }
}

/// The physical record of one registered rectangle.
///
/// A `Body` is owned by its `CollisionWorld`; outside code reads it through
/// `CollisionWorld::body` and changes it only through the world's move
/// requests.
#[derive(PartialEq, Clone, Debug)]
pub struct Body {
    id: BodyId,
    rect: Rect,
    mobility: Mobility,
    overlap: OverlapClass,
    pending_displacements: Vec<Vec2>,
    pending_corrections: Vec<Vec2>,
    teleport: bool,
}

impl Body {
    pub(crate) fn new(id: BodyId, rect: Rect, mobility: Mobility, overlap: OverlapClass) -> Body {
        Body {
            id,
            rect,
            mobility,
            overlap,
            pending_displacements: Vec::new(),
            pending_corrections: Vec::new(),
            teleport: false,
        }
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// The authoritative bounds, as of the last commit or absolute move.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn mobility(&self) -> Mobility {
        self.mobility
    }

    #[inline]
    pub fn overlap(&self) -> OverlapClass {
        self.overlap
    }

    /// Relative moves queued for the next commit, in request order.
    pub fn pending_displacements(&self) -> &[Vec2] {
        &self.pending_displacements
    }

    /// Relative moves queued by collision handlers for the next commit.
    pub fn pending_corrections(&self) -> &[Vec2] {
        &self.pending_corrections
    }

    /// Returns `true` if an absolute move happened since the last commit.
    pub fn is_teleporting(&self) -> bool {
        self.teleport
    }

    pub(crate) fn queue_displacement(&mut self, displacement: Vec2) {
        self.pending_displacements.push(displacement);
    }

    pub(crate) fn queue_correction(&mut self, correction: Vec2) {
        self.pending_corrections.push(correction);
    }

    // Moves immediately and drops any queued relative motion.
    pub(crate) fn teleport_to(&mut self, pos: Vec2) {
        self.rect = self.rect.moved_to(pos);
        self.teleport = true;
        self.pending_displacements.clear();
        self.pending_corrections.clear();
    }

    // Applies displacements, then corrections, and clears both queues. Static
    // bodies keep their rect. A body that teleported since the last commit
    // discards whatever was queued after the teleport.
    pub(crate) fn commit(&mut self) {
        if !self.teleport && self.mobility == Mobility::Dynamic {
            let displacement: Vec2 = self.pending_displacements.iter().sum();
            let correction: Vec2 = self.pending_corrections.iter().sum();
            self.rect = self.rect.translated(displacement + correction);
        }
        self.teleport = false;
        self.pending_displacements.clear();
        self.pending_corrections.clear();
    }
}
