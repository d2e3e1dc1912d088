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


use crate::geom::{v2, Vec2};

/// An axis-aligned rectangle, described by its top-left corner and its size.
///
/// The y-axis points down, so `top() <= bottom()` for a well-formed rectangle.
#[derive(PartialEq, Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// The top-left corner.
    pub pos: Vec2,
    /// The width and height.
    pub dims: Vec2,
}

/// Shorthand for `Rect::new(v2(x, y), v2(width, height))`.
#[inline]
pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(v2(x, y), v2(width, height))
}

impl Rect {
    /// Constructs a new rectangle from its top-left corner `pos` and its `dims`.
    #[inline]
    pub fn new(pos: Vec2, dims: Vec2) -> Rect {
        Rect { pos, dims }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.dims.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.dims.y
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.pos.x + self.dims.x
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.pos.y + self.dims.y
    }

    /// Returns `true` if the rectangle has a non-positive width or height, or
    /// any non-finite coordinate. Such rectangles are never stored in a world.
    pub fn is_degenerate(&self) -> bool {
        !(self.pos.is_finite() && self.dims.is_finite() && self.dims.x > 0.0 && self.dims.y > 0.0)
    }

    /// Returns `true` if the interiors of the two rectangles overlap.
    ///
    /// Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Returns the same rectangle with its top-left corner placed at `pos`.
    pub fn moved_to(&self, pos: Vec2) -> Rect {
        Rect::new(pos, self.dims)
    }

    /// Returns the same rectangle shifted by `delta`.
    pub fn translated(&self, delta: Vec2) -> Rect {
        Rect::new(self.pos + delta, self.dims)
    }

    /// Splits the rectangle into four equal quadrants, in the order
    /// north-west, north-east, south-west, south-east.
    pub fn quadrants(&self) -> [Rect; 4] {
        let half = self.dims * 0.5;
        let (x, y) = (self.pos.x, self.pos.y);
        [
            Rect::new(v2(x, y), half),
            Rect::new(v2(x + half.x, y), half),
            Rect::new(v2(x, y + half.y), half),
            Rect::new(v2(x + half.x, y + half.y), half),
        ]
    }
}
