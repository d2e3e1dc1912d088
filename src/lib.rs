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


//! A 2D collision world for games, built on a quadtree over axis-aligned
//! rectangles.
//!
//! Bodies are registered in a `CollisionWorld` as either static or dynamic.
//! Gameplay code queues moves during a frame, and `CollisionWorld::resolve`
//! turns them into committed positions once per tick. Before anything is
//! committed, the owners of the bodies a move would run into are notified
//! through a `NotificationSink` and may cancel or redirect the move by
//! queueing corrections.
//!
//! ```
//! use quadcollide::geom::{rect, v2};
//! use quadcollide::{CollisionWorld, EventBus, Mobility, OverlapClass, WorldConfig};
//!
//! let mut world = CollisionWorld::new(WorldConfig::new(rect(0.0, 0.0, 100.0, 100.0))).unwrap();
//! world.create_body(rect(0.0, 0.0, 10.0, 10.0), 1, Mobility::Dynamic, OverlapClass::All).unwrap();
//! world.create_body(rect(10.0, 0.0, 10.0, 10.0), 2, Mobility::Static, OverlapClass::StaticOnly).unwrap();
//!
//! let mut bus = EventBus::new();
//! bus.block_moves_into(2);
//!
//! world.request_move(1, v2(5.0, 0.0));
//! world.resolve(&mut bus);
//! assert_eq!(world.rect(1).pos, v2(0.0, 0.0));
//! ```

pub mod geom;
mod config;
mod error;
mod quadtree;
mod util;
mod world;

pub use config::*;
pub use error::*;
pub use quadtree::{IndexStats, QuadTree, DEFAULT_MAX_DEPTH, DEFAULT_NODE_CAPACITY};
pub use world::*;
