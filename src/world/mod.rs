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


mod body;
mod bus;
mod notify;

pub use self::body::{Body, BodyId, Mobility, OverlapClass, QueryFilter};
pub use self::bus::{EventBus, Priority, SubscriptionId};
pub use self::notify::{CollisionEntered, Corrections, Notification, NotificationSink, PositionChanged};

use crate::config::{tile_bounds, WorldConfig};
use crate::error::WorldError;
use crate::geom::{Rect, Vec2};
use crate::quadtree::{IndexStats, QuadTree};
use crate::util::{dedup_ids, ProcessQueue};
use fnv::FnvHashMap;
use tracing::{debug, trace, warn};

/// The single authority over a set of bodies, their two spatial indices
/// (one for static bodies, one for dynamic bodies), and the per-tick
/// movement protocol.
///
/// Movement is deferred. During a frame, gameplay code queues relative moves
/// with `request_move` (or teleports with `absolute_move`). Once per tick,
/// `resolve` tests every queued move against the indices, lets the owners of
/// the bodies that would be hit respond through a `NotificationSink`, then
/// commits the net motion and rebuilds both indices.
pub struct CollisionWorld {
    config: WorldConfig,
    bodies: FnvHashMap<BodyId, Body>,
    static_index: QuadTree,
    dynamic_index: QuadTree,
    process: ProcessQueue,
}

impl CollisionWorld {
    /// Constructs an empty world from `config`.
    pub fn new(config: WorldConfig) -> Result<CollisionWorld, WorldError> {
        config.validate()?;
        let mut static_index = QuadTree::new(config.node_capacity, config.max_depth);
        let mut dynamic_index = QuadTree::new(config.node_capacity, config.max_depth);
        static_index.init(config.bounds);
        dynamic_index.init(config.bounds);
        Ok(CollisionWorld {
            config,
            bodies: FnvHashMap::default(),
            static_index,
            dynamic_index,
            process: ProcessQueue::new(),
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn world_bounds(&self) -> Rect {
        self.config.bounds
    }

    /// Number of live bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    /// Returns the body with the given `id`. Panics if there is none.
    pub fn body(&self, id: BodyId) -> &Body {
        self.bodies
            .get(&id)
            .unwrap_or_else(|| panic!("body id {} not found", id))
    }

    /// Shorthand for `self.body(id).rect()`.
    pub fn rect(&self, id: BodyId) -> Rect {
        self.body(id).rect()
    }

    /// Returns `true` if `id` will be committed by the next `resolve`.
    pub fn is_queued(&self, id: BodyId) -> bool {
        self.process.contains(id)
    }

    /// Iterates over all live bodies, in no particular order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    /// Shape of the spatial index holding bodies of the given mobility.
    pub fn index_stats(&self, mobility: Mobility) -> IndexStats {
        self.index(mobility).stats()
    }

    /// # Registers a new body.
    ///
    /// The body is inserted into the static or dynamic index according to
    /// `mobility`, and collides with the populations named by `overlap` when
    /// it moves. Panics if `id` is already in use.
    ///
    /// Returns an error, leaving the world unchanged, if `rect` is degenerate
    /// or lies entirely outside the world.
    pub fn create_body(
        &mut self,
        rect: Rect,
        id: BodyId,
        mobility: Mobility,
        overlap: OverlapClass,
    ) -> Result<BodyId, WorldError> {
        assert!(!self.bodies.contains_key(&id), "body id {} already in use", id);
        if rect.is_degenerate() {
            return Err(WorldError::DegenerateRect { id, rect });
        }
        if !self.config.bounds.intersects(&rect) {
            return Err(WorldError::OutsideWorld { id, rect, world: self.config.bounds });
        }
        self.index_mut(mobility).insert(id, rect);
        self.bodies.insert(id, Body::new(id, rect, mobility, overlap));
        debug!(id, ?rect, ?mobility, ?overlap, "created body");
        Ok(id)
    }

    /// Removes the body with the given `id` and returns its final state,
    /// discarding any queued motion. Panics if there is no such body.
    ///
    /// The spatial index forgets the body at the next rebuild; until then,
    /// queries and collision tests skip it.
    pub fn remove_body(&mut self, id: BodyId) -> Body {
        let body = self
            .bodies
            .remove(&id)
            .unwrap_or_else(|| panic!("body id {} not found", id));
        self.process.remove(id);
        debug!(id, "removed body");
        body
    }

    /// Removes every body and empties both indices.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.process.clear();
        self.static_index.init(self.config.bounds);
        self.dynamic_index.init(self.config.bounds);
        debug!("cleared world");
    }

    /// Replaces the world bounds and rebuilds both indices.
    pub fn resize_world(&mut self, bounds: Rect) -> Result<(), WorldError> {
        if bounds.is_degenerate() {
            return Err(WorldError::DegenerateWorld(bounds));
        }
        self.config.bounds = bounds;
        self.rebuild_indices();
        debug!(?bounds, "resized world");
        Ok(())
    }

    /// Resizes the world to a tile map anchored at the origin.
    pub fn resize_world_tiles(
        &mut self,
        tile_width: f64,
        tiles_x: f64,
        tile_height: f64,
        tiles_y: f64,
    ) -> Result<(), WorldError> {
        self.resize_world(tile_bounds(tile_width, tiles_x, tile_height, tiles_y))
    }

    /// Resizes the world to `size`, anchored at the origin.
    pub fn resize_world_to_size(&mut self, size: Vec2) -> Result<(), WorldError> {
        self.resize_world(Rect::new(Vec2::zero(), size))
    }

    /// Returns `true` if the body `id` could be placed with its top-left corner
    /// at `target` without overlapping any other body it collides with.
    ///
    /// This is a pure probe: nothing is queued and nothing is published.
    pub fn test_move(&self, id: BodyId, target: Vec2) -> bool {
        let body = self.body(id);
        let probe = body.rect().moved_to(target);
        self.hits(id, body.overlap().filter(), &probe).is_empty()
    }

    /// Queues a relative move of the body `id`, to be tested by the next
    /// `resolve`. Repeated requests accumulate. The move is committed only
    /// for dynamic bodies; a static body is tested and notified as usual but
    /// stays where it is.
    ///
    /// Panics if `id` is unknown.
    pub fn request_move(&mut self, id: BodyId, displacement: Vec2) {
        assert!(displacement.is_finite(), "non-finite displacement {:?} for body {}", displacement, id);
        self.body_mut(id).queue_displacement(displacement);
        self.process.push(id);
    }

    /// Queues a move of the body `id` towards `position`, as the
    /// displacement from its current top-left corner.
    pub fn request_move_to(&mut self, id: BodyId, position: Vec2) {
        let displacement = position - self.rect(id).pos;
        self.request_move(id, displacement);
    }

    /// Queues a correction for the body `id`, applied after its
    /// displacements the next time it is committed.
    ///
    /// Collision handlers normally do this through the `Corrections` handed
    /// to them during `resolve`.
    pub fn request_correction(&mut self, id: BodyId, correction: Vec2) {
        notify::check_correction(&self.bodies, id, correction);
        self.body_mut(id).queue_correction(correction);
    }

    /// Moves the body `id` so its top-left corner is at `position`, right
    /// away. Queued displacements and corrections are dropped, and the body
    /// skips collision testing in the next `resolve`.
    pub fn absolute_move(&mut self, id: BodyId, position: Vec2) {
        assert!(position.is_finite(), "non-finite position {:?} for body {}", position, id);
        self.body_mut(id).teleport_to(position);
        self.process.push(id);
    }

    /// Returns the ids of the bodies intersecting `area`, without duplicates.
    pub fn query_area(&self, area: &Rect, filter: QueryFilter) -> Vec<BodyId> {
        let mut ids = Vec::new();
        if filter.includes_dynamic() {
            ids.extend(self.dynamic_index.query(area));
        }
        if filter.includes_static() {
            ids.extend(self.static_index.query(area));
        }
        ids.retain(|id| self.bodies.contains_key(id));
        dedup_ids(ids)
    }

    /// # Runs one tick of the movement protocol.
    ///
    /// 1. Takes every body with queued motion, in the order they were first
    ///    queued this tick.
    /// 2. For each one that did not teleport, tests each queued displacement
    ///    in turn (cumulatively) against the indices selected by its overlap
    ///    class. For every step that hits something, `sink` receives one
    ///    `CollisionEntered` per hit body and then one for the mover.
    ///    Handlers may queue corrections.
    /// 3. Commits displacements and then corrections into each dynamic body's
    ///    rect. Static bodies keep theirs.
    /// 4. Publishes `PositionChanged` for each committed body.
    /// 5. Rebuilds both indices from the committed rects.
    ///
    /// Nothing is changed before step 3, so if a handler panics during step 2
    /// the world is left as it was before the call, queued motion included.
    ///
    /// Returns the committed ids in processing order.
    pub fn resolve<S: NotificationSink + ?Sized>(&mut self, sink: &mut S) -> Vec<BodyId> {
        let batch = self.process.snapshot();
        let mut corrections = Vec::new();
        let mut published = 0;

        for &id in &batch {
            let body = self.body(id);
            if body.is_teleporting() {
                continue;
            }
            let (rect, filter) = (body.rect(), body.overlap().filter());

            let mut target = rect.pos;
            for &displacement in body.pending_displacements() {
                target += displacement;
                let all_hits = self.hits(id, filter, &rect.moved_to(target));
                if all_hits.is_empty() {
                    continue;
                }
                let mut event = CollisionEntered { mover: id, hit: id, all_hits, displacement };
                let mut handle = Corrections::new(&self.bodies, &mut corrections);
                for index in 0..event.all_hits.len() {
                    event.hit = event.all_hits[index];
                    trace!(mover = id, hit = event.hit, ?displacement, "collision entered");
                    sink.collision_entered(&event, &mut handle);
                }
                event.hit = id;
                sink.collision_entered(&event, &mut handle);
                published += event.all_hits.len() + 1;
            }
        }

        for (id, correction) in corrections {
            self.body_mut(id).queue_correction(correction);
        }
        self.process.clear();
        let mut committed = Vec::with_capacity(batch.len());
        for id in batch {
            let body = self.body_mut(id);
            body.commit();
            committed.push(PositionChanged { id, rect: body.rect() });
        }
        for event in &committed {
            sink.position_changed(event);
        }

        self.rebuild_indices();
        debug!(committed = committed.len(), collisions = published, "resolved tick");
        committed.into_iter().map(|event| event.id).collect()
    }

    // Ids of the live bodies other than `mover` that intersect `probe`,
    // dynamic hits first.
    fn hits(&self, mover: BodyId, filter: QueryFilter, probe: &Rect) -> Vec<BodyId> {
        let mut ids = self.query_area(probe, filter);
        ids.retain(|&id| id != mover);
        ids
    }

    // Builds fresh trees and swaps them in, so a panic part way through
    // leaves the previous indices untouched.
    fn rebuild_indices(&mut self) {
        let bounds = self.config.bounds;
        let mut statics = Vec::new();
        let mut dynamics = Vec::new();
        for body in self.bodies.values() {
            if !bounds.intersects(&body.rect()) {
                warn!(id = body.id(), rect = ?body.rect(), "body lies outside the world and cannot be indexed");
                continue;
            }
            match body.mobility() {
                Mobility::Static => statics.push((body.id(), body.rect())),
                Mobility::Dynamic => dynamics.push((body.id(), body.rect())),
            }
        }
        statics.sort_unstable_by_key(|&(id, _)| id);
        dynamics.sort_unstable_by_key(|&(id, _)| id);
        let (capacity, max_depth) = (self.config.node_capacity, self.config.max_depth);
        let static_index = QuadTree::build(capacity, max_depth, bounds, statics);
        let dynamic_index = QuadTree::build(capacity, max_depth, bounds, dynamics);
        self.static_index = static_index;
        self.dynamic_index = dynamic_index;
    }

    pub(crate) fn index(&self, mobility: Mobility) -> &QuadTree {
        match mobility {
            Mobility::Static => &self.static_index,
            Mobility::Dynamic => &self.dynamic_index,
        }
    }

    fn index_mut(&mut self, mobility: Mobility) -> &mut QuadTree {
        match mobility {
            Mobility::Static => &mut self.static_index,
            Mobility::Dynamic => &mut self.dynamic_index,
        }
    }

    fn body_mut(&mut self, id: BodyId) -> &mut Body {
        self.bodies
            .get_mut(&id)
            .unwrap_or_else(|| panic!("body id {} not found", id))
    }
}
