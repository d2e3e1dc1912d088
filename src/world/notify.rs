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
use crate::world::body::{Body, BodyId};
use fnv::FnvHashMap;

/// Published during `resolve` when a queued displacement would move a body
/// into others.
///
/// One notification is addressed to each body in `all_hits`, followed by one
/// addressed to the mover itself (`hit == mover`).
#[derive(PartialEq, Clone, Debug)]
pub struct CollisionEntered {
    /// The body whose displacement is being tested.
    pub mover: BodyId,
    /// The body this notification is addressed to.
    pub hit: BodyId,
    /// Every body the mover would overlap after this displacement step,
    /// without duplicates and without the mover.
    pub all_hits: Vec<BodyId>,
    /// The displacement step being tested.
    pub displacement: Vec2,
}

impl CollisionEntered {
    /// Returns `true` for the notification addressed to the mover itself.
    pub fn is_for_mover(&self) -> bool {
        self.hit == self.mover
    }
}

/// Published during `resolve` once a body's new position has been committed.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct PositionChanged {
    pub id: BodyId,
    /// The committed bounds, for owners that mirror the body in a transform.
    pub rect: Rect,
}

/// A notification as recorded by the `Vec<Notification>` sink.
#[derive(PartialEq, Clone, Debug)]
pub enum Notification {
    CollisionEntered(CollisionEntered),
    PositionChanged(PositionChanged),
}

/// Receives the notifications published by `CollisionWorld::resolve`.
///
/// Both methods run synchronously. Every `collision_entered` call of a tick
/// happens before any body of that tick is committed, so a handler can still
/// change the outcome through `corrections`. `position_changed` calls come
/// after the commit and get no way back into the world.
pub trait NotificationSink {
    fn collision_entered(&mut self, event: &CollisionEntered, corrections: &mut Corrections<'_>);

    fn position_changed(&mut self, event: &PositionChanged);
}

impl NotificationSink for () {
    fn collision_entered(&mut self, _event: &CollisionEntered, _corrections: &mut Corrections<'_>) {}

    fn position_changed(&mut self, _event: &PositionChanged) {}
}

impl NotificationSink for Vec<Notification> {
    fn collision_entered(&mut self, event: &CollisionEntered, _corrections: &mut Corrections<'_>) {
        self.push(Notification::CollisionEntered(event.clone()));
    }

    fn position_changed(&mut self, event: &PositionChanged) {
        self.push(Notification::PositionChanged(*event));
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn collision_entered(&mut self, event: &CollisionEntered, corrections: &mut Corrections<'_>) {
        (**self).collision_entered(event, corrections)
    }

    fn position_changed(&mut self, event: &PositionChanged) {
        (**self).position_changed(event)
    }
}

/// The only write access a collision handler gets: it may queue corrections
/// and read the current (not yet committed) bounds of any body.
///
/// Corrections are held here until every notification of the tick has been
/// delivered, so a tick aborted by a panicking handler leaves no body changed.
pub struct Corrections<'a> {
    bodies: &'a FnvHashMap<BodyId, Body>,
    queued: &'a mut Vec<(BodyId, Vec2)>,
}

impl<'a> Corrections<'a> {
    pub(crate) fn new(bodies: &'a FnvHashMap<BodyId, Body>, queued: &'a mut Vec<(BodyId, Vec2)>) -> Corrections<'a> {
        Corrections { bodies, queued }
    }

    /// Queues `correction` for the body `id`. It is applied after the body's
    /// displacements when the tick commits.
    ///
    /// Panics if `id` is unknown.
    pub fn request_correction(&mut self, id: BodyId, correction: Vec2) {
        check_correction(self.bodies, id, correction);
        self.queued.push((id, correction));
    }

    /// Returns the bounds of `id` as of the previous commit, or `None` if no
    /// such body exists.
    pub fn rect(&self, id: BodyId) -> Option<Rect> {
        self.bodies.get(&id).map(Body::rect)
    }
}

pub(crate) fn check_correction(bodies: &FnvHashMap<BodyId, Body>, id: BodyId, correction: Vec2) {
    assert!(correction.is_finite(), "non-finite correction {:?} for body {}", correction, id);
    assert!(bodies.contains_key(&id), "body id {} not found", id);
}
