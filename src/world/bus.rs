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


// EventBus is a ready-made NotificationSink that fans notifications out to
// subscribed closures. Subscriptions are kept in a BTreeMap ordered by
// priority and then by subscription order, so delivery order is fixed.

use crate::world::body::BodyId;
use crate::world::notify::{CollisionEntered, Corrections, NotificationSink, PositionChanged};
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};

/// Delivery priority of a subscription. `High` handlers run first.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Hash)]
pub enum Priority {
    High,
    Normal,
    Low,
}

/// Handle returned by the `EventBus::on_*` methods, used to unsubscribe.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Hash)]
pub struct SubscriptionId {
    priority: Priority,
    index: u64,
}

type CollisionHandler = Box<dyn FnMut(&CollisionEntered, &mut Corrections<'_>)>;
type PositionHandler = Box<dyn FnMut(&PositionChanged)>;

enum Handler {
    Collision(CollisionHandler),
    Position(PositionHandler),
}

struct Subscription {
    // None subscribes to notifications addressed to any body.
    target: Option<BodyId>,
    handler: Handler,
}

impl Subscription {
    fn wants(&self, id: BodyId) -> bool {
        self.target.map_or(true, |target| target == id)
    }
}

/// A prioritized publish/subscribe sink for collision notifications.
///
/// Handlers subscribe either to one body (receiving only the notifications
/// addressed to it) or to every body. Within a priority, handlers run in the
/// order they subscribed.
#[derive(Default)]
pub struct EventBus {
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
    next_index: u64,
}

impl EventBus {
    pub fn new() -> EventBus {
        EventBus::default()
    }

    /// Subscribes `handler` to `CollisionEntered` notifications addressed to
    /// `target`, or to all of them if `target` is `None`.
    pub fn on_collision<F>(&mut self, target: Option<BodyId>, priority: Priority, handler: F) -> SubscriptionId
    where
        F: FnMut(&CollisionEntered, &mut Corrections<'_>) + 'static,
    {
        self.subscribe(target, priority, Handler::Collision(Box::new(handler)))
    }

    /// Subscribes `handler` to `PositionChanged` notifications for `target`,
    /// or for every body if `target` is `None`.
    pub fn on_position_changed<F>(&mut self, target: Option<BodyId>, priority: Priority, handler: F) -> SubscriptionId
    where
        F: FnMut(&PositionChanged) + 'static,
    {
        self.subscribe(target, priority, Handler::Position(Box::new(handler)))
    }

    /// Makes `blocker` impassable: every displacement step that runs into it
    /// is cancelled with an equal and opposite correction on the mover.
    pub fn block_moves_into(&mut self, blocker: BodyId) -> SubscriptionId {
        self.on_collision(Some(blocker), Priority::Normal, move |event, corrections| {
            if event.mover != blocker {
                corrections.request_correction(event.mover, -event.displacement);
            }
        })
    }

    /// Removes a subscription. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    fn subscribe(&mut self, target: Option<BodyId>, priority: Priority, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId { priority, index: self.next_index };
        self.next_index += 1;
        assert!(self.subscriptions.insert(id, Subscription { target, handler }).is_none());
        id
    }
}

impl NotificationSink for EventBus {
    fn collision_entered(&mut self, event: &CollisionEntered, corrections: &mut Corrections<'_>) {
        for subscription in self.subscriptions.values_mut() {
            if !subscription.wants(event.hit) {
                continue;
            }
            if let Handler::Collision(ref mut handler) = subscription.handler {
                handler(event, &mut *corrections);
            }
        }
    }

    fn position_changed(&mut self, event: &PositionChanged) {
        for subscription in self.subscriptions.values_mut() {
            if !subscription.wants(event.id) {
                continue;
            }
            if let Handler::Position(ref mut handler) = subscription.handler {
                handler(event);
            }
        }
    }
}

impl Debug for EventBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .field("next_index", &self.next_index)
            .finish()
    }
}
