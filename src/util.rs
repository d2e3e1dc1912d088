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


use crate::world::BodyId;
use fnv::FnvHashSet;

// Removes repeated ids, keeping the first occurrence of each.
pub fn dedup_ids(ids: Vec<BodyId>) -> Vec<BodyId> {
    let mut seen = FnvHashSet::default();
    ids.into_iter().filter(|&id| seen.insert(id)).collect()
}

// ProcessQueue is a set of body ids that remembers insertion order. It holds
// the ids with movement awaiting the next resolve.
#[derive(Clone, Debug, Default)]
pub struct ProcessQueue {
    order: Vec<BodyId>,
    members: FnvHashSet<BodyId>,
}

impl ProcessQueue {
    pub fn new() -> ProcessQueue {
        ProcessQueue::default()
    }

    // Returns false if the id was already queued.
    pub fn push(&mut self, id: BodyId) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    pub fn remove(&mut self, id: BodyId) -> bool {
        if self.members.remove(&id) {
            self.order.retain(|&other| other != id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.members.contains(&id)
    }

    // Returns the queued ids in insertion order, leaving the queue as is.
    pub fn snapshot(&self) -> Vec<BodyId> {
        self.order.clone()
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.order.clear();
    }
}
