// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::timer::{EventId, Scheduler},
    parking_lot::Mutex,
    std::{
        sync::Arc,
        time::{Duration, Instant},
    },
};

struct SchedulerState {
    now: Instant,
    next_id: u64,
    scheduled: Vec<(EventId, Instant)>,
    cancelled: Vec<EventId>,
}

/// A `Scheduler` driven by a manually advanced clock. Clones share the same clock and queue, so
/// a test keeps one handle while the code under test owns another.
#[derive(Clone)]
pub struct FakeScheduler {
    state: Arc<Mutex<SchedulerState>>,
}

impl FakeScheduler {
    pub fn new() -> Self {
        FakeScheduler {
            state: Arc::new(Mutex::new(SchedulerState {
                now: Instant::now(),
                next_id: 0,
                scheduled: vec![],
                cancelled: vec![],
            })),
        }
    }

    /// Moves the clock forward and returns the events whose deadline passed, earliest first.
    pub fn advance(&self, duration: Duration) -> Vec<EventId> {
        let mut state = self.state.lock();
        state.now += duration;
        let now = state.now;
        let mut expired: Vec<(EventId, Instant)> =
            state.scheduled.iter().filter(|(_, deadline)| *deadline <= now).copied().collect();
        state.scheduled.retain(|(_, deadline)| *deadline > now);
        expired.sort_by_key(|(id, deadline)| (*deadline, *id));
        expired.into_iter().map(|(id, _)| id).collect()
    }

    /// Pops the pending event with the earliest deadline and moves the clock to it.
    pub fn expire_next(&self) -> Option<EventId> {
        let mut state = self.state.lock();
        let (idx, _) = state
            .scheduled
            .iter()
            .enumerate()
            .min_by_key(|(_, (id, deadline))| (*deadline, *id))?;
        let (id, deadline) = state.scheduled.remove(idx);
        if deadline > state.now {
            state.now = deadline;
        }
        Some(id)
    }

    pub fn deadline(&self, id: EventId) -> Option<Instant> {
        self.state.lock().scheduled.iter().find(|(i, _)| *i == id).map(|(_, deadline)| *deadline)
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().scheduled.len()
    }

    pub fn is_cancelled(&self, id: EventId) -> bool {
        self.state.lock().cancelled.contains(&id)
    }
}

impl Scheduler for FakeScheduler {
    fn now(&self) -> Instant {
        self.state.lock().now
    }

    fn schedule(&mut self, deadline: Instant) -> EventId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = EventId(state.next_id);
        state.scheduled.push((id, deadline));
        id
    }

    fn cancel(&mut self, id: EventId) {
        let mut state = self.state.lock();
        state.scheduled.retain(|(i, _)| *i != id);
        state.cancelled.push(id);
    }
}
