// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Bounded work queue of the dynamic strategy.
//!
//! The queue tracks, next to its items, the number of *pending* subproblems:
//! those queued plus those a worker popped and has not finished yet. Workers
//! block in `pop` while the queue is empty but work is still pending, since a
//! pending subproblem may still produce children. Once nothing is pending the
//! tree is covered and every `pop` returns `None`.
//!
//! A full queue rejects `try_push` and hands the subproblem back; the
//! producer then solves it itself. No subproblem is ever dropped.

use shopfloor_bnb::subproblem::Subproblem;
use std::{
    collections::VecDeque,
    sync::{Condvar, Mutex, PoisonError},
    time::Duration,
};

/// Interval at which blocked workers re-check their stop condition.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, Default)]
struct QueueState {
    items: VecDeque<Subproblem>,
    pending: usize,
    closed: bool,
}

/// A bounded multi-producer, multi-consumer queue of subproblems.
#[derive(Debug)]
pub struct WorkQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
    capacity: usize,
}

impl WorkQueue {
    /// Slots reserved up front; the queue grows on demand up to its capacity.
    const INITIAL_CAPACITY: usize = 4096;

    /// Creates an empty queue holding at most `capacity` (at least one) items.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity.min(Self::INITIAL_CAPACITY)),
                pending: 0,
                closed: false,
            }),
            ready: Condvar::new(),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of queued items.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of queued or in-progress subproblems.
    pub fn pending(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
    }

    /// Queues `subproblem`, or hands it back if the queue is full or closed.
    pub fn try_push(&self, subproblem: Subproblem) -> Result<(), Subproblem> {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.closed || guard.items.len() >= self.capacity {
            return Err(subproblem);
        }
        guard.items.push_back(subproblem);
        guard.pending += 1;
        drop(guard);
        self.ready.notify_one();
        Ok(())
    }

    /// Takes the oldest queued subproblem, blocking while the queue is empty
    /// but work is pending. Returns `None` once nothing is pending, the queue
    /// is closed, or `should_stop` returns `true`.
    ///
    /// Every `Some` must be matched by a call to `task_done`.
    pub fn pop<F>(&self, should_stop: F) -> Option<Subproblem>
    where
        F: Fn() -> bool,
    {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if guard.closed {
                return None;
            }
            if let Some(item) = guard.items.pop_front() {
                return Some(item);
            }
            if guard.pending == 0 || should_stop() {
                return None;
            }
            guard = self
                .ready
                .wait_timeout(guard, STOP_POLL_INTERVAL)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Marks a popped subproblem as finished, including all children its
    /// worker solved itself.
    pub fn task_done(&self) {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        debug_assert!(
            guard.pending > 0,
            "called `WorkQueue::task_done` without a pending subproblem"
        );
        guard.pending = guard.pending.saturating_sub(1);
        let finished = guard.pending == 0;
        drop(guard);
        if finished {
            self.ready.notify_all();
        }
    }

    /// Wakes every blocked worker and makes all further `pop` calls return `None`.
    pub fn close(&self) {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        guard.closed = true;
        drop(guard);
        self.ready.notify_all();
    }

    /// Returns `true` if every queued subproblem was finished and the queue
    /// was not closed.
    pub fn is_drained(&self) -> bool {
        let guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        !guard.closed && guard.pending == 0 && guard.items.is_empty()
    }
}
