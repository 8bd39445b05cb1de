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

//! # Shared Incumbent
//!
//! A concurrent holder for the best schedule discovered so far. Workers read
//! the best makespan through a lock-free atomic on every node and only take
//! the mutex when they actually hold an improving schedule.
//!
//! ## Guarantees
//!
//! - `try_install` performs the comparison and the copy of the schedule under
//!   a single mutex, so a reader never sees a half-written schedule and two
//!   racing improvements can never both win against the same incumbent.
//! - The atomic bound is written only while the mutex is held and only after
//!   the schedule was stored. Every value a reader observes is therefore the
//!   makespan of a schedule that was really installed. It may lag behind the
//!   newest one, which only weakens pruning for a moment.
//! - `upper_bound` starts at `i64::MAX`, meaning "no incumbent yet".
//!
//! ## Usage
//!
//! ```rust
//! use shopfloor_search::incumbent::SharedIncumbent;
//! use shopfloor_model::solution::Schedule;
//!
//! let incumbent: SharedIncumbent<i64> = SharedIncumbent::new();
//! assert!(incumbent.try_install(&Schedule::new(12, vec![0, 5])));
//! assert!(!incumbent.try_install(&Schedule::new(12, vec![1, 6])));
//! assert_eq!(incumbent.upper_bound(), 12);
//! assert_eq!(incumbent.improvements(), 1);
//! ```

use num_traits::{PrimInt, Signed};
use shopfloor_model::solution::Schedule;
use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicI64, AtomicU64, Ordering},
};

/// A concurrent holder for the best (incumbent) schedule found during search.
#[derive(Debug)]
pub struct SharedIncumbent<T> {
    /// Makespan of the installed schedule, `i64::MAX` while there is none.
    upper_bound: AtomicI64,
    /// Number of successful `try_install` calls.
    improvements: AtomicU64,
    /// The incumbent schedule. Source of truth for the atomic above.
    schedule: Mutex<Option<Schedule<T>>>,
}

impl<T> Default for SharedIncumbent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SharedIncumbent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(upper_bound: {})", self.upper_bound())
    }
}

impl<T> SharedIncumbent<T> {
    /// Creates an empty incumbent. The upper bound is `i64::MAX`.
    #[inline]
    pub fn new() -> Self {
        Self {
            upper_bound: AtomicI64::new(i64::MAX),
            improvements: AtomicU64::new(0),
            schedule: Mutex::new(None),
        }
    }

    /// Creates an incumbent seeded with `schedule`.
    ///
    /// Seeding does not count as an improvement.
    #[inline]
    pub fn with_schedule(schedule: Schedule<T>) -> Self
    where
        T: PrimInt + Signed + Into<i64>,
    {
        Self {
            upper_bound: AtomicI64::new(schedule.makespan().into()),
            improvements: AtomicU64::new(0),
            schedule: Mutex::new(Some(schedule)),
        }
    }

    /// Returns the current upper bound.
    #[inline]
    pub fn upper_bound(&self) -> i64 {
        self.upper_bound.load(Ordering::Relaxed)
    }

    /// Returns the current upper bound converted to `T`.
    ///
    /// Fails while no schedule is installed and `T` is narrower than `i64`.
    #[inline]
    pub fn upper_bound_as(&self) -> Result<T, <T as TryFrom<i64>>::Error>
    where
        T: TryFrom<i64>,
    {
        T::try_from(self.upper_bound())
    }

    /// Returns `true` once a schedule is installed.
    #[inline]
    pub fn has_schedule(&self) -> bool {
        self.upper_bound() != i64::MAX
    }

    /// Returns how many schedules were installed through `try_install`.
    #[inline]
    pub fn improvements(&self) -> u64 {
        self.improvements.load(Ordering::Relaxed)
    }

    /// Returns a copy of the current incumbent schedule, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Schedule<T>>
    where
        T: Clone,
    {
        let guard = self.schedule.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Installs `candidate` if its makespan is strictly better than the
    /// incumbent's. Returns `true` if the candidate was installed.
    pub fn try_install(&self, candidate: &Schedule<T>) -> bool
    where
        T: PrimInt + Signed + Into<i64>,
    {
        let candidate_makespan: i64 = candidate.makespan().into();

        // Cheap rejection through the atomic hint.
        if candidate_makespan >= self.upper_bound() {
            return false;
        }

        let mut guard = self.schedule.lock().unwrap_or_else(PoisonError::into_inner);
        // The hint may be stale; compare against the stored schedule.
        if let Some(current) = guard.as_ref() {
            if candidate_makespan >= current.makespan().into() {
                return false;
            }
        }

        *guard = Some(candidate.clone());
        self.upper_bound.store(candidate_makespan, Ordering::Relaxed);
        self.improvements.fetch_add(1, Ordering::Relaxed);
        true
    }
}
