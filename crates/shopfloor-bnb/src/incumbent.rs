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

//! Incumbent access for the engine.
//!
//! `IncumbentStore<T>` is the engine's view of the best known makespan. It
//! abstracts over a run that keeps its incumbent to itself and a run that
//! races other workers through a `SharedIncumbent`.
//!
//! - `NoSharedIncumbent<T>`: `initial_upper_bound = T::MAX`, `tighten(x) = x`,
//!   publishing is a no-op.
//! - `SharedIncumbentAdapter<'a, T>`: reads the shared atomic bound on every
//!   `tighten` and publishes complete schedules through `try_install`.
//!   A shared bound that does not fit into `T` reads as `T::MAX`.

use shopfloor_model::solution::Schedule;
use shopfloor_search::{incumbent::SharedIncumbent, num::SolverNumeric};
use std::marker::PhantomData;

/// The engine's handle to the best known makespan.
pub trait IncumbentStore<T>
where
    T: SolverNumeric,
{
    /// Returns the upper bound the search starts with.
    fn initial_upper_bound(&self) -> T;
    /// Returns the better of `current_local_best` and the store's bound.
    fn tighten(&self, current_local_best: T) -> T;
    /// Publishes a schedule that beats the run's local bound. Returns `true`
    /// if the store accepted it as its new best.
    fn install(&self, schedule: &Schedule<T>) -> bool;
}

/// Keeps the incumbent local to one run.
#[repr(transparent)]
pub struct NoSharedIncumbent<T>(PhantomData<T>);

impl<T> Default for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> IncumbentStore<T> for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn initial_upper_bound(&self) -> T {
        T::max_value()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: T) -> T {
        current_local_best
    }

    #[inline(always)]
    fn install(&self, _: &Schedule<T>) -> bool {
        true
    }
}

/// Shares the incumbent with every other run holding the same `SharedIncumbent`.
#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct SharedIncumbentAdapter<'a, T> {
    inner: &'a SharedIncumbent<T>,
}

impl<'a, T> SharedIncumbentAdapter<'a, T> {
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent<T>) -> Self {
        Self { inner }
    }
}

impl<'a, T> SharedIncumbentAdapter<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn shared_bound(&self) -> T {
        self.inner.upper_bound_as().unwrap_or_else(|_| T::max_value())
    }
}

impl<'a, T> IncumbentStore<T> for SharedIncumbentAdapter<'a, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn initial_upper_bound(&self) -> T {
        self.shared_bound()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: T) -> T {
        self.shared_bound().min(current_local_best)
    }

    #[inline(always)]
    fn install(&self, schedule: &Schedule<T>) -> bool {
        self.inner.try_install(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn schedule(makespan: IntegerType) -> Schedule<IntegerType> {
        Schedule::new(makespan, vec![0, 1, 2])
    }

    #[test]
    fn test_no_shared_incumbent_is_passthrough() {
        let store: NoSharedIncumbent<IntegerType> = NoSharedIncumbent::new();
        assert_eq!(store.initial_upper_bound(), IntegerType::MAX);
        for val in [0, 1, 42, IntegerType::MAX - 1] {
            assert_eq!(store.tighten(val), val);
        }
        assert!(store.install(&schedule(3)));
        assert_eq!(store.tighten(10), 10);
    }

    #[test]
    fn test_adapter_reads_shared_bound() {
        let shared = SharedIncumbent::<IntegerType>::new();
        let adapter = SharedIncumbentAdapter::new(&shared);
        assert_eq!(adapter.initial_upper_bound(), IntegerType::MAX);

        assert!(shared.try_install(&schedule(120)));
        assert_eq!(adapter.initial_upper_bound(), 120);
        assert_eq!(adapter.tighten(350), 120);
        assert_eq!(adapter.tighten(100), 100);
    }

    #[test]
    fn test_adapter_publishes_solutions() {
        let shared = SharedIncumbent::<IntegerType>::new();
        let adapter = SharedIncumbentAdapter::new(&shared);

        assert!(adapter.install(&schedule(95)));
        assert!(!adapter.install(&schedule(97)));
        assert!(!adapter.install(&schedule(95)));
        assert_eq!(shared.upper_bound(), 95);
        assert_eq!(shared.improvements(), 1);
        assert_eq!(shared.snapshot().unwrap().start_times(), &[0, 1, 2]);
    }

    #[test]
    fn test_narrow_type_without_schedule_reads_max() {
        let shared = SharedIncumbent::<i32>::new();
        let adapter = SharedIncumbentAdapter::new(&shared);
        assert_eq!(adapter.initial_upper_bound(), i32::MAX);
        assert_eq!(adapter.tighten(7), 7);
    }
}
