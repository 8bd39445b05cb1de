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

//! Undo log for the in-place search state.
//!
//! `SearchTrail` records, for every operation the engine fixes, the values the
//! state held before. Frames group the entries of one tree level so that a
//! single `backtrack` restores the parent node. Typical usage:
//!
//! 1. `push_frame()` before descending into a child,
//! 2. `apply(state, model, decision)` to fix the child's operation,
//! 3. `backtrack(state)` to return to the parent.
//!
//! Backtracking `k` applied decisions costs `O(k)` and never allocates.

use crate::{
    branching::decision::Decision,
    state::{PreviousTimes, SearchState},
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{
    index::{JobIndex, MachineIndex},
    model::Model,
};

/// A record of one fixed operation, sufficient to undo it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TrailEntry<T> {
    previous: PreviousTimes<T>,
    duration: T,
    job: JobIndex,
    machine: MachineIndex,
}

impl<T> TrailEntry<T>
where
    T: Copy,
{
    /// Returns the job whose operation was fixed.
    #[inline]
    pub fn job(&self) -> JobIndex {
        self.job
    }

    /// Returns the machine the operation ran on.
    #[inline]
    pub fn machine(&self) -> MachineIndex {
        self.machine
    }

    /// Returns the duration of the fixed operation.
    #[inline]
    pub fn duration(&self) -> T {
        self.duration
    }
}

impl<T> std::fmt::Display for TrailEntry<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrailEntry(job: {}, machine: {}, old_job_ready: {}, old_machine_ready: {}, old_makespan: {})",
            self.job.get(),
            self.machine.get(),
            self.previous.job_ready,
            self.previous.machine_ready,
            self.previous.makespan
        )
    }
}

/// A linear undo log with frame markers.
#[derive(Debug, Clone)]
pub struct SearchTrail<T> {
    /// Every change applied to the state, oldest first.
    entries: Vec<TrailEntry<T>>,
    /// `frames[i]` is the index into `entries` where depth `i` began.
    frames: Vec<usize>,
}

impl<T> Default for SearchTrail<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchTrail<T> {
    /// Creates a new, empty trail.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a trail with room for a full descent through `num_operations` levels.
    #[inline]
    pub fn preallocated(num_operations: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_operations),
            frames: Vec::with_capacity(num_operations + 1),
        }
    }

    /// Grows the buffers to hold a full descent through `num_operations` levels.
    pub fn ensure_capacity(&mut self, num_operations: usize) {
        if self.entries.capacity() < num_operations {
            self.entries.reserve(num_operations - self.entries.len());
        }
        if self.frames.capacity() < num_operations + 1 {
            self.frames.reserve((num_operations + 1) - self.frames.len());
        }
    }

    /// Returns the number of entries on the trail.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of open frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frame is open.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Opens a new frame. Everything applied until the matching
    /// `backtrack` belongs to it.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Fixes the operation described by `decision` in `state` and records how to undo it.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `decision` does not target the next
    /// unscheduled operation of its job.
    pub fn apply(&mut self, state: &mut SearchState<T>, model: &Model<T>, decision: &Decision<T>)
    where
        T: PrimInt + Signed,
    {
        let job = decision.job();
        debug_assert!(
            job.get() < state.num_jobs(),
            "called `SearchTrail::apply` with job index out of bounds: the len is {} but the index is {}",
            state.num_jobs(),
            job.get()
        );
        debug_assert_eq!(
            state.next_operation(job),
            decision.position(),
            "called `SearchTrail::apply` with a decision for operation {} of job {}, but its next operation is {}",
            decision.position(),
            job.get(),
            state.next_operation(job)
        );
        debug_assert_eq!(
            model.operation(job, decision.position()).machine(),
            decision.machine(),
            "called `SearchTrail::apply` with a decision on the wrong machine"
        );

        let machine = decision.machine();
        self.entries.push(TrailEntry {
            previous: PreviousTimes {
                job_ready: state.job_ready_time(job),
                machine_ready: state.machine_ready_time(machine),
                makespan: state.makespan(),
            },
            duration: decision.duration(),
            job,
            machine,
        });

        let offset = model.operation_offset(job, decision.position());
        // SAFETY: indices were validated above and by `operation_offset`.
        unsafe {
            state.schedule_operation(
                job,
                machine,
                offset,
                decision.start_time(),
                decision.duration(),
            );
        }
    }

    /// Closes the innermost frame, undoing everything applied since it was opened.
    pub fn backtrack(&mut self, state: &mut SearchState<T>)
    where
        T: PrimInt + Signed,
    {
        let Some(start) = self.frames.pop() else {
            return;
        };

        while self.entries.len() > start {
            // SAFETY: the loop condition guarantees a remaining entry.
            let entry = unsafe { self.entries.pop().unwrap_unchecked() };
            unsafe {
                state.unschedule_operation(
                    entry.job,
                    entry.machine,
                    entry.duration,
                    entry.previous,
                );
            }
        }
    }

    /// Undoes every recorded change and drops all frames.
    pub fn clear(&mut self, state: &mut SearchState<T>)
    where
        T: PrimInt + Signed,
    {
        while let Some(entry) = self.entries.pop() {
            unsafe {
                state.unschedule_operation(
                    entry.job,
                    entry.machine,
                    entry.duration,
                    entry.previous,
                );
            }
        }
        self.frames.clear();
    }

    /// Forgets all entries and frames without touching any state.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    /// Returns an iterator over the recorded entries, oldest first.
    #[inline]
    pub fn iter_entries(&self) -> std::slice::Iter<'_, TrailEntry<T>> {
        self.entries.iter()
    }
}

impl<T> std::fmt::Display for SearchTrail<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfloor_model::model::ModelBuilder;

    type IntegerType = i64;

    fn two_by_two() -> Model<IntegerType> {
        let mut b = ModelBuilder::new(2, 2);
        b.add_operations(JobIndex::new(0), [(MachineIndex::new(0), 3), (MachineIndex::new(1), 2)]);
        b.add_operations(JobIndex::new(1), [(MachineIndex::new(1), 2), (MachineIndex::new(0), 1)]);
        b.build().unwrap()
    }

    fn decide(
        model: &Model<IntegerType>,
        state: &SearchState<IntegerType>,
        job: usize,
    ) -> Decision<IntegerType> {
        Decision::for_job(model, state, JobIndex::new(job)).unwrap()
    }

    #[test]
    fn test_new_trail_is_empty() {
        let trail = SearchTrail::<IntegerType>::new();
        assert!(trail.is_empty());
        assert_eq!(trail.depth(), 0);
        assert_eq!(trail.num_entries(), 0);
    }

    #[test]
    fn test_backtrack_restores_parent_level_by_level() {
        let model = two_by_two();
        let root = SearchState::new(&model);
        let mut state = root.clone();
        let mut trail = SearchTrail::preallocated(model.num_operations());

        trail.push_frame();
        let d = decide(&model, &state, 0);
        trail.apply(&mut state, &model, &d);
        let after_first = state.clone();

        trail.push_frame();
        let d = decide(&model, &state, 1);
        trail.apply(&mut state, &model, &d);
        assert_eq!(state.num_scheduled(), 2);
        assert_eq!(trail.depth(), 2);
        assert_eq!(trail.num_entries(), 2);

        trail.backtrack(&mut state);
        assert_eq!(state, after_first);
        assert_eq!(trail.depth(), 1);

        trail.backtrack(&mut state);
        assert_eq!(state, root);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_backtrack_on_empty_trail_is_noop() {
        let model = two_by_two();
        let mut state = SearchState::new(&model);
        let mut trail = SearchTrail::new();
        trail.backtrack(&mut state);
        assert_eq!(state, SearchState::new(&model));
    }

    #[test]
    fn test_full_descent_and_clear() {
        let model = two_by_two();
        let root = SearchState::new(&model);
        let mut state = root.clone();
        let mut trail = SearchTrail::new();

        for job in [1, 0, 0, 1] {
            trail.push_frame();
            let d = decide(&model, &state, job);
            trail.apply(&mut state, &model, &d);
        }
        assert!(state.is_complete());
        assert_eq!(state.makespan(), 5);
        assert_eq!(state.start_times(), &[0, 3, 0, 3]);

        trail.clear(&mut state);
        assert_eq!(state, root);
        assert_eq!(trail.num_entries(), 0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_display() {
        let trail = SearchTrail::<IntegerType>::new();
        assert_eq!(trail.to_string(), "SearchTrail(entries: 0, frames: 0)");
    }
}
