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

//! Search state of the branch-and-bound engine.
//!
//! `SearchState` is one node of the search tree: a partial schedule in which
//! every job has fixed a prefix of its operations. It tracks
//!
//! - per job the next unscheduled operation and the time the job is free,
//! - per machine the time it is free, its remaining workload and the number of
//!   operations still waiting for it,
//! - the start time of every fixed operation and the current makespan.
//!
//! Children are produced by fixing the next operation of one job at its
//! earliest feasible start. The engine never clones states; it mutates one
//! instance in place and undoes changes through `SearchTrail`, which is the
//! only caller of `schedule_operation` and `unschedule_operation`.
//!
//! Invariants:
//! - `num_scheduled == Σ next_operation(j)` and `num_scheduled <= num_operations`.
//! - Every fixed operation starts no earlier than both the completion of its
//!   job predecessor and the machine's previous completion.
//! - `makespan` is the largest completion time among fixed operations.

use num_traits::{PrimInt, Signed};
use shopfloor_model::{
    index::{JobIndex, MachineIndex},
    model::Model,
    solution::Schedule,
};

/// A partial schedule, mutated in place during search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState<T> {
    next_operation: Vec<usize>,
    job_ready_times: Vec<T>,
    machine_ready_times: Vec<T>,
    machine_remaining_work: Vec<T>,
    machine_pending_operations: Vec<usize>,
    start_times: Vec<T>,
    makespan: T,
    num_scheduled: usize,
}

impl<T> SearchState<T>
where
    T: PrimInt + Signed,
{
    /// Creates the root state of `model`: nothing scheduled, everything free at time zero.
    pub fn new(model: &Model<T>) -> Self {
        let machines = (0..model.num_machines()).map(MachineIndex::new);
        Self {
            next_operation: vec![0; model.num_jobs()],
            job_ready_times: vec![T::zero(); model.num_jobs()],
            machine_ready_times: vec![T::zero(); model.num_machines()],
            machine_remaining_work: machines.clone().map(|m| model.machine_workload(m)).collect(),
            machine_pending_operations: machines
                .map(|m| model.machine_operations(m).len())
                .collect(),
            start_times: vec![T::zero(); model.num_operations()],
            makespan: T::zero(),
            num_scheduled: 0,
        }
    }

    /// Returns the number of jobs.
    #[inline]
    pub fn num_jobs(&self) -> usize {
        self.next_operation.len()
    }

    /// Returns the number of machines.
    #[inline]
    pub fn num_machines(&self) -> usize {
        self.machine_ready_times.len()
    }

    /// Returns the total number of operations of the model.
    #[inline]
    pub fn num_operations(&self) -> usize {
        self.start_times.len()
    }

    /// Returns the number of fixed operations, which equals the depth of the node.
    #[inline]
    pub fn num_scheduled(&self) -> usize {
        self.num_scheduled
    }

    /// Returns `true` once every operation is fixed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.num_scheduled == self.start_times.len()
    }

    /// Returns the largest completion time among fixed operations.
    #[inline]
    pub fn makespan(&self) -> T {
        self.makespan
    }

    /// Returns the position of the next unscheduled operation of `job`.
    #[inline]
    pub fn next_operation(&self, job: JobIndex) -> usize {
        let index = job.get();
        debug_assert!(
            index < self.num_jobs(),
            "called `SearchState::next_operation` with job index out of bounds: the len is {} but the index is {}",
            self.num_jobs(),
            index
        );

        self.next_operation[index]
    }

    /// Returns the position of the next unscheduled operation of `job` without bounds checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `job` is in `0..num_jobs()`.
    #[inline]
    pub unsafe fn next_operation_unchecked(&self, job: JobIndex) -> usize {
        debug_assert!(
            job.get() < self.num_jobs(),
            "called `SearchState::next_operation_unchecked` with job index out of bounds: the len is {} but the index is {}",
            self.num_jobs(),
            job.get()
        );

        unsafe { *self.next_operation.get_unchecked(job.get()) }
    }

    /// Returns the completion time of the last fixed operation of `job`.
    #[inline]
    pub fn job_ready_time(&self, job: JobIndex) -> T {
        let index = job.get();
        debug_assert!(
            index < self.num_jobs(),
            "called `SearchState::job_ready_time` with job index out of bounds: the len is {} but the index is {}",
            self.num_jobs(),
            index
        );

        self.job_ready_times[index]
    }

    /// Returns the completion time of the last operation fixed on `machine`.
    #[inline]
    pub fn machine_ready_time(&self, machine: MachineIndex) -> T {
        let index = machine.get();
        debug_assert!(
            index < self.num_machines(),
            "called `SearchState::machine_ready_time` with machine index out of bounds: the len is {} but the index is {}",
            self.num_machines(),
            index
        );

        self.machine_ready_times[index]
    }

    /// Returns the summed duration of unscheduled operations on `machine`.
    #[inline]
    pub fn machine_remaining_work(&self, machine: MachineIndex) -> T {
        let index = machine.get();
        debug_assert!(
            index < self.num_machines(),
            "called `SearchState::machine_remaining_work` with machine index out of bounds: the len is {} but the index is {}",
            self.num_machines(),
            index
        );

        self.machine_remaining_work[index]
    }

    /// Returns how many unscheduled operations still need `machine`.
    #[inline]
    pub fn machine_pending_operations(&self, machine: MachineIndex) -> usize {
        let index = machine.get();
        debug_assert!(
            index < self.num_machines(),
            "called `SearchState::machine_pending_operations` with machine index out of bounds: the len is {} but the index is {}",
            self.num_machines(),
            index
        );

        self.machine_pending_operations[index]
    }

    /// Returns the flattened start times. Entries of unscheduled operations are meaningless.
    #[inline]
    pub fn start_times(&self) -> &[T] {
        &self.start_times
    }

    /// Fixes the next operation of `job` on `machine` at `start` for `duration`.
    ///
    /// Only `SearchTrail` calls this, after recording the values it overwrites.
    ///
    /// # Safety
    ///
    /// `job` and `machine` must be in bounds, `offset` must be the flattened
    /// index of the job's next operation, and that operation must run on `machine`.
    #[inline]
    pub(crate) unsafe fn schedule_operation(
        &mut self,
        job: JobIndex,
        machine: MachineIndex,
        offset: usize,
        start: T,
        duration: T,
    ) {
        debug_assert!(
            job.get() < self.num_jobs(),
            "called `SearchState::schedule_operation` with job index out of bounds: the len is {} but the index is {}",
            self.num_jobs(),
            job.get()
        );
        debug_assert!(
            machine.get() < self.num_machines(),
            "called `SearchState::schedule_operation` with machine index out of bounds: the len is {} but the index is {}",
            self.num_machines(),
            machine.get()
        );
        debug_assert!(
            offset < self.num_operations(),
            "called `SearchState::schedule_operation` with offset out of bounds: the len is {} but the index is {}",
            self.num_operations(),
            offset
        );
        debug_assert!(
            !self.is_complete(),
            "called `SearchState::schedule_operation` on a complete state"
        );

        let (j, m) = (job.get(), machine.get());
        let end = start.saturating_add(duration);
        unsafe {
            *self.next_operation.get_unchecked_mut(j) += 1;
            *self.job_ready_times.get_unchecked_mut(j) = end;
            *self.machine_ready_times.get_unchecked_mut(m) = end;
            let remaining = self.machine_remaining_work.get_unchecked_mut(m);
            *remaining = remaining.saturating_sub(duration);
            *self.machine_pending_operations.get_unchecked_mut(m) -= 1;
            *self.start_times.get_unchecked_mut(offset) = start;
        }
        self.makespan = self.makespan.max(end);
        self.num_scheduled += 1;
    }

    /// Reverts the most recent `schedule_operation` of `job` on `machine`.
    ///
    /// # Safety
    ///
    /// Must be called with the values recorded before the matching
    /// `schedule_operation`, in reverse order of application.
    #[inline]
    pub(crate) unsafe fn unschedule_operation(
        &mut self,
        job: JobIndex,
        machine: MachineIndex,
        duration: T,
        previous: PreviousTimes<T>,
    ) {
        debug_assert!(
            self.num_scheduled > 0,
            "called `SearchState::unschedule_operation` on the root state"
        );

        let (j, m) = (job.get(), machine.get());
        unsafe {
            *self.next_operation.get_unchecked_mut(j) -= 1;
            *self.job_ready_times.get_unchecked_mut(j) = previous.job_ready;
            *self.machine_ready_times.get_unchecked_mut(m) = previous.machine_ready;
            let remaining = self.machine_remaining_work.get_unchecked_mut(m);
            *remaining = remaining.saturating_add(duration);
            *self.machine_pending_operations.get_unchecked_mut(m) += 1;
        }
        self.makespan = previous.makespan;
        self.num_scheduled -= 1;
    }

    /// Converts a complete state into a `Schedule`. Returns `None` while
    /// operations are still unscheduled.
    pub fn to_schedule(&self) -> Option<Schedule<T>> {
        self.is_complete()
            .then(|| Schedule::new(self.makespan, self.start_times.clone()))
    }
}

/// The values `schedule_operation` overwrites, kept to undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PreviousTimes<T> {
    pub job_ready: T,
    pub machine_ready: T,
    pub makespan: T,
}

impl<T> std::fmt::Display for SearchState<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState(scheduled: {}/{}, makespan: {})",
            self.num_scheduled,
            self.num_operations(),
            self.makespan
        )
    }
}
