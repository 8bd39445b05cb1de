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

//! Branching decisions and the `DecisionBuilder` interface.
//!
//! A `Decision` fixes the next unscheduled operation of one job at its
//! earliest feasible start, `max(job ready time, machine ready time)`. Every
//! unfinished job yields exactly one decision per node, so the children of a
//! node are in one-to-one correspondence with its unfinished jobs.
//!
//! Appending operations this way enumerates every semi-active schedule, and
//! some semi-active schedule is always optimal for the makespan. Builders only
//! choose the order in which children are explored; they never drop one.

use crate::state::SearchState;
use num_traits::{PrimInt, Signed};
use shopfloor_model::{
    index::{JobIndex, MachineIndex},
    model::Model,
};
use std::{iter::FusedIterator, marker::PhantomData};

/// Fix operation `position` of `job` on `machine` from `start_time` for `duration`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decision<T> {
    start_time: T,
    duration: T,
    job: JobIndex,
    machine: MachineIndex,
    position: usize,
}

impl<T> Decision<T>
where
    T: PrimInt + Signed,
{
    /// Creates a new decision.
    #[inline(always)]
    pub fn new(
        job: JobIndex,
        position: usize,
        machine: MachineIndex,
        start_time: T,
        duration: T,
    ) -> Self {
        Self {
            start_time,
            duration,
            job,
            machine,
            position,
        }
    }

    /// Builds the decision that fixes the next operation of `job` in `state`.
    /// Returns `None` if the job is finished.
    #[inline]
    pub fn for_job(model: &Model<T>, state: &SearchState<T>, job: JobIndex) -> Option<Self> {
        let position = state.next_operation(job);
        if position >= model.num_job_operations(job) {
            return None;
        }
        // SAFETY: `job` was bounds-checked by `next_operation` and `position` above.
        Some(unsafe { Self::for_job_unchecked(model, state, job, position) })
    }

    /// Builds the decision for operation `position` of `job` without checks.
    ///
    /// # Safety
    ///
    /// `job` must be in bounds and `position` must be the job's next,
    /// still unscheduled operation.
    #[inline(always)]
    pub unsafe fn for_job_unchecked(
        model: &Model<T>,
        state: &SearchState<T>,
        job: JobIndex,
        position: usize,
    ) -> Self {
        let op = unsafe { model.operation_unchecked(job, position) };
        let start_time = state
            .job_ready_time(job)
            .max(state.machine_ready_time(op.machine()));
        Self::new(job, position, op.machine(), start_time, op.duration())
    }

    #[inline(always)]
    pub fn job(&self) -> JobIndex {
        self.job
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline(always)]
    pub fn machine(&self) -> MachineIndex {
        self.machine
    }

    #[inline(always)]
    pub fn start_time(&self) -> T {
        self.start_time
    }

    #[inline(always)]
    pub fn duration(&self) -> T {
        self.duration
    }

    /// `start_time + duration`, saturating.
    #[inline(always)]
    pub fn end_time(&self) -> T {
        self.start_time.saturating_add(self.duration)
    }
}

impl<T> std::fmt::Display for Decision<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decision(J{}.{} on M{}, start: {}, duration: {})",
            self.job.get(),
            self.position,
            self.machine.get(),
            self.start_time,
            self.duration
        )
    }
}

/// Iterates over the decision of every unfinished job, in job order.
pub fn open_decisions<'a, T>(
    model: &'a Model<T>,
    state: &'a SearchState<T>,
) -> impl Iterator<Item = Decision<T>> + 'a
where
    T: PrimInt + Signed,
{
    (0..model.num_jobs()).filter_map(move |j| Decision::for_job(model, state, JobIndex::new(j)))
}

/// Produces the children of a node in the order they should be explored.
///
/// The iterator must yield one decision per unfinished job, most promising first.
pub trait DecisionBuilder<T>
where
    T: PrimInt + Signed,
{
    type DecisionIterator<'a>: Iterator<Item = Decision<T>> + FusedIterator + 'a
    where
        Self: 'a,
        T: 'a;

    /// Returns the name of the builder.
    fn name(&self) -> &str;

    /// Returns the decisions for the children of `state`.
    fn next_decision<'a>(
        &'a mut self,
        model: &'a Model<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a>;
}

/// A sortable entry of a builder's scratch buffer that carries a decision.
pub trait Candidate<T> {
    fn decision(&self) -> Decision<T>;
}

/// Iterator over a builder's sorted candidate buffer.
pub struct CandidateIter<'a, T, C> {
    iter: std::slice::Iter<'a, C>,
    _marker: PhantomData<T>,
}

impl<'a, T, C> CandidateIter<'a, T, C> {
    #[inline]
    pub fn new(candidates: &'a [C]) -> Self {
        Self {
            iter: candidates.iter(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T, C> Iterator for CandidateIter<'a, T, C>
where
    C: Candidate<T>,
{
    type Item = Decision<T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(Candidate::decision)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, T, C> ExactSizeIterator for CandidateIter<'a, T, C> where C: Candidate<T> {}
impl<'a, T, C> FusedIterator for CandidateIter<'a, T, C> where C: Candidate<T> {}
