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

//! Critical-work branching
//!
//! Orders the open jobs so that the search first continues the job with the
//! most work still ahead of it. Those jobs are the ones most likely to end up
//! on the critical path, so fixing them early tends to produce a strong
//! incumbent quickly.
//!
//! Ties are broken by bottleneck pressure (how many other operations still
//! wait for the same machine), then by the shorter duration, and finally by
//! job index so that traversal is deterministic.
//!
//! Produces a fused iterator of decisions; once exhausted, `next()` returns `None`.

use crate::{
    branching::decision::{Candidate, CandidateIter, Decision, DecisionBuilder},
    state::SearchState,
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{index::JobIndex, model::Model};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityCandidate<T> {
    remaining_work: T, // Primary Key (Descending)
    pressure: usize,   // Descending
    decision: Decision<T>,
}

impl<T: PrimInt + Signed> Ord for PriorityCandidate<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .remaining_work
            .cmp(&self.remaining_work)
            .then_with(|| other.pressure.cmp(&self.pressure))
            .then_with(|| self.decision.duration().cmp(&other.decision.duration()))
            .then_with(|| self.decision.job().cmp(&other.decision.job()))
    }
}

impl<T: PrimInt + Signed> PartialOrd for PriorityCandidate<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Copy> Candidate<T> for PriorityCandidate<T> {
    #[inline(always)]
    fn decision(&self) -> Decision<T> {
        self.decision
    }
}

/// Most remaining job work first, then highest machine pressure, then
/// shortest duration, then lowest job index.
#[derive(Debug, Clone, Default)]
pub struct PriorityBuilder<T> {
    candidates: Vec<PriorityCandidate<T>>,
}

impl<T> PriorityBuilder<T> {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    pub fn preallocated(num_jobs: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(num_jobs),
        }
    }
}

impl<T> DecisionBuilder<T> for PriorityBuilder<T>
where
    T: PrimInt + Signed,
{
    type DecisionIterator<'a>
        = CandidateIter<'a, T, PriorityCandidate<T>>
    where
        Self: 'a,
        T: 'a;

    fn name(&self) -> &str {
        "PriorityBuilder"
    }

    fn next_decision<'a>(
        &'a mut self,
        model: &'a Model<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a> {
        self.candidates.clear();
        for j in 0..model.num_jobs() {
            let job = JobIndex::new(j);
            let position = unsafe { state.next_operation_unchecked(job) };
            if position >= model.num_job_operations(job) {
                continue;
            }

            let decision = unsafe { Decision::for_job_unchecked(model, state, job, position) };
            // The candidate itself is among the pending operations of its machine.
            let pressure = state
                .machine_pending_operations(decision.machine())
                .saturating_sub(1);
            self.candidates.push(PriorityCandidate {
                remaining_work: model.remaining_work(job, position),
                pressure,
                decision,
            });
        }
        self.candidates.sort_unstable();
        CandidateIter::new(&self.candidates)
    }
}
