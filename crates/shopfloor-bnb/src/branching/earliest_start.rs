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

//! Earliest-start branching
//!
//! Prefers the open operation that can start soonest, which mimics the
//! Giffler-Thompson style of building active schedules from left to right.
//! Ties on the start time go to the operation that finishes first, then to
//! the lower job index.

use crate::{
    branching::decision::{Candidate, CandidateIter, Decision, DecisionBuilder},
    state::SearchState,
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{index::JobIndex, model::Model};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarliestStartCandidate<T> {
    decision: Decision<T>,
}

impl<T: PrimInt + Signed> Ord for EarliestStartCandidate<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (&self.decision, &other.decision);
        a.start_time()
            .cmp(&b.start_time())
            .then_with(|| a.end_time().cmp(&b.end_time()))
            .then_with(|| a.job().cmp(&b.job()))
    }
}

impl<T: PrimInt + Signed> PartialOrd for EarliestStartCandidate<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Copy> Candidate<T> for EarliestStartCandidate<T> {
    #[inline(always)]
    fn decision(&self) -> Decision<T> {
        self.decision
    }
}

/// Smallest earliest start first.
#[derive(Debug, Clone, Default)]
pub struct EarliestStartBuilder<T> {
    candidates: Vec<EarliestStartCandidate<T>>,
}

impl<T> EarliestStartBuilder<T> {
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

impl<T> DecisionBuilder<T> for EarliestStartBuilder<T>
where
    T: PrimInt + Signed,
{
    type DecisionIterator<'a>
        = CandidateIter<'a, T, EarliestStartCandidate<T>>
    where
        Self: 'a,
        T: 'a;

    fn name(&self) -> &str {
        "EarliestStartBuilder"
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
            if position < model.num_job_operations(job) {
                let decision = unsafe { Decision::for_job_unchecked(model, state, job, position) };
                self.candidates.push(EarliestStartCandidate { decision });
            }
        }
        self.candidates.sort_unstable();
        CandidateIter::new(&self.candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfloor_model::{index::MachineIndex, model::ModelBuilder};

    type IntegerType = i64;

    #[test]
    fn test_orders_by_start_then_end_then_job() {
        let mut b = ModelBuilder::<IntegerType>::new(3, 2);
        b.add_operations(JobIndex::new(0), [(MachineIndex::new(0), 4), (MachineIndex::new(1), 1)]);
        b.add_operations(JobIndex::new(1), [(MachineIndex::new(0), 2), (MachineIndex::new(1), 1)]);
        b.add_operations(JobIndex::new(2), [(MachineIndex::new(1), 3), (MachineIndex::new(0), 1)]);
        let model = b.build().unwrap();
        let mut state = SearchState::new(&model);
        let mut builder = EarliestStartBuilder::new();

        let jobs: Vec<_> = builder
            .next_decision(&model, &state)
            .map(|d| d.job().get())
            .collect();
        // All start at 0; ends are 4, 2, 3.
        assert_eq!(jobs, vec![1, 2, 0]);

        // Occupy M0 until 2. J2 still starts at 0; J1 (2..3) and J0 (2..6)
        // share a start and are ordered by their ends.
        let mut trail = crate::trail::SearchTrail::new();
        trail.push_frame();
        let d = Decision::for_job(&model, &state, JobIndex::new(1)).unwrap();
        trail.apply(&mut state, &model, &d);

        let decisions: Vec<_> = builder.next_decision(&model, &state).collect();
        assert_eq!(decisions.len(), 3);
        assert_eq!(decisions[0].job(), JobIndex::new(2));
        assert_eq!(decisions[1].job(), JobIndex::new(1));
        assert_eq!(decisions[1].end_time(), 3);
        assert_eq!(decisions[2].job(), JobIndex::new(0));
        assert_eq!(decisions[2].start_time(), 2);
        assert_eq!(builder.name(), "EarliestStartBuilder");
    }
}
