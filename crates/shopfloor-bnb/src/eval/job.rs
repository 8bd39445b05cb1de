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

//! Job path bound.
//!
//! A job cannot finish before its ready time plus the processing time of all
//! its unscheduled operations. The bound is the maximum of that quantity over
//! all jobs, and never less than the makespan already committed. Remaining
//! work comes from the suffix sums precomputed by `Model`, so the bound costs
//! `O(num_jobs)` per node.

use crate::{eval::evaluator::BoundEvaluator, state::SearchState};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{index::JobIndex, model::Model};

/// `max_j (job_ready(j) + remaining_work(j, next_op(j)))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobPathBound;

impl JobPathBound {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> BoundEvaluator<T> for JobPathBound
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "JobPathBound"
    }

    fn lower_bound(&mut self, model: &Model<T>, state: &SearchState<T>) -> T {
        let mut bound = state.makespan();
        for j in 0..model.num_jobs() {
            let job = JobIndex::new(j);
            let next = unsafe { state.next_operation_unchecked(job) };
            let finish = state
                .job_ready_time(job)
                .saturating_add(model.remaining_work(job, next));
            bound = bound.max(finish);
        }
        bound
    }
}
