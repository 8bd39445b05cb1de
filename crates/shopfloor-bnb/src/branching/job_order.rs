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

//! Job-order branching
//!
//! Emits the next operation of every unfinished job in ascending job index,
//! without looking at any property of the instance. Useful as a reproducible
//! baseline and for exhaustive enumeration in tests.

use crate::{
    branching::decision::{Decision, DecisionBuilder},
    state::SearchState,
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::{index::JobIndex, model::Model};
use std::iter::FusedIterator;

/// Branches on jobs in ascending index order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobOrderBuilder;

impl JobOrderBuilder {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> DecisionBuilder<T> for JobOrderBuilder
where
    T: PrimInt + Signed,
{
    type DecisionIterator<'a>
        = JobOrderIter<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn name(&self) -> &str {
        "JobOrderBuilder"
    }

    fn next_decision<'a>(
        &'a mut self,
        model: &'a Model<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a> {
        JobOrderIter {
            model,
            state,
            next_job: 0,
        }
    }
}

/// Walks the jobs lazily; no scratch buffer needed.
pub struct JobOrderIter<'a, T> {
    model: &'a Model<T>,
    state: &'a SearchState<T>,
    next_job: usize,
}

impl<'a, T> Iterator for JobOrderIter<'a, T>
where
    T: PrimInt + Signed,
{
    type Item = Decision<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_job < self.model.num_jobs() {
            let job = JobIndex::new(self.next_job);
            self.next_job += 1;
            if let Some(decision) = Decision::for_job(self.model, self.state, job) {
                return Some(decision);
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.model.num_jobs() - self.next_job))
    }
}

impl<'a, T> FusedIterator for JobOrderIter<'a, T> where T: PrimInt + Signed {}
