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

//! Maximum of two bounds.
//!
//! The maximum of two admissible bounds is admissible and at least as tight
//! as either one. `CombinedBound::standard` pairs the job path bound with the
//! machine sequencing bound, which is what the solver uses by default.

use crate::{
    eval::{evaluator::BoundEvaluator, job::JobPathBound, machine::MachineSequencingBound},
    state::SearchState,
};
use num_traits::{PrimInt, Signed};
use shopfloor_model::model::Model;

/// Evaluates both bounds and returns the larger one.
#[derive(Debug, Clone)]
pub struct CombinedBound<A, B> {
    first: A,
    second: B,
    name: String,
}

impl<A, B> CombinedBound<A, B> {
    /// Combines `first` and `second`.
    pub fn new<T>(first: A, second: B) -> Self
    where
        T: PrimInt + Signed,
        A: BoundEvaluator<T>,
        B: BoundEvaluator<T>,
    {
        let name = format!("CombinedBound({}, {})", first.name(), second.name());
        Self {
            first,
            second,
            name,
        }
    }

    /// Returns the first bound.
    #[inline]
    pub fn first(&self) -> &A {
        &self.first
    }

    /// Returns the second bound.
    #[inline]
    pub fn second(&self) -> &B {
        &self.second
    }
}

impl<T> CombinedBound<JobPathBound, MachineSequencingBound<T>>
where
    T: PrimInt + Signed,
{
    /// The job path bound combined with the machine sequencing bound.
    pub fn standard() -> Self {
        Self::new::<T>(JobPathBound::new(), MachineSequencingBound::new())
    }
}

impl<T, A, B> BoundEvaluator<T> for CombinedBound<A, B>
where
    T: PrimInt + Signed,
    A: BoundEvaluator<T>,
    B: BoundEvaluator<T>,
{
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn lower_bound(&mut self, model: &Model<T>, state: &SearchState<T>) -> T {
        let a = self.first.lower_bound(model, state);
        let b = self.second.lower_bound(model, state);
        a.max(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::machine::MachineWorkloadBound;
    use shopfloor_model::{
        index::{JobIndex, MachineIndex},
        model::ModelBuilder,
    };

    type IntegerType = i64;

    #[test]
    fn test_combined_takes_the_maximum() {
        // One long job and a crowded machine.
        let mut b = ModelBuilder::<IntegerType>::new(3, 2);
        b.add_operations(JobIndex::new(0), [(MachineIndex::new(1), 10)]);
        b.add_operations(JobIndex::new(1), [(MachineIndex::new(0), 4)]);
        b.add_operations(JobIndex::new(2), [(MachineIndex::new(0), 4)]);
        let model = b.build().unwrap();
        let state = SearchState::new(&model);

        let mut job_first = CombinedBound::new::<IntegerType>(JobPathBound, MachineWorkloadBound);
        assert_eq!(job_first.lower_bound(&model, &state), 10);

        let mut b = ModelBuilder::<IntegerType>::new(2, 1);
        b.add_operation(JobIndex::new(0), MachineIndex::new(0), 3)
            .add_operation(JobIndex::new(1), MachineIndex::new(0), 3);
        let model = b.build().unwrap();
        let state = SearchState::new(&model);
        assert_eq!(job_first.lower_bound(&model, &state), 6);
    }

    #[test]
    fn test_standard_name() {
        let bound = CombinedBound::<JobPathBound, MachineSequencingBound<IntegerType>>::standard();
        assert_eq!(
            BoundEvaluator::<IntegerType>::name(&bound),
            "CombinedBound(JobPathBound, MachineSequencingBound)"
        );
    }
}
