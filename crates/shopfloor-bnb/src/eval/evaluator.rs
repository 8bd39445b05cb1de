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

use crate::state::SearchState;
use num_traits::{PrimInt, Signed};
use shopfloor_model::model::Model;

/// Computes an admissible lower bound on the final makespan of a node.
///
/// The engine calls `lower_bound` once per expanded node and prunes the node
/// when the result is at least the incumbent makespan. Implementations may
/// keep scratch buffers, hence `&mut self`, but must not carry information
/// from one node to the next.
pub trait BoundEvaluator<T>
where
    T: PrimInt + Signed,
{
    /// Returns the name of the evaluator.
    fn name(&self) -> &str;

    /// Returns a value no larger than the makespan of any complete schedule
    /// reachable from `state`.
    fn lower_bound(&mut self, model: &Model<T>, state: &SearchState<T>) -> T;
}

impl<T> std::fmt::Debug for dyn BoundEvaluator<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundEvaluator({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn BoundEvaluator<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundEvaluator({})", self.name())
    }
}

/// Returns the makespan of the fixed operations and nothing else.
///
/// Turns the engine into a plain enumeration that only cuts branches whose
/// partial makespan already reaches the incumbent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrivialBound;

impl TrivialBound {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> BoundEvaluator<T> for TrivialBound
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "TrivialBound"
    }

    #[inline]
    fn lower_bound(&mut self, _model: &Model<T>, state: &SearchState<T>) -> T {
        state.makespan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfloor_model::{
        index::{JobIndex, MachineIndex},
        model::ModelBuilder,
    };

    #[test]
    fn test_trivial_bound_is_current_makespan() {
        let mut b = ModelBuilder::<i64>::new(1, 1);
        b.add_operation(JobIndex::new(0), MachineIndex::new(0), 7);
        let model = b.build().unwrap();
        let state = SearchState::new(&model);

        let mut bound = TrivialBound::new();
        assert_eq!(bound.lower_bound(&model, &state), 0);
        let dyn_bound: &dyn BoundEvaluator<i64> = &bound;
        assert_eq!(format!("{}", dyn_bound), "BoundEvaluator(TrivialBound)");
    }
}
